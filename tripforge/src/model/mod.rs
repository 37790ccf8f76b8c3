pub mod alert;
pub mod booking;
pub mod edge;
pub mod itinerary;
pub mod leg;
pub mod mode;
pub mod place;
pub mod transit;
pub mod traversal_state;
pub mod vertex;
pub mod walk_step;

pub use mode::TraverseMode;
pub use traversal_state::{TraversalState, TraversedPath};
