//! builds rider-facing trip itineraries from computed multimodal graph
//! paths: leg slicing, turn-by-turn walk narration, transit metadata
//! resolution, service alert overlay, and itinerary assembly.

pub mod convert;
pub mod index;
pub mod model;

#[cfg(test)]
pub(crate) mod testlib;
