mod alert_overlay;
mod assemble;
mod convert_error;
mod fixup_ops;
mod geometry_ops;
mod leg_builder;
mod slice_ops;
mod walk_step_narrator;


pub use assemble::{convert_itinerary, generate_plan};
pub use convert_error::ConvertError;
pub use slice_ops::slice_states;
pub use walk_step_narrator::WalkStepNarrator;

use crate::index::{FareService, TransitIndex};
use chrono::FixedOffset;

/// read-only collaborators for one conversion call. passing them explicitly
/// keeps conversion pure and parallelizable across paths.
pub struct ConvertContext<'a> {
    pub index: &'a dyn TransitIndex,
    pub fare: Option<&'a dyn FareService>,
    /// agency timezone applied to every rider-facing timestamp.
    pub timezone: FixedOffset,
    /// geoid-vs-ellipsoid height difference for elevation correction.
    pub ellipsoid_to_geoid_difference: f64,
}

/// per-request conversion options.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub show_intermediate_stops: bool,
    /// attach alerts even when their effective window misses the leg.
    pub disable_alert_filtering: bool,
    /// meters beyond which `walk_limit_exceeded` is flagged.
    pub max_walk_distance: f64,
    /// meters per second, used when replaying stored transfer edges.
    pub walk_speed: f64,
    /// apply the geoid height correction to elevation samples.
    pub geoid_elevation: bool,
    /// the names the rider typed for the endpoints, if any.
    pub from_name: Option<String>,
    pub to_name: Option<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            show_intermediate_stops: false,
            disable_alert_filtering: false,
            max_walk_distance: f64::INFINITY,
            walk_speed: 1.33,
            geoid_elevation: false,
            from_name: None,
            to_name: None,
        }
    }
}
