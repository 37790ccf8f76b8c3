use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// travel mode recorded on the edge used to reach a traversal state.
///
/// `LegSwitch` is a pseudo-mode marking connector spans between rider-visible
/// legs; it never materializes as a leg of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraverseMode {
    Walk,
    Bicycle,
    Car,
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    LegSwitch,
}

impl TraverseMode {
    /// true for scheduled transit modes.
    pub fn is_transit(&self) -> bool {
        use TraverseMode as M;
        matches!(
            self,
            M::Tram | M::Subway | M::Rail | M::Bus | M::Ferry | M::CableCar | M::Gondola | M::Funicular
        )
    }

    /// true for surface modes that produce turn-by-turn narration.
    pub fn is_on_street(&self) -> bool {
        matches!(self, TraverseMode::Walk | TraverseMode::Bicycle | TraverseMode::Car)
    }
}

impl Display for TraverseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TraverseMode::Walk => "WALK",
            TraverseMode::Bicycle => "BICYCLE",
            TraverseMode::Car => "CAR",
            TraverseMode::Tram => "TRAM",
            TraverseMode::Subway => "SUBWAY",
            TraverseMode::Rail => "RAIL",
            TraverseMode::Bus => "BUS",
            TraverseMode::Ferry => "FERRY",
            TraverseMode::CableCar => "CABLE_CAR",
            TraverseMode::Gondola => "GONDOLA",
            TraverseMode::Funicular => "FUNICULAR",
            TraverseMode::LegSwitch => "LEG_SWITCH",
        };
        write!(f, "{}", s)
    }
}
