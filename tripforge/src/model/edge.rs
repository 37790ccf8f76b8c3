use geo_types::LineString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// per-sample (distance along edge, height) pairs. profiles tagged with a
/// third dimension exist in some graphs; elevation aggregation ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationProfile {
    pub samples: Vec<(f64, f64)>,
    pub dimensions: u8,
}

impl ElevationProfile {
    pub fn two_dimensional(samples: Vec<(f64, f64)>) -> Self {
        Self {
            samples,
            dimensions: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreetDetail {
    pub roundabout: bool,
    /// minor link road (ramp/connector) class.
    pub link: bool,
    /// open area (plaza) traversal.
    pub area: bool,
    pub elevation: Option<ElevationProfile>,
}

/// one hop of a scheduled pattern. `stop_index` references the hop's origin
/// stop within the pattern; alighting ends therefore read `stop_index + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitHopDetail {
    pub stop_index: usize,
    /// partial hops are demand-responsive portions of a scheduled hop.
    pub partial: bool,
    pub flag_stop_board: bool,
    pub flag_stop_alight: bool,
    pub deviated_board: bool,
    pub deviated_alight: bool,
    pub board_area: Option<LineString<f64>>,
    pub alight_area: Option<LineString<f64>>,
    /// unconstrained vehicle seconds for partial hops.
    pub direct_time: Option<i64>,
    /// direct demand-responsive (call-and-ride) hop.
    pub call_and_ride: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub stay_seated: bool,
    pub guaranteed: bool,
}

/// closed enumeration of edge kinds the conversion pipeline dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EdgeKind {
    Street(StreetDetail),
    /// zero-cost connector, invisible in narration.
    Free,
    /// explicit leg-switching connector between legs.
    LegSwitch,
    /// station pathway traversal.
    Pathway,
    /// alighting from an elevator; names the destination floor.
    ElevatorAlight { floor: String },
    TransitHop(TransitHopDetail),
    /// same vehicle continues under a different scheduled trip.
    InterlineDwell,
    TimedTransfer(TransferDetails),
    /// pre-computed transfer carrying its constituent street edges.
    SimpleTransfer { edges: Vec<Arc<Edge>> },
    RentBikeOn,
    RentBikeOff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub name: String,
    /// synthetic placeholder name ("path", "service road"), not a real one.
    pub bogus_name: bool,
    /// meters.
    pub distance: f64,
    pub geometry: Option<LineString<f64>>,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn street(&self) -> Option<&StreetDetail> {
        match &self.kind {
            EdgeKind::Street(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn transit_hop(&self) -> Option<&TransitHopDetail> {
        match &self.kind {
            EdgeKind::TransitHop(detail) => Some(detail),
            _ => None,
        }
    }

    pub fn is_roundabout(&self) -> bool {
        self.street().map(|s| s.roundabout).unwrap_or(false)
    }

    pub fn is_link(&self) -> bool {
        self.street().map(|s| s.link).unwrap_or(false)
    }

    pub fn is_area(&self) -> bool {
        self.street().map(|s| s.area).unwrap_or(false)
    }

    pub fn elevation(&self) -> Option<&ElevationProfile> {
        self.street().and_then(|s| s.elevation.as_ref())
    }

    /// the name with any parenthetical suffix removed; narration treats
    /// "Main St (north)" and "Main St (south)" as the same street.
    pub fn name_no_parens(&self) -> &str {
        name_no_parens(&self.name)
    }
}

pub fn name_no_parens(name: &str) -> &str {
    match name.find('(') {
        Some(idx) if idx > 0 => name[..idx].trim_end(),
        _ => name,
    }
}
