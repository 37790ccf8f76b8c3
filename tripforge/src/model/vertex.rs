use super::transit::StopId;
use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// summary of one street departing a vertex, used when deciding whether a
/// silent same-name turn needs narration and when counting roundabout exits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingStreet {
    pub name: String,
    /// heading of the street's first segment, radians clockwise from north.
    pub first_angle: f64,
}

/// street-network vertex detail. adjacency summaries are precomputed by the
/// graph the caller supplies; conversion never walks the graph itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreetVertex {
    /// generated "corner of A & B" label for intersections.
    pub intersection_name: Option<String>,
    /// true for synthetic request endpoints, which keep their request name.
    pub endpoint: bool,
    /// nearest connected transit stop (id, display name), present on
    /// mode-transition vertices such as station link points.
    pub linked_stop: Option<(StopId, String)>,
    pub outgoing_streets: Vec<OutgoingStreet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VertexKind {
    Street(StreetVertex),
    TransitStop { stop: StopId },
    BikeRental { station_id: String },
    BikePark { park_id: String },
    ParkAndRide { park_id: String },
    Exit { exit_name: String },
    /// the itinerary begins already aboard a vehicle.
    OnboardDepart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// stable identifier, also the display fallback when `name` is unset.
    pub label: String,
    pub name: Option<String>,
    pub coord: Coord<f64>,
    pub kind: VertexKind,
}

impl Vertex {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.label)
    }

    pub fn street(&self) -> Option<&StreetVertex> {
        match &self.kind {
            VertexKind::Street(sv) => Some(sv),
            _ => None,
        }
    }

    pub fn stop_id(&self) -> Option<&StopId> {
        match &self.kind {
            VertexKind::TransitStop { stop } => Some(stop),
            _ => None,
        }
    }
}
