use super::edge::Edge;
use super::mode::TraverseMode;
use super::transit::{TripId, TripTimes};
use super::vertex::{Vertex, VertexKind};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// one node along a computed path: the vertex reached, the edge and mode
/// used to reach it, and cumulative trip metrics. immutable; owned by the
/// input path for the duration of one conversion.
#[derive(Debug, Clone)]
pub struct TraversalState {
    pub vertex: Arc<Vertex>,
    pub back_edge: Option<Arc<Edge>>,
    pub back_mode: Option<TraverseMode>,
    pub time: DateTime<Utc>,
    /// cumulative path cost.
    pub weight: f64,
    /// cumulative walked/biked/driven meters.
    pub walk_distance: f64,
    pub num_boardings: u32,
    pub bike_renting: bool,
    /// scheduled trip context while on board.
    pub back_trip: Option<TripId>,
    pub trip_times: Option<Arc<TripTimes>>,
    pub service_day: Option<NaiveDate>,
    /// headsign supplied by the boarding edge, preferred over the trip default.
    pub back_direction: Option<String>,
}

impl TraversalState {
    /// whether more than one street left the vertex this state sits at.
    /// used for roundabout exit counting and silent-turn narration.
    pub fn multiple_options_before(&self) -> bool {
        self.vertex
            .street()
            .map(|sv| sv.outgoing_streets.len() > 1)
            .unwrap_or(false)
    }
}

/// an ordered sequence of traversal states produced by the upstream path
/// search. state `i+1` carries the edge traversed to reach it from state `i`.
#[derive(Debug, Clone)]
pub struct TraversedPath {
    pub states: Vec<TraversalState>,
}

impl TraversedPath {
    pub fn new(states: Vec<TraversalState>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[TraversalState] {
        &self.states
    }

    pub fn start_vertex(&self) -> Option<&Arc<Vertex>> {
        self.states.first().map(|s| &s.vertex)
    }

    pub fn end_vertex(&self) -> Option<&Arc<Vertex>> {
        self.states.last().map(|s| &s.vertex)
    }

    /// back edges of every state after the first, in path order.
    pub fn edges(&self) -> impl Iterator<Item = &Arc<Edge>> {
        self.states.iter().skip(1).filter_map(|s| s.back_edge.as_ref())
    }

    /// true when the path begins already aboard a vehicle.
    pub fn starts_onboard(&self) -> bool {
        self.states
            .first()
            .map(|s| matches!(s.vertex.kind, VertexKind::OnboardDepart))
            .unwrap_or(false)
    }
}
