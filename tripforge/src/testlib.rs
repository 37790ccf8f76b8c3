//! fixtures shared by the conversion tests: small vertex/edge constructors
//! and a path builder that keeps state times and cumulative metrics honest.

use crate::model::edge::{Edge, EdgeKind, StreetDetail, TransitHopDetail};
use crate::model::mode::TraverseMode;
use crate::model::transit::{StopId, TripId, TripTimes};
use crate::model::traversal_state::TraversalState;
use crate::model::vertex::{OutgoingStreet, StreetVertex, Vertex, VertexKind};
use chrono::{DateTime, Duration, TimeZone, Utc};
use geo_types::{Coord, LineString};
use std::sync::Arc;

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 6, 1, 12, 0, 0).unwrap()
}

pub(crate) fn line(coords: &[(f64, f64)]) -> LineString<f64> {
    LineString::new(coords.iter().map(|(x, y)| Coord { x: *x, y: *y }).collect())
}

pub(crate) fn street_vertex(label: &str, x: f64, y: f64) -> Arc<Vertex> {
    Arc::new(Vertex {
        label: label.to_string(),
        name: None,
        coord: Coord { x, y },
        kind: VertexKind::Street(StreetVertex::default()),
    })
}

/// a street vertex with named outgoing streets, for turn narration tests.
pub(crate) fn vertex_with_streets(
    label: &str,
    x: f64,
    y: f64,
    streets: &[(&str, f64)],
) -> Arc<Vertex> {
    Arc::new(Vertex {
        label: label.to_string(),
        name: None,
        coord: Coord { x, y },
        kind: VertexKind::Street(StreetVertex {
            outgoing_streets: streets
                .iter()
                .map(|(name, angle)| OutgoingStreet {
                    name: name.to_string(),
                    first_angle: *angle,
                })
                .collect(),
            ..StreetVertex::default()
        }),
    })
}

pub(crate) fn stop_vertex(label: &str, stop: &str, x: f64, y: f64) -> Arc<Vertex> {
    Arc::new(Vertex {
        label: label.to_string(),
        name: Some(label.to_string()),
        coord: Coord { x, y },
        kind: VertexKind::TransitStop {
            stop: StopId::new(stop),
        },
    })
}

pub(crate) fn street_edge(name: &str, coords: &[(f64, f64)], distance: f64) -> Arc<Edge> {
    Arc::new(Edge {
        name: name.to_string(),
        bogus_name: false,
        distance,
        geometry: Some(line(coords)),
        kind: EdgeKind::Street(StreetDetail::default()),
    })
}

pub(crate) fn street_edge_with(
    name: &str,
    coords: &[(f64, f64)],
    distance: f64,
    detail: StreetDetail,
) -> Arc<Edge> {
    Arc::new(Edge {
        name: name.to_string(),
        bogus_name: false,
        distance,
        geometry: Some(line(coords)),
        kind: EdgeKind::Street(detail),
    })
}

/// zero-cost connector without geometry.
pub(crate) fn free_edge(name: &str) -> Arc<Edge> {
    Arc::new(Edge {
        name: name.to_string(),
        bogus_name: true,
        distance: 0.0,
        geometry: None,
        kind: EdgeKind::Free,
    })
}

/// the explicit leg-switching connector, distinct from plain free edges.
pub(crate) fn leg_switch_edge() -> Arc<Edge> {
    Arc::new(Edge {
        name: "leg switch".to_string(),
        bogus_name: true,
        distance: 0.0,
        geometry: None,
        kind: EdgeKind::LegSwitch,
    })
}

pub(crate) fn interline_dwell_edge() -> Arc<Edge> {
    Arc::new(Edge {
        name: "interline dwell".to_string(),
        bogus_name: true,
        distance: 0.0,
        geometry: None,
        kind: EdgeKind::InterlineDwell,
    })
}

pub(crate) fn hop_edge(name: &str, stop_index: usize, coords: &[(f64, f64)]) -> Arc<Edge> {
    Arc::new(Edge {
        name: name.to_string(),
        bogus_name: false,
        distance: 1000.0,
        geometry: Some(line(coords)),
        kind: EdgeKind::TransitHop(TransitHopDetail {
            stop_index,
            ..TransitHopDetail::default()
        }),
    })
}

pub(crate) fn scheduled_trip_times(n_stops: usize) -> Arc<TripTimes> {
    Arc::new(TripTimes {
        scheduled: true,
        stop_sequences: (0..n_stops as u32).map(|i| i + 1).collect(),
        departure_delays: vec![0; n_stops],
        arrival_delays: vec![0; n_stops],
        ..TripTimes::default()
    })
}

/// accumulates a state sequence one edge at a time. times advance by the
/// given seconds and walk distance accrues on street modes, so assembled
/// itineraries get consistent totals without per-test bookkeeping.
pub(crate) struct PathBuilder {
    states: Vec<TraversalState>,
    time: DateTime<Utc>,
}

impl PathBuilder {
    pub(crate) fn start_at(vertex: Arc<Vertex>) -> Self {
        let time = t0();
        Self {
            states: vec![TraversalState {
                vertex,
                back_edge: None,
                back_mode: None,
                time,
                weight: 0.0,
                walk_distance: 0.0,
                num_boardings: 0,
                bike_renting: false,
                back_trip: None,
                trip_times: None,
                service_day: None,
                back_direction: None,
            }],
            time,
        }
    }

    pub(crate) fn step(
        mut self,
        edge: Arc<Edge>,
        mode: TraverseMode,
        seconds: i64,
        vertex: Arc<Vertex>,
    ) -> Self {
        self.time += Duration::seconds(seconds);
        let previous = self.states.last().cloned();
        let previous = previous.as_ref();
        let mut state = TraversalState {
            vertex,
            back_edge: Some(edge.clone()),
            back_mode: Some(mode),
            time: self.time,
            weight: previous.map(|p| p.weight).unwrap_or(0.0) + seconds as f64,
            walk_distance: previous.map(|p| p.walk_distance).unwrap_or(0.0),
            num_boardings: previous.map(|p| p.num_boardings).unwrap_or(0),
            bike_renting: previous.map(|p| p.bike_renting).unwrap_or(false),
            back_trip: previous.and_then(|p| p.back_trip.clone()),
            trip_times: previous.and_then(|p| p.trip_times.clone()),
            service_day: previous.and_then(|p| p.service_day),
            back_direction: None,
        };
        if mode.is_on_street() {
            state.walk_distance += edge.distance;
        }
        if mode.is_transit() && previous.map(|p| p.back_trip.is_none()).unwrap_or(true) {
            state.num_boardings += 1;
        }
        self.states.push(state);
        self
    }

    /// set the scheduled trip context on the last pushed state.
    pub(crate) fn on_trip(mut self, trip: &str, trip_times: Arc<TripTimes>) -> Self {
        if let Some(last) = self.states.last_mut() {
            last.back_trip = Some(TripId::new(trip));
            last.trip_times = Some(trip_times);
            last.service_day = Some(chrono::NaiveDate::from_ymd_opt(2020, 6, 1).unwrap());
        }
        self
    }

    pub(crate) fn build(self) -> Vec<TraversalState> {
        self.states
    }
}

/// a state sequence following the given per-state back modes, with edge
/// kinds appropriate to each mode. state 0's mode entry must be None.
pub(crate) fn path_with_modes(modes: &[Option<TraverseMode>]) -> Vec<TraversalState> {
    let mut builder = match modes.first() {
        Some(_) => PathBuilder::start_at(street_vertex("v0", 0.0, 0.0)),
        None => return vec![],
    };
    for (i, mode) in modes.iter().enumerate().skip(1) {
        let Some(mode) = *mode else { continue };
        let x = i as f64;
        let coords = [(x - 1.0, 0.0), (x, 0.0)];
        let (edge, vertex) = if mode.is_transit() {
            (
                hop_edge("route", i - 1, &coords),
                stop_vertex(&format!("stop {i}"), &format!("S{i}"), x, 0.0),
            )
        } else if mode == TraverseMode::LegSwitch {
            (free_edge("connector"), street_vertex(&format!("v{i}"), x, 0.0))
        } else {
            (
                street_edge("street", &coords, 100.0),
                street_vertex(&format!("v{i}"), x, 0.0),
            )
        };
        builder = builder.step(edge, mode, 60, vertex);
    }
    builder.build()
}
