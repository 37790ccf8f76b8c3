use super::booking::BookingArrangement;
use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(StopId);
id_type!(TripId);
id_type!(RouteId);
id_type!(AgencyId);

/// GTFS pick up / drop off rule code for one stop of a scheduled pattern.
/// the integer equivalence (0..3) matters for feed round-trips, so the
/// conversion from raw codes is kept explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickDrop {
    Scheduled,
    None,
    CallAgency,
    CoordinateWithDriver,
}

impl PickDrop {
    pub fn from_code(code: i32) -> PickDrop {
        match code {
            1 => PickDrop::None,
            2 => PickDrop::CallAgency,
            3 => PickDrop::CoordinateWithDriver,
            _ => PickDrop::Scheduled,
        }
    }

    /// rider-facing board/alight rule label. scheduled stops have none.
    pub fn board_alight_message(&self) -> Option<&'static str> {
        match self {
            PickDrop::Scheduled => None,
            PickDrop::None => Some("impossible"),
            PickDrop::CallAgency => Some("mustPhone"),
            PickDrop::CoordinateWithDriver => Some("coordinateWithDriver"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub code: Option<String>,
    pub platform_code: Option<String>,
    pub zone_id: Option<String>,
    pub coord: Coord<f64>,
    pub parent_station: Option<StopId>,
    pub multimodal_station: Option<StopId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
    pub url: Option<String>,
    pub branding_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub agency_id: AgencyId,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub route_type: i32,
    pub branding_url: Option<String>,
    pub booking: Option<BookingArrangement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
    pub headsign: Option<String>,
    pub short_name: Option<String>,
    pub block_id: Option<String>,
    pub drt_advance_book_min: Option<f64>,
    pub drt_pickup_message: Option<String>,
    pub drt_drop_off_message: Option<String>,
    pub continuous_pickup_message: Option<String>,
    pub continuous_drop_off_message: Option<String>,
    pub booking: Option<BookingArrangement>,
}

/// the sequence of pick/drop rules and stop-level booking overrides of a
/// scheduled pattern, indexed by stop position within the pattern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPattern {
    pub pickups: Vec<PickDrop>,
    pub dropoffs: Vec<PickDrop>,
    pub bookings: Vec<Option<BookingArrangement>>,
}

impl TripPattern {
    pub fn board_rule(&self, stop_index: usize) -> Option<&'static str> {
        self.pickups
            .get(stop_index)
            .and_then(|p| p.board_alight_message())
    }

    pub fn alight_rule(&self, stop_index: usize) -> Option<&'static str> {
        self.dropoffs
            .get(stop_index)
            .and_then(|d| d.board_alight_message())
    }

    pub fn booking_at(&self, stop_index: usize) -> Option<&BookingArrangement> {
        self.bookings.get(stop_index).and_then(|b| b.as_ref())
    }
}

/// a demand-responsive travel time specification: applied to the
/// unconstrained (direct) vehicle time as `factor * direct + constant`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandResponseTime {
    pub factor: f64,
    pub constant_seconds: i64,
}

impl Default for DemandResponseTime {
    fn default() -> Self {
        Self {
            factor: 1.0,
            constant_seconds: 0,
        }
    }
}

impl DemandResponseTime {
    pub fn apply(&self, direct_seconds: i64) -> i64 {
        (self.factor * direct_seconds as f64) as i64 + self.constant_seconds
    }
}

/// realized (or scheduled) per-stop times of one trip on one service day, as
/// exposed by the realtime trip-time provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripTimes {
    /// false once a realtime update has touched this trip.
    pub scheduled: bool,
    pub stop_sequences: Vec<u32>,
    pub departure_delays: Vec<i64>,
    pub arrival_delays: Vec<i64>,
    pub drt_max_time: DemandResponseTime,
    pub drt_avg_time: DemandResponseTime,
}

impl TripTimes {
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// seconds behind (positive) or ahead of (negative) schedule at a stop index.
    pub fn departure_delay(&self, stop_index: usize) -> i64 {
        self.departure_delays.get(stop_index).copied().unwrap_or(0)
    }

    pub fn arrival_delay(&self, stop_index: usize) -> i64 {
        self.arrival_delays.get(stop_index).copied().unwrap_or(0)
    }

    pub fn stop_sequence(&self, stop_index: usize) -> Option<u32> {
        self.stop_sequences.get(stop_index).copied()
    }

    pub fn demand_response_max_time(&self, direct_seconds: i64) -> i64 {
        self.drt_max_time.apply(direct_seconds)
    }

    pub fn demand_response_avg_time(&self, direct_seconds: i64) -> i64 {
        self.drt_avg_time.apply(direct_seconds)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pick_drop_messages() {
        assert_eq!(PickDrop::from_code(0).board_alight_message(), None);
        assert_eq!(
            PickDrop::from_code(1).board_alight_message(),
            Some("impossible")
        );
        assert_eq!(
            PickDrop::from_code(2).board_alight_message(),
            Some("mustPhone")
        );
        assert_eq!(
            PickDrop::from_code(3).board_alight_message(),
            Some("coordinateWithDriver")
        );
    }

    #[test]
    fn test_demand_response_time() {
        let max = DemandResponseTime {
            factor: 2.5,
            constant_seconds: 0,
        };
        assert_eq!(max.apply(600), 1500);
        let flat = DemandResponseTime {
            factor: 1.0,
            constant_seconds: 300,
        };
        assert_eq!(flat.apply(600), 900);
    }
}
