use super::transit::{AgencyId, RouteId, StopId, TripId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// role a stop plays for a rider when an alert is evaluated against it.
/// an alert declares the conditions it applies to; an empty set means the
/// alert applies regardless of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopCondition {
    Stop,
    StartPoint,
    ExceptionalStop,
    NotStopping,
    RequestStop,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub header: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub effective_start: DateTime<Utc>,
    pub effective_end: Option<DateTime<Utc>>,
}

/// one concrete window in which an alert is active, in whole epoch seconds.
/// an open end means "until further notice".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePeriod {
    pub start: i64,
    pub end: Option<i64>,
}

impl TimePeriod {
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.start <= end && self.end.map_or(true, |e| e > start)
    }
}

/// a time-scoped service alert, optionally narrowed to a specific trip,
/// route, agency, or stop. an alert may carry multiple disjoint active
/// periods; only the ones overlapping a leg apply to that occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPatch {
    pub id: String,
    pub alert: Alert,
    pub stop_conditions: Vec<StopCondition>,
    pub trip: Option<TripId>,
    pub route: Option<RouteId>,
    pub agency: Option<AgencyId>,
    pub stop: Option<StopId>,
    pub active_periods: Vec<TimePeriod>,
}

impl AlertPatch {
    /// whether any active period overlaps [start, end] (epoch seconds).
    /// a patch without periods is considered always active.
    pub fn display_during(&self, start: i64, end: i64) -> bool {
        if self.active_periods.is_empty() {
            return true;
        }
        self.active_periods.iter().any(|p| p.overlaps(start, end))
    }
}
