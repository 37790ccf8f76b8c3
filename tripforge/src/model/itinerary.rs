use super::leg::Leg;
use super::place::Place;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 currency code.
    pub currency: String,
    pub cents: i64,
}

/// fare summary returned by the external fare-computation service, keyed by
/// rider category ("regular", "student", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fare {
    pub totals: BTreeMap<String, Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// total elapsed seconds from the first to the last state.
    pub duration: i64,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    /// seconds spent walking/biking/driving.
    pub walk_time: i64,
    /// seconds aboard scheduled transit.
    pub transit_time: i64,
    /// seconds spent waiting between legs.
    pub waiting_time: i64,
    pub walk_distance: f64,
    pub walk_limit_exceeded: bool,
    pub elevation_gained: f64,
    pub elevation_lost: f64,
    /// number of vehicle changes: boardings minus one, unless the itinerary
    /// starts already on board.
    pub transfers: u32,
    /// meters, summed over the legs.
    pub distance: f64,
    /// path cost reported by the search.
    pub weight: f64,
    pub fare: Option<Fare>,
    pub legs: Vec<Leg>,
}

/// the full response for one planning request: itineraries for every
/// surviving candidate path, sharing the request's endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub date: DateTime<FixedOffset>,
    pub from: Place,
    pub to: Place,
    pub itineraries: Vec<Itinerary>,
}
