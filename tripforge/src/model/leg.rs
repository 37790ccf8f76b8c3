use super::alert::AlertPatch;
use super::booking::BookingArrangement;
use super::edge::TransferDetails;
use super::mode::TraverseMode;
use super::place::Place;
use super::transit::{AgencyId, RouteId, TripId};
use super::walk_step::WalkStep;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// one rider-facing leg of an itinerary: a maximal same-mode (or same-trip)
/// contiguous segment of the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub mode: TraverseMode,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    /// latest possible start for a deviated-route boarding.
    pub max_start_time: Option<DateTime<FixedOffset>>,
    /// earliest possible end for a deviated-route alighting.
    pub min_end_time: Option<DateTime<FixedOffset>>,
    /// meters, summed over the leg's edges.
    pub distance: f64,
    /// seconds offset from UTC of the agency timezone at the leg start.
    pub agency_time_zone_offset: i32,

    pub from: Place,
    pub to: Place,
    /// intermediate stops, when requested.
    pub stop: Option<Vec<Place>>,
    /// polyline-encoded leg geometry.
    pub leg_geometry: Option<String>,
    pub walk_steps: Vec<WalkStep>,

    pub agency_id: Option<AgencyId>,
    pub agency_name: Option<String>,
    pub agency_url: Option<String>,
    pub agency_branding_url: Option<String>,
    /// display name of the route, from the boarding edge.
    pub route: Option<String>,
    pub route_id: Option<RouteId>,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_color: Option<String>,
    pub route_text_color: Option<String>,
    pub route_type: Option<i32>,
    pub route_branding_url: Option<String>,
    pub trip_id: Option<TripId>,
    pub trip_short_name: Option<String>,
    pub trip_block_id: Option<String>,
    pub headsign: Option<String>,
    pub service_date: Option<NaiveDate>,

    pub interline_with_previous_leg: bool,
    /// placeholder leg produced by a leg-switching connector.
    pub intermediate_place: bool,
    pub pathway: bool,
    pub rented_bike: bool,
    pub call_and_ride: bool,

    pub realtime: bool,
    pub departure_delay: i64,
    pub arrival_delay: i64,

    pub drt_advance_book_min: Option<f64>,
    pub drt_pickup_message: Option<String>,
    pub drt_drop_off_message: Option<String>,
    pub continuous_pickup_message: Option<String>,
    pub continuous_drop_off_message: Option<String>,
    /// unconstrained vehicle seconds for a demand-responsive hop.
    pub direct_time: Option<i64>,
    pub booking_arrangements: Option<BookingArrangement>,

    pub board_rule: Option<String>,
    pub alight_rule: Option<String>,

    /// timed transfer ending this leg; moved onto the adjoining transit legs
    /// as `transfer_to`/`transfer_from` during assembly.
    pub timed_transfer: Option<TransferDetails>,
    pub transfer_to: Option<TransferDetails>,
    pub transfer_from: Option<TransferDetails>,

    pub alert_patches: Vec<AlertPatch>,
}

impl Leg {
    pub fn new(
        mode: TraverseMode,
        start_time: DateTime<FixedOffset>,
        end_time: DateTime<FixedOffset>,
        from: Place,
        to: Place,
    ) -> Self {
        Self {
            mode,
            start_time,
            end_time,
            max_start_time: None,
            min_end_time: None,
            distance: 0.0,
            agency_time_zone_offset: 0,
            from,
            to,
            stop: None,
            leg_geometry: None,
            walk_steps: vec![],
            agency_id: None,
            agency_name: None,
            agency_url: None,
            agency_branding_url: None,
            route: None,
            route_id: None,
            route_short_name: None,
            route_long_name: None,
            route_color: None,
            route_text_color: None,
            route_type: None,
            route_branding_url: None,
            trip_id: None,
            trip_short_name: None,
            trip_block_id: None,
            headsign: None,
            service_date: None,
            interline_with_previous_leg: false,
            intermediate_place: false,
            pathway: false,
            rented_bike: false,
            call_and_ride: false,
            realtime: false,
            departure_delay: 0,
            arrival_delay: 0,
            drt_advance_book_min: None,
            drt_pickup_message: None,
            drt_drop_off_message: None,
            continuous_pickup_message: None,
            continuous_drop_off_message: None,
            direct_time: None,
            booking_arrangements: None,
            board_rule: None,
            alight_rule: None,
            timed_transfer: None,
            transfer_to: None,
            transfer_from: None,
            alert_patches: vec![],
        }
    }

    pub fn is_transit_leg(&self) -> bool {
        self.mode.is_transit()
    }

    /// attach an alert patch, keeping at most one copy per patch id.
    pub fn add_alert_patch(&mut self, patch: &AlertPatch) {
        if !self.alert_patches.iter().any(|p| p.id == patch.id) {
            self.alert_patches.push(patch.clone());
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds()
    }
}
