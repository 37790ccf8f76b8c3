use super::geometry_ops::{concat_edge_geometries, encode_polyline};
use super::{ConvertContext, PlanOptions};
use crate::model::booking::BookingArrangement;
use crate::model::edge::{Edge, EdgeKind, TransitHopDetail};
use crate::model::leg::Leg;
use crate::model::mode::TraverseMode;
use crate::model::place::{BoardAlightType, Place, VertexType};
use crate::model::transit::{StopId, TripTimes};
use crate::model::traversal_state::TraversalState;
use crate::model::vertex::VertexKind;
use chrono::Duration;
use std::sync::Arc;

/// build one leg from a contiguous state slice. the slice's first state
/// belongs to the previous leg (its back edge arrived there), so edges are
/// taken from every following state.
pub(super) fn generate_leg(
    ctx: &ConvertContext<'_>,
    states: &[TraversalState],
    options: &PlanOptions,
) -> Leg {
    let edges: Vec<Arc<Edge>> = states[1..]
        .iter()
        .filter_map(|s| s.back_edge.clone())
        .collect();
    let first = &states[0];
    let last = &states[states.len() - 1];

    let mode = states
        .iter()
        .rev()
        .find_map(|s| s.back_mode)
        .unwrap_or(TraverseMode::Walk);

    let trip_times = last.trip_times.as_ref();
    let from = make_place(ctx, first, edges.first(), trip_times);
    let to = make_place(ctx, last, None, trip_times);

    let mut leg = Leg::new(
        mode,
        first.time.with_timezone(&ctx.timezone),
        last.time.with_timezone(&ctx.timezone),
        from,
        to,
    );
    // adjacent legs fill these in during fixup
    leg.from.arrival = None;
    leg.to.departure = None;

    leg.distance = edges.iter().map(|e| e.distance).sum();
    leg.agency_time_zone_offset = ctx.timezone.local_minus_utc();
    leg.leg_geometry = encode_polyline(&concat_edge_geometries(&edges));

    leg.interline_with_previous_leg = first
        .back_edge
        .as_ref()
        .map(|e| matches!(e.kind, EdgeKind::InterlineDwell))
        .unwrap_or(false);
    leg.intermediate_place = first
        .back_edge
        .as_ref()
        .map(|e| matches!(e.kind, EdgeKind::LegSwitch))
        .unwrap_or(false);
    leg.rented_bike = first.bike_renting && last.bike_renting;

    if let Some(EdgeKind::TimedTransfer(details)) = edges.last().map(|e| &e.kind) {
        leg.timed_transfer = Some(*details);
    }

    if mode.is_transit() {
        apply_transit_metadata(ctx, &mut leg, states, &edges);
        if options.show_intermediate_stops {
            let visits = intermediate_places(ctx, states, trip_times, &leg);
            leg.stop = Some(visits);
        }
    }

    leg
}

fn apply_transit_metadata(
    ctx: &ConvertContext<'_>,
    leg: &mut Leg,
    states: &[TraversalState],
    edges: &[Arc<Edge>],
) {
    let last = &states[states.len() - 1];
    leg.route = edges.last().map(|e| e.name.clone());
    leg.service_date = last.service_day;

    let Some(trip_id) = last.back_trip.clone() else {
        return;
    };
    leg.trip_id = Some(trip_id.clone());

    let mut booking = None;
    if let Some(trip) = ctx.index.trip(&trip_id) {
        leg.trip_short_name = trip.short_name.clone();
        leg.trip_block_id = trip.block_id.clone();
        // a headsign shown on the boarding edge wins over the trip default
        leg.headsign = states[1]
            .back_direction
            .clone()
            .or_else(|| trip.headsign.clone());
        leg.drt_advance_book_min = trip.drt_advance_book_min;
        leg.drt_pickup_message = trip.drt_pickup_message.clone();
        leg.drt_drop_off_message = trip.drt_drop_off_message.clone();
        leg.continuous_pickup_message = trip.continuous_pickup_message.clone();
        leg.continuous_drop_off_message = trip.continuous_drop_off_message.clone();

        if let Some(route) = ctx.index.route(&trip.route_id) {
            leg.route_id = Some(route.id.clone());
            leg.route_short_name = route.short_name.clone();
            leg.route_long_name = route.long_name.clone();
            leg.route_color = route.color.clone();
            leg.route_text_color = route.text_color.clone();
            leg.route_type = Some(route.route_type);
            leg.route_branding_url = route.branding_url.clone();
            leg.agency_id = Some(route.agency_id.clone());
            if let Some(agency) = ctx.index.agency(&route.agency_id) {
                leg.agency_name = Some(agency.name.clone());
                leg.agency_url = agency.url.clone();
                leg.agency_branding_url = agency.branding_url.clone();
            }
            booking = merge_booking(booking, route.booking.as_ref());
        }
        booking = merge_booking(booking, trip.booking.as_ref());
    }
    if let (Some(pattern), Some(stop_index)) =
        (ctx.index.pattern_for_trip(&trip_id), leg.from.stop_index)
    {
        booking = merge_booking(booking, pattern.booking_at(stop_index));
    }
    leg.booking_arrangements = booking;

    if let Some(tt) = last.trip_times.as_ref() {
        if !tt.is_scheduled() {
            leg.realtime = true;
            if let Some(i) = leg.from.stop_index {
                leg.departure_delay = tt.departure_delay(i);
            }
            if let Some(i) = leg.to.stop_index {
                leg.arrival_delay = tt.arrival_delay(i);
            }
        }
        if let Some(hop) = edges.last().and_then(|e| e.transit_hop()) {
            apply_demand_response(leg, hop, tt);
        }
    }
    if let Some(hop) = edges.last().and_then(|e| e.transit_hop()) {
        leg.call_and_ride = hop.call_and_ride;
    }
}

/// demand-responsive hops advertise an unconstrained vehicle time; the gap
/// between the maximum and average constrained times widens the rider-facing
/// boarding/alighting window on the deviated end.
fn apply_demand_response(leg: &mut Leg, hop: &TransitHopDetail, trip_times: &TripTimes) {
    let Some(direct) = hop.direct_time else {
        return;
    };
    leg.direct_time = Some(direct);
    let delta = trip_times.demand_response_max_time(direct)
        - trip_times.demand_response_avg_time(direct);
    if direct != 0 && delta > 0 {
        if hop.deviated_board {
            leg.max_start_time = Some(leg.start_time + Duration::seconds(delta));
        }
        if hop.deviated_alight {
            leg.min_end_time = Some(leg.end_time - Duration::seconds(delta));
        }
    }
}

fn merge_booking(
    base: Option<BookingArrangement>,
    overrides: Option<&BookingArrangement>,
) -> Option<BookingArrangement> {
    match (base, overrides) {
        (Some(mut b), Some(o)) => {
            b.add_overrides(o);
            Some(b)
        }
        (None, Some(o)) => Some(o.clone()),
        (base, None) => base,
    }
}

/// build the rider-facing place for one state. `leg_edge` is the edge
/// leaving the place when it starts a leg; a leg-ending place reads the
/// state's own back edge instead, which shifts hop-relative stop indices by
/// one (stored indices reference hop origins).
pub(super) fn make_place(
    ctx: &ConvertContext<'_>,
    state: &TraversalState,
    leg_edge: Option<&Arc<Edge>>,
    trip_times: Option<&Arc<TripTimes>>,
) -> Place {
    let end_of_leg = leg_edge.is_none();
    let edge = match leg_edge {
        Some(e) => Some(e),
        None => state.back_edge.as_ref(),
    };
    let vertex = &state.vertex;

    let mut name = vertex.display_name().to_string();
    if let Some(sv) = vertex.street() {
        if !sv.endpoint {
            if let Some(intersection) = &sv.intersection_name {
                name = intersection.clone();
            }
        }
        if let Some((_, stop_name)) = &sv.linked_stop {
            name = stop_name.clone();
        }
    }

    let time = state.time.with_timezone(&ctx.timezone);
    let mut place = Place::new(name, vertex.coord.x, vertex.coord.y);
    place.arrival = Some(time);
    place.departure = Some(time);

    match &vertex.kind {
        VertexKind::TransitStop { stop } => {
            place.vertex_type = VertexType::Transit;
            place.stop_id = Some(stop.clone());
            if let Some(s) = ctx.index.stop(stop) {
                place.name = s.name.clone();
                place.stop_code = s.code.clone();
                place.platform_code = s.platform_code.clone();
                place.zone_id = s.zone_id.clone();
            }
            if let Some(hop) = edge.and_then(|e| e.transit_hop()) {
                let stop_index = hop.stop_index + usize::from(end_of_leg);
                place.stop_index = Some(stop_index);
                place.stop_sequence = trip_times.and_then(|tt| tt.stop_sequence(stop_index));
                let (flag, deviated, area) = if end_of_leg {
                    (hop.flag_stop_alight, hop.deviated_alight, &hop.alight_area)
                } else {
                    (hop.flag_stop_board, hop.deviated_board, &hop.board_area)
                };
                place.board_alight_type = Some(if deviated {
                    BoardAlightType::Deviated
                } else if flag {
                    BoardAlightType::FlagStop
                } else {
                    BoardAlightType::Default
                });
                place.flag_stop_area = area.as_ref().and_then(encode_polyline);
            }
        }
        VertexKind::BikeRental { station_id } => {
            place.vertex_type = VertexType::Bikeshare;
            place.bike_share_id = Some(station_id.clone());
        }
        VertexKind::BikePark { park_id } => {
            place.vertex_type = VertexType::Bikepark;
            place.bike_park_id = Some(park_id.clone());
        }
        VertexKind::ParkAndRide { park_id } => {
            place.vertex_type = VertexType::ParkAndRide;
            place.car_park_id = Some(park_id.clone());
        }
        _ => {
            if let Some(sv) = vertex.street() {
                if let Some((stop_id, _)) = &sv.linked_stop {
                    place.stop_id = Some(stop_id.clone());
                }
            }
        }
    }

    place
}

/// stops passed without boarding or alighting, in ride order. a vehicle
/// dwelling at a stop yields consecutive states at the same stop; the later
/// state refreshes the recorded departure instead of adding a duplicate.
fn intermediate_places(
    ctx: &ConvertContext<'_>,
    states: &[TraversalState],
    trip_times: Option<&Arc<TripTimes>>,
    leg: &Leg,
) -> Vec<Place> {
    let mut visits: Vec<Place> = vec![];
    let mut previous: Option<StopId> = None;

    for i in 1..states.len() - 1 {
        let state = &states[i];
        let Some(stop) = state.vertex.stop_id() else {
            continue;
        };
        if previous.is_none() && leg.from.stop_id.as_ref() == Some(stop) {
            continue;
        }
        if previous.as_ref() == Some(stop) {
            if let Some(last_visit) = visits.last_mut() {
                last_visit.departure = Some(state.time.with_timezone(&ctx.timezone));
            }
            continue;
        }
        if leg.to.stop_id.as_ref() == Some(stop) {
            break;
        }
        let outgoing = states[i + 1].back_edge.as_ref();
        visits.push(make_place(ctx, state, outgoing, trip_times));
        previous = Some(stop.clone());
    }

    visits
}
