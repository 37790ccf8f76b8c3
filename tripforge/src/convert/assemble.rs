use super::alert_overlay::{add_alert_patches_to_leg, filter_inactive_alerts};
use super::convert_error::ConvertError;
use super::fixup_ops::{fixup_legs, move_transfer_details, remove_stay_seated_transfers};
use super::leg_builder::generate_leg;
use super::slice_ops::slice_states;
use super::walk_step_narrator::WalkStepNarrator;
use super::{ConvertContext, PlanOptions};
use crate::model::itinerary::{Itinerary, TripPlan};
use crate::model::leg::Leg;
use crate::model::mode::TraverseMode;
use crate::model::place::Place;
use crate::model::traversal_state::{TraversalState, TraversedPath};
use crate::model::vertex::Vertex;
use itertools::Itertools;
use rayon::prelude::*;
use std::sync::Arc;

/// convert one computed path into a rider-facing itinerary.
pub fn convert_itinerary(
    ctx: &ConvertContext<'_>,
    path: &TraversedPath,
    options: &PlanOptions,
) -> Result<Itinerary, ConvertError> {
    let states = path.states();
    let ranges = slice_states(states)?;
    let legs_states: Vec<&[TraversalState]> = ranges
        .iter()
        .map(|r| &states[*r.start()..=*r.end()])
        .collect();

    let mut legs: Vec<Leg> = legs_states
        .iter()
        .map(|slice| generate_leg(ctx, slice, options))
        .collect();

    add_walk_steps(ctx, &mut legs, &legs_states, options);
    for (i, leg) in legs.iter_mut().enumerate() {
        add_alert_patches_to_leg(ctx, leg, options, i == 0);
    }
    fixup_legs(ctx, &mut legs, &legs_states);
    move_transfer_details(&mut legs);
    remove_stay_seated_transfers(&mut legs);
    for leg in legs.iter_mut() {
        filter_inactive_alerts(leg);
    }

    let first = &states[0];
    let last = &states[states.len() - 1];
    let mut transfers = last.num_boardings;
    if transfers > 0 && !path.starts_onboard() {
        transfers -= 1;
    }

    let mut itinerary = Itinerary {
        duration: (last.time - first.time).num_seconds(),
        start_time: first.time.with_timezone(&ctx.timezone),
        end_time: last.time.with_timezone(&ctx.timezone),
        walk_time: 0,
        transit_time: 0,
        waiting_time: 0,
        walk_distance: last.walk_distance,
        walk_limit_exceeded: last.walk_distance > options.max_walk_distance,
        elevation_gained: 0.0,
        elevation_lost: 0.0,
        transfers,
        distance: legs.iter().map(|l| l.distance).sum(),
        weight: last.weight,
        fare: ctx.fare.and_then(|f| f.fare(path)),
        legs,
    };
    calculate_times(&mut itinerary, states);
    calculate_elevations(&mut itinerary, states);
    Ok(itinerary)
}

/// convert every candidate path and assemble the planning response.
/// individual path failures are logged and skipped; an error is returned
/// only when nothing survives.
pub fn generate_plan(
    ctx: &ConvertContext<'_>,
    paths: &[TraversedPath],
    options: &PlanOptions,
) -> Result<TripPlan, ConvertError> {
    let mut itineraries: Vec<Itinerary> = paths
        .par_iter()
        .filter_map(|path| match convert_itinerary(ctx, path, options) {
            Ok(itinerary) => Some(itinerary),
            Err(e) => {
                log::warn!("skipping path that produced no itinerary: {e}");
                None
            }
        })
        .collect();

    if itineraries.is_empty() {
        return Err(ConvertError::NoItineraries(paths.len()));
    }

    // a transit itinerary that walks more than the best non-transit option
    // is dominated and never shown
    let best_non_transit = itineraries
        .iter()
        .filter(|i| i.transit_time == 0)
        .map(|i| i.walk_time)
        .min();
    if let Some(best) = best_non_transit {
        itineraries.retain(|i| !(i.transit_time > 0 && i.walk_time > best));
    }

    for itinerary in &mut itineraries {
        if let Some(first_leg) = itinerary.legs.first_mut() {
            first_leg.from.orig = options.from_name.clone();
        }
        if let Some(last_leg) = itinerary.legs.last_mut() {
            last_leg.to.orig = options.to_name.clone();
        }
        // leg trimming can move the rider-visible endpoints
        let leg_start = itinerary.legs.first().map(|l| l.start_time);
        let leg_end = itinerary.legs.last().map(|l| l.end_time);
        if let Some(start) = leg_start {
            if itinerary.start_time != start {
                log::info!("itinerary start differs from first leg, adjusting");
                itinerary.start_time = start;
            }
        }
        if let Some(end) = leg_end {
            if itinerary.end_time != end {
                log::info!("itinerary end differs from last leg, adjusting");
                itinerary.end_time = end;
            }
        }
    }

    let date = paths[0]
        .states()
        .first()
        .map(|s| s.time.with_timezone(&ctx.timezone))
        .unwrap_or_else(|| chrono::Utc::now().with_timezone(&ctx.timezone));

    Ok(TripPlan {
        date,
        from: endpoint_place(paths[0].start_vertex(), &options.from_name),
        to: endpoint_place(paths[0].end_vertex(), &options.to_name),
        itineraries,
    })
}

fn endpoint_place(vertex: Option<&Arc<Vertex>>, orig: &Option<String>) -> Place {
    let mut place = match vertex {
        Some(v) => Place::new(v.display_name().to_string(), v.coord.x, v.coord.y),
        None => Place::new(String::new(), 0.0, 0.0),
    };
    place.orig = orig.clone();
    place
}

/// narrate every street leg, threading the last heading across consecutive
/// street legs so the next leg opens with a turn (a stepless leg in between
/// resets it), and tagging the first step of each leg that changes mode.
fn add_walk_steps(
    ctx: &ConvertContext<'_>,
    legs: &mut [Leg],
    legs_states: &[&[TraversalState]],
    options: &PlanOptions,
) {
    let mut previous_angle: Option<f64> = None;
    let mut last_mode: Option<TraverseMode> = None;

    for (leg, states) in legs.iter_mut().zip(legs_states) {
        let steps = WalkStepNarrator::new(options, ctx).narrate(states, previous_angle);
        previous_angle = steps.last().map(|s| s.angle);
        leg.walk_steps = steps;
        if last_mode != Some(leg.mode) {
            if let Some(first) = leg.walk_steps.first_mut() {
                first.new_mode = Some(leg.mode);
                last_mode = Some(leg.mode);
            }
        }
    }
}

fn calculate_times(itinerary: &mut Itinerary, states: &[TraversalState]) {
    for (back, forward) in states.iter().tuple_windows() {
        let Some(mode) = forward.back_mode else {
            continue;
        };
        let seconds = (forward.time - back.time).num_seconds();
        if mode.is_transit() {
            itinerary.transit_time += seconds;
        } else if mode == TraverseMode::LegSwitch {
            itinerary.waiting_time += seconds;
        } else {
            itinerary.walk_time += seconds;
        }
    }
}

fn calculate_elevations(itinerary: &mut Itinerary, states: &[TraversalState]) {
    for state in states {
        let Some(edge) = state.back_edge.as_ref() else {
            continue;
        };
        let Some(profile) = edge.elevation() else {
            continue;
        };
        if profile.dimensions != 2 {
            continue;
        }
        for (a, b) in profile.samples.iter().tuple_windows() {
            let delta = b.1 - a.1;
            if delta > 0.0 {
                itinerary.elevation_gained += delta;
            } else {
                itinerary.elevation_lost -= delta;
            }
        }
    }
}
