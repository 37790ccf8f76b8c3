use super::{ConvertContext, PlanOptions};
use crate::model::alert::{AlertPatch, StopCondition};
use crate::model::leg::Leg;
use crate::model::transit::StopId;
use chrono::{DateTime, Utc};

/// overlay the applicable service alerts on one generated leg. alerts are
/// resolved per scope (stop+route, stop+trip, stop, trip, route, agency)
/// with stop roles depending on where the stop sits in the leg: boarding
/// stops use departing conditions, alighting stops arriving conditions, and
/// intermediate stops passing conditions with their own time window.
pub(super) fn add_alert_patches_to_leg(
    ctx: &ConvertContext<'_>,
    leg: &mut Leg,
    options: &PlanOptions,
    is_first_leg: bool,
) {
    let mut departing = vec![StopCondition::Stop, StopCondition::StartPoint];
    if !is_first_leg {
        // boarding mid-itinerary can be affected by exceptional stops
        departing.push(StopCondition::ExceptionalStop);
    }
    let passing = vec![StopCondition::Stop, StopCondition::NotStopping];
    let arriving = vec![StopCondition::Stop, StopCondition::Destination];

    let leg_start = leg.start_time.with_timezone(&Utc);
    let leg_end = leg.end_time.with_timezone(&Utc);

    let mut attachments: Vec<AlertPatch> = vec![];
    {
        let mut consider =
            |patches: Vec<&AlertPatch>,
             conditions: &[StopCondition],
             start: DateTime<Utc>,
             end: DateTime<Utc>| {
                for patch in patches {
                    if !conditions_match(patch, conditions) {
                        continue;
                    }
                    if !options.disable_alert_filtering && !effective_during(patch, start, end) {
                        continue;
                    }
                    attachments.push(patch.clone());
                }
            };

        if let (Some(from), Some(route)) = (&leg.from.stop_id, &leg.route_id) {
            for id in stop_fanout(ctx, from) {
                consider(
                    ctx.index.alerts_for_stop_and_route(&id, route),
                    &departing,
                    leg_start,
                    leg_end,
                );
            }
        }
        if let (Some(to), Some(route)) = (&leg.to.stop_id, &leg.route_id) {
            for id in stop_fanout(ctx, to) {
                consider(
                    ctx.index.alerts_for_stop_and_route(&id, route),
                    &arriving,
                    leg_start,
                    leg_end,
                );
            }
        }
        if let (Some(from), Some(trip)) = (&leg.from.stop_id, &leg.trip_id) {
            for id in stop_fanout(ctx, from) {
                consider(
                    ctx.index.alerts_for_stop_and_trip(&id, trip),
                    &departing,
                    leg_start,
                    leg_end,
                );
            }
        }
        if let (Some(to), Some(trip)) = (&leg.to.stop_id, &leg.trip_id) {
            for id in stop_fanout(ctx, to) {
                consider(
                    ctx.index.alerts_for_stop_and_trip(&id, trip),
                    &arriving,
                    leg_start,
                    leg_end,
                );
            }
        }

        if let Some(stops) = &leg.stop {
            for place in stops {
                let Some(stop_id) = &place.stop_id else {
                    continue;
                };
                let start = place
                    .arrival
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or(leg_start);
                let end = place
                    .departure
                    .map(|t| t.with_timezone(&Utc))
                    .unwrap_or(leg_end);
                for id in stop_fanout(ctx, stop_id) {
                    if let Some(trip) = &leg.trip_id {
                        consider(
                            ctx.index.alerts_for_stop_and_trip(&id, trip),
                            &passing,
                            start,
                            end,
                        );
                    }
                    consider(ctx.index.alerts_for_stop(&id), &passing, start, end);
                }
            }
        }

        if let Some(from) = &leg.from.stop_id {
            for id in stop_fanout(ctx, from) {
                consider(ctx.index.alerts_for_stop(&id), &departing, leg_start, leg_end);
            }
        }
        if let Some(to) = &leg.to.stop_id {
            for id in stop_fanout(ctx, to) {
                consider(ctx.index.alerts_for_stop(&id), &arriving, leg_start, leg_end);
            }
        }

        // trip-, route- and agency-wide alerts apply without stop roles
        if let Some(trip) = &leg.trip_id {
            consider(ctx.index.alerts_for_trip(trip), &[], leg_start, leg_end);
        }
        if let Some(route) = &leg.route_id {
            consider(ctx.index.alerts_for_route(route), &[], leg_start, leg_end);
        }
        if let Some(agency) = &leg.agency_id {
            consider(ctx.index.alerts_for_agency(agency), &[], leg_start, leg_end);
        }
    }

    for patch in &attachments {
        leg.add_alert_patch(patch);
    }
}

/// drop attached patches whose active periods all miss the leg. this runs
/// even when the effective-window filter is disabled: a patch with concrete
/// active periods only describes this occurrence if one of them overlaps.
pub(super) fn filter_inactive_alerts(leg: &mut Leg) {
    let start = leg.start_time.timestamp();
    let end = leg.end_time.timestamp();
    leg.alert_patches.retain(|p| p.display_during(start, end));
}

/// a stop inherits alerts registered on its parent and multimodal stations.
fn stop_fanout(ctx: &ConvertContext<'_>, stop: &StopId) -> Vec<StopId> {
    let mut ids = vec![stop.clone()];
    if let Some(s) = ctx.index.stop(stop) {
        if let Some(parent) = &s.parent_station {
            ids.push(parent.clone());
        }
        if let Some(multimodal) = &s.multimodal_station {
            ids.push(multimodal.clone());
        }
    }
    ids
}

fn conditions_match(patch: &AlertPatch, requested: &[StopCondition]) -> bool {
    if patch.stop_conditions.is_empty() || requested.is_empty() {
        return true;
    }
    patch.stop_conditions.iter().any(|c| requested.contains(c))
}

fn effective_during(patch: &AlertPatch, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    patch.alert.effective_start < end && patch.alert.effective_end.map_or(true, |e| e > start)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::index::MemoryTransitIndex;
    use crate::model::alert::{Alert, TimePeriod};
    use crate::model::mode::TraverseMode as M;
    use crate::model::place::Place;
    use crate::model::transit::{RouteId, Stop, TripId};
    use chrono::{FixedOffset, TimeZone};
    use geo_types::Coord;

    fn ctx(index: &MemoryTransitIndex) -> ConvertContext<'_> {
        ConvertContext {
            index,
            fare: None,
            timezone: FixedOffset::west_opt(7 * 3600).unwrap(),
            ellipsoid_to_geoid_difference: 0.0,
        }
    }

    fn patch(id: &str, conditions: Vec<StopCondition>) -> AlertPatch {
        AlertPatch {
            id: id.to_string(),
            alert: Alert {
                header: Some("escalator outage".to_string()),
                description: None,
                url: None,
                effective_start: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
                effective_end: None,
            },
            stop_conditions: conditions,
            trip: None,
            route: None,
            agency: None,
            stop: None,
            active_periods: vec![],
        }
    }

    fn transit_leg() -> Leg {
        let tz = FixedOffset::west_opt(7 * 3600).unwrap();
        let start = Utc
            .with_ymd_and_hms(2020, 6, 1, 12, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let end = start + chrono::Duration::seconds(600);
        let mut from = Place::new("Stop A".to_string(), 0.0, 0.0);
        from.stop_id = Some(StopId::new("S0"));
        let mut to = Place::new("Stop B".to_string(), 1.0, 0.0);
        to.stop_id = Some(StopId::new("S1"));
        let mut leg = Leg::new(M::Bus, start, end, from, to);
        leg.route_id = Some(RouteId::new("R10"));
        leg.trip_id = Some(TripId::new("T1"));
        leg
    }

    fn child_stop(id: &str, parent: &str) -> Stop {
        Stop {
            id: StopId::new(id),
            name: id.to_string(),
            code: None,
            platform_code: None,
            zone_id: None,
            coord: Coord { x: 0.0, y: 0.0 },
            parent_station: Some(StopId::new(parent)),
            multimodal_station: None,
        }
    }

    #[test]
    fn test_destination_alert_via_parent_station() {
        let mut index = MemoryTransitIndex::default();
        index.add_stop(child_stop("S1", "P1"));
        index.add_stop_alert(
            StopId::new("P1"),
            patch("closed", vec![StopCondition::Destination]),
        );
        let ctx = ctx(&index);
        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &PlanOptions::default(), true);
        assert_eq!(leg.alert_patches.len(), 1);
        assert_eq!(leg.alert_patches[0].id, "closed");
    }

    #[test]
    fn test_departing_conditions_exclude_destination_alert_at_origin() {
        let mut index = MemoryTransitIndex::default();
        index.add_stop_alert(
            StopId::new("S0"),
            patch("dest-only", vec![StopCondition::Destination]),
        );
        let ctx = ctx(&index);
        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &PlanOptions::default(), true);
        assert!(leg.alert_patches.is_empty());
    }

    #[test]
    fn test_exceptional_stop_needs_non_first_leg() {
        let mut index = MemoryTransitIndex::default();
        index.add_stop_alert(
            StopId::new("S0"),
            patch("exceptional", vec![StopCondition::ExceptionalStop]),
        );
        let ctx = ctx(&index);

        let mut first = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut first, &PlanOptions::default(), true);
        assert!(first.alert_patches.is_empty());

        let mut later = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut later, &PlanOptions::default(), false);
        assert_eq!(later.alert_patches.len(), 1);
    }

    #[test]
    fn test_trip_wide_alert_ignores_conditions() {
        let mut index = MemoryTransitIndex::default();
        index.add_trip_alert(
            TripId::new("T1"),
            patch("tripwide", vec![StopCondition::NotStopping]),
        );
        let ctx = ctx(&index);
        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &PlanOptions::default(), true);
        assert_eq!(leg.alert_patches.len(), 1);
    }

    #[test]
    fn test_effective_window_filter_and_bypass() {
        let mut index = MemoryTransitIndex::default();
        let mut expired = patch("expired", vec![]);
        expired.alert.effective_end =
            Some(Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap());
        index.add_trip_alert(TripId::new("T1"), expired);
        let ctx = ctx(&index);

        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &PlanOptions::default(), true);
        assert!(leg.alert_patches.is_empty());

        let bypass = PlanOptions {
            disable_alert_filtering: true,
            ..PlanOptions::default()
        };
        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &bypass, true);
        assert_eq!(leg.alert_patches.len(), 1);
    }

    #[test]
    fn test_duplicate_patch_attaches_once() {
        let mut index = MemoryTransitIndex::default();
        // same patch id reachable through both stop and trip scope
        index.add_stop_alert(StopId::new("S0"), patch("dup", vec![]));
        index.add_trip_alert(TripId::new("T1"), patch("dup", vec![]));
        let ctx = ctx(&index);
        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &PlanOptions::default(), true);
        assert_eq!(leg.alert_patches.len(), 1);
    }

    #[test]
    fn test_inactive_period_pruned_after_attachment() {
        let mut leg = transit_leg();
        let mut p = patch("old-period", vec![]);
        p.active_periods = vec![TimePeriod {
            start: 0,
            end: Some(1000),
        }];
        leg.alert_patches.push(p);
        filter_inactive_alerts(&mut leg);
        assert!(leg.alert_patches.is_empty());
    }

    #[test]
    fn test_stale_period_pruned_even_with_filtering_disabled() {
        let mut index = MemoryTransitIndex::default();
        let mut stale = patch("stale", vec![]);
        stale.active_periods = vec![TimePeriod {
            start: 0,
            end: Some(1000),
        }];
        index.add_trip_alert(TripId::new("T1"), stale);
        let ctx = ctx(&index);

        let bypass = PlanOptions {
            disable_alert_filtering: true,
            ..PlanOptions::default()
        };
        let mut leg = transit_leg();
        add_alert_patches_to_leg(&ctx, &mut leg, &bypass, true);
        assert_eq!(leg.alert_patches.len(), 1);
        // the switch only widens attachment; the active-period prune still
        // applies to the final leg window
        filter_inactive_alerts(&mut leg);
        assert!(leg.alert_patches.is_empty());
    }
}
