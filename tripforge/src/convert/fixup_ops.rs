use super::ConvertContext;
use crate::model::edge::EdgeKind;
use crate::model::leg::Leg;
use crate::model::traversal_state::TraversalState;

/// post-generation stitching across adjacent legs: board/alight rules from
/// the ridden pattern, pathway flags, shared endpoint times and places, and
/// the wait absorbed by placeholder legs between path segments.
pub(super) fn fixup_legs(
    ctx: &ConvertContext<'_>,
    legs: &mut [Leg],
    legs_states: &[&[TraversalState]],
) {
    for i in 0..legs.len() {
        let from_other = legs[i].interline_with_previous_leg;
        let to_other = i + 1 < legs.len() && legs[i + 1].interline_with_previous_leg;

        let mut board_rule = None;
        let mut alight_rule = None;
        for state in &legs_states[i][1..] {
            match state.back_edge.as_ref().map(|e| &e.kind) {
                Some(EdgeKind::TransitHop(_)) => {
                    let pattern = state
                        .back_trip
                        .as_ref()
                        .and_then(|t| ctx.index.pattern_for_trip(t));
                    if let Some(pattern) = pattern {
                        if let Some(idx) = legs[i].from.stop_index {
                            board_rule = pattern.board_rule(idx);
                        }
                        if let Some(idx) = legs[i].to.stop_index {
                            alight_rule = pattern.alight_rule(idx);
                        }
                    }
                }
                Some(EdgeKind::Pathway) => legs[i].pathway = true,
                _ => {}
            }
        }

        if i + 1 < legs.len() {
            let (head, tail) = legs.split_at_mut(i + 1);
            let leg = &mut head[i];
            let next = &mut tail[0];

            // a placeholder leg waits in place until its scheduled successor,
            // but only a genuine transit leg anchors the shift
            if leg.intermediate_place && !next.intermediate_place && next.is_transit_leg() {
                let wait = next.start_time - leg.end_time;
                if wait.num_seconds() > 0 {
                    leg.start_time += wait;
                    leg.end_time += wait;
                    if let Some(departure) = leg.from.departure {
                        leg.from.departure = Some(departure + wait);
                    }
                    if let Some(arrival) = leg.to.arrival {
                        leg.to.arrival = Some(arrival + wait);
                    }
                }
            }

            next.from.arrival = leg.to.arrival;
            leg.to.departure = next.from.departure;

            // the transit-side place carries the richer stop identity, so it
            // wins the shared boundary
            if leg.is_transit_leg() && !next.is_transit_leg() {
                next.from = leg.to.clone();
            }
            if !leg.is_transit_leg() && next.is_transit_leg() {
                leg.to = next.from.clone();
            }
        }

        if legs[i].is_transit_leg() {
            // interlined boundaries stay on the vehicle; no rule applies
            if !from_other {
                legs[i].board_rule = board_rule.map(str::to_string);
            }
            if !to_other {
                legs[i].alight_rule = alight_rule.map(str::to_string);
            }
        }
    }
}

/// a transfer leg carrying timed-transfer details donates them to the
/// adjoining transit legs, where riders actually see them.
pub(super) fn move_transfer_details(legs: &mut [Leg]) {
    for i in 1..legs.len().saturating_sub(1) {
        if let Some(details) = legs[i].timed_transfer {
            legs[i - 1].transfer_to = Some(details);
            legs[i + 1].transfer_from = Some(details);
        }
    }
}

/// stay-seated transfers are invisible to the rider; drop their legs.
pub(super) fn remove_stay_seated_transfers(legs: &mut Vec<Leg>) {
    legs.retain(|leg| !leg.timed_transfer.map(|t| t.stay_seated).unwrap_or(false));
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::convert::leg_builder::generate_leg;
    use crate::convert::PlanOptions;
    use crate::index::MemoryTransitIndex;
    use crate::model::edge::TransferDetails;
    use crate::model::mode::TraverseMode as M;
    use crate::model::transit::{PickDrop, TripId, TripPattern};
    use chrono::FixedOffset;

    fn ctx(index: &MemoryTransitIndex) -> ConvertContext<'_> {
        ConvertContext {
            index,
            fare: None,
            timezone: FixedOffset::west_opt(7 * 3600).unwrap(),
            ellipsoid_to_geoid_difference: 0.0,
        }
    }

    fn walk_then_bus() -> (Vec<TraversalState>, Vec<TraversalState>) {
        use crate::testlib::*;
        let walk = PathBuilder::start_at(street_vertex("origin", 0.0, 0.0))
            .step(
                street_edge("Main St", &[(0.0, 0.0), (1.0, 0.0)], 100.0),
                M::Walk,
                90,
                stop_vertex("Stop A", "S0", 1.0, 0.0),
            )
            .build();
        let tt = scheduled_trip_times(2);
        let bus = PathBuilder::start_at(stop_vertex("Stop A", "S0", 1.0, 0.0))
            .step(
                hop_edge("10", 0, &[(1.0, 0.0), (2.0, 0.0)]),
                M::Bus,
                300,
                stop_vertex("Stop B", "S1", 2.0, 0.0),
            )
            .on_trip("T1", tt)
            .build();
        (walk, bus)
    }

    #[test]
    fn test_adjacent_legs_share_boundary() {
        let index = MemoryTransitIndex::default();
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (walk_states, bus_states) = walk_then_bus();
        let mut legs = vec![
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        fixup_legs(&ctx, &mut legs, &[&walk_states, &bus_states]);

        // non-transit into transit adopts the transit-side place
        assert_eq!(legs[0].to, legs[1].from);
        assert_eq!(legs[0].to.stop_id, legs[1].from.stop_id);
        assert!(legs[0].to.arrival.is_some());
        assert!(legs[0].to.departure.is_some());
    }

    #[test]
    fn test_board_and_alight_rules_from_pattern() {
        let mut index = MemoryTransitIndex::default();
        index.add_pattern(
            TripId::new("T1"),
            TripPattern {
                pickups: vec![PickDrop::CallAgency, PickDrop::Scheduled],
                dropoffs: vec![PickDrop::Scheduled, PickDrop::None],
                bookings: vec![None, None],
            },
        );
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (walk_states, bus_states) = walk_then_bus();
        let mut legs = vec![
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        fixup_legs(&ctx, &mut legs, &[&walk_states, &bus_states]);

        assert_eq!(legs[1].board_rule.as_deref(), Some("mustPhone"));
        assert_eq!(legs[1].alight_rule.as_deref(), Some("impossible"));
        assert!(legs[0].board_rule.is_none());
    }

    #[test]
    fn test_interlined_leg_keeps_boarding_rule_unset() {
        let mut index = MemoryTransitIndex::default();
        index.add_pattern(
            TripId::new("T1"),
            TripPattern {
                pickups: vec![PickDrop::CallAgency, PickDrop::Scheduled],
                dropoffs: vec![PickDrop::Scheduled, PickDrop::None],
                bookings: vec![None, None],
            },
        );
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (walk_states, bus_states) = walk_then_bus();
        let mut legs = vec![
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        legs[1].interline_with_previous_leg = true;
        fixup_legs(&ctx, &mut legs, &[&walk_states, &bus_states]);
        assert!(legs[1].board_rule.is_none());
        // alighting still happens off the vehicle
        assert_eq!(legs[1].alight_rule.as_deref(), Some("impossible"));
    }

    #[test]
    fn test_intermediate_place_absorbs_wait() {
        let index = MemoryTransitIndex::default();
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (mut walk_states, bus_states) = walk_then_bus();
        // the walk segment came out of a leg-switching connector, making it
        // a placeholder between path segments
        walk_states[0].back_edge = Some(crate::testlib::leg_switch_edge());
        let mut legs = vec![
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        assert!(legs[0].intermediate_place);

        // the scheduled departure is 240s after the placeholder would end
        let wait = chrono::Duration::seconds(240);
        legs[1].start_time += wait;
        legs[1].end_time += wait;
        if let Some(departure) = legs[1].from.departure {
            legs[1].from.departure = Some(departure + wait);
        }
        let original_start = legs[0].start_time;

        fixup_legs(&ctx, &mut legs, &[&walk_states, &bus_states]);
        assert_eq!(legs[0].end_time, legs[1].start_time);
        // the walk took 90s; the remaining 150s gap shifted it forward
        assert_eq!(
            legs[0].start_time,
            original_start + chrono::Duration::seconds(150)
        );
        assert_eq!(legs[0].duration_seconds(), 90);
    }

    #[test]
    fn test_placeholder_does_not_shift_toward_placeholder_transit_leg() {
        let index = MemoryTransitIndex::default();
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (mut walk_states, mut bus_states) = walk_then_bus();
        // both segments begin at a retained leg-switch connector state, so
        // the transit leg is itself a placeholder boundary
        walk_states[0].back_edge = Some(crate::testlib::leg_switch_edge());
        bus_states[0].back_edge = Some(crate::testlib::leg_switch_edge());
        let mut legs = vec![
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        assert!(legs[0].intermediate_place);
        assert!(legs[1].intermediate_place);

        let wait = chrono::Duration::seconds(240);
        legs[1].start_time += wait;
        legs[1].end_time += wait;
        let original_start = legs[0].start_time;

        fixup_legs(&ctx, &mut legs, &[&walk_states, &bus_states]);
        assert_eq!(legs[0].start_time, original_start);
    }

    #[test]
    fn test_transfer_details_move_to_neighbours() {
        let index = MemoryTransitIndex::default();
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (walk_states, bus_states) = walk_then_bus();
        let mut legs = vec![
            generate_leg(&ctx, &bus_states, &options),
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        let details = TransferDetails {
            stay_seated: false,
            guaranteed: true,
        };
        legs[1].timed_transfer = Some(details);
        move_transfer_details(&mut legs);
        assert_eq!(legs[0].transfer_to, Some(details));
        assert_eq!(legs[2].transfer_from, Some(details));
    }

    #[test]
    fn test_stay_seated_transfer_leg_is_dropped() {
        let index = MemoryTransitIndex::default();
        let ctx = ctx(&index);
        let options = PlanOptions::default();
        let (walk_states, bus_states) = walk_then_bus();
        let mut legs = vec![
            generate_leg(&ctx, &bus_states, &options),
            generate_leg(&ctx, &walk_states, &options),
            generate_leg(&ctx, &bus_states, &options),
        ];
        legs[1].timed_transfer = Some(TransferDetails {
            stay_seated: true,
            guaranteed: false,
        });
        move_transfer_details(&mut legs);
        remove_stay_seated_transfers(&mut legs);
        assert_eq!(legs.len(), 2);
        assert!(legs.iter().all(|l| l.is_transit_leg()));
        assert!(legs[0].transfer_to.is_some());
        assert!(legs[1].transfer_from.is_some());
    }
}
