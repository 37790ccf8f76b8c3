use super::convert_error::ConvertError;
use crate::model::edge::EdgeKind;
use crate::model::mode::TraverseMode;
use crate::model::traversal_state::TraversalState;
use std::ops::RangeInclusive;

/// partition a state sequence into contiguous leg ranges (inclusive index
/// pairs into the original slice). a boundary is created when:
/// 1. a leg-switch span begins or ends (the span itself belongs to no leg)
/// 2. the mode changes, for instance from bicycle to walk
/// 3. an interline-dwell edge is seen: the mode is unchanged but the
///    scheduled trip is not, so trip metadata must switch legs
pub fn slice_states(states: &[TraversalState]) -> Result<Vec<RangeInclusive<usize>>, ConvertError> {
    if states.len() < 2 {
        return Err(ConvertError::PathTooShort(states.len()));
    }

    let trivial = states.iter().all(|s| {
        matches!(s.back_mode, None | Some(TraverseMode::LegSwitch))
    });
    if trivial {
        return Err(ConvertError::TrivialPath);
    }

    let last = states.len() - 1;
    let mut ranges: Vec<RangeInclusive<usize>> = vec![];
    let mut current: (usize, usize) = (0, last);

    for i in 1..last {
        let (Some(back_mode), Some(forward_mode)) = (states[i].back_mode, states[i + 1].back_mode)
        else {
            continue;
        };

        if back_mode == TraverseMode::LegSwitch || forward_mode == TraverseMode::LegSwitch {
            if back_mode != TraverseMode::LegSwitch {
                // a leg-switch span opens here
                current.1 = i;
            } else if forward_mode != TraverseMode::LegSwitch {
                // the span closes. a span that opened at the path start (or
                // closed with zero length) produced no leg.
                if current.1 != last {
                    ranges.push(current.0..=current.1);
                }
                // when the connector into the previous state was the
                // leg-switching edge itself, retain that state as the shared
                // boundary so geometry stays continuous across the switch.
                let switch_connector = states[i - 1]
                    .back_edge
                    .as_ref()
                    .map(|e| matches!(e.kind, EdgeKind::LegSwitch))
                    .unwrap_or(false);
                current = if switch_connector { (i - 1, last) } else { (i, last) };
            }
        } else if back_mode != forward_mode {
            current.1 = i;
            ranges.push(current.0..=current.1);
            current = (i, last);
        } else if states[i + 1]
            .back_edge
            .as_ref()
            .map(|e| matches!(e.kind, EdgeKind::InterlineDwell))
            .unwrap_or(false)
        {
            current.1 = i;
            ranges.push(current.0..=current.1);
            current = (i + 1, last);
        }
    }

    ranges.push(current.0..=current.1);
    Ok(ranges)
}
