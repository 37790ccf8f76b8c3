use super::geometry_ops::{absolute_angle_diff, first_heading, last_heading};
use super::{ConvertContext, PlanOptions};
use crate::model::edge::{Edge, EdgeKind};
use crate::model::traversal_state::TraversalState;
use crate::model::vertex::{StreetVertex, Vertex, VertexKind};
use crate::model::walk_step::{RelativeDirection, WalkStep};
use chrono::Duration;
use std::f64::consts::PI;
use std::sync::Arc;

/// beyond this distance a middle step is no longer narration noise.
const MAX_ZAG_DISTANCE: f64 = 30.0;

/// converts the states of one street leg into narrated walk steps.
///
/// the narration is a left-to-right pass carrying explicit bookkeeping:
/// the step under construction (always the last one emitted), the heading
/// leaving the previous edge, the running in-step distance used to offset
/// elevation samples, and roundabout entry/exit counters.
pub struct WalkStepNarrator<'a> {
    options: &'a PlanOptions,
    height_correction: f64,
    steps: Vec<WalkStep>,
    last_angle: f64,
    /// distance within the current step, used as the elevation sample offset.
    elevation_offset: f64,
    /// zero when not on a roundabout, otherwise the 1-based exit ordinal.
    roundabout_exit: u32,
    roundabout_previous_street: Option<String>,
}

impl<'a> WalkStepNarrator<'a> {
    pub fn new(options: &'a PlanOptions, ctx: &ConvertContext<'_>) -> Self {
        let height_correction = if options.geoid_elevation {
            -ctx.ellipsoid_to_geoid_difference
        } else {
            0.0
        };
        Self {
            options,
            height_correction,
            steps: vec![],
            last_angle: 0.0,
            elevation_offset: 0.0,
            roundabout_exit: 0,
            roundabout_previous_street: None,
        }
    }

    /// narrate one leg. `previous_angle` is the starting heading of the last
    /// step of the preceding street leg, when there is one; the first step
    /// then becomes a turn relative to it instead of a depart.
    pub fn narrate(
        mut self,
        states: &[TraversalState],
        previous_angle: Option<f64>,
    ) -> Vec<WalkStep> {
        let replayed;
        let states = match self.replay_transfer(states) {
            Some(r) => {
                replayed = r;
                &replayed[..]
            }
            None => states,
        };

        let mut on_rental_station: Option<String> = None;
        let mut off_rental_station: Option<String> = None;

        for i in 0..states.len().saturating_sub(1) {
            let back = &states[i];
            let forward = &states[i + 1];
            let Some(edge) = forward.back_edge.as_ref() else {
                continue;
            };

            match &edge.kind {
                EdgeKind::RentBikeOn => {
                    if let VertexKind::BikeRental { station_id } = &forward.vertex.kind {
                        on_rental_station = Some(station_id.clone());
                    }
                }
                EdgeKind::RentBikeOff => {
                    if let VertexKind::BikeRental { station_id } = &back.vertex.kind {
                        off_rental_station = Some(station_id.clone());
                    }
                }
                _ => {}
            }

            if matches!(edge.kind, EdgeKind::Free) {
                continue;
            }
            if !forward.back_mode.map(|m| m.is_on_street()).unwrap_or(false) {
                continue;
            }
            let Some(geometry) = edge.geometry.as_ref() else {
                continue;
            };

            // alighting from an elevator always becomes its own step, named
            // after the destination floor. the `continue` also keeps it out
            // of the zag pass and the per-edge accumulation below.
            if let EdgeKind::ElevatorAlight { floor } = &edge.kind {
                let mut step = self.create_walk_step(back, edge);
                step.street_name = floor.clone();
                step.relative_direction = RelativeDirection::Elevator;
                self.steps.push(step);
                continue;
            }

            let street_name_no_parens = edge.name_no_parens().to_string();
            let mut created_new_step = false;

            if self.steps.is_empty() {
                // first step of the leg
                let mut step = self.create_walk_step(back, edge);
                created_new_step = true;
                let this_angle = first_heading(geometry).unwrap_or(self.last_angle);
                match previous_angle {
                    None => {
                        step.set_absolute_direction(this_angle);
                        step.relative_direction = RelativeDirection::Depart;
                    }
                    Some(prev) => step.set_directions(prev, this_angle, false),
                }
                self.steps.push(step);
                self.elevation_offset = edge.distance;
            } else {
                let name_changed = {
                    let step = self.steps.last().map(|s| s.street_name_no_parens());
                    let differs = step != Some(street_name_no_parens.as_str());
                    let both_bogus = self
                        .steps
                        .last()
                        .map(|s| s.bogus_name && edge.bogus_name)
                        .unwrap_or(false);
                    differs && !both_bogus
                };
                let roundabout_boundary = edge.is_roundabout() != (self.roundabout_exit > 0);
                let back_is_link = back
                    .back_edge
                    .as_ref()
                    .map(|e| e.is_link())
                    .unwrap_or(false);
                let link_boundary = edge.is_link() && !back_is_link;

                if name_changed || roundabout_boundary || link_boundary {
                    if self.roundabout_exit > 0 {
                        // just came off a roundabout: record which exit was
                        // taken on the roundabout step
                        let stay = self.roundabout_previous_street.as_deref()
                            == Some(street_name_no_parens.as_str());
                        if let Some(step) = self.steps.last_mut() {
                            step.exit = Some(self.roundabout_exit.to_string());
                            if stay {
                                step.stay_on = true;
                            }
                        }
                        self.roundabout_exit = 0;
                    }

                    let mut step = self.create_walk_step(back, edge);
                    created_new_step = true;
                    if edge.is_roundabout() {
                        // one-based exit numbering from here on
                        self.roundabout_exit = 1;
                        self.roundabout_previous_street = back
                            .back_edge
                            .as_ref()
                            .map(|e| e.name_no_parens().to_string());
                    }
                    let this_angle = first_heading(geometry).unwrap_or(self.last_angle);
                    step.set_directions(self.last_angle, this_angle, edge.is_roundabout());
                    self.steps.push(step);
                    self.elevation_offset = edge.distance;
                } else {
                    // street name unchanged
                    let this_angle = first_heading(geometry).unwrap_or(self.last_angle);
                    let direction = RelativeDirection::calculate(
                        self.last_angle,
                        this_angle,
                        edge.is_roundabout(),
                    );
                    if edge.is_roundabout() && back.multiple_options_before() {
                        // passed a plausible exit while circling
                        self.roundabout_exit += 1;
                    }
                    if !edge.is_roundabout() && direction != RelativeDirection::Continue {
                        // an actual turn that keeps the street name. narrate
                        // it only when other plausible streets left the
                        // intersection, otherwise the rider cannot go wrong.
                        if self.plausible_alternatives(back, &edge.name, this_angle) {
                            let mut step = self.create_walk_step(back, edge);
                            created_new_step = true;
                            step.set_directions(self.last_angle, this_angle, false);
                            step.stay_on = true;
                            self.steps.push(step);
                            self.elevation_offset = edge.distance;
                        }
                    }
                }
            }

            // a named exit vertex upstream of this edge (skipping zero-cost
            // connectors) tags the step
            let mut j = i;
            while j > 0
                && states[j]
                    .back_edge
                    .as_ref()
                    .map(|e| matches!(e.kind, EdgeKind::Free))
                    .unwrap_or(false)
            {
                j -= 1;
            }
            if let VertexKind::Exit { exit_name } = &states[j].vertex.kind {
                if let Some(step) = self.steps.last_mut() {
                    step.exit = Some(exit_name.clone());
                }
            }

            if created_new_step && forward.back_mode == back.back_mode {
                self.remove_zag();
            } else if !created_new_step {
                let samples = self.encode_elevation(edge, self.elevation_offset);
                if let Some(step) = self.steps.last_mut() {
                    step.elevation.extend(samples);
                }
                self.elevation_offset += edge.distance;
            }

            if let Some(step) = self.steps.last_mut() {
                step.distance += edge.distance;
                step.duration += (forward.time - back.time).num_seconds();
            }
            if let Some(angle) = last_heading(geometry) {
                self.last_angle = angle;
            }
        }

        if let Some(station) = on_rental_station {
            if let Some(last) = self.steps.last_mut() {
                last.bike_rental_on_station = Some(station);
            }
        }
        if let Some(station) = off_rental_station {
            if let Some(first) = self.steps.first_mut() {
                first.bike_rental_off_station = Some(station);
            }
        }

        self.steps
    }

    /// a leg consisting of a single pre-computed transfer edge replays its
    /// stored constituent edges so narration works per edge. replay stops at
    /// the first edge that cannot be walked; whatever was produced so far is
    /// narrated (non-fatal).
    fn replay_transfer(&self, states: &[TraversalState]) -> Option<Vec<TraversalState>> {
        if states.len() != 2 {
            return None;
        }
        let transfer = states[1].back_edge.as_ref()?;
        let EdgeKind::SimpleTransfer { edges } = &transfer.kind else {
            return None;
        };
        if edges.is_empty() {
            return None;
        }

        let mut replayed = vec![TraversalState {
            back_edge: None,
            back_mode: None,
            ..states[0].clone()
        }];
        let mut time = states[0].time;
        let mut walk_distance = states[0].walk_distance;

        for edge in edges {
            if !walkable(edge) {
                log::warn!(
                    "unable to replay transfer edge '{}' while generating walk steps, truncating narration",
                    edge.name
                );
                break;
            }
            let seconds = (edge.distance / self.options.walk_speed).round() as i64;
            time += Duration::seconds(seconds);
            walk_distance += edge.distance;
            replayed.push(TraversalState {
                vertex: replay_vertex(edge, &states[0].vertex),
                back_edge: Some(edge.clone()),
                back_mode: Some(crate::model::mode::TraverseMode::Walk),
                time,
                walk_distance,
                ..states[0].clone()
            });
        }

        Some(replayed)
    }

    fn plausible_alternatives(
        &self,
        back: &TraversalState,
        street_name: &str,
        this_angle: f64,
    ) -> bool {
        let Some(street_vertex) = back.vertex.street() else {
            return false;
        };
        let angle_diff = absolute_angle_diff(this_angle, self.last_angle);
        for alternative in &street_vertex.outgoing_streets {
            if alternative.name == street_name {
                // same-named alternatives are usually street splits
                continue;
            }
            let alt_angle_diff = absolute_angle_diff(alternative.first_angle, self.last_angle);
            if angle_diff > PI / 4.0 || alt_angle_diff - angle_diff < PI / 16.0 {
                return true;
            }
        }
        false
    }

    /// inspect the last three steps; a short middle step flanked by a return
    /// to the same street is narration noise. two same-handed turns merge
    /// into a U-turn, anything else collapses into the oldest step.
    fn remove_zag(&mut self) {
        let len = self.steps.len();
        if len < 3 {
            return;
        }
        let middle_is_short = self.steps[len - 2].distance < MAX_ZAG_DISTANCE;
        let names_match = self.steps[len - 1].street_name_no_parens()
            == self.steps[len - 3].street_name_no_parens();
        if !(middle_is_short && names_match) {
            return;
        }

        let last_dir = self.steps[len - 1].relative_direction;
        let middle_dir = self.steps[len - 2].relative_direction;
        let same_handed = (last_dir.is_right_turn() && middle_dir.is_right_turn())
            || (last_dir.is_left_turn() && middle_dir.is_left_turn());

        if same_handed {
            let middle = self.steps.remove(len - 2);
            if let Some(last) = self.steps.last_mut() {
                last.distance += middle.distance;
                last.duration += middle.duration;
                last.relative_direction = if last_dir.is_left_turn() {
                    RelativeDirection::UturnLeft
                } else {
                    RelativeDirection::UturnRight
                };
                // zag removal implies identical street names on both sides
                last.stay_on = true;
            }
        } else {
            // the newest step carries nothing yet; fold the middle into the
            // oldest and continue narrating on it
            self.steps.pop();
            let middle = match self.steps.pop() {
                Some(s) => s,
                None => return,
            };
            if let Some(step) = self.steps.last_mut() {
                step.distance += middle.distance;
                step.duration += middle.duration;
                self.elevation_offset += step.distance;
                let offset = step.distance;
                step.elevation
                    .extend(middle.elevation.iter().map(|(d, h)| (d + offset, *h)));
            }
        }
    }

    fn create_walk_step(&self, back: &TraversalState, edge: &Edge) -> WalkStep {
        WalkStep {
            street_name: edge.name.clone(),
            lon: back.vertex.coord.x,
            lat: back.vertex.coord.y,
            relative_direction: RelativeDirection::Continue,
            absolute_direction: None,
            angle: edge
                .geometry
                .as_ref()
                .and_then(first_heading)
                .unwrap_or(self.last_angle),
            distance: 0.0,
            duration: 0,
            elevation: self.encode_elevation(edge, 0.0),
            exit: None,
            stay_on: false,
            bogus_name: edge.bogus_name,
            area: edge.is_area(),
            new_mode: None,
            bike_rental_on_station: None,
            bike_rental_off_station: None,
        }
    }

    fn encode_elevation(&self, edge: &Edge, distance_offset: f64) -> Vec<(f64, f64)> {
        match edge.elevation() {
            Some(profile) => profile
                .samples
                .iter()
                .map(|(d, h)| (d + distance_offset, h + self.height_correction))
                .collect(),
            None => vec![],
        }
    }
}

fn walkable(edge: &Edge) -> bool {
    matches!(
        edge.kind,
        EdgeKind::Street(_) | EdgeKind::Free | EdgeKind::Pathway
    )
}

/// synthetic vertex for replayed transfer states; replays carry no network
/// vertices, so exits and alternative streets never trigger on them.
fn replay_vertex(edge: &Edge, origin: &Arc<Vertex>) -> Arc<Vertex> {
    let coord = edge
        .geometry
        .as_ref()
        .and_then(|g| g.0.last().copied())
        .unwrap_or(origin.coord);
    Arc::new(Vertex {
        label: format!("transfer at {}", edge.name),
        name: None,
        coord,
        kind: VertexKind::Street(StreetVertex::default()),
    })
}
