use super::edge::name_no_parens;
use super::mode::TraverseMode;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelativeDirection {
    Depart,
    HardLeft,
    Left,
    SlightlyLeft,
    Continue,
    SlightlyRight,
    Right,
    HardRight,
    CircleClockwise,
    CircleCounterclockwise,
    Elevator,
    UturnLeft,
    UturnRight,
}

impl RelativeDirection {
    /// classify the turn between two headings (radians clockwise from
    /// north). thresholds are in radians: ~17 degrees still reads as
    /// "continue", and anything beyond ~115 degrees is a hard turn.
    pub fn calculate(last_angle: f64, this_angle: f64, roundabout: bool) -> RelativeDirection {
        let mut angle_diff = this_angle - last_angle;
        if angle_diff < 0.0 {
            angle_diff += 2.0 * PI;
        }
        let ccw_angle_diff = 2.0 * PI - angle_diff;

        if roundabout {
            if angle_diff > ccw_angle_diff {
                return RelativeDirection::CircleCounterclockwise;
            }
            return RelativeDirection::CircleClockwise;
        }

        if angle_diff < 0.3 || ccw_angle_diff < 0.3 {
            RelativeDirection::Continue
        } else if angle_diff < 0.7 {
            RelativeDirection::SlightlyRight
        } else if ccw_angle_diff < 0.7 {
            RelativeDirection::SlightlyLeft
        } else if angle_diff < 2.0 {
            RelativeDirection::Right
        } else if ccw_angle_diff < 2.0 {
            RelativeDirection::Left
        } else if angle_diff < PI {
            RelativeDirection::HardRight
        } else {
            RelativeDirection::HardLeft
        }
    }

    pub fn is_right_turn(&self) -> bool {
        matches!(self, RelativeDirection::Right | RelativeDirection::HardRight)
    }

    pub fn is_left_turn(&self) -> bool {
        matches!(self, RelativeDirection::Left | RelativeDirection::HardLeft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbsoluteDirection {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl AbsoluteDirection {
    /// compass octant for a heading in radians clockwise from north.
    pub fn from_heading(heading: f64) -> AbsoluteDirection {
        use AbsoluteDirection as A;
        let octants = [
            A::North,
            A::Northeast,
            A::East,
            A::Southeast,
            A::South,
            A::Southwest,
            A::West,
            A::Northwest,
        ];
        let normalized = heading.rem_euclid(2.0 * PI);
        let octant = ((normalized / (PI / 4.0)).round() as usize) % 8;
        octants[octant]
    }
}

/// one narrated turn-by-turn instruction within a street leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkStep {
    pub street_name: String,
    pub lon: f64,
    pub lat: f64,
    pub relative_direction: RelativeDirection,
    pub absolute_direction: Option<AbsoluteDirection>,
    /// heading at the start of the step, radians clockwise from north.
    pub angle: f64,
    /// meters accumulated over the step's edges.
    pub distance: f64,
    /// seconds accumulated over the step's edges.
    pub duration: i64,
    /// (distance along step, height) samples.
    pub elevation: Vec<(f64, f64)>,
    pub exit: Option<String>,
    pub stay_on: bool,
    pub bogus_name: bool,
    pub area: bool,
    /// set on the first step of a leg whose mode differs from the previous leg.
    pub new_mode: Option<TraverseMode>,
    pub bike_rental_on_station: Option<String>,
    pub bike_rental_off_station: Option<String>,
}

impl WalkStep {
    pub fn street_name_no_parens(&self) -> &str {
        name_no_parens(&self.street_name)
    }

    pub fn set_absolute_direction(&mut self, heading: f64) {
        self.angle = heading;
        self.absolute_direction = Some(AbsoluteDirection::from_heading(heading));
    }

    pub fn set_directions(&mut self, last_angle: f64, this_angle: f64, roundabout: bool) {
        self.relative_direction = RelativeDirection::calculate(last_angle, this_angle, roundabout);
        self.set_absolute_direction(this_angle);
    }
}
