use crate::model::edge::Edge;
use geo_types::{Coord, LineString};
use std::f64::consts::PI;
use std::sync::Arc;

/// concatenate the display geometries of a leg's edges into one line,
/// dropping the shared boundary coordinate between consecutive edges.
pub fn concat_edge_geometries(edges: &[Arc<Edge>]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = vec![];
    for edge in edges {
        if let Some(geometry) = &edge.geometry {
            if coords.is_empty() {
                coords.extend(geometry.coords().copied());
            } else {
                coords.extend(geometry.coords().skip(1).copied());
            }
        }
    }
    LineString::new(coords)
}

/// polyline-encode a line at the conventional 1e-5 precision. an empty or
/// unencodable line yields None rather than an error.
pub fn encode_polyline(line: &LineString<f64>) -> Option<String> {
    if line.0.is_empty() {
        return None;
    }
    polyline::encode_coordinates(line.coords().copied(), 5).ok()
}

/// heading of the segment a -> b, radians clockwise from north in [0, 2pi).
pub fn heading(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx.atan2(dy).rem_euclid(2.0 * PI)
}

/// heading of the first distinct segment of a line.
pub fn first_heading(line: &LineString<f64>) -> Option<f64> {
    let coords = &line.0;
    let first = *coords.first()?;
    coords
        .iter()
        .skip(1)
        .find(|c| **c != first)
        .map(|c| heading(first, *c))
}

/// heading of the last distinct segment of a line.
pub fn last_heading(line: &LineString<f64>) -> Option<f64> {
    let coords = &line.0;
    let last = *coords.last()?;
    coords
        .iter()
        .rev()
        .skip(1)
        .find(|c| **c != last)
        .map(|c| heading(*c, last))
}

/// smaller of the clockwise and counterclockwise differences between two
/// headings, in [0, pi].
pub fn absolute_angle_diff(this_angle: f64, last_angle: f64) -> f64 {
    let mut diff = this_angle - last_angle;
    if diff < 0.0 {
        diff += 2.0 * PI;
    }
    let ccw_diff = 2.0 * PI - diff;
    diff.min(ccw_diff)
}
