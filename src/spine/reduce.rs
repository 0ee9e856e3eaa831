//! Mapping into Spine space and removal of redundant points
//!
//! Spine puts the origin in the middle of the canvas with y pointing up. The
//! reduction works on the flat `incoming, anchor, outgoing, ...` point stream
//! of one subpath, after rounding, so exact equality is meaningful.

use super::types::{Point, Subpath};

/// Target coordinate space: origin at the document center, y flipped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpineSpace {
    pub half_width: f64,
    pub half_height: f64,
}

impl SpineSpace {
    pub fn new(half_width: f64, half_height: f64) -> Self {
        Self {
            half_width,
            half_height,
        }
    }

    pub fn from_document_size(width: f64, height: f64) -> Self {
        Self::new(width / 2.0, height / 2.0)
    }

    pub fn remap(&self, p: Point) -> Point {
        Point::new(
            round2(p.x - self.half_width),
            round2(self.half_height - p.y),
        )
    }

    /// Flatten a subpath into its remapped point stream
    pub fn flatten(&self, subpath: &Subpath) -> Vec<Point> {
        subpath
            .nodes
            .iter()
            .flat_map(|node| node.points())
            .map(|p| self.remap(p))
            .collect()
    }
}

/// Round to 2 decimals, half away from zero, without producing -0
fn round2(v: f64) -> f64 {
    let r = (v * 100.0).round() / 100.0;
    if r == 0.0 { 0.0 } else { r }
}

/// Full reduction of a subpath's point stream
pub fn reduce_points(points: &mut Vec<Point>, closed: bool) {
    if closed {
        drop_closing_node(points);
        normalize_closed_start(points);
    }
    remove_doubles(points);
}

fn drop_closing_node(points: &mut Vec<Point>) {
    points.truncate(points.len().saturating_sub(3));
}

/// Merge a first vertex that is repeated at the start or at the end of a
/// closed loop
fn normalize_closed_start(points: &mut Vec<Point>) {
    if points.len() < 12 {
        return;
    }
    if points[0] == points[3] {
        points.drain(2..5);
    }
    let n = points.len();
    if points[1] == points[n - 2] {
        points.rotate_right(3);
        points.drain(1..4);
    }
}

/// Collapse zero-length segments: whenever an anchor, its outgoing handle and
/// the next node's incoming handle and anchor all coincide, the two nodes
/// become one.
pub fn remove_doubles(points: &mut Vec<Point>) {
    let mut i = 1;
    while i + 3 < points.len() {
        while i + 3 < points.len() && is_run(&points[i..i + 4]) {
            points.drain(i + 1..i + 4);
        }
        i += 3;
    }

    let n = points.len();
    if n >= 3 && points[n - 2] == points[n - 1] && is_run(&[points[n - 1], points[0], points[1]]) {
        points[0] = points[n - 3];
        points.truncate(n - 3);
    }
}

fn is_run(points: &[Point]) -> bool {
    points.windows(2).all(|w| w[0] == w[1])
}
