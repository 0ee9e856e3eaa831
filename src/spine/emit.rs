//! Flat vertex output for reduced subpaths

use super::types::{Node, Point};

/// Minimum length of the flat `x, y, ...` list for a subpath to be exported
pub fn minimum_vertex_numbers(closed: bool) -> usize {
    if closed { 9 } else { 6 }
}

/// A subpath accepted for export, in Spine space
#[derive(Debug, Clone, PartialEq)]
pub struct SpinePath {
    pub name: String,
    pub closed: bool,
    /// Number of points, i.e. `vertices.len() / 2`
    pub vertex_count: usize,
    pub vertices: Vec<f64>,
    /// Stroke color as `rrggbb` or `rrggbbaa`
    pub color: Option<String>,
}

impl SpinePath {
    pub fn points(&self) -> Vec<Point> {
        self.vertices
            .chunks_exact(2)
            .map(|xy| Point::new(xy[0], xy[1]))
            .collect()
    }

    /// Regroup the flat vertex list into `incoming, anchor, outgoing` nodes
    pub fn nodes(&self) -> Vec<Node> {
        self.points()
            .chunks_exact(3)
            .map(|t| Node::new(t[0], t[1], t[2]))
            .collect()
    }
}

/// A subpath dropped because it has too few vertices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipNotice {
    pub name: String,
    pub vertex_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    Path(SpinePath),
    Skipped(SkipNotice),
}

/// Flatten reduced points into `x0, y0, x1, y1, ...`
pub fn flatten_vertices(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Emit one reduced subpath, or a skip notice when it is below Spine's minimum
pub fn emit_subpath(name: String, closed: bool, color: Option<String>, points: &[Point]) -> Emitted {
    let vertex_count = points.len();
    let vertices = flatten_vertices(points);
    if vertices.len() < minimum_vertex_numbers(closed) {
        return Emitted::Skipped(SkipNotice { name, vertex_count });
    }

    Emitted::Path(SpinePath {
        name,
        closed,
        vertex_count,
        vertices,
        color,
    })
}
