use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// 2D point, either in SVG user space or in Spine space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point `n` units from `self` along the line towards `toward`.
    /// Negative `n` walks away from `toward`.
    pub fn point_at_distance(&self, toward: Point, n: f64) -> Point {
        let d = self.distance(toward);
        if d == 0.0 {
            return *self;
        }
        self.lerp(toward, n / d)
    }

    /// Mirror image of `self` through `center`
    pub fn reflect_through(&self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    /// Linear interpolation: `t = 0` is `self`, `t = 1` is `other`
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// One vertex of a cubic path with the two handles around it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Handle steering the curve arriving at `anchor`
    pub incoming: Point,
    pub anchor: Point,
    /// Handle steering the curve leaving `anchor`
    pub outgoing: Point,
}

impl Node {
    pub fn new(incoming: Point, anchor: Point, outgoing: Point) -> Self {
        Self {
            incoming,
            anchor,
            outgoing,
        }
    }

    /// A node whose handles sit on the anchor
    pub fn corner(anchor: Point) -> Self {
        Self::new(anchor, anchor, anchor)
    }

    /// True when the edge from `self` to `next` is a straight line
    pub fn is_line_to(&self, next: &Node) -> bool {
        self.outgoing == self.anchor && next.incoming == next.anchor
    }

    pub fn points(&self) -> [Point; 3] {
        [self.incoming, self.anchor, self.outgoing]
    }

    pub fn map(&self, f: impl Fn(Point) -> Point) -> Node {
        Node::new(f(self.incoming), f(self.anchor), f(self.outgoing))
    }
}

/// One continuous curve of a path.
///
/// A closed subpath ends with a duplicate of its first node that closes the
/// loop; reduction removes it again.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    pub nodes: Vec<Node>,
    pub closed: bool,
}

impl Subpath {
    pub fn new(nodes: Vec<Node>, closed: bool) -> Self {
        Self { nodes, closed }
    }
}

/// Handle synthesis policy for the two free ends of an open subpath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerStyle {
    /// Extend each end's tangent backwards
    #[default]
    Curve,
    /// Point each end's handle at the other end, as if joined by a line
    Line,
}

impl FromStr for CornerStyle {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curve" => Ok(CornerStyle::Curve),
            "line" => Ok(CornerStyle::Line),
            other => Err(ConvertError::invalid_configuration(format!(
                "unknown corner type '{}', expected 'curve' or 'line'",
                other
            ))),
        }
    }
}

impl fmt::Display for CornerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CornerStyle::Curve => f.write_str("curve"),
            CornerStyle::Line => f.write_str("line"),
        }
    }
}
