use std::str::FromStr;

use super::types::{Point, Subpath};

/// 2D affine transformation matrix [a, b, c, d, e, f]
/// Represents: | a  c  e |
///             | b  d  f |
///             | 0  0  1 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::identity()
        }
    }

    /// Parse an SVG `transform` attribute.
    /// Returns `None` when the list cannot be parsed.
    pub fn parse(value: &str) -> Option<Self> {
        let ts = svgtypes::Transform::from_str(value).ok()?;
        Some(Self {
            a: ts.a,
            b: ts.b,
            c: ts.c,
            d: ts.d,
            e: ts.e,
            f: ts.f,
        })
    }

    /// Compose two transforms: self * other
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Transform every handle and anchor of a subpath
    pub fn apply_to_subpath(&self, subpath: &mut Subpath) {
        for node in &mut subpath.nodes {
            *node = node.map(|p| self.apply(p));
        }
    }
}

/// Transforms collected from the outermost ancestor down to an element.
///
/// Pushing returns a new stack so that sibling branches never see each
/// other's transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformStack {
    transforms: Vec<Transform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, transform: Transform) -> Self {
        let mut transforms = self.transforms.clone();
        transforms.push(transform);
        Self { transforms }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Single matrix equivalent to applying the innermost transform first
    pub fn compose(&self) -> Transform {
        self.transforms
            .iter()
            .fold(Transform::identity(), |acc, t| acc.compose(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spine::types::Node;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_parse_matrix() {
        let t = Transform::parse("matrix(1 0 0 1 55 55)").unwrap();
        assert_eq!(t.a, 1.0);
        assert_eq!(t.d, 1.0);
        assert_eq!(t.e, 55.0);
        assert_eq!(t.f, 55.0);
    }

    #[test]
    fn test_parse_transform_list() {
        let t = Transform::parse("translate(10, 20) scale(2)").unwrap();
        assert!(close(t.apply(Point::new(1.0, 1.0)), Point::new(12.0, 22.0)));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(Transform::parse("wobble(3)").is_none());
    }

    #[test]
    fn test_stack_composes_outer_first() {
        let stack = TransformStack::new()
            .push(Transform::translate(100.0, 0.0))
            .push(Transform::parse("scale(2)").unwrap());
        // Innermost scale happens before the outer translation
        assert!(close(
            stack.compose().apply(Point::new(1.0, 1.0)),
            Point::new(102.0, 2.0)
        ));
    }

    #[test]
    fn test_push_does_not_touch_parent() {
        let parent = TransformStack::new().push(Transform::translate(1.0, 1.0));
        let child = parent.push(Transform::translate(5.0, 5.0));
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn test_empty_stack_is_identity() {
        assert_eq!(TransformStack::new().compose(), Transform::identity());
    }

    #[test]
    fn test_apply_to_subpath() {
        let mut sp = Subpath::new(
            vec![
                Node::corner(Point::new(0.0, 0.0)),
                Node::new(Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(2.0, 0.0)),
            ],
            false,
        );
        Transform::translate(10.0, -5.0).apply_to_subpath(&mut sp);
        assert_eq!(sp.nodes[0].anchor, Point::new(10.0, -5.0));
        assert_eq!(sp.nodes[1].incoming, Point::new(11.0, -5.0));
        assert_eq!(sp.nodes[1].anchor, Point::new(12.0, -5.0));
    }
}
