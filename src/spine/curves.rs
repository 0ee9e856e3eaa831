//! Handle synthesis for straight edges and open subpath ends

use super::types::{CornerStyle, Subpath};

/// Give every straight edge handles at one third of its length, so that all
/// edges are cubic curves. Zero-length edges keep their handles on the anchor.
///
/// For a closed subpath the last edge runs into the loop-closing duplicate;
/// its synthesized handle is copied onto the first node.
pub fn lines_to_curves(subpath: &mut Subpath) {
    let nodes = &mut subpath.nodes;
    let mut wrap_handle = None;

    for i in 0..nodes.len().saturating_sub(1) {
        wrap_handle = None;
        let (a, b) = (nodes[i], nodes[i + 1]);
        if !a.is_line_to(&b) {
            continue;
        }

        let d = a.anchor.distance(b.anchor) / 3.0;
        if d > 0.0 {
            nodes[i].outgoing = a.anchor.point_at_distance(b.anchor, d);
            nodes[i + 1].incoming = b.anchor.point_at_distance(a.anchor, d);
            wrap_handle = Some(nodes[i + 1].incoming);
        }
    }

    if subpath.closed
        && let Some(handle) = wrap_handle
    {
        nodes[0].incoming = handle;
    }
}

/// Synthesize the handles at the two free ends of an open subpath
pub fn shape_open_ends(subpath: &mut Subpath, style: CornerStyle) {
    if subpath.closed {
        return;
    }
    let Some(last) = subpath.nodes.len().checked_sub(1) else {
        return;
    };
    let nodes = &mut subpath.nodes;

    match style {
        CornerStyle::Line => {
            let (start, end) = (nodes[0].anchor, nodes[last].anchor);
            let d = start.distance(end) / 3.0;
            if d > 0.0 {
                nodes[0].incoming = start.point_at_distance(end, d);
                nodes[last].outgoing = end.point_at_distance(start, d);
            }
        }
        CornerStyle::Curve => {
            let first = nodes[0];
            if first.outgoing != first.anchor {
                nodes[0].incoming = first.outgoing.reflect_through(first.anchor);
            }
            let end = nodes[last];
            if end.incoming != end.anchor {
                nodes[last].outgoing = end.incoming.reflect_through(end.anchor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spine::segment::parse_path_data;
    use crate::spine::types::{Node, Point};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn collinear(a: Point, b: Point, c: Point) -> bool {
        ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() < 1e-9
    }

    #[test]
    fn test_straight_edge_gets_third_handles() {
        let mut sp = Subpath::new(vec![Node::corner(p(0.0, 0.0)), Node::corner(p(30.0, 0.0))], false);
        lines_to_curves(&mut sp);
        assert_eq!(sp.nodes[0].outgoing, p(10.0, 0.0));
        assert_eq!(sp.nodes[1].incoming, p(20.0, 0.0));
        // Free ends are left for the corner handler
        assert_eq!(sp.nodes[0].incoming, p(0.0, 0.0));
        assert_eq!(sp.nodes[1].outgoing, p(30.0, 0.0));
    }

    #[test]
    fn test_zero_length_edge_keeps_handles() {
        let mut sp = Subpath::new(vec![Node::corner(p(4.0, 4.0)), Node::corner(p(4.0, 4.0))], false);
        lines_to_curves(&mut sp);
        for node in &sp.nodes {
            assert_eq!(node.incoming, p(4.0, 4.0));
            assert_eq!(node.outgoing, p(4.0, 4.0));
            assert!(!node.incoming.x.is_nan());
        }
    }

    #[test]
    fn test_curved_edge_untouched() {
        let mut sp = parse_path_data("M0 0 C0 10 10 10 10 0").unwrap().remove(0);
        let before = sp.clone();
        lines_to_curves(&mut sp);
        assert_eq!(sp, before);
    }

    #[test]
    fn test_closed_square_wraps_to_first_node() {
        let mut sp = parse_path_data("M0 0 L30 0 L30 30 L0 30 Z").unwrap().remove(0);
        lines_to_curves(&mut sp);
        let nodes = &sp.nodes;
        assert_eq!(nodes[0].outgoing, p(10.0, 0.0));
        assert_eq!(nodes[0].incoming, p(0.0, 10.0));
        assert_eq!(nodes[0].incoming, nodes[4].incoming);

        // Every corner's handles are collinear with its neighbours
        for i in 1..4 {
            let (prev, node, next) = (nodes[i - 1], nodes[i], nodes[i + 1]);
            assert!(collinear(prev.anchor, node.incoming, node.anchor));
            assert!(collinear(node.anchor, node.outgoing, next.anchor));
        }
    }

    #[test]
    fn test_closed_path_ending_on_curve_does_not_wrap() {
        let mut sp = parse_path_data("M0 0 L30 0 C30 20 10 30 0 0 Z").unwrap().remove(0);
        lines_to_curves(&mut sp);
        assert_eq!(sp.nodes[0].incoming, p(0.0, 0.0));
    }

    #[test]
    fn test_line_corners_point_at_other_end() {
        let mut sp = Subpath::new(vec![Node::corner(p(0.0, 0.0)), Node::corner(p(30.0, 0.0))], false);
        lines_to_curves(&mut sp);
        shape_open_ends(&mut sp, CornerStyle::Line);
        assert_eq!(sp.nodes[0].incoming, p(10.0, 0.0));
        assert_eq!(sp.nodes[1].outgoing, p(20.0, 0.0));
    }

    #[test]
    fn test_curve_corners_extend_tangents() {
        let mut sp = parse_path_data("M0 0 C10 10 20 10 30 0").unwrap().remove(0);
        shape_open_ends(&mut sp, CornerStyle::Curve);
        assert_eq!(sp.nodes[0].incoming, p(-10.0, -10.0));
        assert_eq!(sp.nodes[1].outgoing, p(40.0, -10.0));
    }

    #[test]
    fn test_corner_styles_differ_only_in_handles() {
        let base = parse_path_data("M0 0 C10 10 20 10 30 0").unwrap().remove(0);
        let mut line = base.clone();
        let mut curve = base.clone();
        shape_open_ends(&mut line, CornerStyle::Line);
        shape_open_ends(&mut curve, CornerStyle::Curve);

        assert_ne!(line.nodes[0].incoming, curve.nodes[0].incoming);
        assert_ne!(line.nodes[1].outgoing, curve.nodes[1].outgoing);
        for (l, c) in line.nodes.iter().zip(&curve.nodes) {
            assert_eq!(l.anchor, c.anchor);
        }
    }

    #[test]
    fn test_closed_subpath_ignores_corner_style() {
        let mut sp = parse_path_data("M0 0 L30 0 L30 30 Z").unwrap().remove(0);
        lines_to_curves(&mut sp);
        let before = sp.clone();
        shape_open_ends(&mut sp, CornerStyle::Line);
        assert_eq!(sp, before);
    }
}
