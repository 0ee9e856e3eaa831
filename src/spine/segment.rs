//! Path data segmentation
//!
//! Turns an SVG `d` attribute into independent cubic subpaths. Every
//! drawing command ends up as a [`Node`]: straight commands give nodes whose
//! handles sit on the anchor, curves fill in the handles.

use std::f64::consts::{FRAC_PI_2, PI};

use svgtypes::{PathParser, PathSegment};

use super::types::{Node, Point, Subpath};
use crate::error::{ConvertError, ConvertResult};

/// Split path data into subpaths at each move-to command
pub fn parse_path_data(data: &str) -> ConvertResult<Vec<Subpath>> {
    let mut builder = SubpathBuilder::default();

    for segment in PathParser::from(data) {
        let segment = segment
            .map_err(|err| ConvertError::malformed_path(format!("invalid path data: {err}")))?;

        let pos = builder.pos;
        let resolve = |abs: bool, x: f64, y: f64| {
            if abs {
                Point::new(x, y)
            } else {
                Point::new(pos.x + x, pos.y + y)
            }
        };

        match segment {
            PathSegment::MoveTo { abs, x, y } => builder.move_to(resolve(abs, x, y)),
            PathSegment::LineTo { abs, x, y } => builder.line_to(resolve(abs, x, y))?,
            PathSegment::HorizontalLineTo { abs, x } => {
                let x = if abs { x } else { pos.x + x };
                builder.line_to(Point::new(x, pos.y))?;
            }
            PathSegment::VerticalLineTo { abs, y } => {
                let y = if abs { y } else { pos.y + y };
                builder.line_to(Point::new(pos.x, y))?;
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => builder.cubic_to(resolve(abs, x1, y1), resolve(abs, x2, y2), resolve(abs, x, y))?,
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let c1 = builder
                    .last_cubic_ctrl
                    .map(|c| c.reflect_through(pos))
                    .unwrap_or(pos);
                builder.cubic_to(c1, resolve(abs, x2, y2), resolve(abs, x, y))?;
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                builder.quad_to(resolve(abs, x1, y1), resolve(abs, x, y))?;
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = builder
                    .last_quad_ctrl
                    .map(|c| c.reflect_through(pos))
                    .unwrap_or(pos);
                builder.quad_to(ctrl, resolve(abs, x, y))?;
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => builder.arc_to(
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                resolve(abs, x, y),
            )?,
            PathSegment::ClosePath { .. } => builder.close()?,
        }
    }

    Ok(builder.finish())
}

#[derive(Debug, Default)]
struct SubpathBuilder {
    subpaths: Vec<Subpath>,
    nodes: Vec<Node>,
    start: Point,
    pos: Point,
    has_pos: bool,
    last_cubic_ctrl: Option<Point>,
    last_quad_ctrl: Option<Point>,
}

impl SubpathBuilder {
    fn move_to(&mut self, p: Point) {
        self.flush(false);
        self.nodes.push(Node::corner(p));
        self.start = p;
        self.pos = p;
        self.has_pos = true;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }

    /// Make sure there is a subpath to draw into. After a close-path the
    /// next drawing command restarts at the closed subpath's start point.
    fn begin_draw(&mut self) -> ConvertResult<()> {
        if !self.nodes.is_empty() {
            return Ok(());
        }
        if !self.has_pos {
            return Err(ConvertError::malformed_path(
                "drawing command before any move-to",
            ));
        }
        self.nodes.push(Node::corner(self.pos));
        self.start = self.pos;
        Ok(())
    }

    fn line_to(&mut self, p: Point) -> ConvertResult<()> {
        self.begin_draw()?;
        self.nodes.push(Node::corner(p));
        self.pos = p;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
        Ok(())
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> ConvertResult<()> {
        self.begin_draw()?;
        if let Some(last) = self.nodes.last_mut() {
            last.outgoing = c1;
        }
        self.nodes.push(Node::new(c2, p, p));
        self.pos = p;
        self.last_cubic_ctrl = Some(c2);
        self.last_quad_ctrl = None;
        Ok(())
    }

    /// Quadratic segments are degree-elevated to an exact cubic
    fn quad_to(&mut self, ctrl: Point, p: Point) -> ConvertResult<()> {
        let from = self.pos;
        self.cubic_to(from.lerp(ctrl, 2.0 / 3.0), p.lerp(ctrl, 2.0 / 3.0), p)?;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = Some(ctrl);
        Ok(())
    }

    fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        p: Point,
    ) -> ConvertResult<()> {
        self.begin_draw()?;
        let from = self.pos;
        if from == p {
            return Ok(());
        }
        if rx == 0.0 || ry == 0.0 {
            return self.line_to(p);
        }
        for [c1, c2, end] in arc_to_cubics(from, rx, ry, x_axis_rotation, large_arc, sweep, p) {
            self.cubic_to(c1, c2, end)?;
        }
        self.last_cubic_ctrl = None;
        Ok(())
    }

    fn close(&mut self) -> ConvertResult<()> {
        self.begin_draw()?;
        self.nodes.push(Node::corner(self.start));
        self.flush(true);
        self.pos = self.start;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
        Ok(())
    }

    fn flush(&mut self, closed: bool) {
        let nodes = std::mem::take(&mut self.nodes);
        // A lone move-to still takes a subpath slot, it reduces to nothing later
        if !nodes.is_empty() {
            self.subpaths.push(Subpath::new(nodes, closed));
        }
    }

    fn finish(mut self) -> Vec<Subpath> {
        self.flush(false);
        self.subpaths
    }
}

/// Approximate an SVG elliptical arc with cubic segments of at most 90 degrees.
/// Returns `[handle1, handle2, end]` per segment.
fn arc_to_cubics(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<[Point; 3]> {
    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();
    let mut rx = rx.abs();
    let mut ry = ry.abs();

    // Endpoint to center parameterization
    let dx2 = (from.x - to.x) / 2.0;
    let dy2 = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let sign = if large_arc == sweep { -1.0 } else { 1.0 };
    let coef = sign * (num / den).max(0.0).sqrt();
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;

    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let angle = |ux: f64, uy: f64, vx: f64, vy: f64| (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;

    let theta1 = angle(1.0, 0.0, ux, uy);
    let mut delta = angle(ux, uy, vx, vy);
    if !sweep && delta > 0.0 {
        delta -= 2.0 * PI;
    } else if sweep && delta < 0.0 {
        delta += 2.0 * PI;
    }

    let count = (delta.abs() / FRAC_PI_2 - 1e-9).ceil().max(1.0) as usize;
    let step = delta / count as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let map = |x: f64, y: f64| {
        Point::new(
            cx + rx * cos_phi * x - ry * sin_phi * y,
            cy + rx * sin_phi * x + ry * cos_phi * y,
        )
    };

    (0..count)
        .map(|i| {
            let a1 = theta1 + step * i as f64;
            let a2 = a1 + step;
            let (s1, c1) = a1.sin_cos();
            let (s2, c2) = a2.sin_cos();
            let end = if i + 1 == count { to } else { map(c2, s2) };
            [map(c1 - k * s1, s1 + k * c1), map(c2 + k * s2, s2 - k * c2), end]
        })
        .collect()
}
