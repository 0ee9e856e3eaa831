use super::curves::{lines_to_curves, shape_open_ends};
use super::emit::{Emitted, SkipNotice, SpinePath, emit_subpath};
use super::reduce::{SpineSpace, reduce_points};
use super::segment::parse_path_data;
use super::transform::{Transform, TransformStack};
use super::types::{CornerStyle, Point, Subpath};
use crate::error::ConvertResult;

/// One `<path>` element ready for conversion
#[derive(Debug, Clone, PartialEq)]
pub struct SourcePath {
    /// Base name; subpaths are exported as `{name}_{n}`
    pub name: String,
    /// Raw `d` attribute
    pub data: String,
    pub transforms: TransformStack,
    pub color: Option<String>,
}

/// Accepted and skipped subpaths, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    pub paths: Vec<SpinePath>,
    pub skipped: Vec<SkipNotice>,
}

impl Conversion {
    pub fn push(&mut self, emitted: Emitted) {
        match emitted {
            Emitted::Path(path) => self.paths.push(path),
            Emitted::Skipped(notice) => self.skipped.push(notice),
        }
    }

    pub fn extend(&mut self, other: Conversion) {
        self.paths.extend(other.paths);
        self.skipped.extend(other.skipped);
    }
}

/// Path to Spine vertex converter for one target space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converter {
    pub space: SpineSpace,
    pub corner_style: CornerStyle,
}

impl Converter {
    pub fn new(space: SpineSpace, corner_style: CornerStyle) -> Self {
        Self {
            space,
            corner_style,
        }
    }

    /// Convert every subpath of a path element.
    /// Fails only when the path data itself is malformed.
    pub fn convert_path(&self, source: &SourcePath) -> ConvertResult<Conversion> {
        let subpaths = parse_path_data(&source.data)?;
        let transform = source.transforms.compose();

        let mut conversion = Conversion::default();
        for (i, subpath) in subpaths.into_iter().enumerate() {
            let closed = subpath.closed;
            let points = self.convert_subpath(subpath, &transform);
            let name = format!("{}_{}", source.name, i + 1);
            conversion.push(emit_subpath(name, closed, source.color.clone(), &points));
        }
        Ok(conversion)
    }

    /// Transform, normalize and reduce one subpath into its Spine point stream
    pub fn convert_subpath(&self, mut subpath: Subpath, transform: &Transform) -> Vec<Point> {
        transform.apply_to_subpath(&mut subpath);
        lines_to_curves(&mut subpath);
        shape_open_ends(&mut subpath, self.corner_style);

        let mut points = self.space.flatten(&subpath);
        reduce_points(&mut points, subpath.closed);
        points
    }
}
