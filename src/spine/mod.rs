//! SVG paths to Spine path attachments
//!
//! The conversion process:
//! 1. Parse the SVG document and walk it, collecting `<path>` elements with
//!    their accumulated transforms
//! 2. Split each path's data into cubic subpaths
//! 3. Apply the transform, turn straight edges into thirds-handle curves and
//!    shape the free ends of open subpaths
//! 4. Map into Spine space and drop redundant points
//! 5. Emit the flat vertex lists and assemble the skeleton JSON

pub mod convert;
pub mod curves;
pub mod document;
pub mod emit;
pub mod reduce;
pub mod segment;
pub mod skeleton;
pub mod style;
pub mod transform;
pub mod types;

pub use convert::{Conversion, Converter, SourcePath};
pub use document::SvgDocument;
pub use emit::{SkipNotice, SpinePath};
pub use reduce::SpineSpace;
pub use skeleton::Skeleton;
pub use transform::{Transform, TransformStack};
pub use types::{CornerStyle, Node, Point, Subpath};

use crate::error::ConvertResult;

/// Options for path export
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    /// Handle style for the free ends of open paths (default: curve)
    pub corner_style: CornerStyle,
    /// Export each path in its own slot instead of one shared slot
    pub own_slot: bool,
    /// Only export the elements listed in `selection`
    pub selected_only: bool,
    /// Element ids to export when `selected_only` is set
    pub selection: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            corner_style: CornerStyle::Curve,
            own_slot: true,
            selected_only: false,
            selection: Vec::new(),
        }
    }
}

/// Convert every exportable path of a parsed document.
///
/// A malformed path only loses that path; it is logged and the walk goes on.
#[tracing::instrument(skip_all, fields(corner_style = %options.corner_style))]
pub fn convert_document(doc: &SvgDocument, options: &ConvertOptions) -> ConvertResult<Conversion> {
    let (width, height) = doc.size();
    let converter = Converter::new(
        SpineSpace::from_document_size(width, height),
        options.corner_style,
    );

    let sources = if options.selected_only && !options.selection.is_empty() {
        doc.collect_selected_paths(&options.selection)?
    } else {
        doc.collect_paths()
    };

    let mut conversion = Conversion::default();
    for source in &sources {
        match converter.convert_path(source) {
            Ok(converted) => conversion.extend(converted),
            Err(err) => tracing::warn!(path = %source.name, "skipping path: {}", err),
        }
    }

    for path in &conversion.paths {
        tracing::debug!(
            path = %path.name,
            closed = path.closed,
            vertex_count = path.vertex_count,
            "converted subpath"
        );
    }
    for notice in &conversion.skipped {
        tracing::warn!(
            path = %notice.name,
            vertex_count = notice.vertex_count,
            "skipped: vertex count below minimum"
        );
    }

    Ok(conversion)
}

/// Build the Spine skeleton for a conversion
pub fn build_skeleton(conversion: &Conversion, own_slot: bool) -> Skeleton {
    let mut skeleton = Skeleton::new(own_slot);
    for path in &conversion.paths {
        skeleton.add_path(path);
    }
    skeleton
}

/// Convert an SVG string into Spine skeleton JSON
pub fn svg_to_spine_json(svg: &str, options: &ConvertOptions) -> ConvertResult<String> {
    let doc = SvgDocument::parse(svg)?;
    let conversion = convert_document(&doc, options)?;
    build_skeleton(&conversion, options.own_slot).to_json()
}
