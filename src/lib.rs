//! # svg-to-spine
//!
//! A Rust library for exporting SVG paths as Spine path attachments.
//!
//! ## Features
//!
//! - **Path conversion**: cubic, quadratic, arc and line commands become
//!   Spine's `handle, anchor, handle` vertex triples
//! - **Document walking**: nested groups, links and `<use>` references with
//!   their transforms
//! - **Skeleton output**: one slot per path or a single shared slot
//!
//! ## Example
//!
//! ```rust,ignore
//! use svg_to_spine::spine::{ConvertOptions, svg_to_spine_json};
//!
//! let svg = std::fs::read_to_string("drawing.svg").unwrap();
//! let json = svg_to_spine_json(&svg, &ConvertOptions::default()).unwrap();
//! std::fs::write("paths.json", json).unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod spine;

// Re-export commonly used items
pub use error::{ConvertError, ConvertResult};
pub use spine::{
    ConvertOptions, CornerStyle, SvgDocument, build_skeleton, convert_document, svg_to_spine_json,
};
