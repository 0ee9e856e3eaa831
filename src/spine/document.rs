//! SVG document model and traversal
//!
//! The document is read with quick-xml into a flat arena of elements. The
//! walker then descends from the root (or from selected elements), keeping a
//! copy-on-push scope of ancestor transforms and ids per branch, and yields
//! one [`SourcePath`] per reachable `<path>` element.

use std::collections::HashMap;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::convert::SourcePath;
use super::style::stroke_color;
use super::transform::{Transform, TransformStack};
use crate::error::{ConvertError, ConvertResult};

/// Size used when the document declares neither a viewBox nor a usable size
pub const DEFAULT_DOCUMENT_SIZE: f64 = 100.0;

/// One SVG element with its attributes, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Local tag name, without namespace prefix
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl Element {
    pub fn new(tag: &str, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.to_string(),
            attributes,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Value of a presentation property; the `style` attribute wins over the
    /// plain attribute
    pub fn presentation(&self, name: &str) -> Option<&str> {
        let from_style = self.attr("style").and_then(|style| {
            style.split(';').find_map(|decl| {
                let (key, value) = decl.split_once(':')?;
                (key.trim() == name).then_some(value.trim())
            })
        });
        from_style.or_else(|| self.attr(name).map(str::trim))
    }

    /// Target id of a `<use>` reference, without the leading `#`
    pub fn href(&self) -> Option<&str> {
        self.attr("href")
            .or_else(|| self.attr("xlink:href"))
            .and_then(|h| h.strip_prefix('#'))
    }
}

/// Parsed SVG document
#[derive(Debug, Clone, Default)]
pub struct SvgDocument {
    pub elements: Vec<Element>,
    pub root: usize,
    ids: HashMap<String, usize>,
}

impl SvgDocument {
    /// Parse an SVG string. The root element must be `<svg>`.
    pub fn parse(xml: &str) -> ConvertResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut elements: Vec<Element> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let idx = push_element(&mut elements, &open, e)?;
                    open.push(idx);
                }
                Ok(Event::Empty(ref e)) => {
                    push_element(&mut elements, &open, e)?;
                }
                Ok(Event::End(_)) => {
                    open.pop();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ConvertError::document(format!(
                        "XML parsing error at position {}: {:?}",
                        reader.error_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        match elements.first() {
            Some(root) if root.tag == "svg" => {}
            Some(root) => {
                return Err(ConvertError::document(format!(
                    "root element is <{}>, expected <svg>",
                    root.tag
                )));
            }
            None => return Err(ConvertError::document("document has no elements")),
        }

        let mut ids = HashMap::new();
        for (idx, element) in elements.iter().enumerate() {
            if let Some(id) = element.id() {
                ids.entry(id.to_string()).or_insert(idx);
            }
        }

        Ok(Self {
            elements,
            root: 0,
            ids,
        })
    }

    pub fn element(&self, idx: usize) -> &Element {
        &self.elements[idx]
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Document width and height in user units
    pub fn size(&self) -> (f64, f64) {
        let root = self.element(self.root);

        if let Some(vb) = root
            .attr("viewBox")
            .and_then(|v| svgtypes::ViewBox::from_str(v).ok())
            && vb.w > 0.0
            && vb.h > 0.0
        {
            return (vb.w, vb.h);
        }

        let dimension = |name: &str| {
            root.attr(name)
                .and_then(length_to_user_units)
                .filter(|v| *v > 0.0)
        };
        let (width, height) = (dimension("width"), dimension("height"));
        (
            width.unwrap_or(DEFAULT_DOCUMENT_SIZE),
            height.unwrap_or(DEFAULT_DOCUMENT_SIZE),
        )
    }

    /// Collect every `<path>` reachable from the root's children
    pub fn collect_paths(&self) -> Vec<SourcePath> {
        let mut walker = Walker::new(self);
        for &child in &self.element(self.root).children {
            walker.visit(child, &Scope::default());
        }
        walker.paths
    }

    /// Collect the `<path>` elements at or below the given ids. Each selected
    /// element keeps the transforms of its ancestors.
    pub fn collect_selected_paths(&self, ids: &[String]) -> ConvertResult<Vec<SourcePath>> {
        let mut walker = Walker::new(self);
        for id in ids {
            let idx = self
                .get_element_by_id(id)
                .ok_or_else(|| ConvertError::document(format!("no element with id '{}'", id)))?;
            let scope = self.ancestor_scope(idx);
            walker.visit(idx, &scope);
        }
        Ok(walker.paths)
    }

    fn ancestor_scope(&self, idx: usize) -> Scope {
        let mut chain = Vec::new();
        let mut current = self.element(idx).parent;
        while let Some(p) = current {
            if p != self.root {
                chain.push(p);
            }
            current = self.element(p).parent;
        }

        chain.iter().rev().fold(Scope::default(), |scope, &p| Scope {
            transforms: scope.transforms.push(element_transform(self.element(p))),
            ..scope
        })
    }
}

fn push_element(
    elements: &mut Vec<Element>,
    open: &[usize],
    e: &BytesStart,
) -> ConvertResult<usize> {
    let name = e.local_name();
    let tag = std::str::from_utf8(name.as_ref()).unwrap_or("");

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| {
            ConvertError::document(format!("invalid attribute on <{}>: {:?}", tag, err))
        })?;
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        let value = attr.unescape_value().map_err(|err| {
            ConvertError::document(format!("invalid value for {}: {}", key, err))
        })?;
        attributes.push((key.to_string(), value.into_owned()));
    }

    let idx = elements.len();
    let mut element = Element::new(tag, attributes);
    element.parent = open.last().copied();
    if let Some(&parent) = open.last() {
        elements[parent].children.push(idx);
    }
    elements.push(element);
    Ok(idx)
}

/// Convert an SVG length to user units (px at 96 dpi)
fn length_to_user_units(value: &str) -> Option<f64> {
    use svgtypes::LengthUnit;

    let length = svgtypes::Length::from_str(value).ok()?;
    let factor = match length.unit {
        LengthUnit::None | LengthUnit::Px => 1.0,
        LengthUnit::In => 96.0,
        LengthUnit::Cm => 96.0 / 2.54,
        LengthUnit::Mm => 96.0 / 25.4,
        LengthUnit::Pt => 96.0 / 72.0,
        LengthUnit::Pc => 16.0,
        _ => return None,
    };
    Some(length.number * factor)
}

/// The element's own transform; unparseable values count as identity
fn element_transform(element: &Element) -> Transform {
    match element.attr("transform") {
        None => Transform::identity(),
        Some(raw) => Transform::parse(raw).unwrap_or_else(|| {
            tracing::warn!(
                element = element.id().unwrap_or(element.tag.as_str()),
                transform = raw,
                "unparseable transform, using identity"
            );
            Transform::identity()
        }),
    }
}

/// What a traversal branch inherits from its ancestors
#[derive(Debug, Clone, Default)]
struct Scope {
    transforms: TransformStack,
    /// Ancestor ids, outermost first
    names: Vec<String>,
    /// `<use>` elements currently being expanded, for cycle detection
    uses: Vec<usize>,
}

impl Scope {
    fn enter(&self, element: &Element) -> Scope {
        let mut names = self.names.clone();
        if let Some(id) = element.id() {
            names.push(id.to_string());
        }
        Scope {
            transforms: self.transforms.push(element_transform(element)),
            names,
            uses: self.uses.clone(),
        }
    }

    /// Ancestor ids innermost first, each followed by `_`
    fn name_prefix(&self) -> String {
        self.names.iter().rev().map(|n| format!("{n}_")).collect()
    }
}

struct Walker<'a> {
    doc: &'a SvgDocument,
    paths: Vec<SourcePath>,
    path_counter: usize,
}

impl<'a> Walker<'a> {
    fn new(doc: &'a SvgDocument) -> Self {
        Self {
            doc,
            paths: Vec::new(),
            path_counter: 0,
        }
    }

    fn visit(&mut self, idx: usize, scope: &Scope) {
        let doc = self.doc;
        let element = doc.element(idx);
        match element.tag.as_str() {
            "g" | "a" => {
                let inner = scope.enter(element);
                for &child in &element.children {
                    self.visit(child, &inner);
                }
            }
            "use" => self.visit_use(idx, scope),
            "path" => self.visit_path(element, scope),
            _ => {}
        }
    }

    fn visit_use(&mut self, idx: usize, scope: &Scope) {
        let doc = self.doc;
        let element = doc.element(idx);
        if scope.uses.contains(&idx) {
            tracing::warn!(
                element = element.id().unwrap_or("use"),
                "recursive <use> reference, skipping"
            );
            return;
        }
        let Some(target) = element.href().and_then(|h| doc.get_element_by_id(h)) else {
            tracing::warn!(
                element = element.id().unwrap_or("use"),
                href = element.href().unwrap_or(""),
                "dangling <use> reference, skipping"
            );
            return;
        };

        let offset = |name: &str| {
            element
                .attr(name)
                .and_then(length_to_user_units)
                .unwrap_or(0.0)
        };
        let mut inner = scope.enter(element);
        inner.transforms = inner
            .transforms
            .push(Transform::translate(offset("x"), offset("y")));
        inner.uses.push(idx);

        self.visit(target, &inner);
    }

    fn visit_path(&mut self, element: &Element, scope: &Scope) {
        self.path_counter += 1;
        let Some(data) = element.attr("d") else {
            tracing::debug!(
                element = element.id().unwrap_or("path"),
                "path without data"
            );
            return;
        };

        let id = element
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| format!("path{}", self.path_counter));

        self.paths.push(SourcePath {
            name: format!("{}{}", scope.name_prefix(), id),
            data: data.to_string(),
            transforms: scope.transforms.push(element_transform(element)),
            color: stroke_color(element),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spine::types::Point;

    const NESTED: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     width="200" height="100">
  <defs>
    <path id="hidden" d="M0 0 L1 1"/>
  </defs>
  <g id="layer1" transform="translate(10,0)">
    <g id="arm">
      <path id="bone" d="M0 0 L30 0" style="stroke:#ff0000"/>
    </g>
    <use id="copy" xlink:href="#arm" x="5" y="7"/>
  </g>
  <rect id="box" width="10" height="10"/>
</svg>"##;

    #[test]
    fn test_parse_tree() {
        let doc = SvgDocument::parse(NESTED).unwrap();
        assert_eq!(doc.element(doc.root).tag, "svg");
        let bone = doc.get_element_by_id("bone").unwrap();
        let arm = doc.get_element_by_id("arm").unwrap();
        assert_eq!(doc.element(bone).parent, Some(arm));
        assert_eq!(doc.element(arm).children, vec![bone]);
    }

    #[test]
    fn test_rejects_non_svg_root() {
        let err = SvgDocument::parse("<html><body/></html>").unwrap_err();
        assert!(err.to_string().contains("expected <svg>"));
    }

    #[test]
    fn test_rejects_broken_xml() {
        assert!(SvgDocument::parse("<svg><g></svg>").is_err());
    }

    #[test]
    fn test_size_from_width_height() {
        let doc = SvgDocument::parse(NESTED).unwrap();
        assert_eq!(doc.size(), (200.0, 100.0));
    }

    #[test]
    fn test_size_prefers_view_box() {
        let doc =
            SvgDocument::parse(r#"<svg width="210mm" height="297mm" viewBox="0 0 210 297"/>"#)
                .unwrap();
        assert_eq!(doc.size(), (210.0, 297.0));
    }

    #[test]
    fn test_size_converts_units() {
        let doc = SvgDocument::parse(r#"<svg width="1in" height="72pt"/>"#).unwrap();
        assert_eq!(doc.size(), (96.0, 96.0));
    }

    #[test]
    fn test_size_defaults() {
        let doc = SvgDocument::parse(r#"<svg width="100%"/>"#).unwrap();
        assert_eq!(doc.size(), (DEFAULT_DOCUMENT_SIZE, DEFAULT_DOCUMENT_SIZE));
    }

    #[test]
    fn test_collect_paths_names_and_transforms() {
        let doc = SvgDocument::parse(NESTED).unwrap();
        let paths = doc.collect_paths();
        let names: Vec<&str> = paths.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arm_layer1_bone", "arm_copy_layer1_bone"]);

        let direct = paths[0].transforms.compose();
        assert_eq!(direct.apply(Point::new(0.0, 0.0)), Point::new(10.0, 0.0));

        let via_use = paths[1].transforms.compose();
        assert_eq!(via_use.apply(Point::new(0.0, 0.0)), Point::new(15.0, 7.0));

        assert_eq!(paths[0].color.as_deref(), Some("ff0000"));
    }

    #[test]
    fn test_sibling_branches_do_not_share_scope() {
        let svg = r#"<svg>
  <g id="a" transform="translate(100,0)"><path id="p" d="M0 0 L1 0"/></g>
  <g id="b"><path id="q" d="M0 0 L1 0"/></g>
</svg>"#;
        let doc = SvgDocument::parse(svg).unwrap();
        let paths = doc.collect_paths();
        assert_eq!(paths[0].name, "a_p");
        assert_eq!(paths[1].name, "b_q");
        assert_eq!(paths[1].transforms.compose(), Transform::identity());
    }

    #[test]
    fn test_selected_paths_keep_ancestor_transforms() {
        let doc = SvgDocument::parse(NESTED).unwrap();
        let paths = doc.collect_selected_paths(&["bone".to_string()]).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].name, "bone");
        let t = paths[0].transforms.compose();
        assert_eq!(t.apply(Point::new(0.0, 0.0)), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_selected_unknown_id_is_an_error() {
        let doc = SvgDocument::parse(NESTED).unwrap();
        assert!(doc.collect_selected_paths(&["nope".to_string()]).is_err());
    }

    #[test]
    fn test_recursive_use_is_skipped() {
        let svg = r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink">
  <g id="loop"><path id="p" d="M0 0 L1 0"/><use id="again" xlink:href="#loop"/></g>
</svg>"##;
        let doc = SvgDocument::parse(svg).unwrap();
        let paths = doc.collect_paths();
        // The direct path, then once more through the <use> before the cycle is cut
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let doc = SvgDocument::parse(
            r#"<svg><path id="p" d="M0 0&#10;L30 0" transform="translate(1&#44;2)"/></svg>"#,
        )
        .unwrap();
        let paths = doc.collect_paths();
        assert_eq!(paths[0].data, "M0 0\nL30 0");
        let t = paths[0].transforms.compose();
        assert_eq!(t.apply(Point::new(0.0, 0.0)), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_path_without_id_gets_counter_name() {
        let doc = SvgDocument::parse(r#"<svg><path d="M0 0 L1 0"/><path d="M0 0 L2 0"/></svg>"#)
            .unwrap();
        let names: Vec<String> = doc.collect_paths().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["path1", "path2"]);
    }

    #[test]
    fn test_presentation_lookup() {
        let el = Element::new(
            "path",
            vec![
                ("stroke".to_string(), "red".to_string()),
                ("style".to_string(), "fill: none ; stroke-width: 2".to_string()),
            ],
        );
        assert_eq!(el.presentation("stroke"), Some("red"));
        assert_eq!(el.presentation("stroke-width"), Some("2"));
        assert_eq!(el.presentation("fill"), Some("none"));
        assert_eq!(el.presentation("opacity"), None);
    }
}
