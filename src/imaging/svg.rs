//! Mutable SVG document model.
//!
//! Icons are parsed into an `xmltree` DOM so the render stage can fix up
//! inline styles before handing the document to the rasterizer, and the
//! extract stage can walk elements in document order.
//!
//! The original bytes are kept alongside the DOM. [`SvgDocument::to_bytes`]
//! only re-serializes when a fixup actually changed something, so untouched
//! icons reach the rasterizer byte-for-byte.

use super::calculations::{DimensionError, resolve_dimensions};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use thiserror::Error;
use xmltree::{Element, XMLNode};

#[derive(Error, Debug)]
pub enum SvgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML parse error: {0}")]
    Parse(#[from] xmltree::ParseError),
    #[error("XML write error: {0}")]
    Write(String),
}

/// A parsed icon document.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    root: Element,
    source: Vec<u8>,
    modified: bool,
}

impl SvgDocument {
    pub fn parse(source: Vec<u8>) -> Result<Self, SvgError> {
        let root = Element::parse(source.as_slice())?;
        Ok(Self {
            root,
            source,
            modified: false,
        })
    }

    pub fn read(path: &Path) -> Result<Self, SvgError> {
        Self::parse(fs::read(path)?)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Value of an attribute on the root element.
    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root.attributes.get(name).map(String::as_str)
    }

    /// Native pixel size from the root `width`/`height`, or the `viewBox`.
    pub fn intrinsic_dimensions(&self) -> Result<(u32, u32), DimensionError> {
        resolve_dimensions(
            self.root_attribute("width"),
            self.root_attribute("height"),
            self.root_attribute("viewBox"),
        )
    }

    /// Every element, depth-first in document order, root included.
    pub fn elements(&self) -> Vec<&Element> {
        fn collect<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
            out.push(element);
            for child in &element.children {
                if let XMLNode::Element(child) = child {
                    collect(child, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// Repair the dash-prefixed inkscape properties some editors emit
    /// (`-inkscape-font-specification`), which break CSS parsing.
    ///
    /// Returns the number of `style` attributes changed.
    pub fn fix_inkscape_prefix(&mut self) -> usize {
        let changed = rewrite_styles(&mut self.root, &mut |style| {
            style
                .contains("-inkscape")
                .then(|| style.replace("-inkscape", "inkscape"))
        });
        self.modified |= changed > 0;
        changed
    }

    /// Drop every inline `style` attribute so an external stylesheet fully
    /// controls presentation.
    ///
    /// Returns the number of attributes removed.
    pub fn clear_inline_styles(&mut self) -> usize {
        fn clear(element: &mut Element) -> usize {
            let mut removed = usize::from(element.attributes.shift_remove("style").is_some());
            for child in element.children.iter_mut() {
                if let XMLNode::Element(child) = child {
                    removed += clear(child);
                }
            }
            removed
        }
        let removed = clear(&mut self.root);
        self.modified |= removed > 0;
        removed
    }

    /// `true` once any fixup has changed the DOM.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// The document as bytes: the original source if unchanged, otherwise
    /// the re-serialized DOM.
    ///
    /// Re-serialized attributes keep their source order, so the same input
    /// always yields the same bytes. Attribute namespace prefixes are not
    /// kept (`xlink:href` is written as `href`, `inkscape:label` as `label`);
    /// the rasterizer accepts the unprefixed SVG 2 forms.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>, SvgError> {
        if !self.modified {
            return Ok(Cow::Borrowed(&self.source));
        }
        let mut out = Vec::with_capacity(self.source.len());
        self.root
            .write(&mut out)
            .map_err(|e| SvgError::Write(e.to_string()))?;
        Ok(Cow::Owned(out))
    }
}

/// Apply `rewrite` to every `style` attribute; `None` leaves it unchanged.
fn rewrite_styles(
    element: &mut Element,
    rewrite: &mut impl FnMut(&str) -> Option<String>,
) -> usize {
    let mut changed = 0;
    if let Some(new_style) = element.attributes.get("style").and_then(|s| rewrite(s)) {
        element.attributes.insert("style".to_string(), new_style);
        changed += 1;
    }
    for child in element.children.iter_mut() {
        if let XMLNode::Element(child) = child {
            changed += rewrite_styles(child, rewrite);
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ICON: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="16px" height="16px" viewBox="0 0 32 32">
  <g id="layer1" style="-inkscape-font-specification:Sans;fill:#000">
    <path id="shape1" style="fill:#ff0000;stroke:none" d="M0 0h16v16H0z"/>
    <rect id="plain" width="4" height="4"/>
  </g>
</svg>"##;

    fn doc(src: &str) -> SvgDocument {
        SvgDocument::parse(src.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn reads_root_attributes() {
        let d = doc(ICON);
        assert_eq!(d.root_attribute("width"), Some("16px"));
        assert_eq!(d.root_attribute("viewBox"), Some("0 0 32 32"));
        assert_eq!(d.root_attribute("missing"), None);
    }

    #[test]
    fn intrinsic_dimensions_prefer_width_height() {
        assert_eq!(doc(ICON).intrinsic_dimensions(), Ok((16, 16)));
    }

    #[test]
    fn intrinsic_dimensions_fall_back_to_view_box() {
        let d = doc(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 12"/>"#);
        assert_eq!(d.intrinsic_dimensions(), Ok((24, 12)));
    }

    #[test]
    fn intrinsic_dimensions_missing() {
        let d = doc(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
        assert!(d.intrinsic_dimensions().is_err());
    }

    #[test]
    fn elements_are_depth_first() {
        let d = doc(ICON);
        let names: Vec<&str> = d.elements().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["svg", "g", "path", "rect"]);
    }

    #[test]
    fn fix_inkscape_prefix_rewrites_styles() {
        let mut d = doc(ICON);
        assert_eq!(d.fix_inkscape_prefix(), 1);
        assert!(d.is_modified());
        let g = d.elements()[1];
        assert_eq!(
            g.attributes.get("style").map(String::as_str),
            Some("inkscape-font-specification:Sans;fill:#000")
        );
    }

    #[test]
    fn fix_inkscape_prefix_noop_keeps_source() {
        let src = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><g style="fill:red"/></svg>"#;
        let mut d = doc(src);
        assert_eq!(d.fix_inkscape_prefix(), 0);
        assert!(!d.is_modified());
        assert_eq!(d.to_bytes().unwrap().as_ref(), src.as_bytes());
    }

    #[test]
    fn clear_inline_styles_removes_every_style() {
        let mut d = doc(ICON);
        assert_eq!(d.clear_inline_styles(), 2);
        assert!(d.elements().iter().all(|e| !e.attributes.contains_key("style")));

        let bytes = d.to_bytes().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(!text.contains("style="));
        assert!(text.contains("shape1"));
    }

    #[test]
    fn serialized_document_parses_again() {
        let mut d = doc(ICON);
        d.clear_inline_styles();
        let bytes = d.to_bytes().unwrap().into_owned();
        let again = SvgDocument::parse(bytes).unwrap();
        assert_eq!(again.intrinsic_dimensions(), Ok((16, 16)));
        assert_eq!(again.elements().len(), 4);
    }

    #[test]
    fn serialized_attributes_keep_source_order() {
        let serialize = || {
            let mut d = doc(ICON);
            d.clear_inline_styles();
            String::from_utf8(d.to_bytes().unwrap().into_owned()).unwrap()
        };
        let text = serialize();
        assert_eq!(text, serialize());

        let rect = text.find("id=\"plain\"").unwrap();
        let width = text.find("width=\"4\"").unwrap();
        let height = text.find("height=\"4\"").unwrap();
        assert!(rect < width && width < height);
        let shape = text.find("id=\"shape1\"").unwrap();
        assert!(shape < text.find("d=\"M0 0h16v16H0z\"").unwrap());
    }

    #[test]
    fn parse_error_on_malformed_xml() {
        let result = SvgDocument::parse(b"<svg><g></svg>".to_vec());
        assert!(matches!(result, Err(SvgError::Parse(_))));
    }

    #[test]
    fn read_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = SvgDocument::read(&tmp.path().join("nope.svg"));
        assert!(matches!(result, Err(SvgError::Io(_))));
    }
}
