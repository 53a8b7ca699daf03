//! Stock stylesheet extraction.
//!
//! Lifts the inline `style` attribute of every identified element into a
//! per-icon stylesheet, so themes can restyle icons without touching the
//! SVG sources:
//!
//! ```text
//! eclipse-svg/org.eclipse.ui/icons/full/obj16/file.svg
//!     <path id="shape1" style="fill:url(#grad1);-inkscape-font-specification:Sans"/>
//!
//! eclipse-css/org.eclipse.ui/styles/stock/full/obj16/file.scss
//!     @import "stock";
//!
//!     #shape1 {
//!         fill: url(../../../../../../eclipse-svg/org.eclipse.ui/icons/full/obj16/file.svg#grad1);
//!         inkscape-font-specification: Sans;
//!     }
//! ```
//!
//! Local `url(#…)` references are rewritten to point back at the source
//! document, since the stylesheet is compiled and loaded from a different
//! directory. Existing stylesheets are replaced.

use crate::config::PipelineConfig;
use crate::imaging::{SvgDocument, SvgError};
use crate::naming;
use crate::types::IconEntry;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Svg(#[from] SvgError),
    #[error("Source icon not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Icon is not inside an '{root}' icons tree: {path}")]
    OutsideSvgRoot { root: String, path: PathBuf },
}

/// Import every extracted stylesheet starts with.
const STOCK_IMPORT: &str = "@import \"stock\";\n\n";

/// Root directory names used to map icons onto stylesheet paths.
#[derive(Debug, Clone)]
pub struct ExtractSettings {
    pub svg_root: String,
    pub css_root: String,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            svg_root: naming::SVG_ROOT.to_string(),
            css_root: naming::CSS_ROOT.to_string(),
        }
    }
}

impl ExtractSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            svg_root: naming::root_name(&config.paths.source),
            css_root: naming::root_name(&config.paths.styles),
        }
    }
}

/// Outcome counts of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub written: usize,
    pub failed: usize,
    pub total: usize,
    pub elapsed_ms: u64,
}

/// Prefix that makes a local fragment reference resolve from the icon's
/// stylesheet: one `../` per path component below the svg root plus one,
/// then the source path from the svg root.
///
/// `eclipse-svg/set/icons/full/obj16/a.svg` →
/// `../../../../../../eclipse-svg/set/icons/full/obj16/a.svg`
pub fn url_prefix(svg: &Path, svg_root: &str) -> Option<String> {
    let mut components = svg.components();
    components.find(|c| matches!(c, Component::Normal(n) if *n == svg_root))?;

    let below: Vec<String> = components
        .filter_map(|c| match c {
            Component::Normal(n) => Some(n.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if below.is_empty() {
        return None;
    }

    let backsteps = "../".repeat(below.len() + 1);
    Some(format!("{backsteps}{svg_root}/{}", below.join("/")))
}

/// One `\t<name>: <value>;` line per well-formed declaration of an inline
/// style.
///
/// Declarations split on the first `:`. One without a colon, or with an
/// empty name or value, is logged and dropped; blank ones are skipped.
pub fn format_declarations(style: &str, url_prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for declaration in style.trim().split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let Some((name, value)) = declaration.split_once(':') else {
            warn!("Invalid style: {declaration}");
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            warn!("Invalid style: {declaration}");
            continue;
        }

        let value = if value.starts_with("url(#") {
            value.replacen("url(", &format!("url({url_prefix}"), 1)
        } else {
            value.to_string()
        };
        lines.push(format!("\t{name}: {value};"));
    }
    lines
}

/// Render the stylesheet for a parsed icon.
///
/// Descendants of the root element are visited depth-first; each one with a
/// non-empty `id` and `style` yields an `#<id>` rule.
pub fn extract_styles(doc: &SvgDocument, url_prefix: &str) -> String {
    let mut out = String::from(STOCK_IMPORT);
    for element in doc.elements().into_iter().skip(1) {
        let id = element.attributes.get("id").map(String::as_str).unwrap_or("");
        let style = element
            .attributes
            .get("style")
            .map(String::as_str)
            .unwrap_or("");
        if id.is_empty() || style.is_empty() {
            continue;
        }

        let fixed = style.replace("-inkscape-", "inkscape-");
        debug!("Writing: #{id}");
        out.push_str(&format!("#{id} {{\n"));
        out.push_str(&format_declarations(&fixed, url_prefix).join("\n"));
        out.push_str("\n}\n\n");
    }
    out
}

/// Extract one icon's stylesheet to its stock location and return the path
/// written.
pub fn extract(icon: &IconEntry, settings: &ExtractSettings) -> Result<PathBuf, ExtractError> {
    if !icon.input_path.exists() {
        return Err(ExtractError::SourceNotFound(icon.input_path.clone()));
    }
    let outside = || ExtractError::OutsideSvgRoot {
        root: settings.svg_root.clone(),
        path: icon.input_path.clone(),
    };
    let output = naming::stylesheet_path(
        &icon.input_path,
        &settings.svg_root,
        &settings.css_root,
        naming::STOCK_THEME,
    )
    .ok_or_else(outside)?;
    let prefix = url_prefix(&icon.input_path, &settings.svg_root).ok_or_else(outside)?;

    let doc = SvgDocument::read(&icon.input_path)?;
    let stylesheet = extract_styles(&doc, &prefix);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    if output.exists() {
        fs::remove_file(&output)?;
    }
    fs::write(&output, stylesheet)?;
    info!("Creating css for: {}", output.display());
    Ok(output)
}

/// Extract every icon on the rayon pool. Failures are logged and counted.
pub fn extract_all(icons: &[IconEntry], settings: &ExtractSettings) -> ExtractSummary {
    let start = Instant::now();
    let written = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    icons.par_iter().for_each(|icon| match extract(icon, settings) {
        Ok(_) => {
            written.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            error!("Error creating CSS for {}: {}", icon.name_base, e);
            failed.fetch_add(1, Ordering::Relaxed);
        }
    });

    ExtractSummary {
        written: written.into_inner(),
        failed: failed.into_inner(),
        total: icons.len(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}
