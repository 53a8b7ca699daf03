//! Icon rasterization.
//!
//! Takes the jobs produced by [`gather`](crate::gather) and renders each one
//! to PNG, plus a desaturated copy for icons with a disabled variant.
//!
//! ## Per-icon steps
//!
//! ```text
//! read SVG ─→ intrinsic size ─→ × scale ─→ fix inline styles
//!          ─→ [theme: compile stylesheet, clear inline styles]
//!          ─→ rasterize ─→ decode ─→ <name>[@<scale>x].png
//!          ─→ [disabled: grayscale → desaturate → brightness/contrast]
//! ```
//!
//! A failing icon never stops the run: the error is logged, the icon is
//! recorded as failed and every other icon still renders. A themed icon
//! whose stylesheet cannot be compiled falls back to its inline styles.
//!
//! ## Output Structure
//!
//! ```text
//! eclipse-png[-<theme>][-hidpi]/
//! └── org.eclipse.ui[.hidpi]/
//!     └── icons/full/
//!         ├── etool16/save_edit@2x.png
//!         └── dtool16/save_edit@2x.png    # disabled variant
//! ```
//!
//! ## Parallel Processing
//!
//! [`Renderer::render_all`] runs icons on the global
//! [rayon](https://docs.rs/rayon) pool. The success counter is atomic and the
//! failure list sits behind a mutex; nothing else is shared between jobs.

use crate::config::PipelineConfig;
use crate::imaging::{
    DimensionError, FilterChain, RasterError, RasterParams, RenderProfile, SvgDocument, SvgError,
    VectorRasterizer, clamp_scale, disabled_chain, is_standard_scale, scaled_dimensions,
};
use crate::naming;
use crate::extract::url_prefix;
use crate::stylesheet::{StylesheetCompiler, ensure_compiled, localize_references};
use crate::types::IconEntry;
use image::{ImageFormat, RgbaImage};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Source icon not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("{0}")]
    Svg(#[from] SvgError),
    #[error("Dimension could not be parsed: {0}")]
    Dimensions(#[from] DimensionError),
    #[error("{0}")]
    Raster(#[from] RasterError),
    #[error("Rendered bitmap could not be decoded: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Disabled variant failed: {0}")]
    Disabled(#[source] image::ImageError),
}

/// Engine settings, fixed for a whole run.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Output multiplier on native icon size; clamped to at least 1.
    pub scale: f64,
    /// Render through `styles/<theme>` stylesheets.
    pub theme: Option<String>,
    /// Recompile stylesheets even if a compiled sheet exists.
    pub regenerate_styles: bool,
    /// Name of the svg root directory component in source paths.
    pub svg_root: String,
    /// Name of the css root directory component in stylesheet paths.
    pub css_root: String,
    /// Include directory for stylesheet imports (`<css root>/styles`).
    pub style_include_dir: PathBuf,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            theme: None,
            regenerate_styles: false,
            svg_root: naming::SVG_ROOT.to_string(),
            css_root: naming::CSS_ROOT.to_string(),
            style_include_dir: Path::new(naming::CSS_ROOT).join(naming::STYLES_DIR),
        }
    }
}

impl RenderSettings {
    /// Build settings from config, resolving the stylesheet include
    /// directory against `working_dir`.
    pub fn from_config(config: &PipelineConfig, working_dir: &Path) -> Self {
        Self {
            scale: config.render.scale,
            theme: config.styles.theme.clone(),
            regenerate_styles: config.styles.regenerate,
            svg_root: naming::root_name(&config.paths.source),
            css_root: naming::root_name(&config.paths.styles),
            style_include_dir: working_dir
                .join(&config.paths.styles)
                .join(naming::STYLES_DIR),
        }
    }
}

/// A successfully rendered icon.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedIcon {
    pub name: String,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub disabled_output: Option<PathBuf>,
    /// Compiled stylesheet the icon was rendered with.
    pub stylesheet: Option<PathBuf>,
}

/// An icon that could not be rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedIcon {
    pub name: String,
    pub source: PathBuf,
    pub reason: String,
}

impl FailedIcon {
    fn new(icon: &IconEntry, err: &RenderError) -> Self {
        Self {
            name: icon.name_base.clone(),
            source: icon.input_path.clone(),
            reason: err.to_string(),
        }
    }
}

/// Progress event emitted once per icon by [`Renderer::render_all`].
#[derive(Debug, Clone)]
pub enum RenderEvent {
    Rendered(RenderedIcon),
    Failed(FailedIcon),
}

/// Result of a render run, also written as `render-report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSummary {
    pub rendered: usize,
    pub failed: usize,
    pub total: usize,
    pub elapsed_ms: u64,
    pub failures: Vec<FailedIcon>,
}

impl RenderSummary {
    pub fn write_report(&self, path: &Path) -> Result<(), RenderError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// A decoded render waiting to be written.
struct Rasterized {
    png: Vec<u8>,
    bitmap: RgbaImage,
    width: u32,
    height: u32,
    stylesheet: Option<PathBuf>,
}

/// Renders icons through a rasterizer and a stylesheet compiler, keeping a
/// running tally of successes and failures.
pub struct Renderer<'a, R: ?Sized, C: ?Sized> {
    settings: RenderSettings,
    rasterizer: &'a R,
    compiler: &'a C,
    disabled: FilterChain,
    rendered: AtomicUsize,
    failures: Mutex<Vec<FailedIcon>>,
}

impl<'a, R, C> Renderer<'a, R, C>
where
    R: VectorRasterizer + ?Sized,
    C: StylesheetCompiler + ?Sized,
{
    pub fn new(mut settings: RenderSettings, rasterizer: &'a R, compiler: &'a C) -> Self {
        if !is_standard_scale(settings.scale) {
            warn!(
                "Unusual scale factor: {} (@{}x)",
                settings.scale, settings.scale
            );
        }
        settings.scale = clamp_scale(settings.scale);
        Self {
            settings,
            rasterizer,
            compiler,
            disabled: disabled_chain(),
            rendered: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render one icon and record the outcome in the tally.
    ///
    /// The icon counts as rendered as soon as its bitmap decodes. A later
    /// failure to write the PNG or its disabled variant is still recorded,
    /// so one icon can show up in both counts.
    pub fn render(&self, icon: &IconEntry) -> Result<RenderedIcon, FailedIcon> {
        self.rasterize_icon(icon)
            .and_then(|raster| {
                self.rendered.fetch_add(1, Ordering::Relaxed);
                self.write_icon(icon, raster)
            })
            .map_err(|e| {
                error!("Failed to render icon {}: {}", icon.name_base, e);
                let failed = FailedIcon::new(icon, &e);
                self.failures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(failed.clone());
                failed
            })
    }

    /// Render every icon on the rayon pool, sending one event per icon when
    /// `events` is set.
    pub fn render_all(
        &self,
        icons: &[IconEntry],
        events: Option<Sender<RenderEvent>>,
    ) -> RenderSummary {
        let start = Instant::now();
        icons.par_iter().for_each_with(events, |events, icon| {
            let event = match self.render(icon) {
                Ok(rendered) => RenderEvent::Rendered(rendered),
                Err(failed) => RenderEvent::Failed(failed),
            };
            if let Some(tx) = events {
                tx.send(event).ok();
            }
        });
        self.summary(icons.len(), start.elapsed())
    }

    /// Snapshot of the tally.
    pub fn summary(&self, total: usize, elapsed: Duration) -> RenderSummary {
        let failures = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        RenderSummary {
            rendered: self.rendered.load(Ordering::Relaxed),
            failed: failures.len(),
            total,
            elapsed_ms: elapsed.as_millis() as u64,
            failures,
        }
    }

    /// Render one icon without touching the tally.
    pub fn render_icon(&self, icon: &IconEntry) -> Result<RenderedIcon, RenderError> {
        let raster = self.rasterize_icon(icon)?;
        self.write_icon(icon, raster)
    }

    /// Everything up to a decoded bitmap; no PNG is written yet.
    fn rasterize_icon(&self, icon: &IconEntry) -> Result<Rasterized, RenderError> {
        if !icon.input_path.exists() {
            return Err(RenderError::SourceNotFound(icon.input_path.clone()));
        }
        fs::create_dir_all(&icon.output_path)?;
        if let Some(dir) = &icon.disabled_path {
            fs::create_dir_all(dir)?;
        }

        let mut doc = SvgDocument::read(&icon.input_path)?;
        let native = doc.intrinsic_dimensions()?;
        let (width, height) = scaled_dimensions(native, self.settings.scale);

        doc.fix_inkscape_prefix();
        let (stylesheet, css) = self.resolve_stylesheet(icon).unzip();
        if stylesheet.is_some() {
            doc.clear_inline_styles();
        }

        debug!(
            "Rasterizing: {}.png at {}x{}",
            icon.name_base, width, height
        );
        let svg = doc.to_bytes()?;
        let png = self.rasterizer.rasterize(&RasterParams {
            svg: &svg,
            width,
            height,
            profile: &RenderProfile::ICON,
            stylesheet: css.as_deref(),
        })?;

        let bitmap = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(RenderError::Decode)?
            .to_rgba8();

        Ok(Rasterized {
            png,
            bitmap,
            width,
            height,
            stylesheet,
        })
    }

    /// Write the PNG, then the disabled variant when the icon has one.
    fn write_icon(
        &self,
        icon: &IconEntry,
        raster: Rasterized,
    ) -> Result<RenderedIcon, RenderError> {
        let file_name = naming::output_file_name(&icon.name_base, self.settings.scale);
        let output = icon.output_path.join(&file_name);
        fs::write(&output, &raster.png)?;

        let disabled_output = match &icon.disabled_path {
            Some(dir) => {
                let path = dir.join(&file_name);
                self.write_disabled(&raster.bitmap, &path)?;
                Some(path)
            }
            None => None,
        };

        Ok(RenderedIcon {
            name: icon.name_base.clone(),
            output,
            width: raster.width,
            height: raster.height,
            disabled_output,
            stylesheet: raster.stylesheet,
        })
    }

    /// Compiled stylesheet for `icon` under the configured theme, with its
    /// CSS ready for the rasterizer, or `None` to render with inline styles.
    fn resolve_stylesheet(&self, icon: &IconEntry) -> Option<(PathBuf, String)> {
        let theme = self.settings.theme.as_deref()?;
        let Some(source) = naming::stylesheet_path(
            &icon.input_path,
            &self.settings.svg_root,
            &self.settings.css_root,
            theme,
        ) else {
            warn!(
                "No stylesheet location for {}, using defaults.",
                icon.input_path.display()
            );
            return None;
        };

        let compiled = match ensure_compiled(
            self.compiler,
            &source,
            &icon.name_base,
            &self.settings.style_include_dir,
            self.settings.regenerate_styles,
        ) {
            Ok(path) => path,
            Err(e) => {
                error!(
                    "Error compiling stylesheet {}: {}, using defaults.",
                    source.display(),
                    e
                );
                return None;
            }
        };

        let css = match fs::read_to_string(&compiled) {
            Ok(css) => css,
            Err(e) => {
                error!(
                    "Could not resolve supplied stylesheet: {}: {}, using defaults.",
                    compiled.display(),
                    e
                );
                return None;
            }
        };
        let css = match url_prefix(&icon.input_path, &self.settings.svg_root) {
            Some(document) => localize_references(&css, &document),
            None => css,
        };
        Some((compiled, css))
    }

    fn write_disabled(&self, bitmap: &RgbaImage, path: &Path) -> Result<(), RenderError> {
        self.disabled
            .apply(bitmap)
            .save_with_format(path, ImageFormat::Png)
            .map_err(RenderError::Disabled)
    }
}
