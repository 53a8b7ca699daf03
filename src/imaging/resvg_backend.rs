//! Pure Rust rasterization backend built on resvg.
//!
//! ## Crate mapping
//!
//! | Step | Crate / function |
//! |---|---|
//! | Parse + style | `usvg::Tree::from_data` with `Options::style_sheet` |
//! | Render | `resvg::render` into a `tiny_skia::Pixmap` |
//! | Encode → PNG | `Pixmap::encode_png` |
//!
//! System fonts are loaded once per backend instance and shared by every
//! render through an `Arc`.
//!
//! Only anti-aliasing, text anti-aliasing and interpolation of the
//! [`RenderProfile`] map onto usvg options. resvg has no switch for
//! `dithering`, `quality_color`, `pure_strokes` or `fractional_text_metrics`:
//! it never dithers, always composites in full precision, draws strokes
//! unnormalized and lays out text with fractional metrics, which is what
//! [`RenderProfile::ICON`] asks for.

use super::backend::{RasterError, VectorRasterizer};
use super::params::{Interpolation, RasterParams, RenderProfile};
use resvg::tiny_skia;
use resvg::usvg;
use std::sync::Arc;

/// resvg-based backend.
///
/// See the [module docs](self) for the crate-to-step mapping.
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        Self {
            fontdb: Arc::new(fontdb),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate the quality profile into usvg rendering hints.
fn apply_profile(options: &mut usvg::Options<'_>, profile: &RenderProfile) {
    options.shape_rendering = if profile.anti_alias {
        usvg::ShapeRendering::GeometricPrecision
    } else {
        usvg::ShapeRendering::CrispEdges
    };
    options.text_rendering = if profile.text_anti_alias {
        usvg::TextRendering::OptimizeLegibility
    } else {
        usvg::TextRendering::OptimizeSpeed
    };
    options.image_rendering = match profile.interpolation {
        Interpolation::NearestNeighbor => usvg::ImageRendering::OptimizeSpeed,
        Interpolation::Bilinear | Interpolation::Bicubic => usvg::ImageRendering::OptimizeQuality,
    };
}

impl VectorRasterizer for ResvgRasterizer {
    fn rasterize(&self, params: &RasterParams<'_>) -> Result<Vec<u8>, RasterError> {
        let mut options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        apply_profile(&mut options, params.profile);
        options.style_sheet = params.stylesheet.map(str::to_string);

        let tree = usvg::Tree::from_data(params.svg, &options)
            .map_err(|e| RasterError::Parse(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(params.width, params.height).ok_or_else(|| {
            RasterError::ProcessingFailed(format!(
                "cannot allocate {}x{} pixmap",
                params.width, params.height
            ))
        })?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            params.width as f32 / size.width(),
            params.height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RasterError::ProcessingFailed(format!("PNG encode failed: {e}")))
    }
}
