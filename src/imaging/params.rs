//! Parameter types for rasterization.
//!
//! These structs describe *what* to render, not *how*. They are the
//! interface between the render engine (which decides sizes and stylesheets)
//! and the [`backend`](super::backend) (which does the pixel work), so a
//! mock backend can stand in during tests.
//!
//! ## Types
//!
//! - [`Interpolation`]: Resampling used for embedded raster images.
//! - [`RenderProfile`]: Fixed quality hints applied to every icon.
//! - [`RasterParams`]: One rasterization: document bytes, output size, profile, optional stylesheet.

/// Resampling filter for raster images embedded in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    NearestNeighbor,
    Bilinear,
    Bicubic,
}

/// Rendering quality hints.
///
/// Icons are small, so geometry is anti-aliased at full precision while
/// text is rendered crisp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProfile {
    pub anti_alias: bool,
    pub text_anti_alias: bool,
    pub interpolation: Interpolation,
    pub dithering: bool,
    /// Highest quality colour and alpha compositing.
    pub quality_color: bool,
    /// Strokes rendered without normalization.
    pub pure_strokes: bool,
    pub fractional_text_metrics: bool,
}

impl RenderProfile {
    /// The profile every icon is rendered with.
    pub const ICON: RenderProfile = RenderProfile {
        anti_alias: true,
        text_anti_alias: false,
        interpolation: Interpolation::Bicubic,
        dithering: false,
        quality_color: true,
        pure_strokes: true,
        fractional_text_metrics: true,
    };
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::ICON
    }
}

/// Parameters for a single rasterization.
#[derive(Debug, Clone, Copy)]
pub struct RasterParams<'a> {
    /// The (possibly rewritten) SVG document.
    pub svg: &'a [u8],
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub profile: &'a RenderProfile,
    /// Compiled CSS text applied on top of the document's own styling.
    pub stylesheet: Option<&'a str>,
}
