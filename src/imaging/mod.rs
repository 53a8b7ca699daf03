//! Icon imaging: SVG parsing, rasterization and bitmap filters.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Parse + fix up** | `xmltree` DOM ([`SvgDocument`]) |
//! | **Intrinsic size** | `width`/`height` or `viewBox` ([`resolve_dimensions`]) |
//! | **Rasterize → PNG** | `resvg` + `tiny-skia` ([`ResvgRasterizer`]) |
//! | **Disabled variant** | `image::RgbaImage` + [`filters::disabled_chain`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a rasterization
//! - **Backend**: [`VectorRasterizer`] trait + [`ResvgRasterizer`]
//! - **Filters**: Composable per-pixel transforms

pub mod backend;
mod calculations;
pub mod filters;
mod params;
pub mod resvg_backend;
pub mod svg;

pub use backend::{RasterError, VectorRasterizer};
pub use calculations::{
    DimensionError, clamp_scale, is_standard_scale, parse_length, parse_view_box,
    resolve_dimensions, scaled_dimensions,
};
pub use filters::{BitmapFilter, FilterChain, disabled_chain};
pub use params::{Interpolation, RasterParams, RenderProfile};
pub use resvg_backend::ResvgRasterizer;
pub use svg::{SvgDocument, SvgError};
