//! # iconsmith
//!
//! Batch tooling for the Eclipse platform SVG icon repository. The icon
//! sources are a directory tree of SVG documents; iconsmith rasterizes them
//! to PNG at any scale, derives the disabled variants, and manages the
//! per-icon stylesheets that themes are built from.
//!
//! # Architecture: Gather, Then Fan Out
//!
//! Every command starts with a gather pass that turns the source tree into a
//! flat list of independent jobs, then runs those jobs on a rayon pool:
//!
//! ```text
//! eclipse-svg/  →  gather  →  [IconEntry]  →  render   →  eclipse-png/
//!                                          →  extract  →  eclipse-css/<set>/styles/stock/
//! eclipse-css/<set>/styles/stock/  →  clone  →  eclipse-css/<set>/styles/<theme>/
//! ```
//!
//! Jobs share nothing but a success counter and a failure list. A job that
//! fails is logged, recorded and skipped; only configuration problems and a
//! missing source tree stop a run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`gather`] | Walks an icon set into render jobs, pairing `e*` directories with their `d*` siblings |
//! | [`render`] | Rasterizes one job to PNG at the configured scale, plus its disabled variant |
//! | [`extract`] | Lifts inline `style` attributes into per-icon stock stylesheets |
//! | [`theme`] | Clones the stock stylesheets into a new named theme |
//! | [`stylesheet`] | Compiles a theme's `.scss` sheet to CSS through an external compiler |
//! | [`fragment`] | Writes the PDE fragment descriptors for hi-dpi output sets |
//! | [`imaging`] | SVG document access, dimension math, rasterizer backends, bitmap filters |
//! | [`config`] | `iconsmith.toml` loading, merging over stock defaults, and validation |
//! | [`naming`] | Directory and file naming conventions of the icon repository |
//! | [`types`] | Job types shared between stages (`IconEntry`, `FolderState`) |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Traits at the External Seams
//!
//! The two collaborators that do real work outside this crate, the vector
//! rasterizer and the stylesheet compiler, sit behind traits
//! ([`imaging::VectorRasterizer`], [`stylesheet::StylesheetCompiler`]).
//! Production uses resvg and the `sass` executable; tests record calls and
//! produce canned output, so the render pipeline is tested without either.
//!
//! ## Styles Win Over Inline Attributes
//!
//! When a theme stylesheet exists for an icon, the icon's inline `style`
//! attributes are removed before rendering. Inline styles outrank any
//! stylesheet rule, so leaving them in place would make every theme a no-op.
//!
//! ## Disabled Icons Are Derived
//!
//! A `d*` directory never holds render sources. Its content is produced from
//! the `e*` sibling by a fixed filter chain (grayscale, desaturate,
//! brightness/contrast), so disabled icons can never drift from their
//! enabled originals.

pub mod config;
pub mod extract;
pub mod fragment;
pub mod gather;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod render;
pub mod stylesheet;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
