//! Pure calculation functions for icon dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Icon sources declare their size either through `width`/`height`
//! attributes or through a `viewBox`. Both are read as whole pixels: only a
//! `px` unit is accepted, and a fractional value is rejected.

use thiserror::Error;

/// Scale factors with a conventional meaning for the output sets.
pub const STANDARD_SCALES: &[f64] = &[1.0, 1.5, 2.0];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DimensionError {
    #[error("no usable width/height or viewBox")]
    Missing,
    #[error("invalid length '{0}'")]
    InvalidLength(String),
    #[error("invalid viewBox '{0}'")]
    InvalidViewBox(String),
    #[error("zero-sized icon ({0}x{1})")]
    Empty(u32, u32),
}

/// Parse a `width`/`height` attribute value into whole pixels.
///
/// ```
/// # use iconsmith::imaging::parse_length;
/// assert_eq!(parse_length("32px"), Some(32));
/// assert_eq!(parse_length("16"), Some(16));
/// assert_eq!(parse_length("2em"), None);
/// ```
pub fn parse_length(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number.parse().ok()
}

/// Width and height from a `viewBox` value (`min-x min-y width height`).
///
/// Exactly four whitespace-separated tokens are required; the last two are
/// read like [`parse_length`], so a `px` suffix is allowed.
pub fn parse_view_box(raw: &str) -> Option<(u32, u32)> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() != 4 {
        return None;
    }
    let width = parse_length(tokens[2])?;
    let height = parse_length(tokens[3])?;
    Some((width, height))
}

/// Resolve an icon's intrinsic pixel size from its root attributes.
///
/// `width` and `height` win when both are present and non-empty. Otherwise
/// the `viewBox` width and height are used. A present but unparsable value
/// is an error, never a fallback.
pub fn resolve_dimensions(
    width: Option<&str>,
    height: Option<&str>,
    view_box: Option<&str>,
) -> Result<(u32, u32), DimensionError> {
    fn non_empty(v: Option<&str>) -> Option<&str> {
        v.filter(|s| !s.trim().is_empty())
    }

    let dims = match (non_empty(width), non_empty(height)) {
        (Some(w), Some(h)) => {
            let w_px = parse_length(w).ok_or_else(|| DimensionError::InvalidLength(w.into()))?;
            let h_px = parse_length(h).ok_or_else(|| DimensionError::InvalidLength(h.into()))?;
            (w_px, h_px)
        }
        _ => {
            let vb = non_empty(view_box).ok_or(DimensionError::Missing)?;
            parse_view_box(vb).ok_or_else(|| DimensionError::InvalidViewBox(vb.into()))?
        }
    };

    if dims.0 == 0 || dims.1 == 0 {
        return Err(DimensionError::Empty(dims.0, dims.1));
    }
    Ok(dims)
}

/// Output pixel size for `native` dimensions at `scale`, truncated.
///
/// ```
/// # use iconsmith::imaging::scaled_dimensions;
/// assert_eq!(scaled_dimensions((16, 16), 1.5), (24, 24));
/// assert_eq!(scaled_dimensions((15, 15), 1.5), (22, 22));
/// ```
pub fn scaled_dimensions(native: (u32, u32), scale: f64) -> (u32, u32) {
    let (w, h) = native;
    ((w as f64 * scale) as u32, (h as f64 * scale) as u32)
}

/// Clamp a requested scale to at least 1.
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 1.0 { scale } else { 1.0 }
}

/// `true` for 1, 1.5 and 2.
pub fn is_standard_scale(scale: f64) -> bool {
    STANDARD_SCALES.contains(&scale)
}
