//! Vector rasterization backend trait and shared types.
//!
//! The [`VectorRasterizer`] trait is the one capability the render engine
//! needs from a vector library: turn SVG bytes into PNG bytes at an exact
//! pixel size, honouring the quality profile and an optional external
//! stylesheet.
//!
//! The production implementation is
//! [`ResvgRasterizer`](super::resvg_backend::ResvgRasterizer).

use super::params::RasterParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("SVG parse failed: {0}")]
    Parse(String),
    #[error("Rasterization failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for vector rasterization backends.
///
/// Implementations must be `Sync`: one instance is shared by every render
/// worker.
pub trait VectorRasterizer: Sync {
    /// Render `params.svg` to a `params.width` × `params.height` PNG.
    fn rasterize(&self, params: &RasterParams<'_>) -> Result<Vec<u8>, RasterError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::RenderProfile;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;
    use std::sync::Mutex;

    /// Fill colour of the bitmaps produced by [`MockRasterizer`].
    pub const MOCK_FILL: Rgba<u8> = Rgba([200, 40, 40, 255]);

    /// Mock rasterizer that records calls and returns a solid PNG of the
    /// requested size.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockRasterizer {
        pub operations: Mutex<Vec<RecordedRaster>>,
        /// Documents containing this text fail to rasterize.
        pub fail_marker: Option<String>,
        /// Return bytes that are not a PNG.
        pub corrupt_output: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRaster {
        pub svg: String,
        pub width: u32,
        pub height: u32,
        pub stylesheet: Option<String>,
    }

    impl MockRasterizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_on(marker: &str) -> Self {
            Self {
                fail_marker: Some(marker.to_string()),
                ..Self::default()
            }
        }

        pub fn corrupt() -> Self {
            Self {
                corrupt_output: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedRaster> {
            self.operations.lock().unwrap().clone()
        }
    }

    /// Encode a solid `width` × `height` PNG.
    pub fn solid_png(width: u32, height: u32, fill: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, fill);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    impl VectorRasterizer for MockRasterizer {
        fn rasterize(&self, params: &RasterParams<'_>) -> Result<Vec<u8>, RasterError> {
            let svg = String::from_utf8_lossy(params.svg).into_owned();
            self.operations.lock().unwrap().push(RecordedRaster {
                svg: svg.clone(),
                width: params.width,
                height: params.height,
                stylesheet: params.stylesheet.map(str::to_string),
            });

            if let Some(marker) = &self.fail_marker
                && svg.contains(marker.as_str())
            {
                return Err(RasterError::ProcessingFailed(format!(
                    "mock failure on '{marker}'"
                )));
            }
            if self.corrupt_output {
                return Ok(b"not a png".to_vec());
            }
            Ok(solid_png(params.width, params.height, MOCK_FILL))
        }
    }

    fn params<'a>(svg: &'a [u8], stylesheet: Option<&'a str>) -> RasterParams<'a> {
        RasterParams {
            svg,
            width: 24,
            height: 16,
            profile: &RenderProfile::ICON,
            stylesheet,
        }
    }

    #[test]
    fn mock_records_rasterize() {
        let backend = MockRasterizer::new();
        let png = backend
            .rasterize(&params(b"<svg/>", Some("#a { fill: red; }")))
            .unwrap();

        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (24, 16));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].svg, "<svg/>");
        assert_eq!(ops[0].stylesheet.as_deref(), Some("#a { fill: red; }"));
    }

    #[test]
    fn mock_fails_on_marker() {
        let backend = MockRasterizer::failing_on("broken");
        assert!(backend.rasterize(&params(b"<svg id='broken'/>", None)).is_err());
        assert!(backend.rasterize(&params(b"<svg id='fine'/>", None)).is_ok());
        assert_eq!(backend.get_operations().len(), 2);
    }

    #[test]
    fn mock_corrupt_output_is_not_png() {
        let backend = MockRasterizer::corrupt();
        let bytes = backend.rasterize(&params(b"<svg/>", None)).unwrap();
        assert!(image::load_from_memory(&bytes).is_err());
    }
}
