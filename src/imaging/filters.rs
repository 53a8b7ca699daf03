//! Bitmap filters for deriving disabled icons.
//!
//! A disabled icon is the rendered bitmap pushed through a fixed chain:
//!
//! ```text
//! rendered RGBA ─→ Grayscale ─→ Desaturate ─→ BrightnessContrast(2.9, 0.2) ─→ disabled RGBA
//! ```
//!
//! Every filter is a pure per-pixel transform that leaves alpha untouched,
//! so transparent icon backgrounds stay transparent.

use image::RgbaImage;

/// A single in-place pixel transform.
pub trait BitmapFilter: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, image: &mut RgbaImage);
}

fn map_rgb(image: &mut RgbaImage, f: impl Fn(u8, u8, u8) -> [u8; 3]) {
    for pixel in image.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let [nr, ng, nb] = f(r, g, b);
        pixel.0 = [nr, ng, nb, a];
    }
}

/// Luma-weighted grayscale: `(77 r + 151 g + 28 b) >> 8`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl BitmapFilter for Grayscale {
    fn name(&self) -> &'static str {
        "grayscale"
    }

    fn apply(&self, image: &mut RgbaImage) {
        map_rgb(image, |r, g, b| {
            let luma = ((r as u32 * 77 + g as u32 * 151 + b as u32 * 28) >> 8) as u8;
            [luma, luma, luma]
        });
    }
}

/// Drops saturation to zero while keeping HSB brightness, so every channel
/// becomes `max(r, g, b)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Desaturate;

impl BitmapFilter for Desaturate {
    fn name(&self) -> &'static str {
        "desaturate"
    }

    fn apply(&self, image: &mut RgbaImage) {
        map_rgb(image, |r, g, b| {
            let v = r.max(g).max(b);
            [v, v, v]
        });
    }
}

/// Brightness multiply followed by contrast around mid-gray, through a
/// 256-entry lookup table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessContrast {
    pub brightness: f32,
    pub contrast: f32,
}

impl BrightnessContrast {
    /// The washed-out look used for disabled icons.
    pub const DISABLED: BrightnessContrast = BrightnessContrast {
        brightness: 2.9,
        contrast: 0.2,
    };

    fn transfer(&self, f: f32) -> f32 {
        let f = f * self.brightness;
        (f - 0.5) * self.contrast + 0.5
    }

    /// Channel lookup table; values are truncated then clamped to 0..=255.
    pub fn table(&self) -> [u8; 256] {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            let v = (255.0 * self.transfer(i as f32 / 255.0)) as i32;
            *slot = v.clamp(0, 255) as u8;
        }
        table
    }
}

impl BitmapFilter for BrightnessContrast {
    fn name(&self) -> &'static str {
        "brightness-contrast"
    }

    fn apply(&self, image: &mut RgbaImage) {
        let table = self.table();
        map_rgb(image, |r, g, b| {
            [table[r as usize], table[g as usize], table[b as usize]]
        });
    }
}

/// Ordered filter pipeline.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn BitmapFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, filter: impl BitmapFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run every filter over a copy of `image`.
    pub fn apply(&self, image: &RgbaImage) -> RgbaImage {
        let mut out = image.clone();
        for filter in &self.filters {
            filter.apply(&mut out);
        }
        out
    }
}

/// grayscale → desaturate → brightness 2.9 / contrast 0.2
pub fn disabled_chain() -> FilterChain {
    FilterChain::new()
        .then(Grayscale)
        .then(Desaturate)
        .then(BrightnessContrast::DISABLED)
}
