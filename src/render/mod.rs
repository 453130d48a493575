//! # Image Rendering
//!
//! Turns decoded images into 1-bit rasters that printer adapters can send.
//!
//! ## Modules
//!
//! - [`decode`]: fetches and decodes image sources (data URIs, files, URLs)
//! - [`dither`]: grayscale to 1-bit conversion
//!
//! ## Pipeline
//!
//! ```text
//! source ──decode──► GrayImage ──rasterize──► Raster ──adapter──► bytes
//!                    (alpha on white)  (downscale, dither, pack)
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use image::{GrayImage, Luma};
//! use thermal_escpos::render::{self, dither::DitheringAlgorithm};
//!
//! let logo = GrayImage::from_pixel(1000, 200, Luma([0]));
//! let raster = render::rasterize(&logo, 576, DitheringAlgorithm::Threshold)?;
//!
//! assert_eq!(raster.width(), 576);
//! assert_eq!(raster.height(), 115);
//! # Ok::<(), thermal_escpos::ThermalError>(())
//! ```

pub mod decode;
pub mod dither;

use image::GrayImage;
use image::imageops::{self, FilterType};

use crate::error::ThermalError;
use dither::DitheringAlgorithm;

pub use decode::{ImageDecoder, SourceDecoder};

/// Printer dots per character column of Font A.
pub const DOTS_PER_COLUMN: usize = 12;

/// Convert a paper width in columns to a raster width in dots.
///
/// 48 columns → 576 dots (80mm paper), 32 columns → 384 dots (58mm paper).
#[inline]
pub const fn dots_for_columns(columns: usize) -> usize {
    columns * DOTS_PER_COLUMN
}

/// A packed 1-bit image: rows of `ceil(width / 8)` bytes, MSB = leftmost dot,
/// 1 = black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap packed raster data, checking that its length matches the
    /// dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ThermalError> {
        if width == 0 {
            return Err(ThermalError::Image("raster width must be at least 1".into()));
        }
        if width.div_ceil(8) > u16::MAX as usize {
            return Err(ThermalError::Image(format!("raster width {} is too wide", width)));
        }
        let expected = width.div_ceil(8) * height;
        if data.len() != expected {
            return Err(ThermalError::Image(format!(
                "raster data is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// An all-white raster.
    pub fn blank(width: usize, height: usize) -> Self {
        let width = width.max(1);
        Self {
            width,
            height,
            data: vec![0; width.div_ceil(8) * height],
        }
    }

    /// Width in dots.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Scale a grayscale image to fit `max_width` dots and dither it to 1-bit.
///
/// Images narrower than `max_width` keep their size; wider ones are scaled
/// down preserving aspect ratio.
pub fn rasterize(
    image: &GrayImage,
    max_width: usize,
    algorithm: DitheringAlgorithm,
) -> Result<Raster, ThermalError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ThermalError::Image("image has no pixels".into()));
    }
    if max_width == 0 {
        return Err(ThermalError::Image("no room to print image".into()));
    }

    let source_width = image.width() as usize;
    let resized;
    let image = if source_width > max_width {
        let aspect = image.height() as f32 / image.width() as f32;
        let height = ((max_width as f32 * aspect).round() as u32).max(1);
        resized = imageops::resize(image, max_width as u32, height, FilterType::Lanczos3);
        &resized
    } else {
        image
    };

    let width = image.width() as usize;
    let height = image.height() as usize;
    let intensity: Vec<f32> = image
        .pixels()
        .map(|pixel| 1.0 - (pixel[0] as f32 / 255.0))
        .collect();

    Raster::new(width, height, dither::dither(&intensity, width, height, algorithm))
}
