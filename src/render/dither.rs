//! # Dithering
//!
//! Converts continuous-tone intensity buffers to packed 1-bit rows suitable
//! for thermal printers.
//!
//! Intensity follows the printer's view of the world: `0.0` is white paper,
//! `1.0` is a fully burned dot.
//!
//! ## Algorithms
//!
//! | Method | Speed | Quality | Artifacts |
//! |--------|-------|---------|-----------|
//! | Threshold | Fastest | Poor on photos | Banding |
//! | Bayer | Fast | Good | Regular pattern |
//! | Floyd-Steinberg | Slower | Better | Noise, worms |
//!
//! Threshold is the default: receipts mostly carry logos and line art where a
//! hard cut at 50% keeps edges crisp.
//!
//! ## Bit Packing
//!
//! - Bit 7 (MSB) = leftmost pixel
//! - 1 = black (print dot), 0 = white
//!
//! ```
//! use thermal_escpos::render::dither::pack_row;
//!
//! let row = vec![true, true, false, false, true, false, true, false];
//! assert_eq!(pack_row(&row), vec![0b11001010]);
//! ```

use serde::{Deserialize, Serialize};

/// Dithering algorithm used to reduce grayscale to 1-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitheringAlgorithm {
    /// Hard cut at 50% intensity.
    #[default]
    #[serde(alias = "none")]
    Threshold,
    /// Bayer 8x8 ordered dithering.
    Bayer,
    /// Floyd-Steinberg error diffusion.
    #[serde(alias = "fs", alias = "floyd_steinberg")]
    FloydSteinberg,
}

impl DitheringAlgorithm {
    /// Parse a dithering algorithm name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" | "none" => Some(DitheringAlgorithm::Threshold),
            "bayer" => Some(DitheringAlgorithm::Bayer),
            "floyd-steinberg" | "floyd_steinberg" | "fs" => {
                Some(DitheringAlgorithm::FloydSteinberg)
            }
            _ => None,
        }
    }
}

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63. Low values activate first at low intensities.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Bayer threshold for a pixel position, in (0, 1).
///
/// ```text
/// threshold = (BAYER8[y mod 8][x mod 8] + 0.5) / 64.0
/// ```
///
/// The half offset keeps full black always printing and full white never
/// printing.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Whether the Bayer matrix prints a dot at `(x, y)` for `intensity`.
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Pack a row of boolean pixel values into bytes, MSB first.
///
/// A row whose length is not a multiple of 8 is padded with white.
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

/// Dither a row-major intensity buffer into packed raster rows.
///
/// Returns `ceil(width / 8) * height` bytes.
pub fn dither(
    intensity: &[f32],
    width: usize,
    height: usize,
    algorithm: DitheringAlgorithm,
) -> Vec<u8> {
    debug_assert_eq!(intensity.len(), width * height);

    let pixels: Vec<bool> = match algorithm {
        DitheringAlgorithm::Threshold => intensity.iter().map(|&v| v > 0.5).collect(),
        DitheringAlgorithm::Bayer => intensity
            .iter()
            .enumerate()
            .map(|(i, &v)| should_print(i % width.max(1), i / width.max(1), v))
            .collect(),
        DitheringAlgorithm::FloydSteinberg => floyd_steinberg(intensity, width, height),
    };

    let mut data = Vec::with_capacity(width.div_ceil(8) * height);
    for row in pixels.chunks(width.max(1)).take(height) {
        data.extend(pack_row(row));
    }
    data
}

fn floyd_steinberg(intensity: &[f32], width: usize, height: usize) -> Vec<bool> {
    let mut buffer = intensity.to_vec();
    let mut out = vec![false; width * height];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = buffer[idx];
            let black = old > 0.5;
            out[idx] = black;
            let error = old - if black { 1.0 } else { 0.0 };

            let mut spread = |dx: isize, dy: usize, weight: f32| {
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx >= 0 && (nx as usize) < width && ny < height {
                    buffer[ny * width + nx as usize] += error * weight;
                }
            };
            spread(1, 0, 7.0 / 16.0);
            spread(-1, 1, 3.0 / 16.0);
            spread(0, 1, 5.0 / 16.0);
            spread(1, 1, 1.0 / 16.0);
        }
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bayer_matrix_values() {
        let mut seen = [false; 64];
        for row in &BAYER8 {
            for &val in row {
                assert!(val < 64, "Matrix value {} out of range", val);
                assert!(!seen[val as usize], "Duplicate value {}", val);
                seen[val as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "Not all values 0-63 present");
    }

    #[test]
    fn test_threshold_range() {
        for y in 0..8 {
            for x in 0..8 {
                let t = threshold(x, y);
                assert!(t > 0.0 && t < 1.0, "Threshold at ({},{}) out of range", x, y);
            }
        }
    }

    #[test]
    fn test_pack_row() {
        assert_eq!(pack_row(&[true; 8]), vec![0xFF]);
        assert_eq!(pack_row(&[false; 8]), vec![0x00]);
        assert_eq!(
            pack_row(&[true, false, true, false, true, false, true, false]),
            vec![0xAA]
        );
        // 9 pixels pad to 2 bytes
        assert_eq!(pack_row(&[true; 9]), vec![0xFF, 0x80]);
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_extremes_for_every_algorithm() {
        for algorithm in [
            DitheringAlgorithm::Threshold,
            DitheringAlgorithm::Bayer,
            DitheringAlgorithm::FloydSteinberg,
        ] {
            let black = dither(&[1.0; 16 * 4], 16, 4, algorithm);
            assert_eq!(black.len(), 8);
            assert!(black.iter().all(|&b| b == 0xFF), "{algorithm:?} black");

            let white = dither(&[0.0; 16 * 4], 16, 4, algorithm);
            assert!(white.iter().all(|&b| b == 0x00), "{algorithm:?} white");
        }
    }

    #[test]
    fn test_threshold_cut() {
        let data = dither(&[0.4, 0.6, 0.5, 0.9], 4, 1, DitheringAlgorithm::Threshold);
        assert_eq!(data, vec![0b0101_0000]);
    }

    #[test]
    fn test_mid_gray_prints_about_half() {
        let gray = vec![0.5; 64 * 64];
        for algorithm in [DitheringAlgorithm::Bayer, DitheringAlgorithm::FloydSteinberg] {
            let data = dither(&gray, 64, 64, algorithm);
            let dots: u32 = data.iter().map(|b| b.count_ones()).sum();
            assert!(
                (1600..=2500).contains(&dots),
                "{algorithm:?} printed {dots} of 4096 dots"
            );
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(DitheringAlgorithm::from_name("Bayer"), Some(DitheringAlgorithm::Bayer));
        assert_eq!(DitheringAlgorithm::from_name("fs"), Some(DitheringAlgorithm::FloydSteinberg));
        assert_eq!(DitheringAlgorithm::from_name("none"), Some(DitheringAlgorithm::Threshold));
        assert_eq!(DitheringAlgorithm::from_name("atkinson"), None);
    }
}
