//! # ESC/POS Dialect
//!
//! Command builders for the Epson ESC/POS protocol spoken by most generic
//! 58mm/80mm receipt printers, and the [`EscPosAdapter`] wiring them into the
//! [`CommandAdapter`] interface.
//!
//! ## Command Summary
//!
//! | Operation | Command | Hex |
//! |-----------|---------|-----|
//! | Initialize | ESC @ | 1B 40 |
//! | Alignment | ESC a n | 1B 61 n |
//! | Character size | GS ! n | 1D 21 n |
//! | Bold | ESC E n | 1B 45 n |
//! | Print and feed n lines | ESC d n | 1B 64 n |
//! | Full cut | GS V 0 | 1D 56 00 |
//! | Partial cut | GS V 1 | 1D 56 01 |
//! | Raster image | GS v 0 m xL xH yL yH d... | 1D 76 30 ... |
//! | Code page | ESC t n | 1B 74 n |

use super::adapter::{Alignment, Capability, CharacterSize, CommandAdapter};
use super::codepage::CodePage;
use super::commands::{ESC, GS, split_count, u16_le};
use crate::render::Raster;

/// Maximum rows sent in a single raster command.
///
/// Large images are split into bands so the printer's receive buffer is not
/// overrun.
pub const RASTER_CHUNK_ROWS: usize = 256;

// ============================================================================
// COMMAND BUILDERS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets modes to power-on defaults: left
/// alignment, 1×1 characters, bold off.
///
/// ```
/// use thermal_escpos::protocol::escpos;
///
/// assert_eq!(escpos::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Select Justification (ESC a n)
///
/// `n = 0` left, `1` center, `2` right. Takes effect at the start of the
/// next line and also applies to raster images.
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

/// # Select Character Size (GS ! n)
///
/// The high nibble holds the width multiplier minus one, the low nibble the
/// height multiplier minus one.
///
/// ```text
/// n = (width - 1) << 4 | (height - 1)
///
/// 1×1 → 0x00    2×1 → 0x10    1×2 → 0x01    2×2 → 0x11    8×8 → 0x77
/// ```
pub fn character_size(size: CharacterSize) -> Vec<u8> {
    let size = CharacterSize::new(size.width, size.height);
    let n = ((size.width - 1) << 4) | (size.height - 1);
    vec![GS, b'!', n]
}

/// # Turn Emphasized Mode On/Off (ESC E n)
#[inline]
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', u8::from(enabled)]
}

/// # Print and Feed n Lines (ESC d n)
///
/// Counts above 255 are split into several commands; zero lines emits
/// nothing.
pub fn feed_lines(lines: usize) -> Vec<u8> {
    split_count(lines).flat_map(|n| [ESC, b'd', n]).collect()
}

/// # Cut Paper (GS V m)
///
/// `m = 0` full cut, `m = 1` partial cut (leaves a small hinge).
#[inline]
pub fn cut(partial: bool) -> Vec<u8> {
    vec![GS, b'V', u8::from(partial)]
}

/// # Select Character Code Table (ESC t n)
pub fn code_page(code_page: CodePage) -> Vec<u8> {
    let n = match code_page {
        CodePage::Cp437 => 0,
        CodePage::Cp850 => 2,
        CodePage::Cp860 => 3,
    };
    vec![ESC, b't', n]
}

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Parameters
///
/// - `m = 0`: normal density
/// - `xL xH`: width in **bytes** (little-endian)
/// - `yL yH`: height in rows (little-endian)
/// - `d1...dk`: packed rows, MSB = leftmost dot, 1 = black
///
/// Images taller than [`RASTER_CHUNK_ROWS`] are emitted as consecutive
/// commands.
pub fn raster(raster: &Raster) -> Vec<u8> {
    let width_bytes = raster.width_bytes();
    let bands = raster.height().div_ceil(RASTER_CHUNK_ROWS);
    let mut out = Vec::with_capacity(raster.data().len() + 8 * bands);

    for chunk in raster.data().chunks(width_bytes * RASTER_CHUNK_ROWS) {
        let rows = chunk.len() / width_bytes;
        let [xl, xh] = u16_le(width_bytes as u16);
        let [yl, yh] = u16_le(rows as u16);
        out.extend_from_slice(&[GS, b'v', b'0', 0, xl, xh, yl, yh]);
        out.extend_from_slice(chunk);
    }
    out
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Epson ESC/POS command adapter. Supports every capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscPosAdapter;

impl CommandAdapter for EscPosAdapter {
    fn name(&self) -> &str {
        "escpos"
    }

    fn initialize(&self) -> Vec<u8> {
        init()
    }

    fn set_align(&self, align: Alignment) -> Vec<u8> {
        self::align(align)
    }

    fn set_character_size(&self, size: CharacterSize) -> Vec<u8> {
        character_size(size)
    }

    fn set_bold(&self, enabled: bool) -> Vec<u8> {
        bold(enabled)
    }

    fn feed(&self, lines: usize) -> Vec<u8> {
        feed_lines(lines)
    }

    fn cut_full(&self, feed_lines: usize) -> Vec<u8> {
        let mut out = self::feed_lines(feed_lines);
        out.extend(cut(false));
        out
    }

    fn cut_partial(&self, feed_lines: usize) -> Vec<u8> {
        let mut out = self::feed_lines(feed_lines);
        out.extend(cut(true));
        out
    }

    fn print_image(&self, image: &Raster) -> Vec<u8> {
        raster(image)
    }

    fn select_code_page(&self, cp: CodePage) -> Vec<u8> {
        code_page(cp)
    }

    fn supports(&self, _capability: Capability) -> bool {
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================
