//! # Control Bytes
//!
//! Escape sequence prefixes shared by the ESC/POS and ESC/Bematech dialects.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`, `ESC E`, `ESC w`
//! - Multi-byte with parameters: `ESC a n`, `GS ! n`, `GS v 0 m xL xH yL yH data...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Most commands begin with ESC (0x1B). This byte signals the start
/// of a control sequence rather than printable text.
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// ESC/POS uses GS for character size, cutter and raster graphics.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use thermal_escpos::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(72), [0x48, 0x00]); // 576 dots = 72 bytes
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

/// Split a line count into chunks that fit a one-byte parameter.
///
/// `split_count(600)` yields `255, 255, 90`. Zero yields nothing.
pub fn split_count(mut total: usize) -> impl Iterator<Item = u8> {
    std::iter::from_fn(move || {
        if total == 0 {
            return None;
        }
        let chunk = total.min(u8::MAX as usize);
        total -= chunk;
        Some(chunk as u8)
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
        assert_eq!(u16_le(576), [0x40, 0x02]);
    }

    #[test]
    fn test_split_count() {
        assert_eq!(split_count(0).collect::<Vec<_>>(), Vec::<u8>::new());
        assert_eq!(split_count(3).collect::<Vec<_>>(), vec![3]);
        assert_eq!(split_count(600).collect::<Vec<_>>(), vec![255, 255, 90]);
    }
}
