//! # ESC/Bematech Dialect
//!
//! Native command set of Bematech receipt printers (MP-4200 TH and
//! relatives) when running in ESC/Bematech mode.
//!
//! | Operation | Command | Hex |
//! |-----------|---------|-----|
//! | Initialize | ESC @ | 1B 40 |
//! | Alignment | ESC a n | 1B 61 n |
//! | Expanded width | ESC W n | 1B 57 n |
//! | Double height | ESC d n | 1B 64 n |
//! | Bold on / off | ESC E / ESC F | 1B 45 / 1B 46 |
//! | Line feed | LF | 0A |
//! | Full cut | ESC w | 1B 77 |
//! | Partial cut | ESC m | 1B 6D |
//!
//! Note that `ESC d` toggles double height here, where ESC/POS uses the same
//! bytes to feed paper. Characters are at most 2×2; raster images and
//! code-page switching are not available in this mode.

use super::adapter::{Alignment, Capability, CharacterSize, CommandAdapter};
use super::commands::{ESC, LF};

/// # Expanded Width Mode (ESC W n)
#[inline]
pub fn expanded_width(enabled: bool) -> Vec<u8> {
    vec![ESC, b'W', u8::from(enabled)]
}

/// # Double Height Mode (ESC d n)
#[inline]
pub fn double_height(enabled: bool) -> Vec<u8> {
    vec![ESC, b'd', u8::from(enabled)]
}

/// # Emphasized Mode (ESC E / ESC F)
#[inline]
pub fn bold(enabled: bool) -> Vec<u8> {
    if enabled {
        vec![ESC, b'E']
    } else {
        vec![ESC, b'F']
    }
}

/// Bematech adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscBematechAdapter;

impl CommandAdapter for EscBematechAdapter {
    fn name(&self) -> &str {
        "escbematech"
    }

    fn initialize(&self) -> Vec<u8> {
        vec![ESC, b'@']
    }

    fn set_align(&self, align: Alignment) -> Vec<u8> {
        vec![ESC, b'a', align as u8]
    }

    /// Any multiplier above 1 selects the 2× mode for that axis.
    fn set_character_size(&self, size: CharacterSize) -> Vec<u8> {
        let mut out = expanded_width(size.width > 1);
        out.extend(double_height(size.height > 1));
        out
    }

    fn set_bold(&self, enabled: bool) -> Vec<u8> {
        bold(enabled)
    }

    fn feed(&self, lines: usize) -> Vec<u8> {
        vec![LF; lines]
    }

    fn cut_full(&self, feed_lines: usize) -> Vec<u8> {
        let mut out = self.feed(feed_lines);
        out.extend([ESC, b'w']);
        out
    }

    fn cut_partial(&self, feed_lines: usize) -> Vec<u8> {
        let mut out = self.feed(feed_lines);
        out.extend([ESC, b'm']);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::codepage::CodePage;
    use crate::render::Raster;

    #[test]
    fn test_character_size() {
        let adapter = EscBematechAdapter;
        assert_eq!(
            adapter.set_character_size(CharacterSize::new(2, 1)),
            vec![0x1B, 0x57, 0x01, 0x1B, 0x64, 0x00]
        );
        assert_eq!(
            adapter.set_character_size(CharacterSize::new(4, 3)),
            vec![0x1B, 0x57, 0x01, 0x1B, 0x64, 0x01]
        );
        assert_eq!(
            adapter.set_character_size(CharacterSize::NORMAL),
            vec![0x1B, 0x57, 0x00, 0x1B, 0x64, 0x00]
        );
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold(true), vec![0x1B, 0x45]);
        assert_eq!(bold(false), vec![0x1B, 0x46]);
    }

    #[test]
    fn test_feed_and_cut() {
        let adapter = EscBematechAdapter;
        assert_eq!(adapter.feed(2), vec![0x0A, 0x0A]);
        assert!(adapter.feed(0).is_empty());
        assert_eq!(adapter.cut_full(3), vec![0x0A, 0x0A, 0x0A, 0x1B, 0x77]);
        assert_eq!(adapter.cut_partial(1), vec![0x0A, 0x1B, 0x6D]);
    }

    #[test]
    fn test_unsupported_capabilities_are_empty() {
        let adapter = EscBematechAdapter;
        assert!(!adapter.supports(Capability::ImagePrinting));
        assert!(!adapter.supports(Capability::CodePageSelection));
        assert!(adapter.print_image(&Raster::blank(16, 4)).is_empty());
        assert!(adapter.select_code_page(CodePage::Cp860).is_empty());
    }
}
