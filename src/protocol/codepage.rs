//! # Single-Byte Code Pages
//!
//! Converts Unicode strings to the single-byte character tables found in
//! thermal printer firmware.
//!
//! ASCII (U+0000–U+007F) passes through unchanged in every table. Each code
//! page maps 128 further characters onto bytes 0x80–0xFF. Characters with no
//! representation are replaced with `?`.
//!
//! | Code page | Region | ESC/POS table (`ESC t n`) |
//! |-----------|--------|---------------------------|
//! | CP437 | US English, box drawing | 0 |
//! | CP850 | Western European (Latin-1) | 2 |
//! | CP860 | Portuguese | 3 |

use serde::{Deserialize, Serialize};

/// Byte emitted for characters missing from the active table.
pub const SUBSTITUTE: u8 = b'?';

/// Supported printer code pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum CodePage {
    Cp437,
    Cp850,
    #[default]
    Cp860,
}

impl CodePage {
    /// Parse a code page name (`"cp860"`, `"PC860"`, `"860"`, `"ibm860"`).
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let digits = lower.trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '-');
        match digits {
            "437" => Some(CodePage::Cp437),
            "850" => Some(CodePage::Cp850),
            "860" => Some(CodePage::Cp860),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CodePage::Cp437 => "cp437",
            CodePage::Cp850 => "cp850",
            CodePage::Cp860 => "cp860",
        }
    }

    /// Encode `text` into this code page.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            if (ch as u32) < 0x80 {
                out.push(ch as u8);
            } else if let Some(byte) = self.upper_half(ch) {
                out.push(byte);
            } else {
                log::debug!(
                    "{}: unmapped character '{}' (U+{:04X}), replacing with '?'",
                    self.name(),
                    ch,
                    ch as u32
                );
                out.push(SUBSTITUTE);
            }
        }
        out
    }

    /// Map a character to its byte in 0x80–0xFF.
    fn upper_half(self, ch: char) -> Option<u8> {
        let position = match self {
            CodePage::Cp437 => CP437_80_AF
                .iter()
                .chain(CP437_B0_FF.iter())
                .position(|&c| c == ch),
            CodePage::Cp860 => CP860_80_AF
                .iter()
                .chain(CP437_B0_FF.iter())
                .position(|&c| c == ch),
            CodePage::Cp850 => CP850_80_FF.iter().position(|&c| c == ch),
        }?;
        Some(0x80 + position as u8)
    }
}

impl From<String> for CodePage {
    fn from(name: String) -> Self {
        CodePage::from_name(&name).unwrap_or_else(|| {
            log::debug!("unknown encoding '{name}', using {}", CodePage::default().name());
            CodePage::default()
        })
    }
}

impl From<CodePage> for &'static str {
    fn from(code_page: CodePage) -> Self {
        code_page.name()
    }
}

// ============================================================================
// TABLES
// ============================================================================

/// CP437 0x80–0xAF: accented letters, currency, Spanish punctuation.
const CP437_80_AF: [char; 48] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
];

/// CP860 0x80–0xAF: Portuguese accented capitals replace the CP437 entries.
const CP860_80_AF: [char; 48] = [
    'Ç', 'ü', 'é', 'â', 'ã', 'à', 'Á', 'ç', 'ê', 'Ê', 'è', 'Í', 'Ô', 'ì', 'Ã', 'Â', //
    'É', 'À', 'È', 'ô', 'õ', 'ò', 'Ú', 'ù', 'Ì', 'Õ', 'Ü', '¢', '£', 'Ù', '₧', 'Ó', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', 'Ò', '¬', '½', '¼', '¡', '«', '»',
];

/// 0xB0–0xFF shared by CP437 and CP860: shades, box drawing, Greek, math.
const CP437_B0_FF: [char; 80] = [
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐', //
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧', //
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀', //
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩', //
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

/// CP850 0x80–0xFF.
const CP850_80_FF: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', //
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ', //
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»', //
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐', //
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤', //
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀', //
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´', //
    '\u{00AD}', '±', '‗', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{00A0}',
];
