//! # Command Adapter
//!
//! The capability interface every printer dialect implements. An adapter is a
//! pure encoder: logical command in, bytes out. It holds no state, so one
//! instance can serve any number of conversions.
//!
//! A dialect that lacks a capability returns an empty byte sequence for it
//! and reports `false` from [`CommandAdapter::supports`]; conversion carries
//! on without the feature.

use std::fmt;
use std::sync::Arc;

use super::bematech::EscBematechAdapter;
use super::codepage::CodePage;
use super::escpos::EscPosAdapter;
use crate::render::Raster;

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// Character magnification, each axis 1–8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSize {
    pub width: u8,
    pub height: u8,
}

impl CharacterSize {
    /// Power-on default: 1×1.
    pub const NORMAL: Self = Self {
        width: 1,
        height: 1,
    };

    /// Build a size, clamping both multipliers to 1–8.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width: width.clamp(1, 8),
            height: height.clamp(1, 8),
        }
    }
}

impl Default for CharacterSize {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Optional features an adapter may lack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ImagePrinting,
    CodePageSelection,
}

// ============================================================================
// ADAPTER TRAIT
// ============================================================================

/// Protocol-specific binary encoder.
///
/// Implement this to target a printer dialect not shipped with the crate and
/// pass it as [`AdapterChoice::Custom`].
pub trait CommandAdapter: Send + Sync {
    /// Protocol identifier for diagnostics.
    fn name(&self) -> &str;

    /// Reset/initialize sequence sent once at the start of a job.
    fn initialize(&self) -> Vec<u8>;

    fn set_align(&self, align: Alignment) -> Vec<u8>;

    fn set_character_size(&self, size: CharacterSize) -> Vec<u8>;

    fn set_bold(&self, bold: bool) -> Vec<u8>;

    /// Encode text in the given single-byte code page. Unmappable characters
    /// become a substitution byte; this never fails.
    fn encode_text(&self, text: &str, code_page: CodePage) -> Vec<u8> {
        code_page.encode(text)
    }

    fn feed(&self, lines: usize) -> Vec<u8>;

    /// Feed `feed_lines` then perform a full cut.
    fn cut_full(&self, feed_lines: usize) -> Vec<u8>;

    /// Feed `feed_lines` then perform a partial cut.
    fn cut_partial(&self, feed_lines: usize) -> Vec<u8>;

    /// Print a monochrome raster. Empty for dialects without image support.
    fn print_image(&self, _raster: &Raster) -> Vec<u8> {
        Vec::new()
    }

    /// Select the printer's character table. Empty when unsupported.
    fn select_code_page(&self, _code_page: CodePage) -> Vec<u8> {
        Vec::new()
    }

    /// Optional features are off unless an adapter opts in.
    fn supports(&self, _capability: Capability) -> bool {
        false
    }
}

// ============================================================================
// ADAPTER SELECTION
// ============================================================================

/// Which adapter a conversion uses: a built-in dialect or a caller object.
#[derive(Clone, Default)]
pub enum AdapterChoice {
    #[default]
    EscPos,
    EscBematech,
    Custom(Arc<dyn CommandAdapter>),
}

impl AdapterChoice {
    /// Look up a built-in dialect by name. Unknown names fall back to ESC/POS.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "escpos" | "esc/pos" => AdapterChoice::EscPos,
            "escbematech" | "esc/bematech" | "bematech" => AdapterChoice::EscBematech,
            other => {
                log::debug!("unknown command adapter '{other}', falling back to escpos");
                AdapterChoice::EscPos
            }
        }
    }

    /// Instantiate the selected adapter.
    pub fn create(&self) -> Arc<dyn CommandAdapter> {
        match self {
            AdapterChoice::EscPos => Arc::new(EscPosAdapter),
            AdapterChoice::EscBematech => Arc::new(EscBematechAdapter),
            AdapterChoice::Custom(adapter) => Arc::clone(adapter),
        }
    }
}

impl fmt::Debug for AdapterChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterChoice::EscPos => f.write_str("EscPos"),
            AdapterChoice::EscBematech => f.write_str("EscBematech"),
            AdapterChoice::Custom(adapter) => write!(f, "Custom({})", adapter.name()),
        }
    }
}

impl From<&str> for AdapterChoice {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl<A: CommandAdapter + 'static> From<Arc<A>> for AdapterChoice {
    fn from(adapter: Arc<A>) -> Self {
        AdapterChoice::Custom(adapter)
    }
}
