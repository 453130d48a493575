//! # Converter
//!
//! Entry points turning a [`PrintNode`] tree into a printer byte stream.
//!
//! ## Output layout
//!
//! ```text
//! initialize │ [code page select] │ tree commands │ [feed + cut]
//! ```
//!
//! Image sources are decoded before the walk starts, each distinct source
//! once. A source that fails to decode aborts the conversion.
//!
//! ## Example
//!
//! ```no_run
//! use thermal_escpos::{ConvertOptions, PrintNode, print_nodes_to_escpos};
//!
//! # async fn demo() -> Result<(), thermal_escpos::ThermalError> {
//! let tree: PrintNode = serde_json::from_str(r#"{
//!     "type": "document",
//!     "children": [
//!         { "type": "text", "props": { "children": "Hello" },
//!           "style": { "textAlign": "center", "fontSize": 20 } }
//!     ]
//! }"#)?;
//! let bytes = print_nodes_to_escpos(&tree, &ConvertOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use image::GrayImage;
use serde::{Deserialize, Deserializer, Serialize};

use crate::document::PrintNode;
use crate::error::ThermalError;
use crate::generator::Generator;
use crate::protocol::{AdapterChoice, Capability, CodePage, CommandAdapter};
use crate::render::dither::DitheringAlgorithm;
use crate::render::{self, ImageDecoder, SourceDecoder};
use crate::traverser::{ImageCache, Traverser, image_requests};

// ============================================================================
// OPTIONS
// ============================================================================

/// What to do with the paper once everything is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CutSetting", into = "CutSetting")]
pub enum CutMode {
    /// Leave the paper uncut; no feed either.
    None,
    #[default]
    Full,
    Partial,
}

/// Wire form of [`CutMode`]: `false`, `true` (full), `"full"` or `"partial"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CutSetting {
    Flag(bool),
    Name(String),
}

impl TryFrom<CutSetting> for CutMode {
    type Error = String;

    fn try_from(setting: CutSetting) -> Result<Self, Self::Error> {
        match setting {
            CutSetting::Flag(false) => Ok(CutMode::None),
            CutSetting::Flag(true) => Ok(CutMode::Full),
            CutSetting::Name(name) => name.parse().map_err(|e: ThermalError| e.to_string()),
        }
    }
}

impl FromStr for CutMode {
    type Err = ThermalError;

    /// Parse `full`, `partial` or `none`, case-insensitively. `true` and
    /// `false` read as `full` and `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "true" => Ok(CutMode::Full),
            "partial" => Ok(CutMode::Partial),
            "none" | "false" => Ok(CutMode::None),
            other => Err(ThermalError::InvalidCommand(format!(
                "unknown cut mode '{other}'"
            ))),
        }
    }
}

impl From<CutMode> for CutSetting {
    fn from(mode: CutMode) -> Self {
        match mode {
            CutMode::None => CutSetting::Flag(false),
            CutMode::Full => CutSetting::Name("full".into()),
            CutMode::Partial => CutSetting::Name("partial".into()),
        }
    }
}

impl fmt::Display for CutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CutMode::None => "none",
            CutMode::Full => "full",
            CutMode::Partial => "partial",
        })
    }
}

/// Conversion settings.
///
/// Deserializes from the camelCase option objects used by JSON callers
/// (`paperWidth`, `feedBeforeCut`, `commandAdapter`); snake_case keys are
/// accepted too. Missing keys take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Characters per line at 1× width (48 for 80mm paper, 32 for 58mm).
    #[serde(alias = "paper_width")]
    pub paper_width: usize,

    /// Code page for text. Unknown names fall back to CP860.
    pub encoding: CodePage,

    pub cut: CutMode,

    /// Lines fed before the cut.
    #[serde(alias = "feed_before_cut")]
    pub feed_before_cut: usize,

    /// Printer dialect. Only names are accepted when deserializing; custom
    /// adapters are set from code.
    #[serde(
        alias = "command_adapter",
        deserialize_with = "deserialize_adapter",
        skip_serializing
    )]
    pub command_adapter: AdapterChoice,

    /// Log the adapter name and the full tree at debug level.
    pub debug: bool,

    /// How images are reduced to black and white.
    pub dither: DitheringAlgorithm,

    /// Emit the code page select command right after initialization.
    #[serde(alias = "select_code_page")]
    pub select_code_page: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            paper_width: 48,
            encoding: CodePage::default(),
            cut: CutMode::Full,
            feed_before_cut: 3,
            command_adapter: AdapterChoice::EscPos,
            debug: false,
            dither: DitheringAlgorithm::default(),
            select_code_page: false,
        }
    }
}

fn deserialize_adapter<'de, D>(deserializer: D) -> Result<AdapterChoice, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(AdapterChoice::from_name(&name))
}

impl ConvertOptions {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, ThermalError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_adapter(mut self, adapter: impl Into<AdapterChoice>) -> Self {
        self.command_adapter = adapter.into();
        self
    }

    pub fn with_cut(mut self, cut: CutMode) -> Self {
        self.cut = cut;
        self
    }
}

// ============================================================================
// CONVERSION
// ============================================================================

/// Convert a tree using the default [`SourceDecoder`] for images.
pub async fn print_nodes_to_escpos(
    root: &PrintNode,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ThermalError> {
    print_nodes_with_decoder(root, options, &SourceDecoder::new()).await
}

/// Convert a tree, resolving image sources through `decoder`.
pub async fn print_nodes_with_decoder(
    root: &PrintNode,
    options: &ConvertOptions,
    decoder: &dyn ImageDecoder,
) -> Result<Vec<u8>, ThermalError> {
    let adapter = options.command_adapter.create();

    if options.debug {
        log::debug!("using command adapter: {}", adapter.name());
        log::debug!("print node tree:\n{}", serde_json::to_string_pretty(root)?);
    }

    let images = if adapter.supports(Capability::ImagePrinting) {
        decode_images(root, options, decoder).await?
    } else {
        log::debug!("{} cannot print images, not decoding any", adapter.name());
        ImageCache::new()
    };

    render_tree(root, options, adapter, &images)
}

/// Decode and rasterize every image the walk will print.
pub async fn decode_images(
    root: &PrintNode,
    options: &ConvertOptions,
    decoder: &dyn ImageDecoder,
) -> Result<ImageCache, ThermalError> {
    let mut decoded: HashMap<String, GrayImage> = HashMap::new();
    let mut cache = ImageCache::new();

    for key in image_requests(root, options.paper_width) {
        if !decoded.contains_key(&key.source) {
            let image = decoder.decode(&key.source).await?;
            log::debug!("decoded image {}x{}", image.width(), image.height());
            decoded.insert(key.source.clone(), image);
        }
        let raster = render::rasterize(&decoded[&key.source], key.max_width_dots, options.dither)?;
        cache.insert(key, raster);
    }
    Ok(cache)
}

/// Synchronous walk over a tree whose images are already rasterized.
pub fn render_tree(
    root: &PrintNode,
    options: &ConvertOptions,
    adapter: Arc<dyn CommandAdapter>,
    images: &ImageCache,
) -> Result<Vec<u8>, ThermalError> {
    let mut generator = Generator::new(options.paper_width, options.encoding, adapter);
    generator.initialize();
    if options.select_code_page {
        generator.select_code_page();
    }

    Traverser::new(&mut generator, images).traverse(root)?;

    match options.cut {
        CutMode::None => {}
        CutMode::Full => generator.cut_full_with_feed(options.feed_before_cut),
        CutMode::Partial => generator.cut_partial_with_feed(options.feed_before_cut),
    }

    let buffer = generator.buffer();
    log::debug!("{}: generated {} bytes", generator.adapter_name(), buffer.len());
    Ok(buffer)
}
