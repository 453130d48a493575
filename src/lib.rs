//! # thermal-escpos - Print Trees to Thermal Printer Commands
//!
//! Compiles a tree of [`PrintNode`]s (documents, views, text, images with
//! CSS-like styles) into the byte stream a thermal receipt printer executes.
//! It provides:
//!
//! - **Style resolution**: font sizes, weights, alignment, borders, spacing
//! - **Printer dialects**: ESC/POS and ESC/Bematech behind one adapter trait
//! - **Flex rows**: side-by-side columns composed into fixed-width lines
//! - **Images**: data URIs, files and URLs dithered to 1-bit rasters
//!
//! ## Quick Start
//!
//! ```no_run
//! use thermal_escpos::{ConvertOptions, CutMode, PrintNode, Style, print_nodes_to_escpos};
//!
//! # async fn demo() -> Result<(), thermal_escpos::ThermalError> {
//! let receipt = PrintNode::document(vec![
//!     PrintNode::text("CAFÉ DO PORTO")
//!         .with_style(Style::new().with("textAlign", "center").with("fontSize", 24)),
//!     PrintNode::view(vec![PrintNode::text("Espresso"), PrintNode::text("2.50")])
//!         .with_style(
//!             Style::new()
//!                 .with("flexDirection", "row")
//!                 .with("justifyContent", "space-between"),
//!         ),
//! ]);
//!
//! let options = ConvertOptions::default().with_cut(CutMode::Partial);
//! let bytes = print_nodes_to_escpos(&receipt, &options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Print-node tree and style maps |
//! | [`styles`] | Style resolution and text layout helpers |
//! | [`protocol`] | Command adapters and code pages |
//! | [`generator`] | Stateful command accumulator |
//! | [`traverser`] | Tree walk and row layout |
//! | [`render`] | Image decoding and dithering |
//! | [`converter`] | Entry points and options |
//! | [`error`] | Error types |

pub mod converter;
pub mod document;
pub mod error;
pub mod generator;
pub mod protocol;
pub mod render;
pub mod styles;
pub mod traverser;

// Re-exports for convenience
pub use converter::{
    ConvertOptions, CutMode, decode_images, print_nodes_to_escpos, print_nodes_with_decoder,
    render_tree,
};
pub use document::{NodeType, PrintNode, Style};
pub use error::ThermalError;
pub use generator::Generator;
pub use protocol::{
    AdapterChoice, Alignment, CharacterSize, CodePage, CommandAdapter, EscBematechAdapter,
    EscPosAdapter,
};
pub use render::{ImageDecoder, Raster, SourceDecoder};
pub use traverser::Traverser;
