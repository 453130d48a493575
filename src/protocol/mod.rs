//! # Printer Protocols
//!
//! Low-level command builders for the thermal printer dialects the converter
//! can target, behind one [`CommandAdapter`] interface.
//!
//! ## Module Structure
//!
//! - [`adapter`]: the capability trait, shared primitives, adapter selection
//! - [`escpos`]: Epson ESC/POS
//! - [`bematech`]: ESC/Bematech
//! - [`codepage`]: single-byte text encodings (CP437, CP850, CP860)
//! - [`commands`]: control bytes and integer helpers
//!
//! ## Usage Example
//!
//! ```
//! use thermal_escpos::protocol::{Alignment, CodePage, CommandAdapter, EscPosAdapter};
//!
//! let adapter = EscPosAdapter;
//! let mut data = Vec::new();
//! data.extend(adapter.initialize());
//! data.extend(adapter.set_align(Alignment::Center));
//! data.extend(adapter.set_bold(true));
//! data.extend(adapter.encode_text("RECIBO\n", CodePage::Cp860));
//! data.extend(adapter.cut_full(3));
//! ```

pub mod adapter;
pub mod bematech;
pub mod codepage;
pub mod commands;
pub mod escpos;

pub use adapter::{AdapterChoice, Alignment, Capability, CharacterSize, CommandAdapter};
pub use bematech::EscBematechAdapter;
pub use codepage::CodePage;
pub use escpos::EscPosAdapter;
