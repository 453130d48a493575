//! # Command Generator
//!
//! Stateful byte accumulator sitting between the tree walk and a
//! [`CommandAdapter`]. It remembers the formatting the printer is currently
//! in and only emits a mode change when the requested value differs, so
//! nested nodes asking for the same alignment cost nothing.
//!
//! ```
//! use std::sync::Arc;
//! use thermal_escpos::generator::Generator;
//! use thermal_escpos::protocol::{Alignment, CodePage, EscPosAdapter};
//!
//! let mut generator = Generator::new(48, CodePage::Cp860, Arc::new(EscPosAdapter));
//! generator.set_align(Alignment::Center);
//! generator.set_align(Alignment::Center);
//! assert_eq!(generator.buffer(), vec![0x1B, 0x61, 0x01]);
//! ```

use std::sync::Arc;

use crate::error::ThermalError;
use crate::protocol::{Alignment, Capability, CharacterSize, CodePage, CommandAdapter};
use crate::render::Raster;

/// Formatting modes the printer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatState {
    pub align: Alignment,
    pub size: CharacterSize,
    pub bold: bool,
}

/// Per-conversion settings the generator encodes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConversionContext {
    /// Characters per line at 1× width.
    paper_width: usize,
    code_page: CodePage,
}

pub struct Generator {
    context: ConversionContext,
    adapter: Arc<dyn CommandAdapter>,
    state: FormatState,
    chunks: Vec<Vec<u8>>,
}

impl Generator {
    pub fn new(paper_width: usize, code_page: CodePage, adapter: Arc<dyn CommandAdapter>) -> Self {
        Self {
            context: ConversionContext {
                paper_width,
                code_page,
            },
            adapter,
            state: FormatState::default(),
            chunks: Vec::new(),
        }
    }

    fn push(&mut self, bytes: Vec<u8>) {
        if !bytes.is_empty() {
            self.chunks.push(bytes);
        }
    }

    /// Emit the adapter's reset sequence. The printer is back at power-on
    /// defaults afterwards, and so is the tracked state.
    pub fn initialize(&mut self) {
        let bytes = self.adapter.initialize();
        self.push(bytes);
        self.state = FormatState::default();
    }

    pub fn set_align(&mut self, align: Alignment) {
        if self.state.align != align {
            let bytes = self.adapter.set_align(align);
            self.push(bytes);
            self.state.align = align;
        }
    }

    pub fn set_size(&mut self, size: CharacterSize) {
        let size = CharacterSize::new(size.width, size.height);
        if self.state.size != size {
            let bytes = self.adapter.set_character_size(size);
            self.push(bytes);
            self.state.size = size;
        }
    }

    pub fn set_bold(&mut self, bold: bool) {
        if self.state.bold != bold {
            let bytes = self.adapter.set_bold(bold);
            self.push(bytes);
            self.state.bold = bold;
        }
    }

    /// Move the printer to `state`: alignment, then size, then bold.
    pub fn apply(&mut self, state: FormatState) {
        self.set_align(state.align);
        self.set_size(state.size);
        self.set_bold(state.bold);
    }

    /// Encode text in the conversion's code page. Empty text emits nothing.
    pub fn emit_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let bytes = self.adapter.encode_text(text, self.context.code_page);
        self.push(bytes);
    }

    pub fn newline(&mut self) {
        self.emit_text("\n");
    }

    /// Feed and cut commands bypass the diffing and always reach the adapter.
    pub fn feed(&mut self, lines: usize) {
        let bytes = self.adapter.feed(lines);
        self.push(bytes);
    }

    pub fn cut_full_with_feed(&mut self, feed_lines: usize) {
        let bytes = self.adapter.cut_full(feed_lines);
        self.push(bytes);
    }

    pub fn cut_partial_with_feed(&mut self, feed_lines: usize) {
        let bytes = self.adapter.cut_partial(feed_lines);
        self.push(bytes);
    }

    /// Print a raster through the adapter.
    ///
    /// Adapters without image support emit nothing. A raster whose data does
    /// not match its dimensions is rejected.
    pub fn print_image(&mut self, raster: &Raster) -> Result<(), ThermalError> {
        if raster.data().len() != raster.width_bytes() * raster.height() {
            return Err(ThermalError::InvalidCommand(format!(
                "raster data is {} bytes for {}x{}",
                raster.data().len(),
                raster.width(),
                raster.height()
            )));
        }
        if !self.adapter.supports(Capability::ImagePrinting) {
            log::debug!(
                "{} cannot print images, skipping {}x{} raster",
                self.adapter.name(),
                raster.width(),
                raster.height()
            );
            return Ok(());
        }
        let bytes = self.adapter.print_image(raster);
        self.push(bytes);
        Ok(())
    }

    /// Switch the printer to the conversion's code page.
    pub fn select_code_page(&mut self) {
        if !self.adapter.supports(Capability::CodePageSelection) {
            log::debug!("{} cannot select code pages", self.adapter.name());
            return;
        }
        let bytes = self.adapter.select_code_page(self.context.code_page);
        self.push(bytes);
    }

    /// Everything emitted so far. Calling this does not consume the buffer.
    pub fn buffer(&self) -> Vec<u8> {
        self.chunks.concat()
    }

    pub fn format_state(&self) -> FormatState {
        self.state
    }

    pub fn paper_width(&self) -> usize {
        self.context.paper_width
    }

    pub fn adapter_name(&self) -> &str {
        self.adapter.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{EscBematechAdapter, EscPosAdapter};
    use pretty_assertions::assert_eq;

    fn escpos() -> Generator {
        Generator::new(48, CodePage::Cp860, Arc::new(EscPosAdapter))
    }

    #[test]
    fn test_state_starts_at_defaults() {
        let generator = escpos();
        assert_eq!(
            generator.format_state(),
            FormatState {
                align: Alignment::Left,
                size: CharacterSize::NORMAL,
                bold: false,
            }
        );
        assert!(generator.buffer().is_empty());
    }

    #[test]
    fn test_redundant_changes_are_suppressed() {
        let mut generator = escpos();
        generator.set_align(Alignment::Left);
        generator.set_size(CharacterSize::NORMAL);
        generator.set_bold(false);
        assert!(generator.buffer().is_empty());

        generator.set_bold(true);
        generator.set_bold(true);
        generator.set_size(CharacterSize::new(2, 2));
        generator.set_size(CharacterSize::new(2, 2));
        assert_eq!(generator.buffer(), vec![0x1B, 0x45, 0x01, 0x1D, 0x21, 0x11]);
    }

    #[test]
    fn test_initialize_resets_state() {
        let mut generator = escpos();
        generator.set_bold(true);
        generator.initialize();
        assert_eq!(generator.format_state(), FormatState::default());
        generator.set_bold(true);
        assert_eq!(
            generator.buffer(),
            vec![0x1B, 0x45, 0x01, 0x1B, 0x40, 0x1B, 0x45, 0x01]
        );
    }

    #[test]
    fn test_apply_order() {
        let mut generator = escpos();
        generator.apply(FormatState {
            align: Alignment::Right,
            size: CharacterSize::new(1, 2),
            bold: true,
        });
        assert_eq!(
            generator.buffer(),
            vec![0x1B, 0x61, 0x02, 0x1D, 0x21, 0x01, 0x1B, 0x45, 0x01]
        );
    }

    #[test]
    fn test_text_encoding_and_newline() {
        let mut generator = escpos();
        generator.emit_text("Pão");
        generator.emit_text("");
        generator.newline();
        assert_eq!(generator.buffer(), vec![b'P', 0x84, b'o', 0x0A]);
    }

    #[test]
    fn test_buffer_is_repeatable() {
        let mut generator = escpos();
        generator.emit_text("x");
        assert_eq!(generator.buffer(), generator.buffer());
        generator.feed(0);
        generator.feed(2);
        assert_eq!(generator.buffer(), vec![b'x', 0x1B, 0x64, 0x02]);
    }

    #[test]
    fn test_cuts() {
        let mut generator = escpos();
        generator.cut_partial_with_feed(1);
        generator.cut_full_with_feed(0);
        assert_eq!(
            generator.buffer(),
            vec![0x1B, 0x64, 0x01, 0x1D, 0x56, 0x01, 0x1D, 0x56, 0x00]
        );
    }

    #[test]
    fn test_print_image_on_unsupported_adapter() {
        let mut generator = Generator::new(48, CodePage::Cp860, Arc::new(EscBematechAdapter));
        generator.print_image(&Raster::blank(8, 2)).unwrap();
        generator.select_code_page();
        assert!(generator.buffer().is_empty());
        assert_eq!(generator.adapter_name(), "escbematech");
    }

    #[test]
    fn test_print_image_and_code_page() {
        let mut generator = escpos();
        generator.select_code_page();
        generator.print_image(&Raster::new(8, 1, vec![0xF0]).unwrap()).unwrap();
        assert_eq!(
            generator.buffer(),
            vec![0x1B, 0x74, 0x03, 0x1D, 0x76, 0x30, 0x00, 1, 0, 1, 0, 0xF0]
        );
    }
}
