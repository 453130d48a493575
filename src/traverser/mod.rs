//! # Tree Traverser
//!
//! Walks a [`PrintNode`] tree depth-first and drives a [`Generator`].
//!
//! ## Formatting state
//!
//! The traverser keeps a stack of the formatting each node *wants*. Entering
//! a node pushes the parent's state overlaid with the node's own valid style
//! keys; leaving it pops. Nothing is emitted on push or pop. The generator is
//! brought to the wanted state right before content is written, and its
//! diffing drops changes the printer already has. A document therefore never
//! ends with reset commands, and siblings that share a style pay for it once.
//!
//! ## Per-node output
//!
//! ```text
//! margin/padding top feed
//! borderTop divider
//! content (text + LF | raster | children | composed row lines)
//! borderBottom divider
//! margin/padding bottom feed
//! ```

pub mod row;

use std::collections::{HashMap, HashSet};

use crate::document::{NodeType, PrintNode};
use crate::error::ThermalError;
use crate::generator::{FormatState, Generator};
use crate::protocol::Alignment;
use crate::render::{Raster, dots_for_columns};
use crate::styles::{
    border_divider, calculate_spacing, extract_text_style, extract_view_style,
    generate_divider_line, parse_width,
};

use row::Line;

/// An image to print: its source and the widest raster that fits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    pub source: String,
    pub max_width_dots: usize,
}

/// Rasters decoded ahead of the walk.
pub type ImageCache = HashMap<ImageKey, Raster>;

/// Widest raster an image node may print, in dots.
///
/// An explicit `width` style is read as character columns; otherwise the
/// full paper width is used.
pub fn image_width_dots(node: &PrintNode, paper_width: usize) -> usize {
    let columns = node
        .style
        .get("width")
        .and_then(|w| parse_width(w, paper_width))
        .unwrap_or(paper_width);
    dots_for_columns(columns.max(1))
}

/// How the walk treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Unknown node type, skipped with its subtree.
    Skip,
    /// Text leaf; children are inline spans, never walked as blocks.
    Text,
    Image,
    /// Flex row, composed column by column.
    Row,
    /// Any other container, children walked in order.
    Block,
}

fn role(node: &PrintNode) -> Role {
    match node.kind {
        NodeType::Other(_) => Role::Skip,
        NodeType::Text | NodeType::TextNode => Role::Text,
        NodeType::Image => Role::Image,
        _ if extract_view_style(&node.style).flex_row => Role::Row,
        _ => Role::Block,
    }
}

/// Layer a node's valid text style keys over `state`.
fn overlay(mut state: FormatState, node: &PrintNode) -> FormatState {
    let style = extract_text_style(&node.style);
    if let Some(align) = style.align {
        state.align = align;
    }
    if let Some(size) = style.size {
        state.size = size;
    }
    if let Some(bold) = style.bold {
        state.bold = bold;
    }
    state
}

/// Distinct images the walk will print, in document order.
///
/// Only images the walk reaches are listed: anything inside rows, text
/// nodes or unknown node types is left out.
pub fn image_requests(root: &PrintNode, paper_width: usize) -> Vec<ImageKey> {
    fn collect(
        node: &PrintNode,
        paper_width: usize,
        seen: &mut HashSet<ImageKey>,
        out: &mut Vec<ImageKey>,
    ) {
        match role(node) {
            Role::Image => {
                if let Some(source) = node.image_source() {
                    let key = ImageKey {
                        source: source.to_string(),
                        max_width_dots: image_width_dots(node, paper_width),
                    };
                    if seen.insert(key.clone()) {
                        out.push(key);
                    }
                }
            }
            Role::Block => {
                for child in &node.children {
                    collect(child, paper_width, seen, out);
                }
            }
            Role::Skip | Role::Text | Role::Row => {}
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    collect(root, paper_width, &mut seen, &mut out);
    out
}

/// Flatten a text node into `(state, text)` runs in reading order.
///
/// Literal props content wins over children, as in
/// [`PrintNode::text_content`]. Alignment is fixed by the outer node.
fn inline_spans(node: &PrintNode, state: FormatState, out: &mut Vec<(FormatState, String)>) {
    if let Some(text) = node.own_text() {
        out.push((state, text));
        return;
    }
    for child in node.text_children() {
        let child_state = FormatState {
            align: state.align,
            ..overlay(state, child)
        };
        inline_spans(child, child_state, out);
    }
}

pub struct Traverser<'a> {
    generator: &'a mut Generator,
    images: &'a ImageCache,
    stack: Vec<FormatState>,
}

impl<'a> Traverser<'a> {
    pub fn new(generator: &'a mut Generator, images: &'a ImageCache) -> Self {
        let base = generator.format_state();
        Self {
            generator,
            images,
            stack: vec![base],
        }
    }

    /// Emit commands for `root` and everything below it.
    pub fn traverse(&mut self, root: &PrintNode) -> Result<(), ThermalError> {
        self.visit(root)
    }

    fn desired(&self) -> FormatState {
        self.stack.last().copied().unwrap_or_default()
    }

    /// Characters per line at the wanted character width.
    fn available_width(&self) -> usize {
        self.generator.paper_width() / self.desired().size.width.max(1) as usize
    }

    fn visit(&mut self, node: &PrintNode) -> Result<(), ThermalError> {
        if let NodeType::Other(name) = &node.kind {
            log::debug!("skipping unknown node type '{name}'");
            return Ok(());
        }

        let state = overlay(self.desired(), node);
        self.stack.push(state);
        let result = self.visit_framed(node);
        self.stack.pop();
        result
    }

    fn visit_framed(&mut self, node: &PrintNode) -> Result<(), ThermalError> {
        let spacing = calculate_spacing(&node.style);
        self.spacer(spacing.top);
        self.divider(node, "borderTop");

        match role(node) {
            Role::Text => self.visit_text(node),
            Role::Image => self.visit_image(node)?,
            Role::Row => self.visit_row(node),
            Role::Block => {
                for child in &node.children {
                    self.visit(child)?;
                }
            }
            Role::Skip => {}
        }

        self.divider(node, "borderBottom");
        self.spacer(spacing.bottom);
        Ok(())
    }

    fn spacer(&mut self, lines: usize) {
        if lines > 0 {
            self.generator.feed(lines);
        }
    }

    fn sync(&mut self) {
        let state = self.desired();
        self.generator.apply(state);
    }

    fn divider(&mut self, node: &PrintNode, key: &str) {
        if let Some(dashed) = border_divider(&node.style, key) {
            let line = generate_divider_line(self.available_width(), dashed);
            self.sync();
            self.generator.emit_text(&line);
            self.generator.newline();
        }
    }

    /// Print a text node on one line. Styled text children keep their own
    /// size and weight; alignment belongs to the line.
    fn visit_text(&mut self, node: &PrintNode) {
        let mut spans = Vec::new();
        inline_spans(node, self.desired(), &mut spans);
        if spans.iter().all(|(_, text)| text.is_empty()) {
            log::debug!("{} node without text, nothing to print", node.kind.as_str());
            return;
        }
        for (state, text) in spans.iter().filter(|(_, text)| !text.is_empty()) {
            self.generator.apply(*state);
            self.generator.emit_text(text);
        }
        self.generator.newline();
    }

    fn visit_image(&mut self, node: &PrintNode) -> Result<(), ThermalError> {
        let Some(source) = node.image_source() else {
            log::debug!("image node without a source, skipping");
            return Ok(());
        };
        let key = ImageKey {
            source: source.to_string(),
            max_width_dots: image_width_dots(node, self.generator.paper_width()),
        };
        let Some(raster) = self.images.get(&key) else {
            log::debug!("image {} was not decoded, skipping", key.source);
            return Ok(());
        };
        self.sync();
        self.generator.print_image(raster)
    }

    fn visit_row(&mut self, node: &PrintNode) {
        let state = self.desired();
        let lines = row::compose(&row::layout_columns(node, state.bold, self.available_width()));
        log::debug!("row rendered to {} line(s)", lines.len());

        self.generator.set_align(Alignment::Left);
        self.generator.set_size(state.size);
        for line in &lines {
            self.emit_line(line);
        }
    }

    fn emit_line(&mut self, line: &Line) {
        for segment in line {
            self.generator.set_bold(segment.bold);
            self.generator.emit_text(&segment.text);
        }
        self.generator.newline();
    }
}
