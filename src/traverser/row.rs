//! # Row Layout
//!
//! Renders `flexDirection: row` containers as side-by-side text columns.
//!
//! Layout runs in two phases that never touch the generator:
//!
//! 1. [`layout_columns`] renders every child into a block of lines at its
//!    column width.
//! 2. [`compose`] pads each cell to its column and joins the cells into full
//!    printer lines.
//!
//! The caller emits the composed lines afterwards.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────┐
//! │ Coffee               │                 3.50 │  ← justifyContent: space-between
//! └──────────────────────┴──────────────────────┘
//!          24 cols               24 cols
//! ```

use crate::document::{NodeType, PrintNode};
use crate::protocol::Alignment;
use crate::styles::{
    Justify, border_divider, calculate_spacing, column_padding, extract_text_style,
    extract_view_style, generate_divider_line, parse_width, wrap_text,
};

/// A run of text sharing one emphasis setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub bold: bool,
}

impl Segment {
    pub fn new(text: impl Into<String>, bold: bool) -> Self {
        Self {
            text: text.into(),
            bold,
        }
    }
}

/// One printed line as a sequence of segments.
pub type Line = Vec<Segment>;

/// Rendered content of one row child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub width: usize,
    pub align: Alignment,
    pub lines: Vec<Line>,
}

/// Characters in a line.
pub fn line_width(line: &[Segment]) -> usize {
    line.iter().map(|s| s.text.chars().count()).sum()
}

/// Distribute `available` columns.
///
/// Explicit widths are honored in order while room remains; the rest is
/// shared equally by the auto-sized columns, the last of them taking the
/// rounding remainder.
pub fn column_widths(explicit: &[Option<usize>], available: usize) -> Vec<usize> {
    let mut remaining = available;
    let mut widths: Vec<Option<usize>> = explicit
        .iter()
        .map(|w| {
            w.map(|w| {
                let w = w.min(remaining);
                remaining -= w;
                w
            })
        })
        .collect();

    let auto = widths.iter().filter(|w| w.is_none()).count();
    if auto > 0 {
        let share = remaining / auto;
        let extra = remaining % auto;
        let mut seen = 0;
        for width in widths.iter_mut().filter(|w| w.is_none()) {
            seen += 1;
            *width = Some(if seen == auto { share + extra } else { share });
        }
    }
    widths.into_iter().map(|w| w.unwrap_or(0)).collect()
}

/// Alignment of a cell: its own `textAlign`, else derived from the row's
/// `justifyContent`.
pub fn cell_alignment(
    own: Option<Alignment>,
    justify: Option<Justify>,
    index: usize,
    count: usize,
) -> Alignment {
    if let Some(align) = own {
        return align;
    }
    match justify {
        Some(Justify::SpaceBetween) if index == 0 => Alignment::Left,
        Some(Justify::SpaceBetween) if index + 1 == count => Alignment::Right,
        Some(Justify::SpaceBetween) => Alignment::Center,
        Some(Justify::Center) => Alignment::Center,
        Some(Justify::FlexEnd) => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Children that occupy a column. Images and unknown node types do not.
fn column_children(row: &PrintNode) -> Vec<&PrintNode> {
    row.children
        .iter()
        .filter(|child| match &child.kind {
            NodeType::Image => {
                log::debug!("images are not supported inside rows, skipping");
                false
            }
            NodeType::Other(name) => {
                log::debug!("skipping unknown node type '{name}' in row");
                false
            }
            _ => true,
        })
        .collect()
}

/// Phase 1: render every column of `row` at its width.
///
/// `bold` is the emphasis inherited from the row's ancestors.
pub fn layout_columns(row: &PrintNode, bold: bool, available: usize) -> Vec<Column> {
    let children = column_children(row);
    let explicit: Vec<Option<usize>> = children
        .iter()
        .map(|child| child.style.get("width").and_then(|w| parse_width(w, available)))
        .collect();
    let widths = column_widths(&explicit, available);
    let justify = extract_view_style(&row.style).justify;
    let count = children.len();

    children
        .into_iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (child, width))| Column {
            width,
            align: cell_alignment(extract_text_style(&child.style).align, justify, index, count),
            lines: render_block(child, bold, width),
        })
        .collect()
}

/// Render a node to lines of at most `width` characters.
pub fn render_block(node: &PrintNode, bold: bool, width: usize) -> Vec<Line> {
    let bold = extract_text_style(&node.style).bold.unwrap_or(bold);
    let mut lines = Vec::new();

    let content: Vec<Line> = match &node.kind {
        NodeType::Text | NodeType::TextNode => {
            let text = node.text_content();
            if text.is_empty() {
                Vec::new()
            } else {
                wrap_text(&text, width)
                    .into_iter()
                    .map(|line| vec![Segment::new(line, bold)])
                    .collect()
            }
        }
        NodeType::Image | NodeType::Other(_) => return Vec::new(),
        _ if extract_view_style(&node.style).flex_row => {
            compose(&layout_columns(node, bold, width))
        }
        _ => node
            .children
            .iter()
            .flat_map(|child| render_block(child, bold, width))
            .collect(),
    };

    let spacing = calculate_spacing(&node.style);
    lines.extend(std::iter::repeat_n(Line::new(), spacing.top));
    if let Some(dashed) = border_divider(&node.style, "borderTop") {
        lines.push(vec![Segment::new(generate_divider_line(width, dashed), bold)]);
    }
    lines.extend(content);
    if let Some(dashed) = border_divider(&node.style, "borderBottom") {
        lines.push(vec![Segment::new(generate_divider_line(width, dashed), bold)]);
    }
    lines.extend(std::iter::repeat_n(Line::new(), spacing.bottom));
    lines
}

/// Phase 2: join columns into full lines.
///
/// Cells are padded to their column width with the column's alignment.
/// Trailing blanks are trimmed and adjacent segments with equal emphasis
/// merged.
pub fn compose(columns: &[Column]) -> Vec<Line> {
    let height = columns.iter().map(|c| c.lines.len()).max().unwrap_or(0);
    let empty = Line::new();

    (0..height)
        .map(|row| {
            let mut line = Line::new();
            for column in columns {
                let cell = column.lines.get(row).unwrap_or(&empty);
                push_cell(&mut line, cell, column.width, column.align);
            }
            trim_end(&mut line);
            line
        })
        .collect()
}

fn push_cell(line: &mut Line, cell: &[Segment], width: usize, align: Alignment) {
    let cell = truncate(cell, width);
    let (left, right) = column_padding(line_width(&cell), width, align);

    push_segment(line, " ".repeat(left), None);
    for segment in cell {
        push_segment(line, segment.text, Some(segment.bold));
    }
    push_segment(line, " ".repeat(right), None);
}

/// Append text, merging with the previous segment when emphasis matches.
/// Padding (`bold: None`) takes whatever emphasis precedes it.
fn push_segment(line: &mut Line, text: String, bold: Option<bool>) {
    if text.is_empty() {
        return;
    }
    match line.last_mut() {
        Some(last) if bold.is_none_or(|b| b == last.bold) => last.text.push_str(&text),
        _ => line.push(Segment::new(text, bold.unwrap_or(false))),
    }
}

fn truncate(cell: &[Segment], width: usize) -> Vec<Segment> {
    let mut budget = width;
    let mut out = Vec::new();
    for segment in cell {
        if budget == 0 {
            break;
        }
        let text: String = segment.text.chars().take(budget).collect();
        budget -= text.chars().count();
        out.push(Segment::new(text, segment.bold));
    }
    out
}

fn trim_end(line: &mut Line) {
    while let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end_matches(' ').len();
        last.text.truncate(trimmed);
        if last.text.is_empty() {
            line.pop();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Style;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Line {
        vec![Segment::new(s, false)]
    }

    fn row(children: Vec<PrintNode>) -> PrintNode {
        PrintNode::view(children).with_style(Style::new().with("flexDirection", "row"))
    }

    #[test]
    fn test_column_widths_even_split() {
        assert_eq!(column_widths(&[None, None], 48), vec![24, 24]);
        assert_eq!(column_widths(&[None, None], 47), vec![23, 24]);
        assert_eq!(column_widths(&[None, None, None], 32), vec![10, 10, 12]);
    }

    #[test]
    fn test_column_widths_explicit() {
        assert_eq!(column_widths(&[Some(10), None, None], 48), vec![10, 19, 19]);
        assert_eq!(column_widths(&[None, Some(8)], 48), vec![40, 8]);
        // Explicit widths never exceed what is left
        assert_eq!(column_widths(&[Some(40), Some(20)], 48), vec![40, 8]);
        assert_eq!(column_widths(&[], 48), Vec::<usize>::new());
    }

    #[test]
    fn test_cell_alignment_from_justify() {
        let between = Some(Justify::SpaceBetween);
        assert_eq!(cell_alignment(None, between, 0, 3), Alignment::Left);
        assert_eq!(cell_alignment(None, between, 1, 3), Alignment::Center);
        assert_eq!(cell_alignment(None, between, 2, 3), Alignment::Right);
        assert_eq!(cell_alignment(None, Some(Justify::Center), 0, 2), Alignment::Center);
        assert_eq!(cell_alignment(None, Some(Justify::FlexEnd), 0, 2), Alignment::Right);
        assert_eq!(cell_alignment(None, Some(Justify::SpaceAround), 1, 2), Alignment::Left);
        assert_eq!(cell_alignment(None, None, 1, 2), Alignment::Left);
        // Own alignment wins
        assert_eq!(cell_alignment(Some(Alignment::Right), between, 0, 2), Alignment::Right);
    }

    #[test]
    fn test_layout_two_texts() {
        let node = row(vec![PrintNode::text("Left"), PrintNode::text("Right")])
            .with_style(
                Style::new()
                    .with("flexDirection", "row")
                    .with("justifyContent", "space-between"),
            );
        let columns = layout_columns(&node, false, 20);
        assert_eq!(
            columns,
            vec![
                Column {
                    width: 10,
                    align: Alignment::Left,
                    lines: vec![text("Left")],
                },
                Column {
                    width: 10,
                    align: Alignment::Right,
                    lines: vec![text("Right")],
                },
            ]
        );
        assert_eq!(compose(&columns), vec![text("Left           Right")]);
    }

    #[test]
    fn test_compose_uneven_heights_and_bold() {
        let columns = vec![
            Column {
                width: 6,
                align: Alignment::Left,
                lines: vec![text("a"), text("b")],
            },
            Column {
                width: 6,
                align: Alignment::Center,
                lines: vec![vec![Segment::new("XY", true)]],
            },
        ];
        assert_eq!(
            compose(&columns),
            vec![
                vec![Segment::new("a       ", false), Segment::new("XY", true)],
                text("b"),
            ]
        );
    }

    #[test]
    fn test_cells_wrap_to_column_width() {
        let node = row(vec![
            PrintNode::text("one two three"),
            PrintNode::text("xyzw").with_style(Style::new().with("width", 3)),
        ]);
        let lines = compose(&layout_columns(&node, false, 9));
        assert_eq!(
            lines,
            vec![text("one   xyz"), text("two   w"), text("three")]
        );
    }

    #[test]
    fn test_compose_truncates_overlong_cells() {
        let columns = vec![Column {
            width: 3,
            align: Alignment::Right,
            lines: vec![text("abcdef")],
        }];
        assert_eq!(compose(&columns), vec![text("abc")]);
    }

    #[test]
    fn test_images_and_unknown_nodes_take_no_column() {
        let node = row(vec![
            PrintNode::image("logo.png"),
            PrintNode::text("A"),
            PrintNode::new(NodeType::Other("svg".into())),
            PrintNode::text("B"),
        ]);
        let columns = layout_columns(&node, false, 8);
        assert_eq!(columns.len(), 2);
        assert_eq!(compose(&columns), vec![text("A   B")]);
    }

    #[test]
    fn test_nested_row_and_inherited_bold() {
        let inner = row(vec![PrintNode::text("a"), PrintNode::text("b")]);
        let node = row(vec![
            inner,
            PrintNode::text("c").with_style(Style::new().with("fontWeight", "normal")),
        ]);
        let lines = compose(&layout_columns(&node, true, 8));
        assert_eq!(
            lines,
            vec![vec![Segment::new("a b ", true), Segment::new("c", false)]]
        );
    }

    #[test]
    fn test_block_borders_and_spacing() {
        let node = PrintNode::view(vec![PrintNode::text("hi")]).with_style(
            Style::new()
                .with("borderBottom", "1px dashed #000")
                .with("marginTop", 10),
        );
        assert_eq!(
            render_block(&node, false, 4),
            vec![Line::new(), text("hi"), text("----")]
        );
    }
}
