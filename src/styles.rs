//! # Style Resolver
//!
//! Pure functions mapping node style attributes to printer primitives.
//!
//! Nothing in here fails: a malformed value (non-numeric `fontSize`, unknown
//! `textAlign`, ...) resolves to `None` so the caller keeps the ambient
//! formatting state.
//!
//! ## Font size buckets
//!
//! | fontSize | width × height |
//! |----------|----------------|
//! | ≥ 25     | 2 × 2          |
//! | ≥ 19     | 2 × 1          |
//! | ≥ 13     | 1 × 2          |
//! | < 13     | 1 × 1          |

use serde_json::Value;

use crate::document::Style;
use crate::protocol::{Alignment, CharacterSize};

/// Style units per blank feed line for margins and paddings.
const SPACING_UNITS_PER_LINE: f64 = 10.0;

// ============================================================================
// RESOLVED STYLES
// ============================================================================

/// Text formatting requested by a node. `None` fields inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub align: Option<Alignment>,
    pub size: Option<CharacterSize>,
    pub bold: Option<bool>,
}

/// Main-axis distribution of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Layout attributes of a container node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewStyle {
    pub align: Option<Alignment>,
    pub flex_row: bool,
    pub justify: Option<Justify>,
}

/// Blank lines to feed around a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub top: usize,
    pub bottom: usize,
}

// ============================================================================
// INDIVIDUAL MAPPERS
// ============================================================================

/// Map a font size in points to a character size. Zero, negative and
/// non-finite sizes map to `None`.
pub fn map_font_size(font_size: f64) -> Option<CharacterSize> {
    if !font_size.is_finite() || font_size <= 0.0 {
        return None;
    }
    let size = if font_size >= 25.0 {
        CharacterSize::new(2, 2)
    } else if font_size >= 19.0 {
        CharacterSize::new(2, 1)
    } else if font_size >= 13.0 {
        CharacterSize::new(1, 2)
    } else {
        CharacterSize::NORMAL
    };
    Some(size)
}

pub fn map_text_align(value: &str) -> Option<Alignment> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left" | "start" => Some(Alignment::Left),
        "center" => Some(Alignment::Center),
        "right" | "end" => Some(Alignment::Right),
        _ => None,
    }
}

/// Interpret a `fontWeight` value: `"bold"` or ≥ 700 is bold, `"normal"` or
/// a lighter numeric weight is not. Anything else is unrecognized.
pub fn is_bold(value: &Value) -> Option<bool> {
    match value {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "bold" | "bolder" => Some(true),
            "normal" | "lighter" => Some(false),
            numeric => numeric.parse::<f64>().ok().and_then(weight_is_bold),
        },
        Value::Number(n) => n.as_f64().and_then(weight_is_bold),
        _ => None,
    }
}

fn weight_is_bold(weight: f64) -> Option<bool> {
    (weight.is_finite() && weight >= 100.0).then_some(weight >= 700.0)
}

fn map_justify(value: &str) -> Option<Justify> {
    match value.trim().to_ascii_lowercase().as_str() {
        "flex-start" | "start" => Some(Justify::FlexStart),
        "flex-end" | "end" => Some(Justify::FlexEnd),
        "center" => Some(Justify::Center),
        "space-between" => Some(Justify::SpaceBetween),
        "space-around" => Some(Justify::SpaceAround),
        "space-evenly" => Some(Justify::SpaceEvenly),
        _ => None,
    }
}

// ============================================================================
// EXTRACTORS
// ============================================================================

pub fn extract_text_style(style: &Style) -> TextStyle {
    TextStyle {
        align: style.str("textAlign").and_then(map_text_align),
        size: style.number("fontSize").and_then(map_font_size),
        bold: style.get("fontWeight").and_then(is_bold),
    }
}

pub fn extract_view_style(style: &Style) -> ViewStyle {
    ViewStyle {
        align: style.str("textAlign").and_then(map_text_align),
        flex_row: style
            .str("flexDirection")
            .is_some_and(|d| d.trim().eq_ignore_ascii_case("row")),
        justify: style.str("justifyContent").and_then(map_justify),
    }
}

pub fn is_dashed_border(value: &str) -> bool {
    value.contains("dashed")
}

/// Divider requested by a border key: `Some(dashed)` when the border is
/// visible, `None` when absent or explicitly disabled (`"none"`, `0`).
pub fn border_divider(style: &Style, key: &str) -> Option<bool> {
    match style.get(key)? {
        Value::String(s) => {
            let s = s.trim();
            let hidden = s.is_empty()
                || s.eq_ignore_ascii_case("none")
                || s == "0"
                || s.starts_with("0 ")
                || s.starts_with("0px");
            (!hidden).then(|| is_dashed_border(s))
        }
        Value::Number(n) => n.as_f64().filter(|w| *w > 0.0).map(|_| false),
        _ => None,
    }
}

pub fn generate_divider_line(width: usize, dashed: bool) -> String {
    let ch = if dashed { '-' } else { '=' };
    std::iter::repeat_n(ch, width).collect()
}

/// Merge styles left to right. Later keys win; an explicit `null` removes a
/// key set by an earlier style.
pub fn merge_styles<'a>(styles: impl IntoIterator<Item = &'a Style>) -> Style {
    let mut merged = Style::new();
    for style in styles {
        for (key, value) in style.iter() {
            if value.is_null() {
                merged.remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    merged
}

/// Resolve a width to character columns.
///
/// Numbers (and numeric strings) are absolute columns; `"NN%"` is relative
/// to `paper_width`. The result is rounded and clamped to `[0, paper_width]`.
pub fn parse_width(value: &Value, paper_width: usize) -> Option<usize> {
    let columns = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(pct) => pct
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .map(|p| p / 100.0 * paper_width as f64),
                None => s.parse::<f64>().ok(),
            }
        }
        _ => None,
    }?;

    columns
        .is_finite()
        .then(|| columns.round().clamp(0.0, paper_width as f64) as usize)
}

/// Feed lines for `marginTop`/`paddingTop` and `marginBottom`/`paddingBottom`.
///
/// `margin` and `padding` numeric shorthands apply when the side-specific key
/// is absent. Negative values count as zero.
pub fn calculate_spacing(style: &Style) -> Spacing {
    let side = |specific: &str, shorthand: &str| {
        style
            .number(specific)
            .or_else(|| style.number(shorthand))
            .unwrap_or(0.0)
            .max(0.0)
    };
    let lines = |units: f64| (units / SPACING_UNITS_PER_LINE).round() as usize;

    Spacing {
        top: lines(side("marginTop", "margin") + side("paddingTop", "padding")),
        bottom: lines(side("marginBottom", "margin") + side("paddingBottom", "padding")),
    }
}

// ============================================================================
// TEXT LAYOUT
// ============================================================================

/// Spaces to put before and after `len` characters to fill `width`.
///
/// Center alignment puts the odd space on the right.
pub fn column_padding(len: usize, width: usize, align: Alignment) -> (usize, usize) {
    let rem = width.saturating_sub(len);
    match align {
        Alignment::Left => (0, rem),
        Alignment::Right => (rem, 0),
        Alignment::Center => (rem / 2, rem - rem / 2),
    }
}

/// Pad (or truncate) `text` to exactly `width` characters.
pub fn align_text_in_column(text: &str, width: usize, align: Alignment) -> String {
    let text: String = text.chars().take(width).collect();
    let (left, right) = column_padding(text.chars().count(), width, align);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Greedy word wrap to `width` columns.
///
/// Explicit newlines start a new paragraph. Words longer than `width` are
/// hard-broken at the width boundary. Empty input yields one empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph, width, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0;
    let start = lines.len();

    for word in paragraph.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(chars[..width].iter().collect());
            chars.drain(..width);
        }
        if chars.is_empty() {
            continue;
        }

        if current_len == 0 {
            current = chars.iter().collect();
            current_len = chars.len();
        } else if current_len + 1 + chars.len() <= width {
            current.push(' ');
            current.extend(chars.iter());
            current_len += 1 + chars.len();
        } else {
            lines.push(std::mem::replace(&mut current, chars.iter().collect()));
            current_len = chars.len();
        }
    }

    if current_len > 0 || lines.len() == start {
        lines.push(current);
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_font_size_buckets() {
        assert_eq!(map_font_size(30.0), Some(CharacterSize::new(2, 2)));
        assert_eq!(map_font_size(25.0), Some(CharacterSize::new(2, 2)));
        assert_eq!(map_font_size(20.0), Some(CharacterSize::new(2, 1)));
        assert_eq!(map_font_size(19.0), Some(CharacterSize::new(2, 1)));
        assert_eq!(map_font_size(13.0), Some(CharacterSize::new(1, 2)));
        assert_eq!(map_font_size(12.0), Some(CharacterSize::NORMAL));
    }

    #[test]
    fn test_font_size_out_of_range_is_ignored() {
        assert_eq!(map_font_size(0.0), None);
        assert_eq!(map_font_size(-14.0), None);
        assert_eq!(map_font_size(f64::NAN), None);
    }

    #[test]
    fn test_is_bold() {
        assert_eq!(is_bold(&json!("bold")), Some(true));
        assert_eq!(is_bold(&json!("normal")), Some(false));
        assert_eq!(is_bold(&json!(700)), Some(true));
        assert_eq!(is_bold(&json!(900)), Some(true));
        assert_eq!(is_bold(&json!(400)), Some(false));
        assert_eq!(is_bold(&json!("800")), Some(true));
        assert_eq!(is_bold(&json!(50)), None);
        assert_eq!(is_bold(&json!("heavy")), None);
        assert_eq!(is_bold(&json!(true)), None);
    }

    #[test]
    fn test_extract_text_style() {
        let style = Style::new()
            .with("textAlign", "center")
            .with("fontSize", 20)
            .with("fontWeight", "bold");
        assert_eq!(
            extract_text_style(&style),
            TextStyle {
                align: Some(Alignment::Center),
                size: Some(CharacterSize::new(2, 1)),
                bold: Some(true),
            }
        );
    }

    #[test]
    fn test_extract_text_style_malformed_values() {
        let style = Style::new()
            .with("textAlign", "diagonal")
            .with("fontSize", "huge")
            .with("fontWeight", json!({ "weight": 700 }));
        assert_eq!(extract_text_style(&style), TextStyle::default());
    }

    #[test]
    fn test_extract_view_style() {
        let style = Style::new()
            .with("flexDirection", "row")
            .with("justifyContent", "space-between");
        let view = extract_view_style(&style);
        assert!(view.flex_row);
        assert_eq!(view.justify, Some(Justify::SpaceBetween));
        assert_eq!(view.align, None);

        assert!(!extract_view_style(&Style::new().with("flexDirection", "column")).flex_row);
    }

    #[test]
    fn test_dashed_border() {
        assert!(is_dashed_border("1px dashed black"));
        assert!(!is_dashed_border("1px solid black"));
    }

    #[test]
    fn test_border_divider() {
        let style = Style::new()
            .with("borderTop", "1px dashed #000")
            .with("borderBottom", "none");
        assert_eq!(border_divider(&style, "borderTop"), Some(true));
        assert_eq!(border_divider(&style, "borderBottom"), None);
        assert_eq!(border_divider(&Style::new().with("borderTop", 1), "borderTop"), Some(false));
        assert_eq!(border_divider(&Style::new(), "borderTop"), None);
    }

    #[test]
    fn test_divider_line() {
        assert_eq!(generate_divider_line(5, true), "-----");
        assert_eq!(generate_divider_line(3, false), "===");
        assert_eq!(generate_divider_line(0, true), "");
    }

    #[test]
    fn test_merge_styles() {
        let base = Style::new().with("fontSize", 12).with("textAlign", "left");
        let over = Style::new().with("textAlign", "right").with("fontWeight", "bold");
        let clear = Style::new().with("fontSize", Value::Null);

        let merged = merge_styles([&base, &over]);
        assert_eq!(merged.number("fontSize"), Some(12.0));
        assert_eq!(merged.str("textAlign"), Some("right"));
        assert_eq!(merged.str("fontWeight"), Some("bold"));

        let cleared = merge_styles([&base, &over, &clear]);
        assert!(!cleared.contains_key("fontSize"));
        assert_eq!(cleared.str("textAlign"), Some("right"));
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width(&json!(10), 48), Some(10));
        assert_eq!(parse_width(&json!(10.6), 48), Some(11));
        assert_eq!(parse_width(&json!("50%"), 48), Some(24));
        assert_eq!(parse_width(&json!("33%"), 48), Some(16));
        assert_eq!(parse_width(&json!("20"), 48), Some(20));
        assert_eq!(parse_width(&json!(100), 48), Some(48));
        assert_eq!(parse_width(&json!(-5), 48), Some(0));
        assert_eq!(parse_width(&json!("150%"), 48), Some(48));
        assert_eq!(parse_width(&json!("wide"), 48), None);
        assert_eq!(parse_width(&json!(null), 48), None);
    }

    #[test]
    fn test_spacing() {
        let style = Style::new()
            .with("marginTop", 10)
            .with("paddingTop", 10)
            .with("marginBottom", 5);
        assert_eq!(calculate_spacing(&style), Spacing { top: 2, bottom: 1 });

        let shorthand = Style::new().with("padding", 10).with("paddingBottom", 0);
        assert_eq!(calculate_spacing(&shorthand), Spacing { top: 1, bottom: 0 });

        assert_eq!(calculate_spacing(&Style::new().with("marginTop", -40)), Spacing::default());
    }

    #[test]
    fn test_align_text_in_column() {
        assert_eq!(align_text_in_column("AB", 5, Alignment::Center), " AB  ");
        assert_eq!(align_text_in_column("AB", 6, Alignment::Center), "  AB  ");
        assert_eq!(align_text_in_column("AB", 5, Alignment::Left), "AB   ");
        assert_eq!(align_text_in_column("AB", 5, Alignment::Right), "   AB");
        assert_eq!(align_text_in_column("ABCDEFG", 4, Alignment::Right), "ABCD");
        assert_eq!(align_text_in_column("ção", 5, Alignment::Left), "ção  ");
    }

    #[test]
    fn test_wrap_text_greedy() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_text("exactly 10", 10), vec!["exactly 10"]);
    }

    #[test]
    fn test_wrap_text_hard_breaks_long_word() {
        let lines = wrap_text("a very long singleword", 6);
        assert_eq!(lines, vec!["a very", "long", "single", "word"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 6));

        let chunks = wrap_text("abcdefghijklm", 5);
        assert_eq!(chunks, vec!["abcde", "fghij", "klm"]);
    }

    #[test]
    fn test_wrap_text_edge_cases() {
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("   ", 10), vec![""]);
        assert_eq!(wrap_text("two\nlines", 10), vec!["two", "lines"]);
        assert_eq!(wrap_text("anything", 0), vec!["anything"]);
    }
}
