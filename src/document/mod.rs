//! # Print Node Document Model
//!
//! The universal intermediate representation consumed by the converter.
//! A tree of [`PrintNode`]s is produced by an external UI layer and
//! deserialized straight from JSON:
//!
//! ```
//! use thermal_escpos::document::{NodeType, PrintNode};
//!
//! let tree: PrintNode = serde_json::from_str(r#"{
//!     "type": "document",
//!     "children": [
//!         { "type": "text", "props": { "children": "Hello" }, "style": { "textAlign": "center" } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(tree.kind, NodeType::Document);
//! assert_eq!(tree.children[0].text_content(), "Hello");
//! ```
//!
//! Missing `props`, `style` and `children` default to empty.

mod style;

pub use style::Style;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// ============================================================================
// NODE TYPE
// ============================================================================

/// Closed set of node tags understood by the traverser.
///
/// Tags outside the set are kept as [`NodeType::Other`] so that a malformed
/// tree still deserializes; the traverser skips them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum NodeType {
    #[default]
    Document,
    Page,
    View,
    Text,
    Image,
    TextNode,
    Other(String),
}

impl NodeType {
    pub fn as_str(&self) -> &str {
        match self {
            NodeType::Document => "document",
            NodeType::Page => "page",
            NodeType::View => "view",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::TextNode => "textnode",
            NodeType::Other(name) => name,
        }
    }

    /// Container nodes lay out their children (document, page, view).
    pub fn is_container(&self) -> bool {
        matches!(self, NodeType::Document | NodeType::Page | NodeType::View)
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "document" => NodeType::Document,
            "page" => NodeType::Page,
            "view" => NodeType::View,
            "text" => NodeType::Text,
            "image" => NodeType::Image,
            "textnode" => NodeType::TextNode,
            _ => NodeType::Other(tag),
        }
    }
}

impl Serialize for NodeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// PRINT NODE
// ============================================================================

/// One element of the document tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintNode {
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub children: Vec<PrintNode>,
}

impl PrintNode {
    pub fn new(kind: NodeType) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// A `document` root holding `children`.
    pub fn document(children: Vec<PrintNode>) -> Self {
        Self::new(NodeType::Document).with_children(children)
    }

    /// A `view` container holding `children`.
    pub fn view(children: Vec<PrintNode>) -> Self {
        Self::new(NodeType::View).with_children(children)
    }

    /// A `text` leaf with literal content in `props.children`.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeType::Text).with_prop("children", Value::String(content.into()))
    }

    /// An `image` leaf whose source is an inline data URI, base64 blob, path or URL.
    pub fn image(source: impl Into<String>) -> Self {
        Self::new(NodeType::Image).with_prop("source", Value::String(source.into()))
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    pub fn with_children(mut self, children: Vec<PrintNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: PrintNode) -> Self {
        self.children.push(child);
        self
    }

    /// Literal text held in this node's own props.
    ///
    /// Text nodes read `props.children` (a string, a number, or an array of
    /// those). Textnode leaves read `props.text` first.
    pub fn own_text(&self) -> Option<String> {
        match self.kind {
            NodeType::TextNode => self
                .props
                .get("text")
                .and_then(literal)
                .or_else(|| self.props.get("children").and_then(literal)),
            _ => self.props.get("children").and_then(literal),
        }
    }

    /// Text and textnode children, the inline spans of a text node.
    pub fn text_children(&self) -> impl Iterator<Item = &PrintNode> {
        self.children
            .iter()
            .filter(|c| matches!(c.kind, NodeType::Text | NodeType::TextNode))
    }

    /// Literal text carried by a text or textnode leaf.
    ///
    /// Falls back to concatenating the content of text/textnode children
    /// when the props hold no literal content.
    pub fn text_content(&self) -> String {
        match self.own_text() {
            Some(text) => text,
            None => self.text_children().map(PrintNode::text_content).collect(),
        }
    }

    /// Source reference of an image node (`props.source`, then `props.src`).
    ///
    /// Accepts a plain string or an object of the form `{ "uri": "..." }`.
    pub fn image_source(&self) -> Option<&str> {
        ["source", "src"]
            .iter()
            .filter_map(|key| self.props.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.as_str()),
                Value::Object(obj) => obj
                    .get("uri")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty()),
                _ => None,
            })
    }
}

/// Flatten a props value to text: strings, numbers and arrays of them.
fn literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(literal).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.concat())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal_tree() {
        let node: PrintNode = serde_json::from_value(json!({
            "type": "view",
            "children": [{ "type": "text", "props": { "children": "hi" } }]
        }))
        .unwrap();

        assert_eq!(node.kind, NodeType::View);
        assert!(node.props.is_empty());
        assert!(node.style.is_empty());
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].kind, NodeType::Text);
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let node: PrintNode = serde_json::from_value(json!({ "type": "qrcode" })).unwrap();
        assert_eq!(node.kind, NodeType::Other("qrcode".into()));
        assert_eq!(node.kind.as_str(), "qrcode");
    }

    #[test]
    fn test_node_type_round_trips_as_string() {
        let value = serde_json::to_value(PrintNode::new(NodeType::TextNode)).unwrap();
        assert_eq!(value["type"], "textnode");
    }

    #[test]
    fn test_text_content_variants() {
        assert_eq!(PrintNode::text("abc").text_content(), "abc");

        let numeric = PrintNode::new(NodeType::Text).with_prop("children", json!(42));
        assert_eq!(numeric.text_content(), "42");

        let array = PrintNode::new(NodeType::Text).with_prop("children", json!(["Total: ", 10]));
        assert_eq!(array.text_content(), "Total: 10");
    }

    #[test]
    fn test_text_content_from_textnode_children() {
        let node = PrintNode::new(NodeType::Text).with_children(vec![
            PrintNode::new(NodeType::TextNode).with_prop("text", json!("Hello, ")),
            PrintNode::new(NodeType::TextNode).with_prop("text", json!("world")),
        ]);
        assert_eq!(node.text_content(), "Hello, world");
    }

    #[test]
    fn test_image_source_lookup() {
        assert_eq!(PrintNode::image("data:x").image_source(), Some("data:x"));

        let src = PrintNode::new(NodeType::Image).with_prop("src", json!({ "uri": "logo.png" }));
        assert_eq!(src.image_source(), Some("logo.png"));

        let empty = PrintNode::new(NodeType::Image).with_prop("source", json!(""));
        assert_eq!(empty.image_source(), None);
    }

    #[test]
    fn test_own_text_ignores_children() {
        let node = PrintNode::new(NodeType::Text)
            .with_child(PrintNode::text("inner"))
            .with_child(PrintNode::image("logo.png"));
        assert_eq!(node.own_text(), None);
        assert_eq!(node.text_children().count(), 1);
        assert_eq!(node.text_content(), "inner");
    }
}
