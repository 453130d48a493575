//! Style attribute map attached to every print node.
//!
//! Styles stay as raw JSON values so that malformed entries survive
//! deserialization; interpretation (and silent fallback) happens in
//! [`crate::styles`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node's style attributes, keyed by camelCase CSS-like names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(Map<String, Value>);

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// String value of `key`, if it is a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Numeric value of `key`; numeric strings such as `"20"` or `"20px"` are accepted.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_end_matches("px").trim().parse().ok(),
            _ => None,
        }
        .filter(|n: &f64| n.is_finite())
    }
}

impl From<Map<String, Value>> for Style {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Style> for Map<String, Value> {
    fn from(style: Style) -> Self {
        style.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_number_accepts_numeric_strings() {
        let style = Style::new()
            .with("fontSize", 20)
            .with("marginTop", "12px")
            .with("width", "abc");
        assert_eq!(style.number("fontSize"), Some(20.0));
        assert_eq!(style.number("marginTop"), Some(12.0));
        assert_eq!(style.number("width"), None);
        assert_eq!(style.number("missing"), None);
    }

    #[test]
    fn test_transparent_serde() {
        let style: Style = serde_json::from_value(json!({ "textAlign": "center" })).unwrap();
        assert_eq!(style.str("textAlign"), Some("center"));
        assert_eq!(serde_json::to_value(&style).unwrap(), json!({ "textAlign": "center" }));
    }
}
