//! Non-streaming reply shapes and plain-text extraction.
//!
//! Replies arrive in several structurally different shapes. They are decoded
//! into [`ResponseReply`] without failing on unexpected fields, then searched in
//! a fixed order by [`extract_text`]:
//!
//! 1. top-level `output_text`
//! 2. each `output` item's `text`
//! 3. that item's `content` as a plain string
//! 4. that item's `content` parts, each checked for `text`
//!
//! ```rust
//! use qprovider::{ResponseReply, extract_text};
//! use serde_json::json;
//!
//! let reply = ResponseReply::from_value(&json!({
//!     "output": [{ "content": [{ "type": "output_text", "text": "hi" }] }]
//! }));
//! assert_eq!(extract_text(&reply), "hi");
//! assert_eq!(extract_text(&ResponseReply::from_value(&json!(42))), "");
//! ```

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseReply {
    pub output_text: Option<String>,
    pub output: Vec<OutputItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputItem {
    pub text: Option<String>,
    pub content: ItemContent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ItemContent {
    #[default]
    Absent,
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPart {
    pub text: Option<String>,
}

impl ResponseReply {
    pub fn text(output_text: impl Into<String>) -> Self {
        Self {
            output_text: Some(output_text.into()),
            output: Vec::new(),
        }
    }

    pub fn items(output: Vec<OutputItem>) -> Self {
        Self {
            output_text: None,
            output,
        }
    }

    /// Decodes any JSON value; fields of the wrong type are treated as absent.
    pub fn from_value(value: &Value) -> Self {
        let output = value
            .get("output")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(OutputItem::from_value).collect())
            .unwrap_or_default();

        Self {
            output_text: string_field(value, "output_text"),
            output,
        }
    }
}

impl OutputItem {
    pub fn from_value(value: &Value) -> Self {
        let content = match value.get("content") {
            Some(Value::String(text)) => ItemContent::Text(text.clone()),
            Some(Value::Array(parts)) => {
                ItemContent::Parts(parts.iter().map(ContentPart::from_value).collect())
            }
            _ => ItemContent::Absent,
        };

        Self {
            text: string_field(value, "text"),
            content,
        }
    }
}

impl ContentPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let text = match value {
            Value::String(text) => Some(text.clone()),
            _ => string_field(value, "text"),
        };

        Self { text }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn non_empty(text: Option<&String>) -> Option<&str> {
    text.map(String::as_str).filter(|text| !text.is_empty())
}

/// Returns the first non-empty text along the documented lookup order, or `""`.
///
/// An empty string is a successful extraction of nothing, not a failure.
pub fn extract_text(reply: &ResponseReply) -> String {
    if let Some(text) = non_empty(reply.output_text.as_ref()) {
        return text.to_string();
    }

    reply
        .output
        .iter()
        .find_map(item_text)
        .map(str::to_string)
        .unwrap_or_default()
}

fn item_text(item: &OutputItem) -> Option<&str> {
    if let Some(text) = non_empty(item.text.as_ref()) {
        return Some(text);
    }

    match &item.content {
        ItemContent::Text(text) if !text.is_empty() => Some(text.as_str()),
        ItemContent::Parts(parts) => parts.iter().find_map(|part| non_empty(part.text.as_ref())),
        _ => None,
    }
}
