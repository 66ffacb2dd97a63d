use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ItemError;
use crate::types::ItemId;

/// A single text item handed over by an ingestion collaborator.
///
/// The text may be absent or carried under a non-string value upstream; both
/// cases normalize to `None` and are scored as the empty string. Every key
/// other than `id`, `text` and `body` is kept verbatim as opaque metadata
/// (subreddit, permalink, draft scope, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Item {
    /// Unique item identifier.
    pub id: ItemId,

    /// The text to classify. `None` when absent or not a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Opaque metadata passed through untouched.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Item {
    /// Create an item with the given id and text and no metadata.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: Some(text.into()),
            metadata: Map::new(),
        }
    }

    /// Create an item whose text is absent.
    #[must_use]
    pub fn without_text(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            text: None,
            metadata: Map::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// The text to score; the empty string when absent.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl TryFrom<Map<String, Value>> for Item {
    type Error = ItemError;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match map.remove("id") {
            Some(Value::String(s)) if !s.is_empty() => ItemId::new(s),
            Some(Value::Number(n)) => ItemId::new(n.to_string()),
            Some(Value::String(_)) => return Err(ItemError::EmptyId),
            Some(other) => return Err(ItemError::InvalidId(json_type_name(&other))),
            None => return Err(ItemError::MissingId),
        };

        // `text` wins when it is a non-empty string, `body` is the fallback.
        let text = map.remove("text");
        let body = map.remove("body");
        let text = [text, body]
            .into_iter()
            .flatten()
            .find_map(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            });

        Ok(Self {
            id,
            text,
            metadata: map,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
