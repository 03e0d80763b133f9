//! Data items and the tokens derived from them.

use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Field selecting the target slide.
pub const SLIDE_INDEX_FIELD: &str = "slide_index";
/// Field naming the replacement image.
pub const IMAGE_FIELD: &str = "image";
/// Token that marks a picture placeholder.
pub const IMAGE_TOKEN: &str = "{{IMAGE}}";

/// A single value of a data field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
    /// Arrays and objects
    Structured(Value),
}

impl FieldValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::String(s) => FieldValue::Text(s),
            Value::Number(n) => FieldValue::Number(n),
            Value::Bool(b) => FieldValue::Bool(b),
            other => FieldValue::Structured(other),
        }
    }

    /// Text substituted for this value; `None` for null.
    pub fn render(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Structured(v) => Some(v.to_string()),
        }
    }
}

/// One record of input data.
///
/// The reserved `slide_index` and `image` fields are split out; every
/// other field is kept in source order and becomes a token.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    slide_index: Option<FieldValue>,
    image: Option<PathBuf>,
    fields: Vec<(String, FieldValue)>,
    /// The record as read, for messages
    source: Map<String, Value>,
}

impl Item {
    /// Build an item from a JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut slide_index = None;
        let mut image = None;
        let mut fields = Vec::with_capacity(map.len());

        for (name, value) in &map {
            let value = FieldValue::from_json(value.clone());
            match name.as_str() {
                SLIDE_INDEX_FIELD => slide_index = Some(value),
                IMAGE_FIELD => {
                    image = value
                        .render()
                        .filter(|path| !path.is_empty())
                        .map(PathBuf::from);
                }
                _ => fields.push((name.clone(), value)),
            }
        }

        Self {
            slide_index,
            image,
            fields,
            source: map,
        }
    }

    /// Build an item from field/value string pairs, e.g. a CSV row.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        Self::from_map(map)
    }

    /// The raw `slide_index` value; `Some(FieldValue::Null)` when given as null.
    pub fn slide_index(&self) -> Option<&FieldValue> {
        self.slide_index.as_ref()
    }

    pub fn has_slide_index(&self) -> bool {
        self.slide_index.is_some()
    }

    pub fn image(&self) -> Option<&PathBuf> {
        self.image.as_ref()
    }

    /// Token fields in source order.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// The record as read, including reserved fields.
    pub fn to_json(&self) -> Value {
        Value::Object(self.source.clone())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Ordered `{{NAME}}` token to replacement text pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenMap {
    entries: Vec<(String, String)>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tokens for every non-null field of `item`.
    ///
    /// Field names that upper-case to the same token keep the first
    /// position and the last value.
    pub fn from_item(item: &Item) -> Self {
        let mut map = Self::new();
        for (name, value) in item.fields() {
            if let Some(text) = value.render() {
                map.insert(&name.to_uppercase(), text);
            }
        }
        map
    }

    /// Add `{{NAME}}` for an already upper-cased name.
    pub fn insert(&mut self, name: &str, value: String) {
        let token = format!("{{{{{}}}}}", name);
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
