//! JSON data sources: one object or an array of objects.

use super::RawData;
use crate::error::{Error, Result};
use crate::model::Item;
use serde_json::Value;

pub(super) fn parse(content: &[u8]) -> Result<RawData> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    let value: Value = serde_json::from_slice(content)?;

    match value {
        Value::Object(map) => Ok(RawData::Single(Item::from_map(map))),
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match value {
                Value::Object(map) => Ok(Item::from_map(map)),
                other => Err(Error::Parse(format!(
                    "item {} is {}, expected an object",
                    i,
                    kind_of(&other)
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(RawData::Many),
        other => Err(Error::Parse(format!(
            "expected an object or an array of objects, found {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
