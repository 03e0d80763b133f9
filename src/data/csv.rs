//! CSV data sources: a header row, then one item per row.

use super::RawData;
use crate::error::Result;
use crate::model::Item;

pub(super) fn parse(content: &[u8]) -> Result<RawData> {
    let content = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Ok(RawData::Many(Vec::new()));
    }

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Short rows leave trailing columns out; extra cells have no header.
        items.push(Item::from_pairs(
            headers.iter().cloned().zip(record.iter().map(str::to_string)),
        ));
    }
    Ok(RawData::Many(items))
}
