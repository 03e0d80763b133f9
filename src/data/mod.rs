//! Loading substitution data from JSON and CSV sources.

mod csv;
mod json;

use crate::error::{Error, Result};
use crate::model::Item;
use std::path::Path;

/// Supported data source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Csv,
}

impl DataFormat {
    /// Pick the format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(DataFormat::Json),
            Some("csv") => Ok(DataFormat::Csv),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Data as read from the source, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawData {
    /// A single JSON object
    Single(Item),
    /// A JSON array or CSV rows
    Many(Vec<Item>),
}

impl RawData {
    /// Normalize to a sequence of items.
    pub fn into_items(self) -> Vec<Item> {
        match self {
            RawData::Single(item) => vec![item],
            RawData::Many(items) => items,
        }
    }
}

/// Read and parse a data file.
///
/// # Example
///
/// ```no_run
/// use slidefill::data::load_data;
///
/// let items = load_data("courses.json")?.into_items();
/// println!("{} items", items.len());
/// # Ok::<(), slidefill::Error>(())
/// ```
pub fn load_data(path: impl AsRef<Path>) -> Result<RawData> {
    let path = path.as_ref();
    let format = DataFormat::from_path(path)?;
    let content = std::fs::read(path)?;

    let data = match format {
        DataFormat::Json => json::parse(&content)?,
        DataFormat::Csv => csv::parse(&content)?,
    };

    tracing::info!(
        path = %path.display(),
        format = ?format,
        items = match &data {
            RawData::Single(_) => 1,
            RawData::Many(items) => items.len(),
        },
        "loaded data"
    );
    Ok(data)
}
