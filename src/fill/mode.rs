//! Choosing between slide-mapped and global substitution.

use crate::model::Item;
use serde::Serialize;
use std::fmt;

/// How items are applied to the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Each item targets the slide named by its `slide_index`
    SlideMapped,
    /// The first item's fields apply to every slide
    Global,
}

impl RunMode {
    /// Slide-mapped as soon as any item carries `slide_index`.
    pub fn select(items: &[Item]) -> Self {
        if items.iter().any(Item::has_slide_index) {
            RunMode::SlideMapped
        } else {
            RunMode::Global
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::SlideMapped => write!(f, "slide-mapped"),
            RunMode::Global => write!(f, "global"),
        }
    }
}
