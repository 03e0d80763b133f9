//! Token substitution over an opened presentation.
//!
//! Items carrying `slide_index` are applied one slide each; otherwise the
//! first item's fields are substituted across the whole presentation.

mod engine;
mod mode;
mod tokens;

pub use engine::{apply_global, apply_slide_item, resolve_slide_index, SlideIndexError};
pub use mode::RunMode;
pub use tokens::substitute;

use crate::model::{Item, Report, TokenMap};
use crate::pptx::Presentation;

/// Apply `items` in the mode they select.
pub fn apply_items(presentation: &mut Presentation, items: &[Item]) -> (RunMode, Report) {
    let mode = RunMode::select(items);
    let mut report = Report::new();

    tracing::info!(mode = %mode, items = items.len(), "applying data");
    match mode {
        RunMode::SlideMapped => {
            for item in items {
                apply_slide_item(presentation, item, &mut report);
            }
        }
        RunMode::Global => {
            let tokens = items.first().map(TokenMap::from_item).unwrap_or_default();
            apply_global(presentation, &tokens, &mut report);
        }
    }

    (mode, report)
}
