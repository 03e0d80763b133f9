//! Applying items to a presentation.

use super::tokens::substitute;
use crate::model::{FieldValue, Item, Report, TokenMap, IMAGE_TOKEN};
use crate::pptx::Presentation;
use std::path::Path;
use thiserror::Error;

/// Why an item could not be mapped to a slide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlideIndexError {
    /// The item has no `slide_index`, or it is null.
    #[error("missing slide_index for item: {item}")]
    Missing { item: String },

    /// The value is not an integer.
    #[error("invalid slide_index: {raw}")]
    Invalid { raw: String },

    /// The index names no slide.
    #[error("slide_index {index} out of range (0..{last})")]
    OutOfRange { index: i64, last: i64 },
}

/// Resolve an item's `slide_index` against a presentation of `slide_count` slides.
pub fn resolve_slide_index(item: &Item, slide_count: usize) -> Result<usize, SlideIndexError> {
    let index = match item.slide_index() {
        None | Some(FieldValue::Null) => {
            return Err(SlideIndexError::Missing {
                item: item.to_string(),
            })
        }
        Some(FieldValue::Text(raw)) => {
            raw.trim()
                .parse::<i64>()
                .map_err(|_| SlideIndexError::Invalid { raw: raw.clone() })?
        }
        Some(FieldValue::Number(n)) => match n.as_i64() {
            Some(i) => i,
            // Floats truncate toward zero; the cast saturates.
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| SlideIndexError::Invalid { raw: n.to_string() })?,
        },
        Some(FieldValue::Bool(b)) => i64::from(*b),
        Some(other) => {
            return Err(SlideIndexError::Invalid {
                raw: other.render().unwrap_or_default(),
            })
        }
    };

    usize::try_from(index)
        .ok()
        .filter(|&i| i < slide_count)
        .ok_or(SlideIndexError::OutOfRange {
            index,
            last: slide_count as i64 - 1,
        })
}

/// Fill the slide an item targets.
///
/// Every shape containing `{{IMAGE}}` is first tried as a picture when
/// the item names an image; on failure the shape falls through to text
/// substitution. Adds one line to `report` and returns the number of
/// shapes replaced.
pub fn apply_slide_item(
    presentation: &mut Presentation,
    item: &Item,
    report: &mut Report,
) -> usize {
    let slide_index = match resolve_slide_index(item, presentation.slide_count()) {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!("{}", e);
            report.push(e.to_string());
            return 0;
        }
    };

    let tokens = TokenMap::from_item(item);
    let shape_count = presentation
        .slide(slide_index)
        .map_or(0, |slide| slide.shape_count());

    let mut replaced = 0;
    for shape_index in 0..shape_count {
        let Some(text) = shape_text(presentation, slide_index, shape_index) else {
            continue;
        };

        if let Some(image) = item.image().filter(|_| text.contains(IMAGE_TOKEN)) {
            if try_picture(presentation, slide_index, shape_index, image) {
                replaced += 1;
                continue;
            }
        }

        if replace_text(presentation, slide_index, shape_index, &text, &tokens) {
            replaced += 1;
        }
    }

    report.push(format!("slide {}: replaced {} shapes", slide_index, replaced));
    replaced
}

/// Substitute `tokens` in every shape of every slide.
///
/// Pictures are never inserted. Adds one line to `report` and returns
/// the number of shapes replaced.
pub fn apply_global(
    presentation: &mut Presentation,
    tokens: &TokenMap,
    report: &mut Report,
) -> usize {
    let mut replaced = 0;
    for slide_index in 0..presentation.slide_count() {
        let shape_count = presentation
            .slide(slide_index)
            .map_or(0, |slide| slide.shape_count());
        for shape_index in 0..shape_count {
            let Some(text) = shape_text(presentation, slide_index, shape_index) else {
                continue;
            };
            if replace_text(presentation, slide_index, shape_index, &text, tokens) {
                replaced += 1;
            }
        }
    }

    report.push(format!("global replace: replaced tokens in {} shapes", replaced));
    replaced
}

fn shape_text(presentation: &Presentation, slide: usize, shape: usize) -> Option<String> {
    presentation
        .slide(slide)?
        .shape(shape)?
        .text()
        .map(str::to_string)
}

fn try_picture(presentation: &mut Presentation, slide: usize, shape: usize, image: &Path) -> bool {
    match presentation.replace_shape_with_picture(slide, shape, image) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(
                slide,
                shape,
                image = %image.display(),
                error = %e,
                "picture not inserted"
            );
            false
        }
    }
}

fn replace_text(
    presentation: &mut Presentation,
    slide: usize,
    shape: usize,
    text: &str,
    tokens: &TokenMap,
) -> bool {
    let Some(updated) = substitute(text, tokens) else {
        return false;
    };
    let Some(target) = presentation.slide_mut(slide) else {
        return false;
    };
    match target.set_shape_text(shape, &updated) {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(slide, shape, error = %e, "shape text not written");
            false
        }
    }
}
