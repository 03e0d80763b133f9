//! # slidefill
//!
//! Fill `{{TOKEN}}` placeholders in PowerPoint templates from JSON or CSV data.
//!
//! Each data record becomes a set of tokens: the field `title` fills
//! `{{TITLE}}`, `author` fills `{{AUTHOR}}`, and so on. Records with a
//! `slide_index` field each fill one slide, and an `image` field replaces
//! a shape containing `{{IMAGE}}` with that picture. Without any
//! `slide_index`, the first record fills every slide.
//!
//! ## Quick Start
//!
//! ```no_run
//! use slidefill::{fill_presentation, FillOptions};
//!
//! let options = FillOptions::new("template.pptx", "courses.json")
//!     .with_output("courses.pptx")
//!     .with_backup(true);
//!
//! let summary = fill_presentation(&options)?;
//! for line in summary.report.iter() {
//!     println!("{}", line);
//! }
//! # Ok::<(), slidefill::Error>(())
//! ```
//!
//! ## Lower-Level APIs
//!
//! ```no_run
//! use slidefill::data::load_data;
//! use slidefill::fill::apply_items;
//! use slidefill::pptx::Presentation;
//!
//! let items = load_data("rows.csv")?.into_items();
//! let mut presentation = Presentation::open("template.pptx")?;
//! let (mode, report) = apply_items(&mut presentation, &items);
//! presentation.save("filled.pptx")?;
//! # Ok::<(), slidefill::Error>(())
//! ```

pub mod backup;
pub mod container;
pub mod data;
pub mod detect;
pub mod error;
pub mod fill;
pub mod model;
pub mod options;
pub mod pptx;

#[cfg(test)]
mod test_support;

// Re-exports
pub use backup::BackupOutcome;
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use detect::PresentationKind;
pub use error::{Error, Result};
pub use fill::RunMode;
pub use model::{FieldValue, Item, Report, TokenMap};
pub use options::FillOptions;
pub use pptx::Presentation;

use serde::Serialize;
use std::path::PathBuf;

/// Outcome of a fill run.
#[derive(Debug, Clone, Serialize)]
pub struct FillSummary {
    /// Path the filled presentation was written to
    pub output: PathBuf,
    /// Backup result, when a backup was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupOutcome>,
    pub mode: RunMode,
    pub report: Report,
}

/// Fill a template with data and write the result.
///
/// Nothing is written if the template is missing, the data cannot be read,
/// or the template is not a presentation. Problems with individual items
/// or shapes are reported in the summary instead of failing the run.
///
/// # Example
///
/// ```no_run
/// use slidefill::{fill_presentation, FillOptions};
///
/// let summary = fill_presentation(&FillOptions::new("deck.pptx", "data.json"))?;
/// println!("{}", summary.report);
/// # Ok::<(), slidefill::Error>(())
/// ```
pub fn fill_presentation(options: &FillOptions) -> Result<FillSummary> {
    if !options.template.exists() {
        return Err(Error::MissingInput(options.template.clone()));
    }

    let items = data::load_data(&options.data)?.into_items();

    let backup = if options.backup {
        Some(backup::create_backup(&options.template)?)
    } else {
        None
    };

    let mut presentation = Presentation::open(&options.template)?;
    let (mode, report) = fill::apply_items(&mut presentation, &items);
    presentation.save(&options.output)?;

    Ok(FillSummary {
        output: options.output.clone(),
        backup,
        mode,
        report,
    })
}
