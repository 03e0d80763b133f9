//! Data model shared by the loader and the substitution engine.
//!
//! Input records become [`Item`]s, each of which yields a [`TokenMap`]; the
//! outcome of a run is collected in a [`Report`].

mod item;
mod report;

pub use item::*;
pub use report::*;
