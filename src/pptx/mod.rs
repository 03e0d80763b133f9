//! PPTX (PowerPoint) presentation editing.
//!
//! This module opens Office Open XML presentations (.pptx, .potx, .ppsx,
//! .pptm), exposes their slides and shapes, and writes them back after
//! text or picture replacement. Untouched parts are copied verbatim.

mod picture;
mod presentation;
mod shape;
mod slide;
mod text_body;

pub use picture::{ImageFormat, IMAGE_RELATIONSHIP};
pub use presentation::Presentation;
pub use shape::{Frame, Placeholder, Shape, ShapeKind};
pub use slide::Slide;
pub use text_body::{rewrite_text, LINE_BREAK};
