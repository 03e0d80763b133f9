//! Error types for the slidefill library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for slidefill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while filling a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input presentation does not exist.
    #[error("Input PPTX not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The data source has an extension we cannot read.
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),

    /// The data source could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The package is not a presentation.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error reading or writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing or writing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The slide or shape index does not exist.
    #[error("Shape not found: slide {slide}, shape {shape}")]
    ShapeNotFound {
        /// Zero-based slide index
        slide: usize,
        /// Zero-based shape index within the slide
        shape: usize,
    },

    /// The shape has no text frame to write into.
    #[error("Shape has no text frame")]
    NoTextFrame,

    /// The shape has no position or size, neither its own nor inherited.
    #[error("Shape has no resolvable position")]
    MissingFrame,

    /// The replacement image file does not exist.
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The replacement image has a type presentations cannot embed.
    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Parse(err.to_string())
    }
}
