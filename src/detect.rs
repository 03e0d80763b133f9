//! Presentation package detection.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Content type for the main part of a regular presentation.
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Content type for the main part of a presentation template.
const POTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml";

/// Content type for the main part of a slide show.
const PPSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml";

/// Content type for the main part of a macro-enabled presentation.
const PPTM_CONTENT_TYPE: &str = "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";

/// Detected presentation package flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationKind {
    /// Regular presentation (.pptx)
    Presentation,
    /// Presentation template (.potx)
    Template,
    /// Slide show (.ppsx)
    Slideshow,
    /// Macro-enabled presentation (.pptm)
    MacroEnabled,
}

impl PresentationKind {
    /// Returns the file extension for this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            PresentationKind::Presentation => "pptx",
            PresentationKind::Template => "potx",
            PresentationKind::Slideshow => "ppsx",
            PresentationKind::MacroEnabled => "pptm",
        }
    }

    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PresentationKind::Presentation => "PowerPoint Presentation",
            PresentationKind::Template => "PowerPoint Template",
            PresentationKind::Slideshow => "PowerPoint Slide Show",
            PresentationKind::MacroEnabled => "PowerPoint Macro-Enabled Presentation",
        }
    }
}

impl std::fmt::Display for PresentationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

/// Detect which kind of presentation a package holds.
///
/// Inspects `[Content_Types].xml`, falling back to the presence of
/// `ppt/presentation.xml` for packages with unusual content types.
pub fn detect_presentation_kind(container: &OoxmlContainer) -> Result<PresentationKind> {
    let content_types = container
        .read_xml("[Content_Types].xml")
        .map_err(|_| Error::MissingComponent("[Content_Types].xml".to_string()))?;

    if content_types.contains(PPTX_CONTENT_TYPE) {
        Ok(PresentationKind::Presentation)
    } else if content_types.contains(POTX_CONTENT_TYPE) {
        Ok(PresentationKind::Template)
    } else if content_types.contains(PPSX_CONTENT_TYPE) {
        Ok(PresentationKind::Slideshow)
    } else if content_types.contains(PPTM_CONTENT_TYPE) {
        Ok(PresentationKind::MacroEnabled)
    } else if container.exists("ppt/presentation.xml") {
        Ok(PresentationKind::Presentation)
    } else {
        Err(Error::UnknownFormat)
    }
}
