//! Picture shapes and embeddable image types.

use super::shape::{Frame, Shape};
use crate::error::{Error, Result};
use std::path::Path;

/// Relationship type of an embedded image.
pub const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Image file types a presentation can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Emf,
    Wmf,
}

impl ImageFormat {
    /// Determine the image format from a file path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" | "jpe" => Ok(ImageFormat::Jpeg),
            "gif" => Ok(ImageFormat::Gif),
            "bmp" => Ok(ImageFormat::Bmp),
            "tif" | "tiff" => Ok(ImageFormat::Tiff),
            "emf" => Ok(ImageFormat::Emf),
            "wmf" => Ok(ImageFormat::Wmf),
            _ => Err(Error::UnsupportedImage(path.display().to_string())),
        }
    }

    /// Extension used for the media part.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Emf => "emf",
            ImageFormat::Wmf => "wmf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Emf => "image/x-emf",
            ImageFormat::Wmf => "image/x-wmf",
        }
    }
}

/// Build a `p:pic` element showing the image behind `rel_id` in `frame`.
pub(crate) fn picture_shape(
    id: u32,
    description: &str,
    rel_id: &str,
    frame: Frame,
) -> Result<Shape> {
    let xml = format!(
        concat!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {number}" descr="{descr}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
        ),
        id = id,
        number = id.saturating_sub(1),
        descr = quick_xml::escape::escape(description),
        rel_id = rel_id,
        x = frame.left,
        y = frame.top,
        cx = frame.width,
        cy = frame.height,
    );
    Shape::from_xml(xml)
}

/// Insert a `Relationship` element into a .rels part.
pub(crate) fn add_relationship(
    rels_xml: &str,
    id: &str,
    rel_type: &str,
    target: &str,
) -> Result<String> {
    let entry = format!(
        r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
        id,
        rel_type,
        quick_xml::escape::escape(target)
    );
    insert_before_closing(rels_xml, "</Relationships>", &entry)
}

/// Ensure `[Content_Types].xml` has a `Default` entry for `format`.
///
/// Returns `None` when the entry already exists.
pub(crate) fn add_default_content_type(
    types_xml: &str,
    format: ImageFormat,
) -> Result<Option<String>> {
    let mut reader = quick_xml::Reader::from_str(types_xml);
    loop {
        match reader.read_event()? {
            quick_xml::events::Event::Empty(e) | quick_xml::events::Event::Start(e)
                if e.name().local_name().as_ref() == b"Default" =>
            {
                let registered = e.attributes().flatten().any(|attr| {
                    attr.key.as_ref() == b"Extension"
                        && String::from_utf8_lossy(&attr.value)
                            .eq_ignore_ascii_case(format.extension())
                });
                if registered {
                    return Ok(None);
                }
            }
            quick_xml::events::Event::Eof => break,
            _ => {}
        }
    }

    let entry = format!(
        r#"<Default Extension="{}" ContentType="{}"/>"#,
        format.extension(),
        format.content_type()
    );
    insert_before_closing(types_xml, "</Types>", &entry).map(Some)
}

fn insert_before_closing(xml: &str, closing: &str, entry: &str) -> Result<String> {
    let at = xml
        .rfind(closing)
        .ok_or_else(|| Error::InvalidData(format!("missing {closing}")))?;
    let mut out = String::with_capacity(xml.len() + entry.len());
    out.push_str(&xml[..at]);
    out.push_str(entry);
    out.push_str(&xml[at..]);
    Ok(out)
}

/// An empty relationships part.
pub(crate) const EMPTY_RELATIONSHIPS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#
);
