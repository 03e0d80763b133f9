//! Shapes of a slide's shape tree.

use super::text_body;
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;

/// Kind of a shape-tree element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// `p:sp`, the only kind carrying a text frame
    AutoShape,
    /// `p:pic`
    Picture,
    /// `p:grpSp`
    Group,
    /// `p:graphicFrame` (tables, charts, SmartArt)
    GraphicFrame,
    /// `p:cxnSp`
    Connector,
    /// Anything else, e.g. `p:contentPart`
    Other,
}

impl ShapeKind {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"sp" => ShapeKind::AutoShape,
            b"pic" => ShapeKind::Picture,
            b"grpSp" => ShapeKind::Group,
            b"graphicFrame" => ShapeKind::GraphicFrame,
            b"cxnSp" => ShapeKind::Connector,
            _ => ShapeKind::Other,
        }
    }
}

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

/// Placeholder reference (`p:ph`) of a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Placeholder type, e.g. `title` or `body`
    pub kind: Option<String>,
    /// Placeholder index; `0` when the attribute is absent
    pub idx: u32,
}

/// A direct child of a slide's shape tree.
///
/// The element's markup is kept verbatim; the accessors expose what the
/// filling pipeline needs from it.
#[derive(Debug, Clone)]
pub struct Shape {
    xml: String,
    kind: ShapeKind,
    id: Option<u32>,
    name: Option<String>,
    text: Option<String>,
    frame: Option<Frame>,
    placeholder: Option<Placeholder>,
}

impl Shape {
    /// Parse a shape from the markup of a single shape-tree element.
    pub fn from_xml(xml: impl Into<String>) -> Result<Self> {
        let xml = xml.into();
        let mut reader = quick_xml::Reader::from_str(&xml);

        let mut kind = ShapeKind::Other;
        let mut id = None;
        let mut name = None;
        let mut placeholder = None;
        let mut text: Option<String> = None;

        let mut depth = 0usize;
        // Depth of the first xfrm, while it is open.
        let mut xfrm_depth: Option<usize> = None;
        let mut offset: Option<(i64, i64)> = None;
        let mut extent: Option<(i64, i64)> = None;
        let mut xfrm_done = false;
        let mut frame = None;
        let mut root_seen = false;
        let mut in_body = false;
        let mut paragraphs = 0usize;
        let mut in_run_text = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    depth += 1;
                    let local = e.name().local_name();
                    let local = local.as_ref();
                    if depth == 1 {
                        kind = ShapeKind::from_local_name(local);
                        root_seen = true;
                        continue;
                    }
                    match local {
                        b"cNvPr" if depth == 3 && id.is_none() => {
                            (id, name) = non_visual_props(&e);
                        }
                        b"ph" if depth == 4 && placeholder.is_none() => {
                            placeholder = Some(placeholder_ref(&e));
                        }
                        // Only the first xfrm describes the shape itself.
                        b"xfrm" if !xfrm_done && !in_body && (depth == 2 || depth == 3) => {
                            xfrm_depth = Some(depth);
                        }
                        b"off" | b"ext" if xfrm_depth == Some(depth - 1) => {
                            read_point(&e, local, &mut offset, &mut extent);
                        }
                        b"txBody" if depth == 2 && kind == ShapeKind::AutoShape => {
                            in_body = true;
                            text = Some(String::new());
                        }
                        b"p" if in_body => {
                            if let Some(text) = text.as_mut() {
                                if paragraphs > 0 {
                                    text.push('\n');
                                }
                            }
                            paragraphs += 1;
                        }
                        b"t" if in_body => in_run_text = true,
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    let local = e.name().local_name();
                    let local = local.as_ref();
                    let depth = depth + 1;
                    if depth == 1 {
                        kind = ShapeKind::from_local_name(local);
                        root_seen = true;
                        continue;
                    }
                    match local {
                        b"cNvPr" if depth == 3 && id.is_none() => {
                            (id, name) = non_visual_props(&e);
                        }
                        b"ph" if depth == 4 && placeholder.is_none() => {
                            placeholder = Some(placeholder_ref(&e));
                        }
                        b"xfrm" if !xfrm_done && !in_body && (depth == 2 || depth == 3) => {
                            xfrm_done = true;
                        }
                        b"off" | b"ext" if xfrm_depth == Some(depth - 1) => {
                            read_point(&e, local, &mut offset, &mut extent);
                        }
                        b"txBody" if depth == 2 && kind == ShapeKind::AutoShape => {
                            text = Some(String::new());
                        }
                        b"p" if in_body => {
                            if let Some(text) = text.as_mut() {
                                if paragraphs > 0 {
                                    text.push('\n');
                                }
                            }
                            paragraphs += 1;
                        }
                        b"br" if in_body => {
                            if let Some(text) = text.as_mut() {
                                text.push(text_body::LINE_BREAK);
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(e) if in_run_text => {
                    if let Some(text) = text.as_mut() {
                        let value = e.unescape().map_err(|e| Error::XmlParse(e.to_string()))?;
                        text.push_str(&value);
                    }
                }
                Event::End(e) => {
                    let local = e.name().local_name();
                    match local.as_ref() {
                        b"xfrm" if xfrm_depth == Some(depth) => {
                            xfrm_depth = None;
                            xfrm_done = true;
                            if let (Some((left, top)), Some((width, height))) = (offset, extent) {
                                frame = Some(Frame {
                                    left,
                                    top,
                                    width,
                                    height,
                                });
                            }
                        }
                        b"txBody" if depth == 2 => in_body = false,
                        b"t" => in_run_text = false,
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !root_seen || depth != 0 {
            return Err(Error::XmlParse("incomplete shape element".to_string()));
        }

        Ok(Self {
            xml,
            kind,
            id,
            name,
            text,
            frame,
            placeholder,
        })
    }

    /// The shape's markup.
    pub fn xml(&self) -> &str {
        &self.xml
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The `id` attribute of the shape's `cNvPr`.
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether the shape carries a text frame.
    pub fn has_text_frame(&self) -> bool {
        self.text.is_some()
    }

    /// Text of the shape: paragraphs joined by `\n`, line breaks as `\u{b}`.
    ///
    /// `None` for shapes without a text frame.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Explicit position and size, if the shape declares one.
    pub fn frame(&self) -> Option<Frame> {
        self.frame
    }

    pub fn placeholder(&self) -> Option<&Placeholder> {
        self.placeholder.as_ref()
    }

    /// A copy of this shape with its text replaced.
    ///
    /// The shape itself is left untouched, so a failure cannot leave it
    /// half-written.
    pub fn with_text(&self, text: &str) -> Result<Shape> {
        if !self.has_text_frame() {
            return Err(Error::NoTextFrame);
        }
        let xml = text_body::rewrite_text(&self.xml, text)?;
        Shape::from_xml(xml)
    }
}

fn non_visual_props(e: &BytesStart) -> (Option<u32>, Option<String>) {
    let mut id = None;
    let mut name = None;
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"id" => id = String::from_utf8_lossy(&attr.value).parse::<u32>().ok(),
            b"name" => {
                name = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .ok()
                    .filter(|v| !v.is_empty())
            }
            _ => {}
        }
    }
    (id, name)
}

fn placeholder_ref(e: &BytesStart) -> Placeholder {
    let mut placeholder = Placeholder { kind: None, idx: 0 };
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"type" => placeholder.kind = Some(String::from_utf8_lossy(&attr.value).to_string()),
            b"idx" => {
                placeholder.idx = String::from_utf8_lossy(&attr.value).parse().unwrap_or(0);
            }
            _ => {}
        }
    }
    placeholder
}

fn read_point(
    e: &BytesStart,
    local: &[u8],
    offset: &mut Option<(i64, i64)>,
    extent: &mut Option<(i64, i64)>,
) {
    let (first, second): (&[u8], &[u8]) = if local == b"off" {
        (b"x", b"y")
    } else {
        (b"cx", b"cy")
    };
    let mut a = None;
    let mut b = None;
    for attr in e.attributes().flatten() {
        let key = attr.key.local_name();
        let value = String::from_utf8_lossy(&attr.value).parse::<i64>().ok();
        if key.as_ref() == first {
            a = value;
        } else if key.as_ref() == second {
            b = value;
        }
    }
    if let (Some(a), Some(b)) = (a, b) {
        if local == b"off" {
            *offset = Some((a, b));
        } else {
            *extent = Some((a, b));
        }
    }
}
