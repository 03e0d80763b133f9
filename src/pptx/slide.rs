//! Slide parts and their shape trees.

use super::shape::Shape;
use crate::error::{Error, Result};
use quick_xml::events::Event;

/// A piece of a shape tree: either a shape or markup passed through as-is.
#[derive(Debug, Clone)]
enum Node {
    Markup(String),
    Shape(Shape),
}

/// A slide (or layout) part with its shape tree split into shapes.
///
/// Serializing an unmodified slide reproduces its XML byte for byte.
#[derive(Debug, Clone)]
pub struct Slide {
    part_name: String,
    index: usize,
    layout_part: Option<String>,
    /// Everything up to and including the `p:spTree` start tag
    head: String,
    nodes: Vec<Node>,
    /// Everything from the `p:spTree` end tag on
    tail: String,
    dirty: bool,
}

impl Slide {
    /// Parse a slide from its part name and XML.
    pub fn from_xml(part_name: impl Into<String>, xml: &str) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut depth = 0usize;
        let mut tree_depth: Option<usize> = None;
        let mut content_start = None;
        let mut content_end = None;
        // (start, end) byte ranges of the shape tree's child elements
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut open_child: Option<usize> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    depth += 1;
                    let after = reader.buffer_position() as usize;
                    match tree_depth {
                        None if e.name().local_name().as_ref() == b"spTree" => {
                            tree_depth = Some(depth);
                            content_start = Some(after);
                        }
                        // Attribute values cannot hold a raw '<', so the last one opens this tag.
                        Some(td) if depth == td + 1 && is_shape_element(&e) => {
                            open_child = xml[..after].rfind('<')
                        }
                        _ => {}
                    }
                }
                Event::End(_) => {
                    let after = reader.buffer_position() as usize;
                    match tree_depth {
                        Some(td) if depth == td => {
                            content_end = xml[..after].rfind("</");
                            break;
                        }
                        Some(td) if depth == td + 1 => {
                            if let Some(start) = open_child.take() {
                                spans.push((start, after));
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let part_name = part_name.into();
        let (start, end) = match (content_start, content_end) {
            (Some(start), Some(end)) => (start, end),
            (None, _) => {
                // No shape tree: keep the part verbatim with no shapes.
                return Ok(Self {
                    part_name,
                    index: 0,
                    layout_part: None,
                    head: xml.to_string(),
                    nodes: Vec::new(),
                    tail: String::new(),
                    dirty: false,
                });
            }
            (Some(_), None) => {
                return Err(Error::XmlParse(format!("unterminated shape tree in {part_name}")));
            }
        };

        let mut nodes = Vec::new();
        let mut cursor = start;
        for (span_start, span_end) in spans {
            if span_start > cursor {
                nodes.push(Node::Markup(xml[cursor..span_start].to_string()));
            }
            let fragment = &xml[span_start..span_end];
            nodes.push(Node::Shape(Shape::from_xml(fragment)?));
            cursor = span_end;
        }
        if end > cursor {
            nodes.push(Node::Markup(xml[cursor..end].to_string()));
        }

        Ok(Self {
            part_name,
            index: 0,
            layout_part: None,
            head: xml[..start].to_string(),
            nodes,
            tail: xml[end..].to_string(),
            dirty: false,
        })
    }

    /// Place the slide in its presentation.
    pub(crate) fn attach(mut self, index: usize, layout_part: Option<String>) -> Self {
        self.index = index;
        self.layout_part = layout_part;
        self
    }

    /// Zero-based position of the slide in the presentation.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Package path of the slide, e.g. `ppt/slides/slide1.xml`.
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    /// Package path of the slide's layout, if it has one.
    pub fn layout_part(&self) -> Option<&str> {
        self.layout_part.as_deref()
    }

    /// Shapes in document order.
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Shape(shape) => Some(shape),
            Node::Markup(_) => None,
        })
    }

    pub fn shape_count(&self) -> usize {
        self.shapes().count()
    }

    /// The shape at `index`, counting shapes only.
    pub fn shape(&self, index: usize) -> Option<&Shape> {
        self.shapes().nth(index)
    }

    /// Swap the shape at `index` for `shape`, returning the old one.
    pub fn replace_shape(&mut self, index: usize, shape: Shape) -> Option<Shape> {
        let slot = self
            .nodes
            .iter_mut()
            .filter_map(|node| match node {
                Node::Shape(existing) => Some(existing),
                Node::Markup(_) => None,
            })
            .nth(index)?;
        self.dirty = true;
        Some(std::mem::replace(slot, shape))
    }

    /// Replace the text of the shape at `index`.
    ///
    /// On failure the shape keeps its previous content.
    pub fn set_shape_text(&mut self, index: usize, text: &str) -> Result<()> {
        let updated = self
            .shape(index)
            .ok_or(Error::ShapeNotFound {
                slide: self.index,
                shape: index,
            })?
            .with_text(text)?;
        self.replace_shape(index, updated);
        Ok(())
    }

    /// Highest `cNvPr` id anywhere in the slide, including group members.
    pub fn max_shape_id(&self) -> u32 {
        let xml = self.to_xml();
        let mut reader = quick_xml::Reader::from_str(&xml);
        let mut max = 0;
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.name().local_name().as_ref() == b"cNvPr" =>
                {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"id" {
                            if let Ok(id) = String::from_utf8_lossy(&attr.value).parse::<u32>() {
                                max = max.max(id);
                            }
                        }
                    }
                }
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
        }
        max
    }

    /// Whether any shape was changed since the slide was parsed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Serialize the slide back to XML.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(self.head.len() + self.tail.len() + 1024);
        xml.push_str(&self.head);
        for node in &self.nodes {
            match node {
                Node::Markup(markup) => xml.push_str(markup),
                Node::Shape(shape) => xml.push_str(shape.xml()),
            }
        }
        xml.push_str(&self.tail);
        xml
    }
}

/// Shape-tree children that are not shapes: the tree's own properties.
fn is_shape_element(e: &quick_xml::events::BytesStart) -> bool {
    !matches!(
        e.name().local_name().as_ref(),
        b"nvGrpSpPr" | b"grpSpPr" | b"extLst"
    )
}
