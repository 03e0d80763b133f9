//! Whole-shape text replacement inside a `p:txBody`.

use crate::error::{Error, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Character standing in for an `a:br` line break in shape text.
pub const LINE_BREAK: char = '\u{b}';

/// Formatting borrowed from the paragraphs being replaced.
#[derive(Default)]
struct Template {
    /// Namespace prefix of the DrawingML paragraphs, usually `a`
    prefix: Option<String>,
    /// First paragraph's `a:pPr` subtree
    paragraph_props: Vec<Event<'static>>,
    /// First run's `a:rPr` subtree
    run_props: Vec<Event<'static>>,
    /// First `a:endParaRPr`, renamed to `a:rPr`
    end_props: Vec<Event<'static>>,
}

#[derive(Clone, Copy)]
enum Slot {
    ParagraphProps,
    RunProps,
    EndProps,
}

impl Template {
    fn slot_mut(&mut self, slot: Slot) -> &mut Vec<Event<'static>> {
        match slot {
            Slot::ParagraphProps => &mut self.paragraph_props,
            Slot::RunProps => &mut self.run_props,
            Slot::EndProps => &mut self.end_props,
        }
    }

    /// Which slot, if any, an element at `rel_depth` below the txBody fills.
    fn wants(&self, local: &[u8], rel_depth: usize, first_paragraph: bool) -> Option<Slot> {
        match local {
            b"pPr" if rel_depth == 2 && first_paragraph && self.paragraph_props.is_empty() => {
                Some(Slot::ParagraphProps)
            }
            b"rPr" if rel_depth == 3 && self.run_props.is_empty() => Some(Slot::RunProps),
            b"endParaRPr" if rel_depth == 2 && self.end_props.is_empty() => Some(Slot::EndProps),
            _ => None,
        }
    }

    fn qualified(&self, local: &str) -> String {
        format!("{}:{}", self.prefix.as_deref().unwrap_or("a"), local)
    }

    fn run_props(&self) -> &[Event<'static>] {
        if self.run_props.is_empty() {
            &self.end_props
        } else {
            &self.run_props
        }
    }
}

/// Replace the paragraphs of a shape's text body with `text`.
///
/// `a:bodyPr` and `a:lstStyle` are kept. Each `\n` in `text` starts a new
/// paragraph and each [`LINE_BREAK`] becomes an `a:br`. New paragraphs and
/// runs reuse the first original paragraph and run properties.
pub fn rewrite_text(shape_xml: &str, text: &str) -> Result<String> {
    if let Some(c) = text.chars().find(|&c| !is_writable(c)) {
        return Err(Error::InvalidData(format!(
            "character U+{:04X} is not allowed in shape text",
            c as u32
        )));
    }

    let mut reader = Reader::from_str(shape_xml);
    let mut writer = Writer::new(Vec::new());
    let mut template = Template::default();

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut in_paragraph = false;
    let mut paragraphs = 0usize;
    let mut capture: Option<(Slot, usize)> = None;
    let mut rewritten = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Eof => break,
            Event::Start(e) => {
                depth += 1;
                let local = e.name().local_name();
                if let Some(bd) = body_depth {
                    if let Some((slot, _)) = capture {
                        template.slot_mut(slot).push(event.clone().into_owned());
                        continue;
                    }
                    if depth == bd + 1 && local.as_ref() == b"p" {
                        in_paragraph = true;
                        paragraphs += 1;
                        if template.prefix.is_none() {
                            template.prefix = prefix_of(e);
                        }
                        continue;
                    }
                    if in_paragraph {
                        if let Some(slot) =
                            template.wants(local.as_ref(), depth - bd, paragraphs == 1)
                        {
                            capture = Some((slot, depth));
                            let owned = captured_root(&template, slot, e);
                            template.slot_mut(slot).push(Event::Start(owned));
                        }
                        continue;
                    }
                } else if depth == 2 && !rewritten && local.as_ref() == b"txBody" {
                    body_depth = Some(depth);
                }
                writer.write_event(event.borrow())?;
            }
            Event::Empty(e) => {
                let local = e.name().local_name();
                let child_depth = depth + 1;
                if let Some(bd) = body_depth {
                    if let Some((slot, _)) = capture {
                        template.slot_mut(slot).push(event.clone().into_owned());
                        continue;
                    }
                    if child_depth == bd + 1 && local.as_ref() == b"p" {
                        paragraphs += 1;
                        if template.prefix.is_none() {
                            template.prefix = prefix_of(e);
                        }
                        continue;
                    }
                    if in_paragraph {
                        if let Some(slot) =
                            template.wants(local.as_ref(), child_depth - bd, paragraphs == 1)
                        {
                            let owned = captured_root(&template, slot, e);
                            template.slot_mut(slot).push(Event::Empty(owned));
                        }
                        continue;
                    }
                } else if child_depth == 2 && !rewritten && local.as_ref() == b"txBody" {
                    // An empty text body gains the mandatory bodyPr and the new paragraphs.
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    writer.write_event(Event::Start(e.borrow()))?;
                    let body_props = BytesStart::new(template.qualified("bodyPr"));
                    writer.write_event(Event::Empty(body_props))?;
                    write_paragraphs(&mut writer, &template, text)?;
                    writer.write_event(Event::End(BytesEnd::new(name)))?;
                    rewritten = true;
                    continue;
                }
                writer.write_event(event.borrow())?;
            }
            Event::End(_) => {
                let current = depth;
                depth = depth.saturating_sub(1);
                if let Some(bd) = body_depth {
                    if let Some((slot, capture_depth)) = capture {
                        if current == capture_depth {
                            capture = None;
                            let owned = match slot {
                                Slot::EndProps => {
                                    Event::End(BytesEnd::new(template.qualified("rPr")))
                                }
                                _ => event.clone().into_owned(),
                            };
                            template.slot_mut(slot).push(owned);
                        } else {
                            template.slot_mut(slot).push(event.clone().into_owned());
                        }
                        continue;
                    }
                    if current == bd + 1 && in_paragraph {
                        in_paragraph = false;
                        continue;
                    }
                    if in_paragraph {
                        continue;
                    }
                    if current == bd {
                        write_paragraphs(&mut writer, &template, text)?;
                        body_depth = None;
                        rewritten = true;
                    }
                }
                writer.write_event(event.borrow())?;
            }
            _ => {
                if let Some((slot, _)) = capture {
                    template.slot_mut(slot).push(event.clone().into_owned());
                } else if !in_paragraph {
                    writer.write_event(event.borrow())?;
                }
            }
        }
    }

    if !rewritten {
        return Err(Error::NoTextFrame);
    }

    String::from_utf8(writer.into_inner()).map_err(|e| Error::InvalidData(e.to_string()))
}

/// Characters XML 1.0 can carry, plus [`LINE_BREAK`] which becomes `a:br`.
fn is_writable(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | LINE_BREAK)
        || (c >= '\u{20}' && c != '\u{fffe}' && c != '\u{ffff}')
}

fn prefix_of(e: &BytesStart) -> Option<String> {
    let name = e.name();
    name.prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
}

/// The root element of a captured subtree; `endParaRPr` becomes `rPr`.
fn captured_root(template: &Template, slot: Slot, e: &BytesStart) -> BytesStart<'static> {
    match slot {
        Slot::EndProps => {
            let mut renamed = BytesStart::new(template.qualified("rPr"));
            renamed.extend_attributes(e.attributes().flatten());
            renamed.into_owned()
        }
        _ => e.clone().into_owned(),
    }
}

fn write_paragraphs(writer: &mut Writer<Vec<u8>>, template: &Template, text: &str) -> Result<()> {
    let p = template.qualified("p");
    let r = template.qualified("r");
    let t = template.qualified("t");
    let br = template.qualified("br");

    for line in text.split('\n') {
        writer.write_event(Event::Start(BytesStart::new(p.as_str())))?;
        for event in &template.paragraph_props {
            writer.write_event(event.borrow())?;
        }
        for (i, segment) in line.split(LINE_BREAK).enumerate() {
            if i > 0 {
                writer.write_event(Event::Empty(BytesStart::new(br.as_str())))?;
            }
            if segment.is_empty() {
                continue;
            }
            writer.write_event(Event::Start(BytesStart::new(r.as_str())))?;
            for event in template.run_props() {
                writer.write_event(event.borrow())?;
            }
            writer.write_event(Event::Start(BytesStart::new(t.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(segment)))?;
            writer.write_event(Event::End(BytesEnd::new(t.as_str())))?;
            writer.write_event(Event::End(BytesEnd::new(r.as_str())))?;
        }
        writer.write_event(Event::End(BytesEnd::new(p.as_str())))?;
    }
    Ok(())
}
