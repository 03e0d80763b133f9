//! Synthetic presentation packages for unit tests.

use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A minimal PNG signature; the bytes are embedded, never decoded.
pub(crate) const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

const NAMESPACES: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// Frame of the layout placeholder with `idx="1"`.
pub(crate) const LAYOUT_BODY_FRAME: (i64, i64, i64, i64) = (1000, 2000, 3000, 4000);

/// Builds a PPTX package in memory.
pub(crate) struct PresentationBuilder {
    slides: Vec<String>,
    media: Vec<String>,
}

impl PresentationBuilder {
    pub(crate) fn new() -> Self {
        Self {
            slides: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Add a slide with one text box per entry.
    pub(crate) fn slide(self, texts: &[&str]) -> Self {
        let shapes: String = texts
            .iter()
            .enumerate()
            .map(|(i, text)| text_box(i as u32 + 2, text))
            .collect();
        self.slide_xml(&shapes)
    }

    /// Add a slide whose shape tree holds the given children.
    pub(crate) fn slide_xml(mut self, shapes: &str) -> Self {
        self.slides.push(shapes.to_string());
        self
    }

    /// Add an existing media part under `ppt/media/`.
    pub(crate) fn media(mut self, name: &str) -> Self {
        self.media.push(name.to_string());
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        let mut overrides = String::new();
        for i in 1..=self.slides.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            ));
        }
        put(
            &mut zip,
            options,
            "[Content_Types].xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>{overrides}</Types>"#
            ),
        );

        put(
            &mut zip,
            options,
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#,
        );

        let mut slide_ids = String::new();
        let mut slide_rels = String::new();
        for i in 0..self.slides.len() {
            slide_ids.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + i,
                i + 2
            ));
            slide_rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
                i + 2,
                i + 1
            ));
        }
        put(
            &mut zip,
            options,
            "ppt/presentation.xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {NAMESPACES}><p:sldIdLst>{slide_ids}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
            ),
        );
        put(
            &mut zip,
            options,
            "ppt/_rels/presentation.xml.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>{slide_rels}</Relationships>"#
            ),
        );

        let (x, y, cx, cy) = LAYOUT_BODY_FRAME;
        put(
            &mut zip,
            options,
            "ppt/slideLayouts/slideLayout1.xml",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout {NAMESPACES}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm></p:spPr></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Content 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm></p:spPr></p:sp></p:spTree></p:cSld></p:sldLayout>"#
            ),
        );

        for (i, shapes) in self.slides.iter().enumerate() {
            put(
                &mut zip,
                options,
                &format!("ppt/slides/slide{}.xml", i + 1),
                &slide_document(shapes),
            );
            put(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#,
            );
        }

        for name in &self.media {
            zip.start_file(format!("ppt/media/{name}"), options).unwrap();
            zip.write_all(PNG_BYTES).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }
}

fn put(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    name: &str,
    content: &str,
) {
    zip.start_file(name, options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();
}

/// Wrap shape-tree children into a complete slide part.
pub(crate) fn slide_document(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld {NAMESPACES}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

/// A text box with an explicit frame; `\n` separates paragraphs.
pub(crate) fn text_box(id: u32, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="TextBox {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="100"/><a:ext cx="500" cy="250"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        x = id * 100,
        paragraphs = paragraphs(text)
    )
}

/// A placeholder without its own frame, inheriting from the layout.
pub(crate) fn placeholder(id: u32, idx: u32, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Content Placeholder {id}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph idx="{idx}"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        paragraphs = paragraphs(text)
    )
}

/// A shape with no text frame.
pub(crate) fn connector(id: u32) -> String {
    format!(
        r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Connector {id}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr></p:cxnSp>"#
    )
}

fn paragraphs(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            format!(
                r#"<a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="2400" b="1"/><a:t>{}</a:t></a:r></a:p>"#,
                quick_xml::escape::escape(line)
            )
        })
        .collect()
}
