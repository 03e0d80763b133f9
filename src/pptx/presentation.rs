//! The presentation handle: open, mutate, save.

use super::picture::{self, ImageFormat, IMAGE_RELATIONSHIP};
use super::shape::{Frame, Shape};
use super::slide::Slide;
use crate::container::OoxmlContainer;
use crate::detect::{detect_presentation_kind, is_zip_file, PresentationKind};
use crate::error::{Error, Result};
use std::path::Path;

const SLIDE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const LAYOUT_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// An opened presentation.
///
/// The handle owns the whole package in memory. Slides are mutated in
/// place through `&mut` access and [`save`](Presentation::save) consumes
/// the handle, so a presentation is written at most once.
#[derive(Debug)]
pub struct Presentation {
    container: OoxmlContainer,
    kind: PresentationKind,
    slides: Vec<Slide>,
}

/// Everything a picture insertion writes, computed before anything is.
struct PicturePlan {
    media_part: String,
    media: Vec<u8>,
    rels_part: String,
    rels_xml: String,
    content_types: Option<String>,
    picture: Shape,
}

impl Presentation {
    /// Open a presentation file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slidefill::pptx::Presentation;
    ///
    /// let presentation = Presentation::open("template.pptx")?;
    /// println!("{} slides", presentation.slide_count());
    /// # Ok::<(), slidefill::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Open a presentation from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if !is_zip_file(&data) {
            return Err(Error::UnknownFormat);
        }
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let kind = detect_presentation_kind(&container)?;
        let slide_parts = Self::slide_parts(&container)?;

        let mut slides = Vec::with_capacity(slide_parts.len());
        for (index, part) in slide_parts.into_iter().enumerate() {
            let xml = container.read_xml(&part)?;
            let layout = container
                .read_relationships(&part)?
                .get_by_type(LAYOUT_RELATIONSHIP)
                .first()
                .map(|rel| OoxmlContainer::resolve_path(&part, &rel.target));
            slides.push(Slide::from_xml(part, &xml)?.attach(index, layout));
        }

        tracing::debug!(slides = slides.len(), kind = %kind, "opened presentation");

        Ok(Self {
            container,
            kind,
            slides,
        })
    }

    /// Slide part names in presentation order, from `p:sldIdLst`.
    fn slide_parts(container: &OoxmlContainer) -> Result<Vec<String>> {
        let rels = container.read_relationships(PRESENTATION_PART)?;
        let xml = container.read_xml(PRESENTATION_PART)?;

        let mut parts = Vec::new();
        let mut reader = quick_xml::Reader::from_str(&xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"sldId" =>
                {
                    // The r:id attribute; the plain `id` is the slide id.
                    let rel_id = e
                        .attributes()
                        .flatten()
                        .find(|attr| {
                            attr.key.local_name().as_ref() == b"id"
                                && attr.key.prefix().is_some()
                        })
                        .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                    let Some(rel) = rel_id.as_deref().and_then(|id| rels.get(id)) else {
                        continue;
                    };
                    if rel.rel_type != SLIDE_RELATIONSHIP {
                        continue;
                    }
                    let part = OoxmlContainer::resolve_path(PRESENTATION_PART, &rel.target);
                    if !container.exists(&part) {
                        return Err(Error::MissingComponent(part));
                    }
                    parts.push(part);
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
        }

        Ok(parts)
    }

    pub fn kind(&self) -> PresentationKind {
        self.kind
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slide_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    /// Replace a shape by a picture of `image` occupying the same frame.
    ///
    /// The shape's own frame is used, or for placeholders without one the
    /// frame of the layout placeholder with the same index. All package
    /// changes are prepared first, so on error nothing has been modified.
    pub fn replace_shape_with_picture(
        &mut self,
        slide_index: usize,
        shape_index: usize,
        image: &Path,
    ) -> Result<()> {
        let plan = self.plan_picture(slide_index, shape_index, image)?;

        self.container.put_part(&plan.media_part, plan.media);
        self.container
            .put_part(&plan.rels_part, plan.rels_xml.into_bytes());
        if let Some(types) = plan.content_types {
            self.container
                .put_part(CONTENT_TYPES_PART, types.into_bytes());
        }
        if let Some(slide) = self.slides.get_mut(slide_index) {
            slide.replace_shape(shape_index, plan.picture);
        }

        tracing::debug!(
            slide = slide_index,
            shape = shape_index,
            media = %plan.media_part,
            "replaced shape with picture"
        );
        Ok(())
    }

    fn plan_picture(
        &self,
        slide_index: usize,
        shape_index: usize,
        image: &Path,
    ) -> Result<PicturePlan> {
        let not_found = || Error::ShapeNotFound {
            slide: slide_index,
            shape: shape_index,
        };
        let slide = self.slides.get(slide_index).ok_or_else(not_found)?;
        let shape = slide.shape(shape_index).ok_or_else(not_found)?;

        if !image.is_file() {
            return Err(Error::ImageNotFound(image.to_path_buf()));
        }
        let format = ImageFormat::from_path(image)?;
        let frame = self.resolve_frame(slide, shape)?;
        let media = std::fs::read(image)?;

        let media_part = self.next_media_part(format);
        let rels_part = OoxmlContainer::rels_path(slide.part_name());
        let rels = self.container.read_relationships(slide.part_name())?;
        let rel_id = rels.next_id();
        let rels_xml = match self.container.read_xml(&rels_part) {
            Ok(xml) => xml,
            Err(Error::MissingComponent(_)) => picture::EMPTY_RELATIONSHIPS.to_string(),
            Err(e) => return Err(e),
        };
        let target = OoxmlContainer::relative_path(slide.part_name(), &media_part);
        let rels_xml = picture::add_relationship(&rels_xml, &rel_id, IMAGE_RELATIONSHIP, &target)?;

        let types_xml = self.container.read_xml(CONTENT_TYPES_PART)?;
        let content_types = picture::add_default_content_type(&types_xml, format)?;

        let description = image
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let picture =
            picture::picture_shape(slide.max_shape_id() + 1, &description, &rel_id, frame)?;

        Ok(PicturePlan {
            media_part,
            media,
            rels_part,
            rels_xml,
            content_types,
            picture,
        })
    }

    /// The shape's frame, falling back to its layout placeholder's.
    fn resolve_frame(&self, slide: &Slide, shape: &Shape) -> Result<Frame> {
        if let Some(frame) = shape.frame() {
            return Ok(frame);
        }
        let (Some(placeholder), Some(layout_part)) = (shape.placeholder(), slide.layout_part())
        else {
            return Err(Error::MissingFrame);
        };

        let layout = Slide::from_xml(layout_part, &self.container.read_xml(layout_part)?)?;
        let frame = layout
            .shapes()
            .filter(|candidate| {
                candidate
                    .placeholder()
                    .is_some_and(|ph| ph.idx == placeholder.idx)
            })
            .find_map(Shape::frame)
            .ok_or(Error::MissingFrame);
        frame
    }

    /// `ppt/media/image{N}.{ext}` with N one past the highest in use.
    fn next_media_part(&self, format: ImageFormat) -> String {
        let highest = self
            .container
            .list_files_with_prefix("ppt/media/")
            .iter()
            .filter_map(|name| {
                let stem = name.strip_prefix("ppt/media/image")?;
                let digits: String = stem.chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u32>().ok()
            })
            .max()
            .unwrap_or(0);
        format!("ppt/media/image{}.{}", highest + 1, format.extension())
    }

    /// Serialize the presentation, writing back every modified slide.
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        self.flush_slides();
        self.container.to_bytes()
    }

    /// Write the presentation to `path`, consuming the handle.
    pub fn save(mut self, path: impl AsRef<Path>) -> Result<()> {
        self.flush_slides();
        self.container.save(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "saved presentation");
        Ok(())
    }

    fn flush_slides(&mut self) {
        for slide in self.slides.iter().filter(|slide| slide.is_dirty()) {
            self.container
                .put_part(slide.part_name(), slide.to_xml().into_bytes());
        }
    }
}
