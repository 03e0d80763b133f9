//! ZIP container abstraction for OOXML packages.
//!
//! The whole package is held in memory so parts can be replaced or added
//! and the archive written back out in its original entry order.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
}

/// Collection of relationships parsed from a .rels file.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Map from relationship ID to relationship data
    pub by_id: HashMap<String, Relationship>,
    /// Map from relationship type to list of relationships
    pub by_type: HashMap<String, Vec<Relationship>>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.by_type
            .get(rel_type)
            .map(|v| v.iter().collect())
            .unwrap_or_default()
    }

    /// Add a relationship.
    pub fn add(&mut self, rel: Relationship) {
        self.by_type
            .entry(rel.rel_type.clone())
            .or_default()
            .push(rel.clone());
        self.by_id.insert(rel.id.clone(), rel);
    }

    /// The next unused `rIdN` identifier.
    pub fn next_id(&self) -> String {
        let max = self
            .by_id
            .keys()
            .filter_map(|id| id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", max + 1)
    }
}

/// Decode XML bytes, skipping a UTF-8 byte order mark.
///
/// Presentation parts are UTF-8 in practice; anything that is not valid
/// UTF-8 is rejected rather than guessed at, since the part will be
/// written back.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// One entry of the package.
#[derive(Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
}

/// OOXML container abstraction over a ZIP archive.
///
/// Provides methods to read XML files, binary data, and relationships
/// from an Office Open XML package, to replace or add parts, and to write
/// the package back to disk.
#[derive(Clone)]
pub struct OoxmlContainer {
    parts: Vec<Part>,
    index: HashMap<String, usize>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use slidefill::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("template.pptx")?;
    /// # Ok::<(), slidefill::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Create an OOXML container from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());
        let mut index = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            // Anything beyond stored/deflated is rewritten as deflated.
            let compression = match file.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            index.insert(name.clone(), parts.len());
            parts.push(Part {
                name,
                data,
                compression,
            });
        }

        Ok(Self { parts, index })
    }

    /// Read an XML file from the archive as a string.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        decode_xml_bytes(self.part(path)?)
    }

    /// Read a binary file from the archive.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.part(path)?.to_vec())
    }

    fn part(&self, path: &str) -> Result<&[u8]> {
        self.index
            .get(path)
            .map(|&i| self.parts[i].data.as_slice())
            .ok_or_else(|| Error::MissingComponent(path.to_string()))
    }

    /// Check if a file exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// List all files in the archive, in archive order.
    pub fn list_files(&self) -> Vec<String> {
        self.parts.iter().map(|p| p.name.clone()).collect()
    }

    /// List files matching a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.parts
            .iter()
            .filter(|p| p.name.starts_with(prefix))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Replace the content of a part, or append it if it does not exist.
    pub fn put_part(&mut self, path: &str, data: Vec<u8>) {
        match self.index.get(path) {
            Some(&i) => self.parts[i].data = data,
            None => {
                self.index.insert(path.to_string(), self.parts.len());
                self.parts.push(Part {
                    name: path.to_string(),
                    data,
                    compression: CompressionMethod::Deflated,
                });
            }
        }
    }

    /// Read and parse relationships for a part.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        self.parse_relationships(&Self::rels_path(part_path))
    }

    /// The .rels part that holds relationships for `part_path`.
    ///
    /// `ppt/slides/slide1.xml` maps to `ppt/slides/_rels/slide1.xml.rels`.
    pub fn rels_path(part_path: &str) -> String {
        if part_path.is_empty() || part_path == "/" {
            return "_rels/.rels".to_string();
        }
        match part_path.rfind('/') {
            Some(slash) => format!(
                "{}/_rels/{}.rels",
                &part_path[..slash],
                &part_path[slash + 1..]
            ),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Parse a relationships file.
    fn parse_relationships(&self, rels_path: &str) -> Result<Relationships> {
        let content = match self.read_xml(rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(Relationships::new()),
        };

        // Handle empty content
        if content.trim().is_empty() {
            return Ok(Relationships::new());
        }

        let mut rels = Relationships::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Type" => rel_type = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                        });
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Resolve a relative path from a base path.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_path = Path::new(base);
        let base_dir = base_path.parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }

    /// Relationship target for `target` as seen from the part `base`.
    ///
    /// This is the inverse of [`resolve_path`](Self::resolve_path).
    pub fn relative_path(base: &str, target: &str) -> String {
        let base_dirs: Vec<&str> = match base.rfind('/') {
            Some(slash) => base[..slash].split('/').collect(),
            None => Vec::new(),
        };
        let target_parts: Vec<&str> = target.split('/').collect();
        let (target_dirs, file) = target_parts.split_at(target_parts.len() - 1);

        let common = base_dirs
            .iter()
            .zip(target_dirs)
            .take_while(|(a, b)| a == b)
            .count();

        let mut segments: Vec<&str> = vec![".."; base_dirs.len() - common];
        segments.extend(&target_dirs[common..]);
        segments.extend(file);
        segments.join("/")
    }

    /// Write the package to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = self.write_to(BufWriter::new(file))?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the package into a byte vector.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Write the package as a ZIP archive, preserving entry order.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = zip::ZipWriter::new(writer);
        for part in &self.parts {
            let options = SimpleFileOptions::default().compression_method(part.compression);
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }
        Ok(zip.finish()?)
    }
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.parts.len())
            .finish()
    }
}
