//! The zip container of a `.docx` file.

use crate::error::{Error, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Package-relative path of the package relationships part.
pub(crate) const PACKAGE_RELS: &str = "_rels/.rels";
/// Conventional path of the main document part.
pub(crate) const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

const OFFICE_DOCUMENT_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// All parts of a package, in archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

impl Package {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every part of a zip archive.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            parts.push(Part {
                name: file.name().to_string(),
                data,
            });
        }

        log::debug!("Read package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Write every part into a new zip archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// A part decoded as UTF-8 text (byte order mark removed).
    pub fn part_str(&self, name: &str) -> Result<Option<String>> {
        let Some(data) = self.part(name) else {
            return Ok(None);
        };
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::Xml(format!("{}: {}", name, e)))?;
        Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
    }

    /// Replace a part's bytes, appending the part if it does not exist.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Check if a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Part names in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Locate the main document part through the package relationships,
    /// falling back to `word/document.xml`.
    pub fn main_document_part(&self) -> Result<String> {
        let Some(rels) = self.part_str(PACKAGE_RELS)? else {
            return Ok(DEFAULT_DOCUMENT_PART.to_string());
        };
        let root = super::xml::parse(&rels)?;
        let target = root
            .elements()
            .filter(|e| e.name == "Relationship")
            .find(|e| e.attr("Type") == Some(OFFICE_DOCUMENT_REL))
            .and_then(|e| e.attr("Target"))
            .map(|t| t.trim_start_matches('/').to_string());
        Ok(target.unwrap_or_else(|| DEFAULT_DOCUMENT_PART.to_string()))
    }
}
