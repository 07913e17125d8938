//! Document-level types.

use super::package::{Package, DEFAULT_DOCUMENT_PART, PACKAGE_RELS};
use super::paragraph::Paragraph;
use super::section::{default_section, read_margins, PageMargins, Section};
use super::styles::StyleSheet;
use super::table::Table;
use super::xml::{self, XmlElement, XmlNode};
use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use std::path::Path;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELATIONSHIPS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// A top-level content block of the body or of a table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// Any other markup (section properties, bookmarks, content controls)
    Other(XmlNode),
}

impl Block {
    pub(crate) fn from_node(node: XmlNode) -> Self {
        match node {
            XmlNode::Element(e) if e.name == "w:p" => Block::Paragraph(Paragraph::from_element(e)),
            XmlNode::Element(e) if e.name == "w:tbl" => Block::Table(Table::from_element(e)),
            other => Block::Other(other),
        }
    }

    pub(crate) fn into_node(self) -> XmlNode {
        match self {
            Block::Paragraph(p) => XmlNode::Element(p.into_element()),
            Block::Table(t) => XmlNode::Element(t.into_element()),
            Block::Other(node) => node,
        }
    }
}

/// A WordprocessingML document loaded into memory.
///
/// The body is held as an ordered block sequence. Everything else in the
/// package is kept as raw bytes and written back unchanged.
#[derive(Debug, Clone)]
pub struct Document {
    package: Package,
    document_part: String,
    styles_part: Option<String>,
    root: XmlElement,
    blocks: Vec<Block>,
    styles: StyleSheet,
}

impl Document {
    /// Create a blank A4 document with the built-in styles.
    pub fn new() -> Self {
        let mut package = Package::new();
        package.set_part("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
        package.set_part(PACKAGE_RELS, PACKAGE_RELATIONSHIPS.as_bytes().to_vec());
        package.set_part(
            "word/_rels/document.xml.rels",
            DOCUMENT_RELATIONSHIPS.as_bytes().to_vec(),
        );

        let root = XmlElement::new("w:document")
            .with_attr(
                "xmlns:w",
                "http://schemas.openxmlformats.org/wordprocessingml/2006/main",
            )
            .with_attr(
                "xmlns:r",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
            )
            .with_attr(
                "xmlns:m",
                "http://schemas.openxmlformats.org/officeDocument/2006/math",
            )
            .with_child(XmlElement::new("w:body"));

        Self {
            package,
            document_part: DEFAULT_DOCUMENT_PART.to_string(),
            styles_part: Some("word/styles.xml".to_string()),
            root,
            blocks: vec![Block::Other(XmlNode::Element(default_section()))],
            styles: StyleSheet::builtin(),
        }
    }

    /// Open a `.docx` file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vkrfmt::Document;
    ///
    /// let doc = Document::open("thesis.docx").unwrap();
    /// println!("Paragraphs: {}", doc.paragraphs().count());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a document from `.docx` bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        detect_format_from_bytes(data)?;
        let package = Package::from_bytes(data)?;

        let document_part = package.main_document_part()?;
        let xml_text = package
            .part_str(&document_part)?
            .ok_or_else(|| Error::MissingPart(document_part.clone()))?;
        let mut root = xml::parse(&xml_text)?;
        let body = root
            .child_mut("w:body")
            .ok_or_else(|| Error::MissingPart(format!("{}: w:body", document_part)))?;
        let blocks = std::mem::take(&mut body.children)
            .into_iter()
            .map(Block::from_node)
            .collect::<Vec<_>>();

        let styles_name = sibling_part(&document_part, "styles.xml");
        let (styles, styles_part) = match package.part_str(&styles_name)? {
            Some(text) => (StyleSheet::parse(&text)?, Some(styles_name)),
            None => {
                log::warn!("No styles part; using built-in styles");
                (StyleSheet::builtin(), None)
            }
        };

        log::debug!(
            "Loaded {} with {} body blocks",
            document_part,
            blocks.len()
        );

        Ok(Self {
            package,
            document_part,
            styles_part,
            root,
            blocks,
            styles,
        })
    }

    /// Write the document to a `.docx` file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Serialize the document to `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut root = self.root.clone();
        if let Some(body) = root.child_mut("w:body") {
            body.children = self.blocks.iter().cloned().map(Block::into_node).collect();
        }

        let mut package = self.package.clone();
        package.set_part(&self.document_part, xml::to_bytes(&root)?);
        if let Some(styles_part) = &self.styles_part {
            package.set_part(styles_part, self.styles.to_bytes()?);
        }
        package.to_bytes()
    }

    // ====== Blocks ======

    /// Body blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Body paragraphs in document order (paragraphs inside tables excluded).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Body paragraphs in document order, mutably.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Body tables in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Body tables in document order, mutably.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Append a paragraph of plain text.
    pub fn add_paragraph(&mut self, text: &str) -> &mut Paragraph {
        let at = self.insert_block(Block::Paragraph(Paragraph::with_text(text)));
        match &mut self.blocks[at] {
            Block::Paragraph(p) => p,
            _ => unreachable!("a paragraph was inserted at {at}"),
        }
    }

    /// Append a paragraph with the named style, adding the style to the
    /// sheet if the document does not define it.
    pub fn add_styled_paragraph(&mut self, text: &str, style_name: &str) -> &mut Paragraph {
        let style_id = self.styles.ensure_paragraph_style(style_name);
        let paragraph = self.add_paragraph(text);
        paragraph.set_style_id(&style_id);
        paragraph
    }

    /// Append a `rows` x `cols` table.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        let at = self.insert_block(Block::Table(Table::new(rows, cols)));
        match &mut self.blocks[at] {
            Block::Table(t) => t,
            _ => unreachable!("a table was inserted at {at}"),
        }
    }

    /// All body text, one line per paragraph.
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ====== Styles ======

    /// The style sheet.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// The style sheet, mutably.
    pub fn styles_mut(&mut self) -> &mut StyleSheet {
        &mut self.styles
    }

    /// UI style name of a paragraph, falling back to `Normal`.
    pub fn paragraph_style_name(&self, paragraph: &Paragraph) -> String {
        self.styles.paragraph_style_name(paragraph.style_id())
    }

    // ====== Sections ======

    /// Mutable views of every section. A body-level section is added when
    /// the document has none.
    pub fn sections_mut(&mut self) -> Vec<Section<'_>> {
        if self.page_margins().is_empty() {
            self.blocks
                .push(Block::Other(XmlNode::Element(default_section())));
        }

        let mut sections = Vec::new();
        for block in self.blocks.iter_mut() {
            match block {
                Block::Paragraph(p) => {
                    if let Some(sect) = p.section_properties_mut() {
                        sections.push(Section::new(sect));
                    }
                }
                Block::Other(XmlNode::Element(e)) if e.name == "w:sectPr" => {
                    sections.push(Section::new(e));
                }
                _ => {}
            }
        }
        sections
    }

    /// Page margins of every section, in document order.
    pub fn page_margins(&self) -> Vec<PageMargins> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => p.section_properties(),
                Block::Other(XmlNode::Element(e)) if e.name == "w:sectPr" => Some(e),
                _ => None,
            })
            .map(read_margins)
            .collect()
    }

    /// Names of all parts in the package.
    pub fn part_names(&self) -> Vec<String> {
        self.package.part_names().map(str::to_string).collect()
    }

    /// Insert before the trailing body-level section properties.
    fn insert_block(&mut self, block: Block) -> usize {
        let at = match self.blocks.last() {
            Some(Block::Other(node)) if node.is_element("w:sectPr") => self.blocks.len() - 1,
            _ => self.blocks.len(),
        };
        self.blocks.insert(at, block);
        at
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn sibling_part(part: &str, name: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, _)) => format!("{}/{}", dir, name),
        None => name.to_string(),
    }
}
