//! Style sheet (`word/styles.xml`).

use super::run::{font_of, set_font_name, set_size};
use super::units::FontSize;
use super::xml::{self, XmlElement, XmlNode};
use crate::error::Result;

/// Child order of `w:style`.
const STYLE_ORDER: &[&str] = &[
    "w:name",
    "w:aliases",
    "w:basedOn",
    "w:next",
    "w:link",
    "w:autoRedefine",
    "w:hidden",
    "w:uiPriority",
    "w:semiHidden",
    "w:unhideWhenUsed",
    "w:qFormat",
    "w:locked",
    "w:personal",
    "w:personalCompose",
    "w:personalReply",
    "w:rsid",
    "w:pPr",
    "w:rPr",
    "w:tblPr",
    "w:trPr",
    "w:tcPr",
    "w:tblStylePr",
];

const STYLES_ORDER: &[&str] = &["w:docDefaults", "w:latentStyles", "w:style"];

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Paragraph, character and table styles of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    root: XmlElement,
}

impl StyleSheet {
    /// Parse a styles part.
    pub fn parse(xml_text: &str) -> Result<Self> {
        Ok(Self {
            root: xml::parse(xml_text)?,
        })
    }

    /// Built-in sheet for new documents: Normal, Heading 1-4, Title,
    /// List Paragraph and Caption.
    pub fn builtin() -> Self {
        let mut sheet = Self {
            root: XmlElement::new("w:styles").with_attr("xmlns:w", WORDML_NS),
        };
        sheet.root.children.push(XmlNode::Element(
            XmlElement::new("w:docDefaults")
                .with_child(XmlElement::new("w:rPrDefault").with_child(
                    XmlElement::new("w:rPr")
                        .with_child(
                            XmlElement::new("w:rFonts")
                                .with_attr("w:ascii", "Calibri")
                                .with_attr("w:hAnsi", "Calibri")
                                .with_attr("w:cs", "Calibri")
                                .with_attr("w:eastAsia", "Calibri"),
                        )
                        .with_child(XmlElement::new("w:sz").with_attr("w:val", "22"))
                        .with_child(XmlElement::new("w:szCs").with_attr("w:val", "22")),
                ))
                .with_child(XmlElement::new("w:pPrDefault")),
        ));

        sheet.push_paragraph_style("Normal", "Normal", true);
        for level in 1..=4 {
            let id = format!("Heading{}", level);
            let style = sheet.push_paragraph_style(&id, &format!("heading {}", level), false);
            style.children.push(XmlNode::Element(
                XmlElement::new("w:pPr").with_child(
                    XmlElement::new("w:outlineLvl").with_attr("w:val", (level - 1).to_string()),
                ),
            ));
        }
        sheet.push_paragraph_style("Title", "Title", false);
        sheet.push_paragraph_style("ListParagraph", "List Paragraph", false);
        sheet.push_paragraph_style("Caption", "caption", false);
        sheet
    }

    /// Serialize the sheet.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        xml::to_bytes(&self.root)
    }

    /// UI name for a style id, e.g. `Heading1` -> `Heading 1`.
    pub fn style_name(&self, style_id: &str) -> Option<String> {
        self.styles()
            .find(|s| s.attr("w:styleId") == Some(style_id))
            .and_then(|s| s.child("w:name"))
            .and_then(|n| n.attr("w:val"))
            .map(ui_name)
    }

    /// Style id for a UI or internal style name.
    pub fn style_id(&self, name: &str) -> Option<String> {
        self.styles()
            .find(|s| {
                s.child("w:name")
                    .and_then(|n| n.attr("w:val"))
                    .is_some_and(|raw| raw == name || ui_name(raw) == name)
            })
            .and_then(|s| s.attr("w:styleId"))
            .map(str::to_string)
    }

    /// Id of the default paragraph style.
    pub fn default_paragraph_style_id(&self) -> Option<&str> {
        self.styles()
            .find(|s| {
                s.attr("w:type") == Some("paragraph")
                    && matches!(s.attr("w:default"), Some("1" | "true" | "on"))
            })
            .and_then(|s| s.attr("w:styleId"))
    }

    /// Resolve the style name a paragraph displays with. Missing or unknown
    /// ids fall back to the default paragraph style, then to `Normal`.
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> String {
        style_id
            .and_then(|id| self.style_name(id))
            .or_else(|| {
                self.default_paragraph_style_id()
                    .and_then(|id| self.style_name(id))
            })
            .unwrap_or_else(|| "Normal".to_string())
    }

    /// Add a paragraph style with the given name unless one exists, and
    /// return its id.
    pub fn ensure_paragraph_style(&mut self, name: &str) -> String {
        if let Some(id) = self.style_id(name) {
            return id;
        }
        let id: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        let style = self.push_paragraph_style(&id, name, false);
        style.children.push(XmlNode::Element(
            XmlElement::new("w:basedOn").with_attr("w:val", "Normal"),
        ));
        id
    }

    /// Set the document default font and the default paragraph style font.
    pub fn set_default_font(&mut self, name: &str, size: FontSize) {
        let defaults = self
            .root
            .ensure_child("w:docDefaults", STYLES_ORDER)
            .ensure_child("w:rPrDefault", &["w:rPrDefault", "w:pPrDefault"])
            .ensure_child("w:rPr", &[]);
        set_font_name(defaults, name);
        set_size(defaults, size);

        let id = self
            .default_paragraph_style_id()
            .map(str::to_string)
            .unwrap_or_else(|| {
                self.push_paragraph_style("Normal", "Normal", true);
                "Normal".to_string()
            });
        if let Some(style) = self
            .root
            .elements_mut()
            .find(|s| s.name == "w:style" && s.attr("w:styleId") == Some(id.as_str()))
        {
            let rpr = style.ensure_child("w:rPr", STYLE_ORDER);
            set_font_name(rpr, name);
            set_size(rpr, size);
        }
    }

    /// Font name and size of the default paragraph style.
    pub fn default_font(&self) -> (Option<String>, Option<FontSize>) {
        let rpr = self
            .default_paragraph_style_id()
            .and_then(|id| self.styles().find(|s| s.attr("w:styleId") == Some(id)))
            .and_then(|s| s.child("w:rPr"));
        font_of(rpr)
    }

    fn styles(&self) -> impl Iterator<Item = &XmlElement> {
        self.root.elements().filter(|e| e.name == "w:style")
    }

    fn push_paragraph_style(&mut self, id: &str, name: &str, default: bool) -> &mut XmlElement {
        let mut style = XmlElement::new("w:style").with_attr("w:type", "paragraph");
        if default {
            style = style.with_attr("w:default", "1");
        }
        let style = style
            .with_attr("w:styleId", id)
            .with_child(XmlElement::new("w:name").with_attr("w:val", name))
            .with_child(XmlElement::new("w:qFormat"));
        self.root.children.push(XmlNode::Element(style));
        let last = self.root.children.len() - 1;
        match &mut self.root.children[last] {
            XmlNode::Element(e) => e,
            _ => unreachable!("styles are pushed as elements"),
        }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Map the lower-case names Word stores for built-in styles to their UI names.
fn ui_name(raw: &str) -> String {
    if let Some(level) = raw.strip_prefix("heading ") {
        if level.parse::<u8>().is_ok() {
            return format!("Heading {}", level);
        }
    }
    match raw {
        "normal" => "Normal",
        "title" => "Title",
        "subtitle" => "Subtitle",
        "caption" => "Caption",
        "header" => "Header",
        "footer" => "Footer",
        "list paragraph" => "List Paragraph",
        "list bullet" => "List Bullet",
        "list number" => "List Number",
        other => other,
    }
    .to_string()
}
