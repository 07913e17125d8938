//! Inline runs.

use super::units::FontSize;
use super::xml::{is_on, XmlElement, XmlNode, RPR_ORDER};
use serde::{Deserialize, Serialize};

/// Snapshot of a run's visible text and directly applied font properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunFormat {
    /// Visible text of the run
    pub text: String,
    /// Font name (ASCII slot of `w:rFonts`)
    pub font_name: Option<String>,
    /// Font size
    pub size: Option<FontSize>,
    /// Bold toggle, if set on the run
    pub bold: Option<bool>,
    /// Whether the run contains a page break
    pub has_page_break: bool,
}

/// Mutable view of a `w:r` element.
#[derive(Debug)]
pub struct Run<'a> {
    element: &'a mut XmlElement,
}

impl<'a> Run<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    /// Visible text of the run.
    pub fn text(&self) -> String {
        run_text(self.element)
    }

    /// Snapshot of the run's formatting.
    pub fn format(&self) -> RunFormat {
        run_format(self.element)
    }

    /// Set the font for Latin, Cyrillic, complex-script and East Asian text.
    ///
    /// Theme font references are dropped since they take precedence over
    /// explicit names.
    pub fn set_font_name(&mut self, name: &str) {
        set_font_name(self.properties_mut(), name);
    }

    /// Set the font size for regular and complex-script text.
    pub fn set_size(&mut self, size: FontSize) {
        set_size(self.properties_mut(), size);
    }

    /// Set or clear bold for regular and complex-script text.
    pub fn set_bold(&mut self, bold: bool) {
        let rpr = self.properties_mut();
        for name in ["w:b", "w:bCs"] {
            let toggle = rpr.ensure_child(name, RPR_ORDER);
            if bold {
                toggle.remove_attr("w:val");
            } else {
                toggle.set_attr("w:val", "0");
            }
        }
    }

    /// Append a page break to the run.
    pub fn add_page_break(&mut self) {
        self.element
            .children
            .push(XmlNode::Element(page_break_element()));
    }

    fn properties_mut(&mut self) -> &mut XmlElement {
        self.element.ensure_leading_child("w:rPr")
    }
}

/// Write font names into a `w:rPr`.
pub(crate) fn set_font_name(rpr: &mut XmlElement, name: &str) {
    let fonts = rpr.ensure_child("w:rFonts", RPR_ORDER);
    for key in ["w:ascii", "w:hAnsi", "w:cs", "w:eastAsia"] {
        fonts.set_attr(key, name);
    }
    for key in [
        "w:asciiTheme",
        "w:hAnsiTheme",
        "w:cstheme",
        "w:eastAsiaTheme",
    ] {
        fonts.remove_attr(key);
    }
}

/// Write a font size into a `w:rPr`.
pub(crate) fn set_size(rpr: &mut XmlElement, size: FontSize) {
    let value = size.half_points().to_string();
    rpr.ensure_child("w:sz", RPR_ORDER)
        .set_attr("w:val", value.as_str());
    rpr.ensure_child("w:szCs", RPR_ORDER).set_attr("w:val", value);
}

/// Font name and size from a `w:rPr`.
pub(crate) fn font_of(rpr: Option<&XmlElement>) -> (Option<String>, Option<FontSize>) {
    let name = rpr
        .and_then(|p| p.child("w:rFonts"))
        .and_then(|f| f.attr("w:ascii").or_else(|| f.attr("w:hAnsi")))
        .map(str::to_string);
    let size = rpr
        .and_then(|p| p.child("w:sz"))
        .and_then(|s| s.attr("w:val"))
        .and_then(|v| v.parse::<u32>().ok())
        .map(FontSize::from_half_points);
    (name, size)
}

/// Build a new `w:r` holding `text`. Tabs and newlines become `w:tab` and `w:br`.
pub(crate) fn new_run_element(text: &str) -> XmlElement {
    let mut run = XmlElement::new("w:r");
    let mut pending = String::new();

    let flush = |run: &mut XmlElement, pending: &mut String| {
        if !pending.is_empty() {
            let t = XmlElement::new("w:t")
                .with_attr("xml:space", "preserve")
                .with_text(std::mem::take(pending));
            run.children.push(XmlNode::Element(t));
        }
    };

    for ch in text.chars() {
        match ch {
            '\t' => {
                flush(&mut run, &mut pending);
                run.children
                    .push(XmlNode::Element(XmlElement::new("w:tab")));
            }
            '\n' => {
                flush(&mut run, &mut pending);
                run.children.push(XmlNode::Element(XmlElement::new("w:br")));
            }
            _ => pending.push(ch),
        }
    }
    flush(&mut run, &mut pending);
    run
}

pub(crate) fn page_break_element() -> XmlElement {
    XmlElement::new("w:br").with_attr("w:type", "page")
}

pub(crate) fn is_page_break(element: &XmlElement) -> bool {
    element.name == "w:br" && element.attr("w:type") == Some("page")
}

pub(crate) fn run_text(run: &XmlElement) -> String {
    let mut text = String::new();
    for child in run.elements() {
        match child.name.as_str() {
            "w:t" => text.push_str(&child.text()),
            "w:tab" | "w:ptab" => text.push('\t'),
            "w:br" if !is_page_break(child) => text.push('\n'),
            "w:cr" => text.push('\n'),
            "w:noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

pub(crate) fn run_format(run: &XmlElement) -> RunFormat {
    let rpr = run.child("w:rPr");
    let (font_name, size) = font_of(rpr);
    let bold = rpr
        .and_then(|p| p.child("w:b"))
        .map(|b| is_on(b.attr("w:val")));

    RunFormat {
        text: run_text(run),
        font_name,
        size,
        bold,
        has_page_break: run.elements().any(is_page_break),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_element_splits_tabs() {
        let run = new_run_element("a\tb\nc");
        let names: Vec<&str> = run.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:t", "w:tab", "w:t", "w:br", "w:t"]);
        assert_eq!(run_text(&run), "a\tb\nc");
    }

    #[test]
    fn test_set_font_properties() {
        let mut element = new_run_element("Текст");
        let mut run = Run::new(&mut element);
        run.set_font_name("Times New Roman");
        run.set_size(FontSize::try_from_pt("size", 14.0).unwrap());
        run.set_bold(true);

        let format = run.format();
        assert_eq!(format.text, "Текст");
        assert_eq!(format.font_name.as_deref(), Some("Times New Roman"));
        assert_eq!(format.size.map(FontSize::to_pt), Some(14.0));
        assert_eq!(format.bold, Some(true));

        let rpr = element.children[0].as_element().unwrap();
        let names: Vec<&str> = rpr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:rFonts", "w:b", "w:bCs", "w:sz", "w:szCs"]);
    }

    #[test]
    fn test_set_font_drops_theme() {
        let mut element = XmlElement::new("w:r").with_child(
            XmlElement::new("w:rPr").with_child(
                XmlElement::new("w:rFonts").with_attr("w:asciiTheme", "minorHAnsi"),
            ),
        );
        Run::new(&mut element).set_font_name("Arial");
        let fonts = element
            .child("w:rPr")
            .and_then(|p| p.child("w:rFonts"))
            .unwrap();
        assert_eq!(fonts.attr("w:asciiTheme"), None);
        assert_eq!(fonts.attr("w:hAnsi"), Some("Arial"));
    }

    #[test]
    fn test_page_break_not_in_text() {
        let mut element = new_run_element("Глава");
        Run::new(&mut element).add_page_break();
        let format = run_format(&element);
        assert!(format.has_page_break);
        assert_eq!(format.text, "Глава");
    }

    #[test]
    fn test_unset_bold() {
        let mut element = new_run_element("x");
        let mut run = Run::new(&mut element);
        run.set_bold(false);
        assert_eq!(run.format().bold, Some(false));
    }
}
