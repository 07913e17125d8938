//! Paragraph access and paragraph-level formatting.

use super::run::{
    is_page_break, new_run_element, page_break_element, run_format, run_text, Run, RunFormat,
};
use super::units::Length;
use super::xml::{is_on, XmlElement, XmlNode, PPR_ORDER};
use serde::{Deserialize, Serialize};

/// Elements that wrap runs without being runs themselves.
const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:ins",
    "w:smartTag",
    "w:fldSimple",
    "w:customXml",
    "w:sdt",
    "w:sdtContent",
];

/// Inline content removed by [`Paragraph::clear_runs`]. Bookmarks and
/// comment ranges stay.
const CLEARABLE: &[&str] = &[
    "w:r",
    "w:hyperlink",
    "w:ins",
    "w:del",
    "w:smartTag",
    "w:fldSimple",
    "w:customXml",
    "w:sdt",
    "w:proofErr",
];

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned (default)
    #[default]
    Left,
    /// Center aligned
    Center,
    /// Right aligned
    Right,
    /// Justified
    Justify,
}

impl Alignment {
    /// Value of `w:jc/@w:val`.
    pub fn as_jc(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }

    /// Parse a `w:jc/@w:val` value.
    pub fn from_jc(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Directly applied paragraph indentation.
///
/// A negative `first_line` is a hanging indent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Indentation {
    /// First-line indent
    pub first_line: Option<Length>,
    /// Left indent
    pub left: Option<Length>,
    /// Right indent
    pub right: Option<Length>,
}

/// Directly applied paragraph spacing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spacing {
    /// Space before the paragraph
    pub before: Option<Length>,
    /// Space after the paragraph
    pub after: Option<Length>,
    /// Line spacing as a multiple of single spacing
    pub line: Option<f64>,
}

/// A `w:p` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    element: XmlElement,
}

impl Paragraph {
    /// Create an empty paragraph.
    pub fn new() -> Self {
        Self {
            element: XmlElement::new("w:p"),
        }
    }

    /// Create a paragraph holding a single run of text.
    pub fn with_text(text: &str) -> Self {
        let mut p = Self::new();
        if !text.is_empty() {
            p.add_run(text);
        }
        p
    }

    pub(crate) fn from_element(element: XmlElement) -> Self {
        Self { element }
    }

    pub(crate) fn into_element(self) -> XmlElement {
        self.element
    }

    /// The underlying element.
    pub fn element(&self) -> &XmlElement {
        &self.element
    }

    /// Visible text, including runs inside hyperlinks and insertions.
    pub fn text(&self) -> String {
        let mut runs = Vec::new();
        collect_runs(&self.element, &mut runs);
        runs.into_iter().map(run_text).collect()
    }

    /// Check if the paragraph has no visible text.
    pub fn is_empty(&self) -> bool {
        self.text().trim().is_empty()
    }

    // ====== Style ======

    /// Style id from `w:pStyle`, if any.
    pub fn style_id(&self) -> Option<&str> {
        self.properties()
            .and_then(|p| p.child("w:pStyle"))
            .and_then(|s| s.attr("w:val"))
    }

    /// Set the paragraph style id.
    pub fn set_style_id(&mut self, style_id: &str) {
        self.properties_mut()
            .ensure_child("w:pStyle", PPR_ORDER)
            .set_attr("w:val", style_id);
    }

    // ====== Layout ======

    /// Directly applied alignment.
    pub fn alignment(&self) -> Option<Alignment> {
        self.properties()
            .and_then(|p| p.child("w:jc"))
            .and_then(|jc| jc.attr("w:val"))
            .and_then(Alignment::from_jc)
    }

    /// Set alignment.
    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.properties_mut()
            .ensure_child("w:jc", PPR_ORDER)
            .set_attr("w:val", alignment.as_jc());
    }

    /// Directly applied indentation.
    pub fn indentation(&self) -> Indentation {
        let Some(ind) = self.properties().and_then(|p| p.child("w:ind")) else {
            return Indentation::default();
        };
        let twips = |key: &str| {
            ind.attr(key)
                .and_then(|v| v.parse::<i64>().ok())
                .map(Length::twips)
        };
        let first_line = match (twips("w:hanging"), twips("w:firstLine")) {
            (Some(hanging), _) if hanging != Length::ZERO => {
                Some(Length::emu(-hanging.as_emu()))
            }
            (_, Some(first)) => Some(first),
            (hanging, None) => hanging,
        };
        Indentation {
            first_line,
            left: twips("w:left").or_else(|| twips("w:start")),
            right: twips("w:right").or_else(|| twips("w:end")),
        }
    }

    /// Set the first-line indent; a negative value becomes a hanging indent.
    pub fn set_first_line_indent(&mut self, indent: Length) {
        let ind = self.indent_element();
        ind.remove_attr("w:firstLineChars");
        ind.remove_attr("w:hangingChars");
        if indent.is_negative() {
            ind.remove_attr("w:firstLine");
            ind.set_attr("w:hanging", indent.abs().to_twips().to_string());
        } else {
            ind.remove_attr("w:hanging");
            ind.set_attr("w:firstLine", indent.to_twips().to_string());
        }
    }

    /// Set the left indent.
    pub fn set_left_indent(&mut self, indent: Length) {
        let ind = self.indent_element();
        ind.remove_attr("w:start");
        ind.remove_attr("w:leftChars");
        ind.remove_attr("w:startChars");
        ind.set_attr("w:left", indent.to_twips().to_string());
    }

    /// Set the right indent.
    pub fn set_right_indent(&mut self, indent: Length) {
        let ind = self.indent_element();
        ind.remove_attr("w:end");
        ind.remove_attr("w:rightChars");
        ind.remove_attr("w:endChars");
        ind.set_attr("w:right", indent.to_twips().to_string());
    }

    /// Directly applied spacing.
    pub fn spacing(&self) -> Spacing {
        let Some(spacing) = self.properties().and_then(|p| p.child("w:spacing")) else {
            return Spacing::default();
        };
        let twips = |key: &str| {
            spacing
                .attr(key)
                .and_then(|v| v.parse::<i64>().ok())
                .map(Length::twips)
        };
        let line = match spacing.attr("w:lineRule") {
            None | Some("auto") => spacing
                .attr("w:line")
                .and_then(|v| v.parse::<f64>().ok())
                .map(|line| line / 240.0),
            Some(_) => None,
        };
        Spacing {
            before: twips("w:before"),
            after: twips("w:after"),
            line,
        }
    }

    /// Set space before the paragraph.
    pub fn set_space_before(&mut self, space: Length) {
        let spacing = self.spacing_element();
        spacing.remove_attr("w:beforeLines");
        spacing.remove_attr("w:beforeAutospacing");
        spacing.set_attr("w:before", space.to_twips().to_string());
    }

    /// Set space after the paragraph.
    pub fn set_space_after(&mut self, space: Length) {
        let spacing = self.spacing_element();
        spacing.remove_attr("w:afterLines");
        spacing.remove_attr("w:afterAutospacing");
        spacing.set_attr("w:after", space.to_twips().to_string());
    }

    /// Set line spacing as a multiple of single spacing.
    pub fn set_line_spacing(&mut self, multiple: f64) {
        let spacing = self.spacing_element();
        spacing.set_attr("w:line", ((multiple * 240.0).round() as i64).to_string());
        spacing.set_attr("w:lineRule", "auto");
    }

    /// The page-break-before flag, if set on the paragraph.
    pub fn page_break_before(&self) -> Option<bool> {
        self.properties()
            .and_then(|p| p.child("w:pageBreakBefore"))
            .map(|e| is_on(e.attr("w:val")))
    }

    /// Set the page-break-before flag. `false` is written explicitly so it
    /// overrides a style that enables it.
    pub fn set_page_break_before(&mut self, on: bool) {
        let flag = self
            .properties_mut()
            .ensure_child("w:pageBreakBefore", PPR_ORDER);
        if on {
            flag.remove_attr("w:val");
        } else {
            flag.set_attr("w:val", "0");
        }
    }

    // ====== Content ======

    /// Check if the paragraph holds an embedded drawing or picture.
    pub fn has_image(&self) -> bool {
        ["w:drawing", "w:pict", "w:object"]
            .iter()
            .any(|name| self.element.has_descendant(name))
    }

    /// Check if the paragraph holds an Office Math zone.
    pub fn has_math(&self) -> bool {
        self.element.has_descendant("m:oMath") || self.element.has_descendant("m:oMathPara")
    }

    /// Snapshots of every run, in order.
    pub fn runs(&self) -> Vec<RunFormat> {
        let mut runs = Vec::new();
        collect_runs(&self.element, &mut runs);
        runs.into_iter().map(run_format).collect()
    }

    /// Mutable views of every run, in order.
    pub fn runs_mut(&mut self) -> Vec<Run<'_>> {
        let mut runs = Vec::new();
        collect_runs_mut(&mut self.element, &mut runs);
        runs.into_iter().map(Run::new).collect()
    }

    /// Number of runs.
    pub fn run_count(&self) -> usize {
        let mut runs = Vec::new();
        collect_runs(&self.element, &mut runs);
        runs.len()
    }

    /// Append a run of text and return a view of it.
    pub fn add_run(&mut self, text: &str) -> Run<'_> {
        self.element
            .children
            .push(XmlNode::Element(new_run_element(text)));
        let last = self.element.children.len() - 1;
        Run::new(element_mut(&mut self.element.children[last]))
    }

    /// Add an empty run when the paragraph has none, so run-level
    /// properties have somewhere to live.
    pub fn ensure_run(&mut self) {
        if self.run_count() == 0 {
            self.add_run("");
        }
    }

    /// Remove all runs and run containers. Paragraph properties, bookmarks
    /// and comment ranges stay.
    pub fn clear_runs(&mut self) {
        self.element.children.retain(|node| match node {
            XmlNode::Element(e) => !CLEARABLE.contains(&e.name.as_str()),
            _ => true,
        });
    }

    /// Replace the visible text with a single run that keeps the first
    /// run's properties.
    pub fn replace_text(&mut self, text: &str) {
        let template = {
            let mut runs = Vec::new();
            collect_runs(&self.element, &mut runs);
            runs.first().and_then(|r| r.child("w:rPr")).cloned()
        };
        self.clear_runs();
        let mut run = new_run_element(text);
        if let Some(rpr) = template {
            run.children.insert(0, XmlNode::Element(rpr));
        }
        self.element.children.push(XmlNode::Element(run));
    }

    /// Check if the first run starts with a page break.
    pub fn has_leading_page_break(&self) -> bool {
        let mut runs = Vec::new();
        collect_runs(&self.element, &mut runs);
        runs.first()
            .and_then(|r| r.elements().find(|e| e.name != "w:rPr"))
            .is_some_and(is_page_break)
    }

    /// Put a page break at the start of the first run.
    ///
    /// The run's content is taken out, the break goes in, and the content
    /// is put back after it.
    pub fn insert_page_break_run(&mut self) {
        self.ensure_run();
        let mut runs = Vec::new();
        collect_runs_mut(&mut self.element, &mut runs);
        let Some(first) = runs.into_iter().next() else {
            return;
        };

        let (props, content): (Vec<XmlNode>, Vec<XmlNode>) = std::mem::take(&mut first.children)
            .into_iter()
            .partition(|node| node.is_element("w:rPr"));
        first.children = props;
        first.children.push(XmlNode::Element(page_break_element()));
        first.children.extend(content);
    }

    pub(crate) fn section_properties_mut(&mut self) -> Option<&mut XmlElement> {
        self.element
            .child_mut("w:pPr")
            .and_then(|p| p.child_mut("w:sectPr"))
    }

    pub(crate) fn section_properties(&self) -> Option<&XmlElement> {
        self.properties().and_then(|p| p.child("w:sectPr"))
    }

    fn properties(&self) -> Option<&XmlElement> {
        self.element.child("w:pPr")
    }

    fn properties_mut(&mut self) -> &mut XmlElement {
        self.element.ensure_leading_child("w:pPr")
    }

    fn indent_element(&mut self) -> &mut XmlElement {
        self.properties_mut().ensure_child("w:ind", PPR_ORDER)
    }

    fn spacing_element(&mut self) -> &mut XmlElement {
        self.properties_mut().ensure_child("w:spacing", PPR_ORDER)
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

fn element_mut(node: &mut XmlNode) -> &mut XmlElement {
    match node {
        XmlNode::Element(e) => e,
        _ => unreachable!("runs are pushed as elements"),
    }
}

fn collect_runs<'a>(element: &'a XmlElement, out: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        if child.name == "w:r" {
            out.push(child);
        } else if RUN_CONTAINERS.contains(&child.name.as_str()) {
            collect_runs(child, out);
        }
    }
}

fn collect_runs_mut<'a>(element: &'a mut XmlElement, out: &mut Vec<&'a mut XmlElement>) {
    for child in element.elements_mut() {
        if child.name == "w:r" {
            out.push(child);
        } else if RUN_CONTAINERS.contains(&child.name.as_str()) {
            collect_runs_mut(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::xml;

    fn parse_paragraph(xml_text: &str) -> Paragraph {
        Paragraph::from_element(xml::parse(xml_text).unwrap())
    }

    #[test]
    fn test_text_through_hyperlink() {
        let p = parse_paragraph(
            r#"<w:p><w:r><w:t>Иванов </w:t></w:r><w:hyperlink r:id="rId5"><w:r><w:t>И.И.</w:t></w:r></w:hyperlink><w:del><w:r><w:delText>x</w:delText></w:r></w:del></w:p>"#,
        );
        assert_eq!(p.text(), "Иванов И.И.");
        assert_eq!(p.run_count(), 2);
    }

    #[test]
    fn test_alignment() {
        let mut p = Paragraph::with_text("Текст");
        assert_eq!(p.alignment(), None);
        p.set_alignment(Alignment::Justify);
        assert_eq!(p.alignment(), Some(Alignment::Justify));
        assert!(p.element().children[0].is_element("w:pPr"));
    }

    #[test]
    fn test_indentation() {
        let mut p = Paragraph::with_text("Текст");
        p.set_first_line_indent(Length::cm(1.25));
        p.set_left_indent(Length::ZERO);
        p.set_right_indent(Length::ZERO);

        let ind = p.indentation();
        assert_eq!(ind.first_line.map(Length::to_twips), Some(709));
        assert_eq!(ind.left, Some(Length::ZERO));
        assert_eq!(ind.right, Some(Length::ZERO));

        p.set_first_line_indent(Length::cm(-1.0));
        assert!(p.indentation().first_line.unwrap().is_negative());
    }

    #[test]
    fn test_indentation_reads_start_end() {
        let p = parse_paragraph(
            r#"<w:p><w:pPr><w:ind w:start="567" w:end="284" w:hanging="360"/></w:pPr></w:p>"#,
        );
        let ind = p.indentation();
        assert_eq!(ind.left.map(Length::to_twips), Some(567));
        assert_eq!(ind.right.map(Length::to_twips), Some(284));
        assert_eq!(ind.first_line.map(Length::to_twips), Some(-360));
    }

    #[test]
    fn test_spacing() {
        let mut p = Paragraph::with_text("Текст");
        p.set_space_before(Length::pt(12.0));
        p.set_space_after(Length::ZERO);
        p.set_line_spacing(1.5);

        let spacing = p.spacing();
        assert_eq!(spacing.before.map(Length::to_twips), Some(240));
        assert_eq!(spacing.after, Some(Length::ZERO));
        assert_eq!(spacing.line, Some(1.5));
    }

    #[test]
    fn test_exact_line_spacing_not_a_multiple() {
        let p = parse_paragraph(
            r#"<w:p><w:pPr><w:spacing w:line="280" w:lineRule="exact"/></w:pPr></w:p>"#,
        );
        assert_eq!(p.spacing().line, None);
    }

    #[test]
    fn test_page_break_before() {
        let mut p = Paragraph::with_text("ГЛАВА 2");
        assert_eq!(p.page_break_before(), None);
        p.set_page_break_before(true);
        assert_eq!(p.page_break_before(), Some(true));
        p.set_page_break_before(false);
        assert_eq!(p.page_break_before(), Some(false));
    }

    #[test]
    fn test_pprops_keep_schema_order() {
        let mut p = Paragraph::with_text("x");
        p.set_alignment(Alignment::Center);
        p.set_first_line_indent(Length::ZERO);
        p.set_space_after(Length::ZERO);
        p.set_page_break_before(true);
        p.set_style_id("Heading1");

        let ppr = p.element().child("w:pPr").unwrap();
        let names: Vec<&str> = ppr.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["w:pStyle", "w:pageBreakBefore", "w:spacing", "w:ind", "w:jc"]
        );
    }

    #[test]
    fn test_has_image_and_math() {
        let p = parse_paragraph(r#"<w:p><w:r><w:drawing><wp:inline/></w:drawing></w:r></w:p>"#);
        assert!(p.has_image());
        assert!(!p.has_math());

        let p = parse_paragraph(r#"<w:p><m:oMath><m:r><m:t>x</m:t></m:r></m:oMath></w:p>"#);
        assert!(p.has_math());
    }

    #[test]
    fn test_replace_text_collapses_runs() {
        let mut p = parse_paragraph(
            r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:bookmarkStart w:id="0" w:name="_Toc1"/><w:r><w:rPr><w:color w:val="FF0000"/></w:rPr><w:t>Вве</w:t></w:r><w:r><w:t>дение</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
        );
        p.replace_text("ВВЕДЕНИЕ");

        assert_eq!(p.text(), "ВВЕДЕНИЕ");
        assert_eq!(p.run_count(), 1);
        assert!(p.element().child("w:bookmarkStart").is_some());
        assert_eq!(p.alignment(), Some(Alignment::Center));
        let run = p.element().child("w:r").unwrap();
        assert!(run.child("w:rPr").and_then(|r| r.child("w:color")).is_some());
    }

    #[test]
    fn test_insert_page_break_run_keeps_text() {
        let mut p = parse_paragraph(
            r#"<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>ГЛАВА 2</w:t></w:r></w:p>"#,
        );
        assert!(!p.has_leading_page_break());
        p.insert_page_break_run();

        assert!(p.has_leading_page_break());
        assert_eq!(p.text(), "ГЛАВА 2");
        let run = p.element().child("w:r").unwrap();
        let names: Vec<&str> = run.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["w:rPr", "w:br", "w:t"]);
    }

    #[test]
    fn test_insert_page_break_into_empty_paragraph() {
        let mut p = Paragraph::new();
        p.insert_page_break_run();
        assert!(p.has_leading_page_break());
    }

    #[test]
    fn test_ensure_run() {
        let mut p = Paragraph::new();
        p.ensure_run();
        p.ensure_run();
        assert_eq!(p.run_count(), 1);
    }
}
