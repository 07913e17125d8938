//! Per-role paragraph formatting.

use super::{apply_font, apply_indents, apply_line_spacing, apply_spacing};
use crate::classify::{ParagraphRole, SpecialSection};
use crate::error::{Error, Result};
use crate::model::{Alignment, Paragraph};
use crate::requirements::{HeadingLevel, Requirements, TextTransform};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a page break before a heading is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageBreakMode {
    /// The paragraph's page-break-before property
    #[default]
    Property,
    /// An explicit break at the start of the first run
    BreakRun,
}

impl PageBreakMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PageBreakMode::Property => "property",
            PageBreakMode::BreakRun => "break-run",
        }
    }
}

impl fmt::Display for PageBreakMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageBreakMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "property" => Ok(PageBreakMode::Property),
            "break-run" | "break_run" | "run" => Ok(PageBreakMode::BreakRun),
            other => Err(Error::invalid_value("page_break_mode", other)),
        }
    }
}

/// Applies the formatting rules of one role to a paragraph.
///
/// The formatter counts the H1 headings it has formatted so that the first
/// chapter of a document does not start with a blank page. Use one
/// formatter per document run.
#[derive(Debug)]
pub struct ParagraphFormatter<'r> {
    requirements: &'r Requirements,
    page_break_mode: PageBreakMode,
    h1_count: usize,
}

impl<'r> ParagraphFormatter<'r> {
    /// Create a formatter that writes page breaks as paragraph properties.
    pub fn new(requirements: &'r Requirements) -> Self {
        Self {
            requirements,
            page_break_mode: PageBreakMode::default(),
            h1_count: 0,
        }
    }

    /// Set how page breaks are written.
    pub fn with_page_break_mode(mut self, mode: PageBreakMode) -> Self {
        self.page_break_mode = mode;
        self
    }

    /// Number of H1 headings seen so far.
    pub fn h1_count(&self) -> usize {
        self.h1_count
    }

    /// Format a paragraph according to its role. `Skip` leaves it untouched.
    pub fn apply(&mut self, role: ParagraphRole, paragraph: &mut Paragraph) -> Result<()> {
        match role {
            ParagraphRole::Skip => Ok(()),
            ParagraphRole::Heading(HeadingLevel::H1) => {
                let preceding = self.h1_count;
                self.h1_count += 1;
                self.format_h1(paragraph, preceding)
            }
            ParagraphRole::Heading(level) => self.format_subheading(level, paragraph),
            ParagraphRole::List => self.format_list(paragraph),
            ParagraphRole::Regular => self.format_regular(paragraph),
            ParagraphRole::ReferencesHeader => self.format_references_header(paragraph),
            ParagraphRole::BibliographyEntry => self.format_bibliography_entry(paragraph),
            ParagraphRole::BibliographyContinuation => {
                self.format_bibliography_continuation(paragraph)
            }
            ParagraphRole::TableCaption => self.format_table_caption(paragraph),
            ParagraphRole::FigureCaption => self.format_figure_caption(paragraph),
            ParagraphRole::FigureImage => self.format_figure_image(paragraph),
            ParagraphRole::Formula => self.format_formula(paragraph),
            ParagraphRole::FormulaNumbering => self.format_formula_numbering(paragraph),
            ParagraphRole::FormulaExplanation => self.format_formula_explanation(paragraph),
            ParagraphRole::Special(section) => self.format_special(section, paragraph),
        }
    }

    /// Format a chapter heading. `preceding_h1s` is the number of H1
    /// headings before this one; the first gets no page break.
    ///
    /// On error the paragraph is left as it was.
    pub fn format_h1(&self, paragraph: &mut Paragraph, preceding_h1s: usize) -> Result<()> {
        staged(paragraph, |p| self.write_h1(p, preceding_h1s))
    }

    fn write_h1(&self, paragraph: &mut Paragraph, preceding_h1s: usize) -> Result<()> {
        let config = &self.requirements.h1_formatting;
        log::debug!("H1 #{}: {}", preceding_h1s + 1, preview(paragraph));

        if config.text_transform == TextTransform::Uppercase {
            uppercase_text(paragraph);
        }
        // The break run is added before fonts so that it is formatted too.
        if config.page_break_before && preceding_h1s > 0 {
            self.add_page_break(paragraph);
        }
        apply_font(
            paragraph,
            "h1_formatting.font_size",
            &config.font_name,
            config.font_size,
            config.font_weight.is_bold(),
        )?;
        paragraph.set_alignment(config.alignment);
        apply_spacing(
            paragraph,
            "h1_formatting.spacing",
            config.space_before_pt,
            config.space_after_pt,
        )?;
        apply_indents(paragraph, "h1_formatting.indent", 0.0, 0.0)?;
        apply_line_spacing(paragraph, "h1_formatting.line_spacing", config.line_spacing)
    }

    /// Format an H2, H3 or H4 heading. These never get a page break and
    /// are indented from the left by the configured amount.
    ///
    /// H1 needs the chapter counter and is rejected here; use
    /// [`apply`](Self::apply) or [`format_h1`](Self::format_h1).
    pub fn format_subheading(&self, level: HeadingLevel, paragraph: &mut Paragraph) -> Result<()> {
        if level == HeadingLevel::H1 {
            return Err(Error::invalid_value("heading_level", level.number()));
        }
        staged(paragraph, |p| self.write_subheading(level, p))
    }

    fn write_subheading(&self, level: HeadingLevel, paragraph: &mut Paragraph) -> Result<()> {
        let config = self.requirements.heading(level);
        log::debug!("H{}: {}", level.number(), preview(paragraph));

        if config.text_transform == TextTransform::Uppercase {
            uppercase_text(paragraph);
        }
        apply_font(
            paragraph,
            "heading.font_size",
            &config.font_name,
            config.font_size,
            config.font_weight.is_bold(),
        )?;
        paragraph.set_alignment(config.alignment);
        apply_spacing(
            paragraph,
            "heading.spacing",
            config.space_before_pt,
            config.space_after_pt,
        )?;
        apply_indents(paragraph, "heading.indent", 0.0, config.paragraph_indent_cm)?;
        apply_line_spacing(paragraph, "heading.line_spacing", config.line_spacing)
    }

    /// List item: list font and a left indent, no red line.
    pub fn format_list(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.lists.bullet_lists;
        apply_font(
            paragraph,
            "lists.bullet_lists.font.size",
            &config.font.name,
            config.font.size,
            false,
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(paragraph, "lists.bullet_lists.indent_cm", 0.0, config.indent_cm)?;
        apply_line_spacing(
            paragraph,
            "lists.bullet_lists.font.line_spacing",
            config.font.line_spacing,
        )
    }

    /// Body text: base font, red line, no extra spacing.
    pub fn format_regular(&self, paragraph: &mut Paragraph) -> Result<()> {
        if paragraph.is_empty() {
            return Ok(());
        }
        let config = &self.requirements.base_formatting;
        apply_font(
            paragraph,
            "base_formatting.font_size",
            &config.font_name,
            config.font_size,
            false,
        )?;
        paragraph.set_alignment(config.text_alignment);
        apply_indents(
            paragraph,
            "base_formatting.paragraph_indent_cm",
            config.paragraph_indent_cm,
            0.0,
        )?;
        apply_spacing(paragraph, "base_formatting.spacing", 0.0, 0.0)?;
        apply_line_spacing(paragraph, "base_formatting.line_spacing", config.line_spacing)
    }

    /// Bibliography title. Gets a page break when configured; it never
    /// counts as a chapter heading.
    pub fn format_references_header(&self, paragraph: &mut Paragraph) -> Result<()> {
        staged(paragraph, |p| self.write_references_header(p))
    }

    fn write_references_header(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.special_sections.references.title;
        if config.text_transform == TextTransform::Uppercase {
            uppercase_text(paragraph);
        }
        if config.page_break_before {
            self.add_page_break(paragraph);
        }
        apply_font(
            paragraph,
            "special_sections.references.title.font_size",
            &config.font_name,
            config.font_size,
            config.font_weight.is_bold(),
        )?;
        paragraph.set_alignment(config.alignment);
        apply_spacing(
            paragraph,
            "special_sections.references.title.spacing",
            config.space_before_pt,
            config.space_after_pt,
        )?;
        apply_indents(paragraph, "special_sections.references.title.indent", 0.0, 0.0)
    }

    /// First line of a bibliography entry, with a red line.
    pub fn format_bibliography_entry(&self, paragraph: &mut Paragraph) -> Result<()> {
        let indent = self
            .requirements
            .special_sections
            .references
            .content
            .paragraph_indent_cm;
        self.format_bibliography(paragraph, indent)
    }

    /// Continuation of the previous entry. The first-line indent is
    /// cleared explicitly.
    pub fn format_bibliography_continuation(&self, paragraph: &mut Paragraph) -> Result<()> {
        self.format_bibliography(paragraph, 0.0)
    }

    fn format_bibliography(&self, paragraph: &mut Paragraph, first_line_cm: f64) -> Result<()> {
        let config = &self.requirements.special_sections.references.content;
        apply_font(
            paragraph,
            "special_sections.references.content.font_size",
            &config.font_name,
            config.font_size,
            false,
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(
            paragraph,
            "special_sections.references.content.paragraph_indent_cm",
            first_line_cm,
            0.0,
        )?;
        apply_spacing(
            paragraph,
            "special_sections.references.content.spacing",
            config.space_before_pt,
            config.space_after_pt,
        )?;
        apply_line_spacing(
            paragraph,
            "special_sections.references.content.line_spacing",
            config.line_spacing,
        )
    }

    pub fn format_table_caption(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.tables.caption;
        apply_font(
            paragraph,
            "tables.caption.font_size",
            &config.font_name,
            config.font_size,
            config.font_weight.is_bold(),
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(paragraph, "tables.caption.indent", 0.0, 0.0)?;
        apply_spacing(
            paragraph,
            "tables.caption.spacing",
            config.spacing.before_pt,
            config.spacing.after_pt,
        )?;
        apply_line_spacing(paragraph, "tables.caption.line_spacing", config.line_spacing)
    }

    pub fn format_figure_caption(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.figures.caption;
        apply_font(
            paragraph,
            "figures.caption.font_size",
            &config.font_name,
            config.font_size,
            config.font_weight.is_bold(),
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(paragraph, "figures.caption.indent", 0.0, 0.0)?;
        apply_spacing(
            paragraph,
            "figures.caption.spacing",
            config.spacing.before_pt,
            config.spacing.after_pt,
        )?;
        apply_line_spacing(paragraph, "figures.caption.line_spacing", config.line_spacing)
    }

    /// Picture paragraph: alignment and spacing only, it has no text to
    /// set a font on.
    pub fn format_figure_image(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.figures.image;
        paragraph.set_alignment(config.alignment);
        apply_spacing(
            paragraph,
            "figures.image.spacing",
            config.spacing.before_pt,
            config.spacing.after_pt,
        )
    }

    pub fn format_formula(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.formulas.formula;
        apply_font(
            paragraph,
            "formulas.formula.font_size",
            &config.font_name,
            config.font_size,
            false,
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(paragraph, "formulas.formula.indent", 0.0, 0.0)?;
        apply_spacing(
            paragraph,
            "formulas.formula.spacing",
            config.spacing.before_pt,
            config.spacing.after_pt,
        )
    }

    pub fn format_formula_numbering(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.formulas.numbering;
        apply_font(
            paragraph,
            "formulas.numbering.font_size",
            &config.font_name,
            config.font_size,
            false,
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(paragraph, "formulas.numbering.indent", 0.0, 0.0)?;
        apply_spacing(
            paragraph,
            "formulas.numbering.spacing",
            config.spacing.before_pt,
            config.spacing.after_pt,
        )
    }

    /// "где ..." lines under a formula.
    pub fn format_formula_explanation(&self, paragraph: &mut Paragraph) -> Result<()> {
        let config = &self.requirements.formulas.variables_explanation;
        apply_font(
            paragraph,
            "formulas.variables_explanation.font_size",
            &config.font_name,
            config.font_size,
            false,
        )?;
        paragraph.set_alignment(config.alignment);
        apply_indents(
            paragraph,
            "formulas.variables_explanation.indent_cm",
            config.indent_cm,
            0.0,
        )?;
        apply_spacing(
            paragraph,
            "formulas.variables_explanation.spacing",
            config.spacing.before_pt,
            config.spacing.after_pt,
        )?;
        apply_line_spacing(
            paragraph,
            "formulas.variables_explanation.line_spacing",
            config.line_spacing,
        )
    }

    /// Title of an unnumbered section (abstract, introduction, ...):
    /// centred, bold, upper-case, spaced like a chapter heading but never
    /// preceded by a page break.
    pub fn format_special(&self, section: SpecialSection, paragraph: &mut Paragraph) -> Result<()> {
        staged(paragraph, |p| self.write_special(section, p))
    }

    fn write_special(&self, section: SpecialSection, paragraph: &mut Paragraph) -> Result<()> {
        let sections = &self.requirements.special_sections;
        let config = match section {
            SpecialSection::Abstract => &sections.abstract_section,
            SpecialSection::Annotation => &sections.annotation,
            SpecialSection::Introduction => &sections.introduction,
            SpecialSection::Conclusion => &sections.conclusion,
        };
        let h1 = &self.requirements.h1_formatting;
        log::debug!("Section {}: {}", section.as_str(), preview(paragraph));

        uppercase_text(paragraph);
        apply_font(
            paragraph,
            "special_sections.font_size",
            &config.font_name,
            config.font_size,
            true,
        )?;
        paragraph.set_alignment(Alignment::Center);
        apply_spacing(
            paragraph,
            "h1_formatting.spacing",
            h1.space_before_pt,
            h1.space_after_pt,
        )?;
        apply_indents(paragraph, "special_sections.indent", 0.0, 0.0)?;
        apply_line_spacing(paragraph, "special_sections.line_spacing", config.line_spacing)
    }

    fn add_page_break(&self, paragraph: &mut Paragraph) {
        match self.page_break_mode {
            PageBreakMode::Property => paragraph.set_page_break_before(true),
            PageBreakMode::BreakRun => {
                if !paragraph.has_leading_page_break() {
                    paragraph.insert_page_break_run();
                }
            }
        }
    }
}

/// Run a rule that rewrites text on a copy, keeping the result only when
/// every value could be applied.
fn staged<F>(paragraph: &mut Paragraph, rule: F) -> Result<()>
where
    F: FnOnce(&mut Paragraph) -> Result<()>,
{
    let mut draft = paragraph.clone();
    rule(&mut draft)?;
    *paragraph = draft;
    Ok(())
}

/// Replace the text with its upper-case form. Runs collapse into one, so
/// this happens before any run-level formatting.
fn uppercase_text(paragraph: &mut Paragraph) {
    let text = paragraph.text();
    let upper = text.to_uppercase();
    if upper != text {
        paragraph.replace_text(&upper);
    }
}

fn preview(paragraph: &Paragraph) -> String {
    paragraph.text().chars().take(40).collect()
}
