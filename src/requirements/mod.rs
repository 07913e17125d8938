//! Formatting requirements.
//!
//! [`Requirements::default`] is the built-in ГОСТ standard for a ВКР. A JSON
//! file may override any subset of it: the user document is merged over the
//! defaults key by key, so `{"base_formatting": {"font_size": 12}}` changes
//! one value and keeps the rest.

mod defaults;
mod patterns;

pub use patterns::CompiledPatterns;

use crate::error::{Error, Result};
use crate::model::Alignment;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Largest font size Word accepts, in points.
const MAX_FONT_PT: f64 = 819.0;

/// Complete formatting standard for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Body text, margins
    pub base_formatting: BaseFormatting,
    /// Chapter headings
    pub h1_formatting: HeadingFormatting,
    /// Section headings
    pub h2_formatting: HeadingFormatting,
    /// Subsection headings
    pub h3_formatting: HeadingFormatting,
    /// Point headings
    pub h4_formatting: HeadingFormatting,
    /// Abstract, annotation, introduction, conclusion and references
    pub special_sections: SpecialSections,
    /// Table of contents
    pub table_of_contents: TableOfContents,
    /// Tables and table captions
    pub tables: Tables,
    /// Figures and figure captions
    pub figures: Figures,
    /// Formulas, their numbers and variable explanations
    pub formulas: Formulas,
    /// Lists
    pub lists: Lists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseFormatting {
    pub font_name: String,
    pub font_size: f64,
    pub line_spacing: f64,
    pub text_alignment: Alignment,
    /// Red line
    pub paragraph_indent_cm: f64,
    pub first_line_indent_cm: f64,
    pub margins_cm: MarginsCm,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginsCm {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Font weight of a heading or caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn is_bold(self) -> bool {
        self == FontWeight::Bold
    }
}

/// Case transform applied to heading text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    #[default]
    None,
    Uppercase,
}

/// Heading level, H1 to H4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// All levels, highest first.
    pub const ALL: [HeadingLevel; 4] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
    ];

    /// Level number, 1 to 4.
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingFormatting {
    pub font_name: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub text_transform: TextTransform,
    pub alignment: Alignment,
    pub page_break_before: bool,
    pub space_before_pt: f64,
    pub space_after_pt: f64,
    /// Left indent; H1 is never indented
    pub paragraph_indent_cm: f64,
    pub line_spacing: f64,
    /// Matched at the start of the text. H1 patterns are matched against
    /// the upper-cased text.
    pub detection_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialSections {
    #[serde(rename = "abstract")]
    pub abstract_section: SpecialSection,
    pub annotation: SpecialSection,
    pub introduction: SpecialSection,
    pub conclusion: SpecialSection,
    pub references: ReferencesSection,
}

/// Formatting of a named unnumbered section and the keywords that title it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialSection {
    pub font_name: String,
    pub font_size: f64,
    pub alignment: Alignment,
    pub line_spacing: f64,
    pub paragraph_indent_cm: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencesSection {
    pub title: TitleFormatting,
    /// Governs both new entries and continuation lines
    pub content: ReferencesContent,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleFormatting {
    pub font_name: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub text_transform: TextTransform,
    pub alignment: Alignment,
    pub page_break_before: bool,
    pub space_before_pt: f64,
    pub space_after_pt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencesContent {
    pub font_name: String,
    pub font_size: f64,
    pub alignment: Alignment,
    pub line_spacing: f64,
    pub paragraph_indent_cm: f64,
    pub space_before_pt: f64,
    pub space_after_pt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableOfContents {
    pub title: String,
    pub font_name: String,
    pub font_size: f64,
    pub alignment: Alignment,
    pub line_spacing: f64,
    pub dot_leader: bool,
    /// Extra header strings recognized as the start of the contents
    pub keywords: Vec<String>,
}

/// Space before and after, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingPt {
    pub before_pt: f64,
    pub after_pt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionFormatting {
    pub alignment: Alignment,
    pub font_name: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub line_spacing: f64,
    pub spacing: SpacingPt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    pub caption: CaptionFormatting,
    pub table: TableLayout,
    /// Rows after the first
    pub content: CellFormatting,
    /// First row
    pub header: CellFormatting,
    pub detection_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub alignment: Alignment,
    pub width_auto: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFormatting {
    pub font_name: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub alignment: Alignment,
    pub line_spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figures {
    pub image: ImageFormatting,
    pub caption: CaptionFormatting,
    pub detection_patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFormatting {
    pub alignment: Alignment,
    pub spacing: SpacingPt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formulas {
    pub formula: FormulaFormatting,
    pub numbering: FormulaFormatting,
    pub variables_explanation: ExplanationFormatting,
    pub detection_patterns: FormulaPatterns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaFormatting {
    pub alignment: Alignment,
    pub font_name: String,
    pub font_size: f64,
    pub spacing: SpacingPt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationFormatting {
    pub font_name: String,
    pub font_size: f64,
    pub alignment: Alignment,
    pub line_spacing: f64,
    pub indent_cm: f64,
    pub spacing: SpacingPt,
}

/// Formula detection is split by the paragraph it finds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaPatterns {
    /// Formula body written as text
    pub formula: Vec<String>,
    /// Stand-alone number such as `(2.1)`
    pub numbering: Vec<String>,
    /// `где x – ...` lines
    pub explanation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lists {
    pub bullet_lists: BulletLists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletLists {
    pub marker: String,
    pub indent_cm: f64,
    pub punctuation: Punctuation,
    pub font: ListFont,
    pub alignment: Alignment,
    pub detection_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Punctuation {
    pub item_ending: String,
    pub last_item_ending: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFont {
    pub name: String,
    pub size: f64,
    pub line_spacing: f64,
}

impl Requirements {
    /// Parse a JSON requirements document and merge it over the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        if !overrides.is_object() {
            return Err(Error::InvalidRequirements(
                "requirements must be a JSON object".to_string(),
            ));
        }

        let mut merged = serde_json::to_value(Self::default())?;
        deep_merge(&mut merged, overrides);
        let requirements: Self = serde_json::from_value(merged)
            .map_err(|e| Error::InvalidRequirements(e.to_string()))?;
        requirements.validate()?;
        Ok(requirements)
    }

    /// Load requirements from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        log::info!("Loading requirements from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Formatting for a heading level.
    pub fn heading(&self, level: HeadingLevel) -> &HeadingFormatting {
        match level {
            HeadingLevel::H1 => &self.h1_formatting,
            HeadingLevel::H2 => &self.h2_formatting,
            HeadingLevel::H3 => &self.h3_formatting,
            HeadingLevel::H4 => &self.h4_formatting,
        }
    }

    /// Check that every auto-detected category has patterns, every named
    /// section has keywords, sizes are usable and every pattern compiles.
    pub fn validate(&self) -> Result<()> {
        let base = &self.base_formatting;
        check_font("base_formatting", base.font_size)?;
        check_spacing("base_formatting.line_spacing", base.line_spacing)?;
        check_length("base_formatting.paragraph_indent_cm", base.paragraph_indent_cm)?;
        let m = base.margins_cm;
        for (field, value) in [
            ("margins_cm.top", m.top),
            ("margins_cm.bottom", m.bottom),
            ("margins_cm.left", m.left),
            ("margins_cm.right", m.right),
        ] {
            check_length(field, value)?;
        }

        for level in HeadingLevel::ALL {
            let heading = self.heading(level);
            let field = format!("h{}_formatting", level.number());
            check_font(&field, heading.font_size)?;
            check_spacing(&field, heading.line_spacing)?;
            check_non_empty(&field, &heading.detection_patterns)?;
        }

        let sections = &self.special_sections;
        for (field, section) in [
            ("special_sections.abstract", &sections.abstract_section),
            ("special_sections.annotation", &sections.annotation),
            ("special_sections.introduction", &sections.introduction),
            ("special_sections.conclusion", &sections.conclusion),
        ] {
            check_font(field, section.font_size)?;
            check_non_empty(field, &section.keywords)?;
        }
        check_font("special_sections.references.title", sections.references.title.font_size)?;
        check_font(
            "special_sections.references.content",
            sections.references.content.font_size,
        )?;
        check_non_empty("special_sections.references", &sections.references.keywords)?;

        check_font("tables.caption", self.tables.caption.font_size)?;
        check_font("tables.content", self.tables.content.font_size)?;
        check_font("tables.header", self.tables.header.font_size)?;
        check_non_empty("tables", &self.tables.detection_patterns)?;

        check_font("figures.caption", self.figures.caption.font_size)?;
        check_non_empty("figures", &self.figures.detection_patterns)?;

        let patterns = &self.formulas.detection_patterns;
        check_non_empty("formulas.formula", &patterns.formula)?;
        check_non_empty("formulas.numbering", &patterns.numbering)?;
        check_non_empty("formulas.explanation", &patterns.explanation)?;

        let lists = &self.lists.bullet_lists;
        check_font("lists.bullet_lists.font", lists.font.size)?;
        check_non_empty("lists.bullet_lists", &lists.detection_patterns)?;

        self.compile().map(|_| ())
    }

    /// Build the regular expressions for one run.
    pub fn compile(&self) -> Result<CompiledPatterns> {
        CompiledPatterns::new(self)
    }
}

fn deep_merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        deep_merge(existing, value)
                    }
                    _ => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}

fn check_font(field: &str, size: f64) -> Result<()> {
    if size.is_finite() && size > 0.0 && size <= MAX_FONT_PT {
        Ok(())
    } else {
        Err(Error::InvalidRequirements(format!(
            "{}: font size {} out of range",
            field, size
        )))
    }
}

fn check_spacing(field: &str, multiple: f64) -> Result<()> {
    if multiple.is_finite() && multiple > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRequirements(format!(
            "{}: line spacing {} must be positive",
            field, multiple
        )))
    }
}

fn check_length(field: &str, cm: f64) -> Result<()> {
    if cm.is_finite() && cm >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRequirements(format!(
            "{}: {} cm must be a non-negative number",
            field, cm
        )))
    }
}

fn check_non_empty(field: &str, items: &[String]) -> Result<()> {
    if items.iter().any(|s| !s.trim().is_empty()) {
        Ok(())
    } else {
        Err(Error::InvalidRequirements(format!("{}: list is empty", field)))
    }
}
