//! Paragraph roles.

use crate::requirements::HeadingLevel;
use serde::{Serialize, Serializer};
use std::fmt;

/// Named unnumbered section with its own formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpecialSection {
    Abstract,
    Annotation,
    Introduction,
    Conclusion,
}

impl SpecialSection {
    pub const ALL: [SpecialSection; 4] = [
        SpecialSection::Abstract,
        SpecialSection::Annotation,
        SpecialSection::Introduction,
        SpecialSection::Conclusion,
    ];

    /// Key under `special_sections` in the requirements.
    pub fn as_str(self) -> &'static str {
        match self {
            SpecialSection::Abstract => "abstract",
            SpecialSection::Annotation => "annotation",
            SpecialSection::Introduction => "introduction",
            SpecialSection::Conclusion => "conclusion",
        }
    }
}

/// What a paragraph is, as decided by the classifier.
///
/// A role is computed fresh for every paragraph and never stored in the
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParagraphRole {
    /// Empty text or front matter; left untouched
    Skip,
    /// Heading of a level
    Heading(HeadingLevel),
    /// List item
    List,
    /// Body text
    Regular,
    /// Title of the bibliography
    ReferencesHeader,
    /// First line of a bibliography entry
    BibliographyEntry,
    /// Further line of the previous bibliography entry
    BibliographyContinuation,
    TableCaption,
    FigureCaption,
    /// Paragraph holding a picture
    FigureImage,
    Formula,
    FormulaNumbering,
    FormulaExplanation,
    /// Title of a named section
    Special(SpecialSection),
}

impl ParagraphRole {
    /// Every role, in a fixed order.
    pub const ALL: [ParagraphRole; 20] = [
        ParagraphRole::Skip,
        ParagraphRole::Heading(HeadingLevel::H1),
        ParagraphRole::Heading(HeadingLevel::H2),
        ParagraphRole::Heading(HeadingLevel::H3),
        ParagraphRole::Heading(HeadingLevel::H4),
        ParagraphRole::List,
        ParagraphRole::Regular,
        ParagraphRole::ReferencesHeader,
        ParagraphRole::BibliographyEntry,
        ParagraphRole::BibliographyContinuation,
        ParagraphRole::TableCaption,
        ParagraphRole::FigureCaption,
        ParagraphRole::FigureImage,
        ParagraphRole::Formula,
        ParagraphRole::FormulaNumbering,
        ParagraphRole::FormulaExplanation,
        ParagraphRole::Special(SpecialSection::Abstract),
        ParagraphRole::Special(SpecialSection::Annotation),
        ParagraphRole::Special(SpecialSection::Introduction),
        ParagraphRole::Special(SpecialSection::Conclusion),
    ];

    /// Role name as used in statistics and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ParagraphRole::Skip => "skip",
            ParagraphRole::Heading(HeadingLevel::H1) => "h1",
            ParagraphRole::Heading(HeadingLevel::H2) => "h2",
            ParagraphRole::Heading(HeadingLevel::H3) => "h3",
            ParagraphRole::Heading(HeadingLevel::H4) => "h4",
            ParagraphRole::List => "list",
            ParagraphRole::Regular => "regular",
            ParagraphRole::ReferencesHeader => "references_header",
            ParagraphRole::BibliographyEntry => "bibliography_entry",
            ParagraphRole::BibliographyContinuation => "bibliography_continuation",
            ParagraphRole::TableCaption => "table_caption",
            ParagraphRole::FigureCaption => "figure_caption",
            ParagraphRole::FigureImage => "figure_image",
            ParagraphRole::Formula => "formula",
            ParagraphRole::FormulaNumbering => "formula_numbering",
            ParagraphRole::FormulaExplanation => "formula_explanation",
            ParagraphRole::Special(SpecialSection::Abstract) => "special_abstract",
            ParagraphRole::Special(SpecialSection::Annotation) => "special_annotation",
            ParagraphRole::Special(SpecialSection::Introduction) => "special_introduction",
            ParagraphRole::Special(SpecialSection::Conclusion) => "special_conclusion",
        }
    }

    /// Parse a role name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == name)
    }

    /// Check if the role leaves the paragraph untouched.
    pub fn is_skip(self) -> bool {
        self == ParagraphRole::Skip
    }

    /// Heading level, for heading roles.
    pub fn heading_level(self) -> Option<HeadingLevel> {
        match self {
            ParagraphRole::Heading(level) => Some(level),
            _ => None,
        }
    }
}

impl fmt::Display for ParagraphRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for ParagraphRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
