//! Paragraph classification.
//!
//! The classifier walks paragraphs in document order. A [`ScanState`]
//! carries what it has seen so far (title page, table of contents, main
//! body, bibliography), so classifying paragraph *n* depends on paragraphs
//! *1..n-1* and a classifier must never be shared between documents.
//!
//! # Example
//!
//! ```
//! use vkrfmt::classify::{ParagraphClassifier, ParagraphRole, StrategyKind};
//! use vkrfmt::requirements::{HeadingLevel, Requirements};
//!
//! let requirements = Requirements::default();
//! let mut classifier = ParagraphClassifier::new(&requirements, StrategyKind::Style).unwrap();
//!
//! assert_eq!(classifier.classify_text("СОДЕРЖАНИЕ"), ParagraphRole::Skip);
//! assert_eq!(classifier.classify_text("1. Введение    3"), ParagraphRole::Skip);
//! assert_eq!(
//!     classifier.classify_text("1. ВВЕДЕНИЕ"),
//!     ParagraphRole::Heading(HeadingLevel::H1)
//! );
//! ```

mod detector;
mod role;
mod state;
mod strategy;

pub use detector::{normalize, uppercase_ratio, ContentDetector};
pub use role::{ParagraphRole, SpecialSection};
pub use state::{ScanRegion, ScanState};
pub use strategy::{
    heading_style_level, is_list_style, ClassificationStrategy, PatternStrategy, StrategyKind,
    StructuralMatch, StyleStrategy,
};

use crate::error::Result;
use crate::model::{Document, Paragraph};
use crate::requirements::{CompiledPatterns, Requirements};
use regex::Regex;

/// Sources whose entries start without an author name.
const INSTITUTIONAL_PREFIXES: &[&str] = &[
    "ГОСТ",
    "ФЕДЕРАЛЬНЫЙ ЗАКОН",
    "ПОСТАНОВЛЕНИЕ",
    "УКАЗ ПРЕЗИДЕНТА",
    "ПРИКАЗ",
    "КОНСТИТУЦИЯ",
];

/// What the classifier needs to know about one paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphInput {
    /// Visible text
    pub text: String,
    /// Resolved UI style name; `Normal` when the paragraph has none
    pub style_name: String,
    /// The paragraph holds a drawing or picture
    pub has_image: bool,
    /// The paragraph holds an Office Math zone
    pub has_math: bool,
}

impl ParagraphInput {
    /// Plain text in the `Normal` style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style_name: "Normal".to_string(),
            has_image: false,
            has_math: false,
        }
    }

    /// Read a paragraph of a document.
    pub fn from_paragraph(document: &Document, paragraph: &Paragraph) -> Self {
        Self {
            text: paragraph.text(),
            style_name: document.paragraph_style_name(paragraph),
            has_image: paragraph.has_image(),
            has_math: paragraph.has_math(),
        }
    }

    pub fn with_style(mut self, style_name: impl Into<String>) -> Self {
        self.style_name = style_name.into();
        self
    }

    pub fn with_image(mut self, has_image: bool) -> Self {
        self.has_image = has_image;
        self
    }

    pub fn with_math(mut self, has_math: bool) -> Self {
        self.has_math = has_math;
        self
    }
}

/// Keyword that titles a named section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKeyword {
    Section(SpecialSection),
    References,
}

/// Assigns a [`ParagraphRole`] to each paragraph in document order.
#[derive(Debug)]
pub struct ParagraphClassifier {
    detector: ContentDetector,
    patterns: CompiledPatterns,
    strategy: Box<dyn ClassificationStrategy>,
    state: ScanState,
    keywords: Vec<(SectionKeyword, String)>,
    contents_keywords: Vec<String>,
    keyword_prefix: Regex,
    entry_start: Vec<Regex>,
}

impl ParagraphClassifier {
    /// Create a classifier for one document run.
    pub fn new(requirements: &Requirements, kind: StrategyKind) -> Result<Self> {
        Self::with_strategy(requirements, kind.build())
    }

    /// Create a classifier with a custom strategy.
    pub fn with_strategy(
        requirements: &Requirements,
        strategy: Box<dyn ClassificationStrategy>,
    ) -> Result<Self> {
        let sections = &requirements.special_sections;
        let mut keywords = Vec::new();
        for kind in SpecialSection::ALL {
            let section = match kind {
                SpecialSection::Abstract => &sections.abstract_section,
                SpecialSection::Annotation => &sections.annotation,
                SpecialSection::Introduction => &sections.introduction,
                SpecialSection::Conclusion => &sections.conclusion,
            };
            keywords.extend(
                section
                    .keywords
                    .iter()
                    .map(|k| (SectionKeyword::Section(kind), canonical_keyword(k))),
            );
        }
        keywords.extend(
            sections
                .references
                .keywords
                .iter()
                .map(|k| (SectionKeyword::References, canonical_keyword(k))),
        );

        Ok(Self {
            detector: ContentDetector::new(),
            patterns: requirements.compile()?,
            strategy,
            state: ScanState::new(),
            keywords,
            contents_keywords: requirements
                .table_of_contents
                .keywords
                .iter()
                .map(|k| canonical_keyword(k))
                .collect(),
            keyword_prefix: Regex::new(r"^(\d+(\.\d+)*\.?|[IVX]+\.)\s*")?,
            entry_start: vec![
                Regex::new(r"^\d+\.")?,
                Regex::new(r"^\[\d+\]")?,
                // Иванов, И. И. / Петров-Водкин К.С.
                Regex::new(r"^[А-ЯЁ][а-яё]+(-[А-ЯЁ][а-яё]+)?,?\s+[А-ЯЁ]\.\s?([А-ЯЁ]\.)?")?,
                // Smith, J.
                Regex::new(r"^[A-Z][a-z]+,?\s+[A-Z]\.")?,
            ],
        })
    }

    /// Current scan state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Strategy in use.
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Classify plain text in the `Normal` style.
    pub fn classify_text(&mut self, text: &str) -> ParagraphRole {
        self.classify(&ParagraphInput::new(text))
    }

    /// Classify the next paragraph and advance the scan state.
    pub fn classify(&mut self, input: &ParagraphInput) -> ParagraphRole {
        let text = normalize(&input.text);
        if text.is_empty() {
            // Picture paragraphs have no text.
            if input.has_image && self.state.found_main_content() {
                return ParagraphRole::FigureImage;
            }
            return ParagraphRole::Skip;
        }

        if self.is_contents_header(&text) {
            if self.state.start_contents_section() {
                log::debug!("Contents header: {}", preview(&text));
            }
            return ParagraphRole::Skip;
        }

        if self.state.in_contents_section() {
            if self.detector.is_contents_line(&text) {
                return ParagraphRole::Skip;
            }
            if self.detector.is_main_content_start(&text) {
                log::debug!("Contents end at: {}", preview(&text));
                self.state.start_main_content();
                return self.classify_content(&text, input);
            }
            return ParagraphRole::Skip;
        }

        if !self.state.found_main_content() {
            if self.detector.is_title_page_content(&text)
                || self.detector.is_service_content(&text)
            {
                return ParagraphRole::Skip;
            }
            if self.detector.is_main_content_start(&text) {
                log::debug!("Main content at: {}", preview(&text));
                self.state.start_main_content();
                return self.classify_content(&text, input);
            }
        }

        if self.state.in_title_section() {
            return ParagraphRole::Skip;
        }

        self.classify_content(&text, input)
    }

    /// Classify a paragraph of the main body.
    fn classify_content(&mut self, text: &str, input: &ParagraphInput) -> ParagraphRole {
        if input.has_image || self.detector.is_image_placeholder(text) {
            return ParagraphRole::FigureImage;
        }
        if self.patterns.is_table_caption(text) {
            return ParagraphRole::TableCaption;
        }
        if self.patterns.is_figure_caption(text) {
            return ParagraphRole::FigureCaption;
        }
        if self.patterns.is_formula_number(text) {
            return ParagraphRole::FormulaNumbering;
        }
        if self.patterns.is_formula_explanation(text) {
            return ParagraphRole::FormulaExplanation;
        }
        if input.has_math || self.patterns.is_formula(text) {
            return ParagraphRole::Formula;
        }

        // Numbered entries read as chapter titles once upper-cased.
        if self.state.in_references_section() && self.is_bibliography_entry(text) {
            return ParagraphRole::BibliographyEntry;
        }

        let keyword = self.section_keyword(text);
        let mut structural = self
            .strategy
            .structural_match(text, &input.style_name, &self.patterns);

        // Short upper-case lines such as ISBN or URL tails are not chapters
        // here; only a heading style starts a new section after the title.
        if self.state.in_references_section()
            && matches!(structural, StructuralMatch::Heading(_))
            && !self.names_heading_style(&input.style_name)
        {
            structural = StructuralMatch::None;
        }

        if let StructuralMatch::Heading(level) = structural {
            // Named sections get their own rules unless numbered as a chapter.
            return match keyword {
                Some(keyword) if !self.detector.is_numbered_chapter(text) => {
                    self.keyword_role(keyword)
                }
                _ => ParagraphRole::Heading(level),
            };
        }

        if self.state.in_references_section() {
            return if self.is_bibliography_entry(text) {
                ParagraphRole::BibliographyEntry
            } else {
                ParagraphRole::BibliographyContinuation
            };
        }

        if let Some(keyword) = keyword {
            return self.keyword_role(keyword);
        }
        if structural == StructuralMatch::List {
            return ParagraphRole::List;
        }
        ParagraphRole::Regular
    }

    fn keyword_role(&mut self, keyword: SectionKeyword) -> ParagraphRole {
        match keyword {
            SectionKeyword::Section(section) => ParagraphRole::Special(section),
            SectionKeyword::References => {
                self.state.start_references_section();
                ParagraphRole::ReferencesHeader
            }
        }
    }

    fn names_heading_style(&self, style_name: &str) -> bool {
        self.strategy.kind() != StrategyKind::Pattern && heading_style_level(style_name).is_some()
    }

    fn is_contents_header(&self, text: &str) -> bool {
        self.detector.is_contents_header(text)
            || self.contents_keywords.contains(&canonical_keyword(text))
    }

    /// Keyword titling `text`, ignoring case, chapter numbering and a
    /// trailing colon or period.
    fn section_keyword(&self, text: &str) -> Option<SectionKeyword> {
        let upper = canonical_keyword(text);
        let stripped = self.keyword_prefix.replace(&upper, "");
        self.keywords
            .iter()
            .find(|(_, k)| *k == stripped)
            .map(|(keyword, _)| *keyword)
    }

    fn is_bibliography_entry(&self, text: &str) -> bool {
        if self.entry_start.iter().any(|re| re.is_match(text)) {
            return true;
        }
        let upper = text.to_uppercase();
        INSTITUTIONAL_PREFIXES.iter().any(|p| upper.starts_with(p))
    }
}

/// Upper-case, collapse whitespace, drop trailing punctuation.
fn canonical_keyword(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
        .trim_end_matches(['.', ':'])
        .to_string()
}

fn preview(text: &str) -> String {
    text.chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::HeadingLevel;

    fn classifier(kind: StrategyKind) -> ParagraphClassifier {
        ParagraphClassifier::new(&Requirements::default(), kind).unwrap()
    }

    fn in_main(kind: StrategyKind) -> ParagraphClassifier {
        let mut c = classifier(kind);
        assert_eq!(
            c.classify_text("ВВЕДЕНИЕ"),
            ParagraphRole::Special(SpecialSection::Introduction)
        );
        c
    }

    #[test]
    fn test_empty_is_skip() {
        let mut c = classifier(StrategyKind::Style);
        assert_eq!(c.classify_text(""), ParagraphRole::Skip);
        assert_eq!(c.classify_text("   \t"), ParagraphRole::Skip);
        let mut c = in_main(StrategyKind::Style);
        assert_eq!(c.classify_text(""), ParagraphRole::Skip);
    }

    #[test]
    fn test_title_page_skipped() {
        let mut c = classifier(StrategyKind::Style);
        for text in [
            "МИНИСТЕРСТВО НАУКИ И ВЫСШЕГО ОБРАЗОВАНИЯ РФ",
            "Кафедра прикладной информатики",
            "ВЫПУСКНАЯ КВАЛИФИКАЦИОННАЯ РАБОТА",
            "на тему: Разработка системы",
            "Иванов И.И.",
            "Москва 2024",
        ] {
            assert_eq!(c.classify_text(text), ParagraphRole::Skip, "{}", text);
        }
        assert_eq!(c.state().region(), ScanRegion::Title);
    }

    #[test]
    fn test_contents_then_main() {
        let mut c = classifier(StrategyKind::Style);
        assert_eq!(c.classify_text("СОДЕРЖАНИЕ"), ParagraphRole::Skip);
        assert_eq!(c.state().region(), ScanRegion::Contents);
        assert_eq!(c.classify_text("1. Введение    5"), ParagraphRole::Skip);
        assert_eq!(c.classify_text("1.1 Обзор........7"), ParagraphRole::Skip);
        assert_eq!(c.classify_text("Приложения"), ParagraphRole::Skip);
        assert_eq!(c.state().region(), ScanRegion::Contents);

        assert_eq!(
            c.classify_text("1. ВВЕДЕНИЕ"),
            ParagraphRole::Heading(HeadingLevel::H1)
        );
        assert!(c.state().found_main_content());
        assert!(c.state().contents_seen());
    }

    #[test]
    fn test_contents_header_after_main_is_skipped() {
        let mut c = in_main(StrategyKind::Style);
        assert_eq!(c.classify_text("Содержание"), ParagraphRole::Skip);
        assert_eq!(c.state().region(), ScanRegion::Main);
        assert_eq!(
            c.classify_text("Текст после оглавления."),
            ParagraphRole::Regular
        );
    }

    #[test]
    fn test_heading_levels_by_style() {
        let mut c = in_main(StrategyKind::Style);
        let role = c.classify(&ParagraphInput::new("Анализ").with_style("Heading 1"));
        assert_eq!(role, ParagraphRole::Heading(HeadingLevel::H1));
        let role = c.classify(&ParagraphInput::new("Обзор").with_style("Заголовок 2"));
        assert_eq!(role, ParagraphRole::Heading(HeadingLevel::H2));
        let role = c.classify(&ParagraphInput::new("Методы").with_style("Heading 3"));
        assert_eq!(role, ParagraphRole::Heading(HeadingLevel::H3));
        let role = c.classify(&ParagraphInput::new("Детали").with_style("Heading 4"));
        assert_eq!(role, ParagraphRole::Heading(HeadingLevel::H4));
    }

    #[test]
    fn test_special_section_tie_break() {
        let mut c = in_main(StrategyKind::Style);
        let role = c.classify(&ParagraphInput::new("Заключение").with_style("Heading 1"));
        assert_eq!(role, ParagraphRole::Special(SpecialSection::Conclusion));
        let role = c.classify(&ParagraphInput::new("1. ВВЕДЕНИЕ").with_style("Heading 1"));
        assert_eq!(role, ParagraphRole::Heading(HeadingLevel::H1));
    }

    #[test]
    fn test_bibliography_split() {
        let mut c = in_main(StrategyKind::Style);
        assert_eq!(
            c.classify_text("СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ"),
            ParagraphRole::ReferencesHeader
        );
        assert!(c.state().in_references_section());
        assert_eq!(
            c.classify_text("1. Иванов И.И. Заголовок. — М., 2020."),
            ParagraphRole::BibliographyEntry
        );
        assert_eq!(
            c.classify_text("— 200 с."),
            ParagraphRole::BibliographyContinuation
        );
        assert_eq!(
            c.classify_text("Петров, П. П. Алгоритмы / П. П. Петров."),
            ParagraphRole::BibliographyEntry
        );
        assert_eq!(
            c.classify_text("ГОСТ 7.32-2017 Отчет о научно-исследовательской работе"),
            ParagraphRole::BibliographyEntry
        );
        assert_eq!(
            c.classify_text("[5] Smith J. Rust in Action."),
            ParagraphRole::BibliographyEntry
        );
    }

    #[test]
    fn test_upper_case_tails_continue_entries() {
        for kind in [StrategyKind::Pattern, StrategyKind::Style] {
            let mut c = in_main(kind);
            c.classify_text("1. ОБЗОР");
            c.classify_text("СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ");
            assert_eq!(
                c.classify_text("1. Иванов И.И. Основы верстки. – М.: Наука, 2020. – 320 с."),
                ParagraphRole::BibliographyEntry
            );
            for tail in [
                "ISBN 978-5-16-012345-6.",
                "URL: HTTPS://GOST.RU",
                "DOI 10.1000/ABC",
            ] {
                assert_eq!(
                    c.classify_text(tail),
                    ParagraphRole::BibliographyContinuation,
                    "{:?}: {}",
                    kind,
                    tail
                );
            }
        }
    }

    #[test]
    fn test_heading_style_ends_bibliography_text() {
        let mut c = in_main(StrategyKind::Style);
        c.classify_text("СПИСОК ЛИТЕРАТУРЫ");
        assert_eq!(
            c.classify(&ParagraphInput::new("Приложение А").with_style("Heading 1")),
            ParagraphRole::Heading(HeadingLevel::H1)
        );

        // The pattern strategy never reads styles.
        let mut c = in_main(StrategyKind::Pattern);
        c.classify_text("СПИСОК ЛИТЕРАТУРЫ");
        assert_eq!(
            c.classify(&ParagraphInput::new("ISBN 5-7695-1234-5").with_style("Heading 1")),
            ParagraphRole::BibliographyContinuation
        );
    }

    #[test]
    fn test_figures_tables_formulas() {
        let mut c = in_main(StrategyKind::Style);
        assert_eq!(
            c.classify(&ParagraphInput::new("").with_image(true)),
            ParagraphRole::FigureImage
        );
        assert_eq!(
            c.classify_text("[ИЗОБРАЖЕНИЕ 1]"),
            ParagraphRole::FigureImage
        );
        assert_eq!(
            c.classify_text("Рисунок 1 – Архитектура системы"),
            ParagraphRole::FigureCaption
        );
        assert_eq!(
            c.classify_text("Таблица 2 – Результаты"),
            ParagraphRole::TableCaption
        );
        assert_eq!(
            c.classify(&ParagraphInput::new("E = mc2").with_math(true)),
            ParagraphRole::Formula
        );
        assert_eq!(c.classify_text("(1.2)"), ParagraphRole::FormulaNumbering);
        assert_eq!(
            c.classify_text("где E – энергия, Дж;"),
            ParagraphRole::FormulaExplanation
        );
    }

    #[test]
    fn test_lists_and_regular() {
        let mut c = in_main(StrategyKind::Style);
        assert_eq!(c.classify_text("– первый пункт;"), ParagraphRole::List);
        assert_eq!(
            c.classify(&ParagraphInput::new("пункт").with_style("List Paragraph")),
            ParagraphRole::List
        );
        assert_eq!(
            c.classify_text("Целью работы является разработка системы."),
            ParagraphRole::Regular
        );
    }

    #[test]
    fn test_strict_style_mode() {
        let mut c = in_main(StrategyKind::StrictStyle);
        assert_eq!(c.classify_text("1.1 Обзор литературы"), ParagraphRole::Regular);
        assert_eq!(c.classify_text("– пункт"), ParagraphRole::Regular);
        let role = c.classify(&ParagraphInput::new("Обзор").with_style("Heading 2"));
        assert_eq!(role, ParagraphRole::Heading(HeadingLevel::H2));
    }

    #[test]
    fn test_pattern_strategy_ignores_style() {
        let mut c = in_main(StrategyKind::Pattern);
        let role = c.classify(&ParagraphInput::new("обычный текст").with_style("Heading 1"));
        assert_eq!(role, ParagraphRole::Regular);
    }

    #[test]
    fn test_image_before_main_is_skipped() {
        let mut c = classifier(StrategyKind::Style);
        assert_eq!(
            c.classify(&ParagraphInput::new("").with_image(true)),
            ParagraphRole::Skip
        );
    }

    #[test]
    fn test_keyword_with_numbering_and_colon() {
        let c = classifier(StrategyKind::Style);
        assert_eq!(
            c.section_keyword("Аннотация:"),
            Some(SectionKeyword::Section(SpecialSection::Annotation))
        );
        assert_eq!(
            c.section_keyword("5.  Список   литературы"),
            Some(SectionKeyword::References)
        );
        assert_eq!(c.section_keyword("Введение в теорию"), None);
    }
}
