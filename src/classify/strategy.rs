//! Classification strategies for headings and list items.

use super::detector::uppercase_ratio;
use crate::error::{Error, Result};
use crate::requirements::{CompiledPatterns, HeadingLevel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Short mostly upper-case lines are read as chapter headings.
const H1_MAX_CHARS: usize = 100;
const H1_UPPER_RATIO: f64 = 0.7;

const H1_STYLES: &[&str] = &["Heading 1", "Заголовок 1", "Title", "Название", "Header 1", "H1"];
const H2_STYLES: &[&str] = &[
    "Heading 2",
    "Заголовок 2",
    "Subtitle",
    "Подзаголовок",
    "Header 2",
    "H2",
    "Heading2",
    "Заголовок2",
    "Sub Heading",
    "Подраздел",
    "Section Heading",
];
const H3_STYLES: &[&str] = &["Heading 3", "Заголовок 3", "Header 3", "H3", "Heading3", "Заголовок3"];
const H4_STYLES: &[&str] = &["Heading 4", "Заголовок 4", "Header 4", "H4", "Heading4", "Заголовок4"];
const LIST_STYLES: &[&str] = &[
    "List Paragraph",
    "Список",
    "Bullet",
    "Numbered",
    "Маркированный список",
    "Нумерованный список",
];

/// Which strategy a classifier uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Text patterns only
    Pattern,
    /// Paragraph style first, text patterns for plain styles
    #[default]
    Style,
    /// Paragraph style only; plain styles are always body text
    StrictStyle,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Pattern => "pattern",
            StrategyKind::Style => "style",
            StrategyKind::StrictStyle => "strict-style",
        }
    }

    /// Build the strategy.
    pub fn build(self) -> Box<dyn ClassificationStrategy> {
        match self {
            StrategyKind::Pattern => Box::new(PatternStrategy),
            StrategyKind::Style => Box::new(StyleStrategy::new(false)),
            StrategyKind::StrictStyle => Box::new(StyleStrategy::new(true)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(StrategyKind::Pattern),
            "style" => Ok(StrategyKind::Style),
            "strict-style" | "strict_style" | "strict" => Ok(StrategyKind::StrictStyle),
            other => Err(Error::invalid_value("strategy", other)),
        }
    }
}

/// Structural reading of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralMatch {
    Heading(HeadingLevel),
    List,
    /// Nothing structural; body text unless another detector claims it
    None,
}

/// Decides whether a body paragraph is a heading or a list item.
///
/// Strategies are stateless; the scan state and the other detectors
/// belong to the classifier.
pub trait ClassificationStrategy: fmt::Debug + Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Read a paragraph from its normalized text and resolved style name.
    fn structural_match(
        &self,
        text: &str,
        style_name: &str,
        patterns: &CompiledPatterns,
    ) -> StructuralMatch;
}

/// Classifies from text alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternStrategy;

impl ClassificationStrategy for PatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Pattern
    }

    fn structural_match(
        &self,
        text: &str,
        _style_name: &str,
        patterns: &CompiledPatterns,
    ) -> StructuralMatch {
        if patterns.is_heading(HeadingLevel::H1, &text.to_uppercase()) {
            return StructuralMatch::Heading(HeadingLevel::H1);
        }
        for level in [HeadingLevel::H2, HeadingLevel::H3, HeadingLevel::H4] {
            if patterns.is_heading(level, text) {
                return StructuralMatch::Heading(level);
            }
        }

        let is_list = patterns.is_list_item(text);
        if !is_list && looks_like_chapter_title(text) {
            return StructuralMatch::Heading(HeadingLevel::H1);
        }
        if is_list {
            StructuralMatch::List
        } else {
            StructuralMatch::None
        }
    }
}

/// Classifies from the paragraph style, falling back to text patterns for
/// `Normal` and other unrecognized styles unless `strict`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleStrategy {
    strict: bool,
}

impl StyleStrategy {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

impl ClassificationStrategy for StyleStrategy {
    fn kind(&self) -> StrategyKind {
        if self.strict {
            StrategyKind::StrictStyle
        } else {
            StrategyKind::Style
        }
    }

    fn structural_match(
        &self,
        text: &str,
        style_name: &str,
        patterns: &CompiledPatterns,
    ) -> StructuralMatch {
        if let Some(level) = heading_style_level(style_name) {
            log::debug!("Style '{}' is heading {}", style_name, level.number());
            return StructuralMatch::Heading(level);
        }
        if is_list_style(style_name) {
            return StructuralMatch::List;
        }
        if self.strict {
            return StructuralMatch::None;
        }
        PatternStrategy.structural_match(text, style_name, patterns)
    }
}

/// Heading level named by a style. Exact alias matches across all levels
/// win over case-insensitive substring matches, so `Subtitle` is H2 and
/// not H1 through `Title`.
pub fn heading_style_level(style_name: &str) -> Option<HeadingLevel> {
    let tables = [
        (HeadingLevel::H1, H1_STYLES),
        (HeadingLevel::H2, H2_STYLES),
        (HeadingLevel::H3, H3_STYLES),
        (HeadingLevel::H4, H4_STYLES),
    ];
    if let Some((level, _)) = tables
        .iter()
        .find(|(_, aliases)| aliases.contains(&style_name))
    {
        return Some(*level);
    }
    let lower = style_name.to_lowercase();
    tables
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|a| lower.contains(&a.to_lowercase())))
        .map(|(level, _)| *level)
}

/// Check if a style names a list.
pub fn is_list_style(style_name: &str) -> bool {
    if LIST_STYLES.contains(&style_name) {
        return true;
    }
    let lower = style_name.to_lowercase();
    LIST_STYLES.iter().any(|a| lower.contains(&a.to_lowercase()))
}

fn looks_like_chapter_title(text: &str) -> bool {
    text.chars().count() < H1_MAX_CHARS
        && uppercase_ratio(text).is_some_and(|ratio| ratio > H1_UPPER_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::Requirements;

    fn patterns() -> CompiledPatterns {
        Requirements::default().compile().unwrap()
    }

    #[test]
    fn test_heading_style_exact_before_substring() {
        assert_eq!(heading_style_level("Heading 1"), Some(HeadingLevel::H1));
        assert_eq!(heading_style_level("Subtitle"), Some(HeadingLevel::H2));
        assert_eq!(heading_style_level("Заголовок 3"), Some(HeadingLevel::H3));
        assert_eq!(heading_style_level("heading 4 custom"), Some(HeadingLevel::H4));
        assert_eq!(heading_style_level("My Title"), Some(HeadingLevel::H1));
        assert_eq!(heading_style_level("Normal"), None);
    }

    #[test]
    fn test_list_styles() {
        assert!(is_list_style("List Paragraph"));
        assert!(is_list_style("List Bullet"));
        assert!(is_list_style("Нумерованный список"));
        assert!(!is_list_style("Normal"));
    }

    #[test]
    fn test_pattern_strategy() {
        let p = patterns();
        let s = PatternStrategy;
        assert_eq!(
            s.structural_match("1. Введение", "Normal", &p),
            StructuralMatch::Heading(HeadingLevel::H1)
        );
        assert_eq!(
            s.structural_match("1.1 ОБЗОР ЛИТЕРАТУРЫ", "Normal", &p),
            StructuralMatch::Heading(HeadingLevel::H2)
        );
        assert_eq!(
            s.structural_match("2.3.1 Метод", "Normal", &p),
            StructuralMatch::Heading(HeadingLevel::H3)
        );
        assert_eq!(
            s.structural_match("ПОСТАНОВКА ЗАДАЧИ", "Normal", &p),
            StructuralMatch::Heading(HeadingLevel::H1)
        );
        assert_eq!(
            s.structural_match("– ПЕРВЫЙ ПУНКТ", "Normal", &p),
            StructuralMatch::List
        );
        assert_eq!(
            s.structural_match("Обычный текст работы.", "Heading 1", &p),
            StructuralMatch::None
        );
    }

    #[test]
    fn test_style_strategy_prefers_style() {
        let p = patterns();
        let s = StyleStrategy::new(false);
        assert_eq!(
            s.structural_match("Обзор", "Heading 2", &p),
            StructuralMatch::Heading(HeadingLevel::H2)
        );
        assert_eq!(
            s.structural_match("Пункт", "List Paragraph", &p),
            StructuralMatch::List
        );
        assert_eq!(
            s.structural_match("1.1 Обзор", "Normal", &p),
            StructuralMatch::Heading(HeadingLevel::H2)
        );
    }

    #[test]
    fn test_strict_style_ignores_text() {
        let p = patterns();
        let s = StyleStrategy::new(true);
        assert_eq!(s.kind(), StrategyKind::StrictStyle);
        assert_eq!(
            s.structural_match("1.1 Обзор", "Normal", &p),
            StructuralMatch::None
        );
        assert_eq!(
            s.structural_match("Обзор", "Заголовок 1", &p),
            StructuralMatch::Heading(HeadingLevel::H1)
        );
    }

    #[test]
    fn test_strategy_kind_parse() {
        assert_eq!("style".parse::<StrategyKind>().unwrap(), StrategyKind::Style);
        assert_eq!(
            "Strict-Style".parse::<StrategyKind>().unwrap(),
            StrategyKind::StrictStyle
        );
        assert!("fuzzy".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::Pattern.build().kind(), StrategyKind::Pattern);
    }
}
