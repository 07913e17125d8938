//! Pre-compiled detection patterns.

use super::{HeadingLevel, Requirements};
use crate::error::{Error, Result};
use regex::Regex;

/// Detection patterns of a [`Requirements`], compiled once per run.
///
/// Every pattern is anchored at the start of the text it is matched
/// against, so `Таблица\s+\d+` finds captions but not references to a
/// table in the middle of a sentence.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    headings: [Vec<Regex>; 4],
    lists: Vec<Regex>,
    table_captions: Vec<Regex>,
    figure_captions: Vec<Regex>,
    formulas: Vec<Regex>,
    formula_numbers: Vec<Regex>,
    formula_explanations: Vec<Regex>,
}

impl CompiledPatterns {
    pub(crate) fn new(requirements: &Requirements) -> Result<Self> {
        let formulas = &requirements.formulas.detection_patterns;
        Ok(Self {
            headings: [
                compile_all(&requirements.h1_formatting.detection_patterns)?,
                compile_all(&requirements.h2_formatting.detection_patterns)?,
                compile_all(&requirements.h3_formatting.detection_patterns)?,
                compile_all(&requirements.h4_formatting.detection_patterns)?,
            ],
            lists: compile_all(&requirements.lists.bullet_lists.detection_patterns)?,
            table_captions: compile_all(&requirements.tables.detection_patterns)?,
            figure_captions: compile_all(&requirements.figures.detection_patterns)?,
            formulas: compile_all(&formulas.formula)?,
            formula_numbers: compile_all(&formulas.numbering)?,
            formula_explanations: compile_all(&formulas.explanation)?,
        })
    }

    /// Check `text` against the patterns of a heading level. H1 patterns are
    /// written for upper-case text, so the caller passes the upper-cased
    /// form for H1.
    pub fn is_heading(&self, level: HeadingLevel, text: &str) -> bool {
        any_match(&self.headings[level.index()], text)
    }

    pub fn is_list_item(&self, text: &str) -> bool {
        any_match(&self.lists, text)
    }

    pub fn is_table_caption(&self, text: &str) -> bool {
        any_match(&self.table_captions, text)
    }

    pub fn is_figure_caption(&self, text: &str) -> bool {
        any_match(&self.figure_captions, text)
    }

    pub fn is_formula(&self, text: &str) -> bool {
        any_match(&self.formulas, text)
    }

    pub fn is_formula_number(&self, text: &str) -> bool {
        any_match(&self.formula_numbers, text)
    }

    pub fn is_formula_explanation(&self, text: &str) -> bool {
        any_match(&self.formula_explanations, text)
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| Regex::new(&format!("^(?:{})", p)).map_err(Error::from))
        .collect()
}

fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|re| re.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> CompiledPatterns {
        Requirements::default().compile().unwrap()
    }

    #[test]
    fn test_heading_patterns() {
        let p = compiled();
        assert!(p.is_heading(HeadingLevel::H1, "1. ВВЕДЕНИЕ"));
        assert!(p.is_heading(HeadingLevel::H1, "ГЛАВА 2. АНАЛИЗ"));
        assert!(p.is_heading(HeadingLevel::H2, "1.1 Обзор литературы"));
        assert!(p.is_heading(HeadingLevel::H2, "1.2. Постановка задачи"));
        assert!(p.is_heading(HeadingLevel::H3, "1.1.1 Методы"));
        assert!(p.is_heading(HeadingLevel::H4, "1.1.1.1. Детали"));
        assert!(!p.is_heading(HeadingLevel::H2, "1.1.1 Методы"));
        assert!(!p.is_heading(HeadingLevel::H3, "1.1 Обзор"));
    }

    #[test]
    fn test_captions_anchored() {
        let p = compiled();
        assert!(p.is_table_caption("Таблица 1 – Исходные данные"));
        assert!(p.is_table_caption("Табл. 3"));
        assert!(!p.is_table_caption("Данные приведены в Таблица 1"));
        assert!(p.is_figure_caption("Рисунок 2.1 – Схема"));
        assert!(p.is_figure_caption("Рис. 4"));
        assert!(!p.is_figure_caption("см. Рисунок 2"));
    }

    #[test]
    fn test_formula_patterns() {
        let p = compiled();
        assert!(p.is_formula_number("(1)"));
        assert!(p.is_formula_number("(2.13)"));
        assert!(!p.is_formula_number("(см. выше)"));
        assert!(!p.is_formula_number("(1) и далее"));
        assert!(p.is_formula_explanation("где x – координата;"));
        assert!(p.is_formula_explanation("с – скорость, м/с;"));
        assert!(!p.is_formula_explanation("Скорость – величина"));
        assert!(p.is_formula("Формула 3"));
    }

    #[test]
    fn test_list_patterns() {
        let p = compiled();
        assert!(p.is_list_item("– первый пункт;"));
        assert!(p.is_list_item("1) первый пункт;"));
        assert!(p.is_list_item("а) первый пункт;"));
        assert!(!p.is_list_item("1. ВВЕДЕНИЕ"));
    }
}
