//! Text-only detection of front matter and section boundaries.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Headers that open a table of contents.
const CONTENT_HEADERS: &[&str] = &["СОДЕРЖАНИЕ", "ОГЛАВЛЕНИЕ", "CONTENTS", "TABLE OF CONTENTS"];

/// Exact headings that open the main body.
const MAIN_CONTENT_MARKERS: &[&str] = &[
    "ВВЕДЕНИЕ",
    "ГЛАВА 1",
    "1. ВВЕДЕНИЕ",
    "1 ВВЕДЕНИЕ",
    "CHAPTER 1",
    "INTRODUCTION",
    "РЕФЕРАТ",
    "ABSTRACT",
    "АННОТАЦИЯ",
];

const TITLE_PAGE_MARKERS: &[&str] = &[
    "ДИПЛОМНАЯ РАБОТА",
    "ВЫПУСКНАЯ КВАЛИФИКАЦИОННАЯ РАБОТА",
    "МИНИСТЕРСТВО ОБРАЗОВАНИЯ",
    "МИНИСТЕРСТВО НАУКИ",
    "ФЕДЕРАЛЬНОЕ ГОСУДАРСТВЕННОЕ",
    "ОБРАЗОВАТЕЛЬНОЕ УЧРЕЖДЕНИЕ",
    "ВЫСШЕГО ОБРАЗОВАНИЯ",
    "КАФЕДРА",
    "НАПРАВЛЕНИЕ ПОДГОТОВКИ",
    "ПРОФИЛЬ",
    "ТЕМА:",
    "ВЫПОЛНИЛ:",
    "СТУДЕНТ",
    "ГРУППЫ",
    "НАУЧНЫЙ РУКОВОДИТЕЛЬ",
    "КОНСУЛЬТАНТ",
    "ДОПУЩЕН К ЗАЩИТЕ",
    "РАБОТА ВЫПОЛНЕНА",
    "ОЦЕНКА",
    "ПОДПИСЬ",
];

/// Assignment sheets, calendar plans and approval stamps.
const SERVICE_MARKERS: &[&str] = &[
    "ЗАДАНИЕ НА",
    "КАЛЕНДАРНЫЙ ПЛАН",
    "КАЛЕНДАРНО-ТЕМАТИЧЕСКИЙ",
    "ТЕХНИЧЕСКОЕ ЗАДАНИЕ",
    "УТВЕРЖДАЮ",
    "РАССМОТРЕНО",
    "СОГЛАСОВАНО",
    "ОТЗЫВ",
    "РЕЦЕНЗИЯ",
    "СПРАВКА О ВНЕДРЕНИИ",
    "АКТ О ВНЕДРЕНИИ",
];

const REFERENCES_KEYWORDS: &[&str] = &[
    "СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ",
    "СПИСОК ЛИТЕРАТУРЫ",
    "БИБЛИОГРАФИЧЕСКИЙ СПИСОК",
    "REFERENCES",
    "BIBLIOGRAPHY",
];

/// Text standing in for a picture in drafts.
const IMAGE_PLACEHOLDERS: &[&str] = &[
    "[ЗДЕСЬ ДОЛЖНО БЫТЬ ИЗОБРАЖЕНИЕ]",
    "[ВТОРОЕ ИЗОБРАЖЕНИЕ]",
    "[ИЗОБРАЖЕНИЕ]",
    "[IMAGE]",
    "[РИСУНОК]",
    "[FIGURE]",
    "[РЕАЛЬНОЕ ИЗОБРАЖЕНИЕ АРХИТЕКТУРЫ]",
    "[ИЗОБРАЖЕНИЕ В РАЗДЕЛЕ 2]",
    "[ИЗОБРАЖЕНИЕ 1]",
    "[ИЗОБРАЖЕНИЕ 2]",
    "[ИЗОБРАЖЕНИЕ 3]",
    "[ИЗОБРАЖЕНИЕ В ПЕРВОЙ ГЛАВЕ]",
    "[ИЗОБРАЖЕНИЕ ВО ВТОРОЙ ГЛАВЕ]",
];

/// Title pages are short.
const TITLE_MAX_CHARS: usize = 200;
const TITLE_MAX_WORDS: usize = 5;
const TITLE_UPPER_RATIO: f64 = 0.8;

/// Stateless predicates over a single paragraph text.
///
/// Every predicate expects text that is already trimmed (see
/// [`normalize`]). The detector holds only compiled patterns and can be
/// shared freely.
#[derive(Debug, Clone)]
pub struct ContentDetector {
    heading_vetoes: Vec<Regex>,
    name_patterns: Vec<Regex>,
    contents_lines: Vec<Regex>,
    chapter_patterns: Vec<Regex>,
    chapter_label: Regex,
    trailing_number: Regex,
    trailing_page: Regex,
    numbered_start: Regex,
}

impl ContentDetector {
    /// Create a detector.
    pub fn new() -> Self {
        Self {
            heading_vetoes: vec![
                Regex::new(r"^\d+\.\s*[А-ЯЁ\s]+$").unwrap(),
                Regex::new(r"^ГЛАВА\s+\d+").unwrap(),
                Regex::new(r"^(ВВЕДЕНИЕ|ЗАКЛЮЧЕНИЕ|РЕФЕРАТ)$").unwrap(),
                Regex::new(r"^[IVX]+\.\s*[А-ЯЁ\s]+$").unwrap(),
            ],
            name_patterns: vec![
                // Иванов И.И.
                Regex::new(r"[А-ЯЁ][а-яё]+\s+[А-ЯЁ]\.\s?[А-ЯЁ]\.").unwrap(),
                // Иванов Иван Иванович
                Regex::new(r"[А-ЯЁ][а-яё]+\s+[А-ЯЁ][а-яё]+\s+[А-ЯЁ][а-яё]+").unwrap(),
            ],
            contents_lines: vec![
                // dot leaders
                Regex::new(r".+\.{3,}.+\d+$").unwrap(),
                Regex::new(r".+\.{2,}\s*\d+$").unwrap(),
                Regex::new(r"^[А-ЯЁ\d\.\s]+\.{3,}\d+$").unwrap(),
                Regex::new(r"^\d+[\.\s][А-ЯЁа-яё\s]+\.{3,}\d+$").unwrap(),
                Regex::new(r"^\d+\.\d+[\.\s][А-ЯЁа-яё\s]+\.{3,}\d+$").unwrap(),
                // whitespace before the page number
                Regex::new(r"^[А-ЯЁа-яё\s]+\s+\d+$").unwrap(),
                Regex::new(r"^\d+\.\s*[А-ЯЁа-яё\s]+\s+\d+$").unwrap(),
                Regex::new(r"^\d+\s+[А-ЯЁа-яё\s]+\s+\d+$").unwrap(),
                Regex::new(r"^\d+\.\d+\s+[А-ЯЁа-яё\s]+\s+\d+$").unwrap(),
                // "Определения, обозначения и сокращения5"
                Regex::new(r"^[А-ЯЁа-яё\s,]+\d+$").unwrap(),
            ],
            chapter_patterns: vec![
                Regex::new(r"^ГЛАВА\s+\d+$").unwrap(),
                Regex::new(r"^\d+\.\s*[А-ЯЁ][А-ЯЁа-яё\s]*$").unwrap(),
                Regex::new(r"^\d+\s+[А-ЯЁ][А-ЯЁа-яё\s]*$").unwrap(),
            ],
            chapter_label: Regex::new(r"^(ГЛАВА|CHAPTER)\s+\d+$").unwrap(),
            trailing_number: Regex::new(r"\d+$").unwrap(),
            trailing_page: Regex::new(r"\s+\d+$").unwrap(),
            numbered_start: Regex::new(r"^\d+\.").unwrap(),
        }
    }

    /// Check if text belongs to a title page: institutional boilerplate, a
    /// personal name, or a short mostly upper-case line.
    ///
    /// Bibliography headers, chapter headings, main-body markers and image
    /// placeholders are never title-page content.
    pub fn is_title_page_content(&self, text: &str) -> bool {
        let upper = text.to_uppercase();

        if is_references_title(&upper) {
            return false;
        }
        if self.heading_vetoes.iter().any(|re| re.is_match(&upper))
            || MAIN_CONTENT_MARKERS.contains(&upper.as_str())
        {
            return false;
        }

        if TITLE_PAGE_MARKERS.iter().any(|m| upper.contains(m)) {
            return true;
        }
        if self.name_patterns.iter().any(|re| re.is_match(text)) {
            return true;
        }

        if text.chars().count() < TITLE_MAX_CHARS {
            if is_image_placeholder(text) {
                return false;
            }
            if let Some(ratio) = uppercase_ratio(text) {
                return ratio > TITLE_UPPER_RATIO
                    && text.split_whitespace().count() <= TITLE_MAX_WORDS
                    && !self.numbered_start.is_match(text);
            }
        }
        false
    }

    /// Check if text is a table-of-contents header.
    pub fn is_contents_header(&self, text: &str) -> bool {
        CONTENT_HEADERS.contains(&text.to_uppercase().as_str())
    }

    /// Check if text is a table-of-contents line ending in a page number.
    ///
    /// A bare chapter label such as `ГЛАВА 1` is not a contents line even
    /// though it ends in a number.
    pub fn is_contents_line(&self, text: &str) -> bool {
        if text.is_empty() || self.chapter_label.is_match(&text.to_uppercase()) {
            return false;
        }
        if self.contents_lines.iter().any(|re| re.is_match(text)) {
            return true;
        }

        if self.trailing_number.is_match(text) {
            let words: Vec<&str> = text.split_whitespace().collect();
            if (2..=8).contains(&words.len()) {
                return words.last().is_some_and(|w| w.parse::<u64>().is_ok());
            }
        }
        false
    }

    /// Check if text marks an assignment sheet, calendar plan or approval
    /// stamp.
    pub fn is_service_content(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        !is_references_title(&upper) && SERVICE_MARKERS.iter().any(|m| upper.contains(m))
    }

    /// Check if text opens the main body.
    ///
    /// Contents lines are excluded first, otherwise chapter titles listed
    /// in the table of contents would end it early.
    pub fn is_main_content_start(&self, text: &str) -> bool {
        if self.is_contents_line(text) {
            return false;
        }
        let upper = text.to_uppercase();
        MAIN_CONTENT_MARKERS.contains(&upper.as_str()) || self.is_numbered_chapter(text)
    }

    /// Check if text is a numbered chapter title (`1. ВВЕДЕНИЕ`, `ГЛАВА 2`)
    /// with no trailing page number.
    pub fn is_numbered_chapter(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        self.chapter_patterns.iter().any(|re| re.is_match(&upper))
            && !self.trailing_page.is_match(text)
    }

    /// Check if text is a known image placeholder.
    pub fn is_image_placeholder(&self, text: &str) -> bool {
        is_image_placeholder(text)
    }
}

impl Default for ContentDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// NFC-normalize and trim paragraph text before detection.
pub fn normalize(text: &str) -> String {
    text.nfc().collect::<String>().trim().to_string()
}

/// Share of upper-case letters among alphabetic characters, or `None` for
/// text without letters.
pub fn uppercase_ratio(text: &str) -> Option<f64> {
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(n, u), c| {
            (n + 1, u + usize::from(c.is_uppercase()))
        });
    (letters > 0).then(|| upper as f64 / letters as f64)
}

fn is_references_title(upper: &str) -> bool {
    REFERENCES_KEYWORDS.iter().any(|k| upper.contains(k))
}

fn is_image_placeholder(text: &str) -> bool {
    let upper = text.to_uppercase();
    IMAGE_PLACEHOLDERS.iter().any(|p| upper.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_page_markers() {
        let d = ContentDetector::new();
        assert!(d.is_title_page_content(
            "Министерство науки и высшего образования Российской Федерации"
        ));
        assert!(d.is_title_page_content("Кафедра информационных систем"));
        assert!(d.is_title_page_content("Выполнил: студент группы ИС-41"));
        assert!(d.is_title_page_content("Петров П.П."));
        assert!(d.is_title_page_content("Иванов Иван Иванович"));
        assert!(d.is_title_page_content("МОСКВА 2024"));
    }

    #[test]
    fn test_title_page_vetoes() {
        let d = ContentDetector::new();
        assert!(!d.is_title_page_content("СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ"));
        assert!(!d.is_title_page_content("1. ВВЕДЕНИЕ"));
        assert!(!d.is_title_page_content("ГЛАВА 1"));
        assert!(!d.is_title_page_content("ЗАКЛЮЧЕНИЕ"));
        assert!(!d.is_title_page_content("АННОТАЦИЯ"));
        assert!(!d.is_title_page_content("[ИЗОБРАЖЕНИЕ]"));
        assert!(!d.is_title_page_content("2. АНАЛИЗ ПРЕДМЕТНОЙ ОБЛАСТИ"));
    }

    #[test]
    fn test_title_page_plain_text() {
        let d = ContentDetector::new();
        assert!(!d.is_title_page_content(
            "В работе рассматриваются методы обработки текстовых документов."
        ));
        assert!(!d.is_title_page_content("12345"));
    }

    #[test]
    fn test_contents_header() {
        let d = ContentDetector::new();
        assert!(d.is_contents_header("СОДЕРЖАНИЕ"));
        assert!(d.is_contents_header("Оглавление"));
        assert!(d.is_contents_header("Table of Contents"));
        assert!(!d.is_contents_header("Содержание работы"));
    }

    #[test]
    fn test_contents_lines() {
        let d = ContentDetector::new();
        assert!(d.is_contents_line("Введение...........3"));
        assert!(d.is_contents_line("1. Обзор литературы..5"));
        assert!(d.is_contents_line("1.1 Подраздел.....8"));
        assert!(d.is_contents_line("Введение    8"));
        assert!(d.is_contents_line("1. Введение    5"));
        assert!(d.is_contents_line("1.1 Недостатки   11"));
        assert!(d.is_contents_line("Определения, обозначения и сокращения5"));
        assert!(d.is_contents_line("Chapter 2 Results 14"));
        assert!(!d.is_contents_line("1. ВВЕДЕНИЕ"));
        assert!(!d.is_contents_line("ГЛАВА 1"));
        assert!(!d.is_contents_line(""));
    }

    #[test]
    fn test_service_content() {
        let d = ContentDetector::new();
        assert!(d.is_service_content("ЗАДАНИЕ НА ВЫПУСКНУЮ КВАЛИФИКАЦИОННУЮ РАБОТУ"));
        assert!(d.is_service_content("Календарный план выполнения"));
        assert!(d.is_service_content("УТВЕРЖДАЮ"));
        assert!(!d.is_service_content("Список литературы"));
        assert!(!d.is_service_content("Обычный текст"));
    }

    #[test]
    fn test_main_content_start() {
        let d = ContentDetector::new();
        assert!(d.is_main_content_start("ВВЕДЕНИЕ"));
        assert!(d.is_main_content_start("Введение"));
        assert!(d.is_main_content_start("1. ВВЕДЕНИЕ"));
        assert!(d.is_main_content_start("1. Введение"));
        assert!(d.is_main_content_start("ГЛАВА 1"));
        assert!(d.is_main_content_start("Реферат"));
        assert!(!d.is_main_content_start("1. Введение    5"));
        assert!(!d.is_main_content_start("Введение...........3"));
        assert!(!d.is_main_content_start("Министерство образования"));
    }

    #[test]
    fn test_numbered_chapter() {
        let d = ContentDetector::new();
        assert!(d.is_numbered_chapter("1. ВВЕДЕНИЕ"));
        assert!(d.is_numbered_chapter("2 Анализ предметной области"));
        assert!(!d.is_numbered_chapter("ВВЕДЕНИЕ"));
        assert!(!d.is_numbered_chapter("1. Введение 5"));
    }

    #[test]
    fn test_normalize_composes_cyrillic() {
        let decomposed = "  И\u{0306}од\n";
        assert_eq!(normalize(decomposed), "Йод");
    }

    #[test]
    fn test_uppercase_ratio() {
        assert_eq!(uppercase_ratio("АБ"), Some(1.0));
        assert_eq!(uppercase_ratio("Аб"), Some(0.5));
        assert_eq!(uppercase_ratio("123 —"), None);
    }
}
