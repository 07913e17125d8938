//! End-to-end formatting runs over documents built in memory.

use vkrfmt::classify::SpecialSection;
use vkrfmt::{
    Alignment, Document, FormatOptions, HeadingLevel, Length, PageBreakMode, Paragraph,
    ParagraphRole, Requirements, VkrFormatter,
};

fn thesis() -> Document {
    let mut doc = Document::new();
    doc.add_paragraph("МИНИСТЕРСТВО НАУКИ И ВЫСШЕГО ОБРАЗОВАНИЯ");
    doc.add_paragraph("СОДЕРЖАНИЕ");
    doc.add_paragraph("Введение.........3");
    doc.add_paragraph("ВВЕДЕНИЕ");
    doc.add_paragraph("Текст введения.");
    doc.add_styled_paragraph("Теоретическая часть", "Heading 1");
    doc.add_styled_paragraph("1.1 Основные понятия", "Heading 2");
    doc.add_paragraph("Таблица 1 – Результаты");
    doc.add_paragraph("Рисунок 1 – Схема");
    doc.add_paragraph("2. ПРАКТИЧЕСКАЯ ЧАСТЬ");
    doc.add_paragraph("– пункт списка;");
    doc.add_paragraph("ЗАКЛЮЧЕНИЕ");
    doc.add_paragraph("СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ");
    doc.add_paragraph("1. Петров П.П. Статья // Журнал. 2021.");
    doc.add_paragraph("2. Сидоров С.С. Книга. 2019.");
    doc.add_table(2, 2);
    doc
}

fn find<'a>(doc: &'a Document, text: &str) -> &'a Paragraph {
    doc.paragraphs()
        .find(|p| p.text() == text)
        .unwrap_or_else(|| panic!("no paragraph {:?}", text))
}

#[test]
fn test_full_thesis_statistics() {
    let mut doc = thesis();
    let report = VkrFormatter::default().format_document(&mut doc).unwrap();
    let stats = &report.statistics;

    assert_eq!(stats.total_paragraphs, 15);
    assert_eq!(stats.skipped_paragraphs, 3);
    assert_eq!(stats.h1_formatted, 2);
    assert_eq!(stats.h2_formatted, 1);
    assert_eq!(stats.regular_formatted, 1);
    assert_eq!(stats.lists_formatted, 1);
    assert_eq!(stats.role_count(ParagraphRole::TableCaption), 1);
    assert_eq!(stats.role_count(ParagraphRole::FigureCaption), 1);
    assert_eq!(stats.role_count(ParagraphRole::BibliographyEntry), 2);
    assert_eq!(
        stats.role_count(ParagraphRole::Special(SpecialSection::Conclusion)),
        1
    );
    assert_eq!(stats.total_tables, 1);
    assert_eq!(stats.tables_formatted, 1);
    assert_eq!(stats.errors, 0);
    assert!(report.main_content_found);
    assert!(report.contents_section_detected);
    assert!(report.references_section_detected);
}

#[test]
fn test_title_and_contents_untouched() {
    let mut doc = thesis();
    let before = find(&doc, "Введение.........3").clone();
    let title = find(&doc, "МИНИСТЕРСТВО НАУКИ И ВЫСШЕГО ОБРАЗОВАНИЯ").clone();

    VkrFormatter::default().format_document(&mut doc).unwrap();

    assert_eq!(find(&doc, "Введение.........3"), &before);
    assert_eq!(find(&doc, "МИНИСТЕРСТВО НАУКИ И ВЫСШЕГО ОБРАЗОВАНИЯ"), &title);
}

#[test]
fn test_styled_heading_uppercased_without_first_break() {
    let mut doc = thesis();
    VkrFormatter::default().format_document(&mut doc).unwrap();

    let first = find(&doc, "ТЕОРЕТИЧЕСКАЯ ЧАСТЬ");
    assert_eq!(first.alignment(), Some(Alignment::Center));
    assert_eq!(first.page_break_before(), None);
    let runs = first.runs();
    assert!(runs.iter().all(|r| r.bold == Some(true)));

    let second = find(&doc, "2. ПРАКТИЧЕСКАЯ ЧАСТЬ");
    assert_eq!(second.page_break_before(), Some(true));

    let conclusion = find(&doc, "ЗАКЛЮЧЕНИЕ");
    assert_ne!(conclusion.page_break_before(), Some(true));
}

#[test]
fn test_body_paragraph_layout() {
    let mut doc = thesis();
    VkrFormatter::default().format_document(&mut doc).unwrap();

    let body = find(&doc, "Текст введения.");
    assert_eq!(body.alignment(), Some(Alignment::Justify));
    assert_eq!(
        body.indentation().first_line.map(Length::to_twips),
        Some(Length::cm(1.25).to_twips())
    );
    assert_eq!(body.spacing().line, Some(1.5));
    let runs = body.runs();
    assert_eq!(runs[0].font_name.as_deref(), Some("Times New Roman"));
    assert_eq!(runs[0].size.map(|s| s.to_pt()), Some(14.0));
}

#[test]
fn test_formatting_is_idempotent() {
    for mode in [PageBreakMode::Property, PageBreakMode::BreakRun] {
        let formatter =
            VkrFormatter::default().with_options(FormatOptions::new().with_page_break_mode(mode));
        let mut doc = thesis();

        let first = formatter.format_document(&mut doc).unwrap();
        let once: Vec<Paragraph> = doc.paragraphs().cloned().collect();
        let second = formatter.format_document(&mut doc).unwrap();
        let twice: Vec<Paragraph> = doc.paragraphs().cloned().collect();

        assert_eq!(once, twice, "mode {}", mode);
        assert_eq!(first.statistics.h1_formatted, second.statistics.h1_formatted);
    }
}

#[test]
fn test_pattern_strategy_ignores_heading_style() {
    let formatter = VkrFormatter::default().with_options(
        FormatOptions::new().with_strategy(vkrfmt::StrategyKind::Pattern),
    );
    let doc = thesis();

    let classification = formatter.classify_document(&doc).unwrap();
    let styled = classification
        .paragraphs
        .iter()
        .find(|p| p.text == "Теоретическая часть")
        .unwrap();
    assert_ne!(styled.role, ParagraphRole::Heading(HeadingLevel::H1));
    assert_eq!(styled.style, "Heading 1");
}

#[test]
fn test_custom_requirements_applied() {
    let requirements = Requirements::from_json_str(
        r#"{"base_formatting": {"font_name": "Arial", "font_size": 12, "line_spacing": 1.0}}"#,
    )
    .unwrap();
    let mut doc = thesis();

    VkrFormatter::new(requirements)
        .unwrap()
        .format_document(&mut doc)
        .unwrap();

    let body = find(&doc, "Текст введения.");
    assert_eq!(body.runs()[0].font_name.as_deref(), Some("Arial"));
    assert_eq!(body.spacing().line, Some(1.0));
    let (font, size) = doc.styles().default_font();
    assert_eq!(font.as_deref(), Some("Arial"));
    assert_eq!(size.map(|s| s.to_pt()), Some(12.0));
}
