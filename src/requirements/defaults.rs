//! Built-in ГОСТ requirements.

use super::*;

const TIMES: &str = "Times New Roman";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn spacing(before_pt: f64, after_pt: f64) -> SpacingPt {
    SpacingPt {
        before_pt,
        after_pt,
    }
}

fn special_section(keywords: &[&str]) -> SpecialSection {
    SpecialSection {
        font_name: TIMES.to_string(),
        font_size: 14.0,
        alignment: Alignment::Justify,
        line_spacing: 1.5,
        paragraph_indent_cm: 1.25,
        keywords: strings(keywords),
    }
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            base_formatting: BaseFormatting {
                font_name: TIMES.to_string(),
                font_size: 14.0,
                line_spacing: 1.5,
                text_alignment: Alignment::Justify,
                paragraph_indent_cm: 1.25,
                first_line_indent_cm: 1.25,
                margins_cm: MarginsCm {
                    top: 2.0,
                    bottom: 2.0,
                    left: 3.0,
                    right: 1.5,
                },
            },
            h1_formatting: HeadingFormatting {
                font_name: TIMES.to_string(),
                font_size: 16.0,
                font_weight: FontWeight::Bold,
                text_transform: TextTransform::Uppercase,
                alignment: Alignment::Center,
                page_break_before: true,
                space_before_pt: 0.0,
                space_after_pt: 18.0,
                paragraph_indent_cm: 0.0,
                line_spacing: 1.0,
                detection_patterns: strings(&[
                    r"^\d+\.\s*[А-ЯЁ\s]+$",
                    r"^ГЛАВА\s+\d+",
                    r"^(ВВЕДЕНИЕ|ЗАКЛЮЧЕНИЕ|РЕФЕРАТ)$",
                    r"^[IVX]+\.\s*[А-ЯЁ\s]+$",
                ]),
            },
            h2_formatting: HeadingFormatting {
                font_name: TIMES.to_string(),
                font_size: 14.0,
                font_weight: FontWeight::Bold,
                text_transform: TextTransform::None,
                alignment: Alignment::Left,
                page_break_before: false,
                space_before_pt: 12.0,
                space_after_pt: 6.0,
                paragraph_indent_cm: 2.0,
                line_spacing: 1.5,
                detection_patterns: strings(&[
                    r"^\d+\.\d+\.?\s+[А-Яа-яёЁ]",
                    r"^\d+\.\d+\s+[А-ЯЁ\s]+$",
                ]),
            },
            h3_formatting: HeadingFormatting {
                font_name: TIMES.to_string(),
                font_size: 14.0,
                font_weight: FontWeight::Normal,
                text_transform: TextTransform::None,
                alignment: Alignment::Left,
                page_break_before: false,
                space_before_pt: 6.0,
                space_after_pt: 3.0,
                paragraph_indent_cm: 2.5,
                line_spacing: 1.5,
                detection_patterns: strings(&[
                    r"^\d+\.\d+\.\d+\.?\s+[А-Яа-яёЁ]",
                    r"^\d+\.\d+\.\d+\s+[А-ЯЁ\s]+$",
                ]),
            },
            h4_formatting: HeadingFormatting {
                font_name: TIMES.to_string(),
                font_size: 14.0,
                font_weight: FontWeight::Normal,
                text_transform: TextTransform::None,
                alignment: Alignment::Left,
                page_break_before: false,
                space_before_pt: 3.0,
                space_after_pt: 3.0,
                paragraph_indent_cm: 2.0,
                line_spacing: 1.5,
                detection_patterns: strings(&[
                    r"^\d+\.\d+\.\d+\.\d+\.?\s+[А-Яа-яёЁ]",
                    r"^\d+\.\d+\.\d+\.\d+\s+[А-ЯЁ\s]+$",
                ]),
            },
            special_sections: SpecialSections {
                abstract_section: special_section(&["РЕФЕРАТ", "ABSTRACT"]),
                annotation: special_section(&["ANNOTATION", "АННОТАЦИЯ"]),
                introduction: special_section(&["ВВЕДЕНИЕ", "INTRODUCTION"]),
                conclusion: special_section(&["ЗАКЛЮЧЕНИЕ", "CONCLUSION"]),
                references: ReferencesSection {
                    title: TitleFormatting {
                        font_name: TIMES.to_string(),
                        font_size: 16.0,
                        font_weight: FontWeight::Bold,
                        text_transform: TextTransform::Uppercase,
                        alignment: Alignment::Center,
                        page_break_before: true,
                        space_before_pt: 0.0,
                        space_after_pt: 18.0,
                    },
                    content: ReferencesContent {
                        font_name: TIMES.to_string(),
                        font_size: 14.0,
                        alignment: Alignment::Justify,
                        line_spacing: 1.5,
                        paragraph_indent_cm: 1.5,
                        space_before_pt: 0.0,
                        space_after_pt: 0.0,
                    },
                    keywords: strings(&[
                        "СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ",
                        "СПИСОК ЛИТЕРАТУРЫ",
                        "БИБЛИОГРАФИЧЕСКИЙ СПИСОК",
                        "REFERENCES",
                        "BIBLIOGRAPHY",
                    ]),
                },
            },
            table_of_contents: TableOfContents {
                title: "СОДЕРЖАНИЕ".to_string(),
                font_name: TIMES.to_string(),
                font_size: 14.0,
                alignment: Alignment::Left,
                line_spacing: 1.0,
                dot_leader: true,
                keywords: strings(&["СОДЕРЖАНИЕ", "ОГЛАВЛЕНИЕ", "CONTENTS"]),
            },
            tables: Tables {
                caption: CaptionFormatting {
                    alignment: Alignment::Left,
                    font_name: TIMES.to_string(),
                    font_size: 14.0,
                    font_weight: FontWeight::Normal,
                    line_spacing: 1.0,
                    spacing: spacing(12.0, 6.0),
                },
                table: TableLayout {
                    alignment: Alignment::Center,
                    width_auto: true,
                },
                content: CellFormatting {
                    font_name: TIMES.to_string(),
                    font_size: 12.0,
                    font_weight: FontWeight::Normal,
                    alignment: Alignment::Center,
                    line_spacing: 1.0,
                },
                header: CellFormatting {
                    font_name: TIMES.to_string(),
                    font_size: 12.0,
                    font_weight: FontWeight::Bold,
                    alignment: Alignment::Center,
                    line_spacing: 1.0,
                },
                detection_patterns: strings(&[r"Таблица\s+\d+", r"Табл\.\s+\d+", r"Table\s+\d+"]),
            },
            figures: Figures {
                image: ImageFormatting {
                    alignment: Alignment::Center,
                    spacing: spacing(12.0, 6.0),
                },
                caption: CaptionFormatting {
                    alignment: Alignment::Center,
                    font_name: TIMES.to_string(),
                    font_size: 14.0,
                    font_weight: FontWeight::Normal,
                    line_spacing: 1.0,
                    spacing: spacing(6.0, 12.0),
                },
                detection_patterns: strings(&[r"Рисунок\s+\d+", r"Рис\.\s+\d+", r"Figure\s+\d+"]),
            },
            formulas: Formulas {
                formula: FormulaFormatting {
                    alignment: Alignment::Center,
                    font_name: TIMES.to_string(),
                    font_size: 14.0,
                    spacing: spacing(12.0, 6.0),
                },
                numbering: FormulaFormatting {
                    alignment: Alignment::Right,
                    font_name: TIMES.to_string(),
                    font_size: 14.0,
                    spacing: spacing(0.0, 6.0),
                },
                variables_explanation: ExplanationFormatting {
                    font_name: TIMES.to_string(),
                    font_size: 14.0,
                    alignment: Alignment::Left,
                    line_spacing: 1.5,
                    indent_cm: 1.25,
                    spacing: spacing(6.0, 12.0),
                },
                detection_patterns: FormulaPatterns {
                    formula: strings(&[r"Формула\s+\d+", r"Formula\s+\d+"]),
                    numbering: strings(&[r"\(\d+(\.\d+)*\)$"]),
                    explanation: strings(&[r"где\s+", r"[а-яёА-ЯЁ]\s*[-–—]\s+"]),
                },
            },
            lists: Lists {
                bullet_lists: BulletLists {
                    marker: "–".to_string(),
                    indent_cm: 1.25,
                    punctuation: Punctuation {
                        item_ending: ";".to_string(),
                        last_item_ending: ".".to_string(),
                    },
                    font: ListFont {
                        name: TIMES.to_string(),
                        size: 14.0,
                        line_spacing: 1.5,
                    },
                    alignment: Alignment::Justify,
                    detection_patterns: strings(&[
                        r"^\s*[-–—]\s+",
                        r"^\s*\d+\)\s+",
                        r"^\s*[а-я]\)\s+",
                    ]),
                },
            },
        }
    }
}
