//! # vkrfmt
//!
//! Formatter for graduation theses (ВКР) stored as `.docx`.
//!
//! The library walks the body of a document, decides what every paragraph
//! is (title page, contents, chapter heading, body text, list item,
//! caption, formula, bibliography entry and so on) and rewrites its font,
//! alignment, indentation and spacing to match a set of ГОСТ-style
//! requirements. Page margins and the default font are set as well.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vkrfmt::{format_file, Requirements};
//!
//! let outcome = format_file("thesis.docx", "thesis_formatted.docx", &Requirements::default());
//! if outcome.success {
//!     println!("{} chapters formatted", outcome.statistics.statistics.h1_formatted);
//! }
//! ```
//!
//! ## Features
//!
//! - **Region tracking**: title pages and the table of contents are left alone
//! - **Two classification strategies**: paragraph styles or text patterns
//! - **Idempotent formatting**: running twice gives the same document
//! - **Soft failures**: a bad paragraph is counted, the run continues
//! - **Configurable**: JSON requirements merged over the built-in standard
//! - **Batch mode**: many files in parallel with Rayon

pub mod classify;
pub mod detect;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod requirements;

// Re-export commonly used types
pub use classify::{ParagraphClassifier, ParagraphInput, ParagraphRole, ScanState, StrategyKind};
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use format::{PageBreakMode, ParagraphFormatter};
pub use model::{Alignment, Document, Length, Paragraph, Table};
pub use pipeline::{
    default_output_path, BatchItem, Classification, ClassifiedParagraph, FormatOptions,
    FormatOutcome, Statistics, StatisticsReport, VkrFormatter,
};
pub use report::JsonFormat;
pub use requirements::{HeadingLevel, Requirements};

use chrono::Utc;
use std::path::Path;

/// Format a thesis file with the given requirements.
///
/// Never fails: problems are logged, and `success` is false when the input
/// could not be read, the requirements are invalid or the output could
/// not be written.
///
/// # Example
///
/// ```no_run
/// use vkrfmt::{format_file, Requirements};
///
/// let requirements = Requirements::from_path("gost.json").unwrap();
/// let outcome = format_file("thesis.docx", "out.docx", &requirements);
/// assert!(outcome.success);
/// ```
pub fn format_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    requirements: &Requirements,
) -> FormatOutcome {
    format_file_with_options(input, output, requirements, FormatOptions::default())
}

/// Format a thesis file with custom options.
///
/// # Example
///
/// ```no_run
/// use vkrfmt::{format_file_with_options, FormatOptions, PageBreakMode, Requirements};
///
/// let options = FormatOptions::new()
///     .strict()
///     .with_page_break_mode(PageBreakMode::BreakRun);
/// let outcome = format_file_with_options("thesis.docx", "out.docx", &Requirements::default(), options);
/// ```
pub fn format_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    requirements: &Requirements,
    options: FormatOptions,
) -> FormatOutcome {
    match VkrFormatter::new(requirements.clone()) {
        Ok(formatter) => formatter.with_options(options).format_file(input, output),
        Err(e) => {
            log::error!("{}", e);
            FormatOutcome {
                success: false,
                statistics: StatisticsReport::empty(options.strategy, Utc::now()),
            }
        }
    }
}

/// Classify every paragraph of a file without changing it.
///
/// # Example
///
/// ```no_run
/// use vkrfmt::{classify_file, ParagraphRole};
///
/// let classification = classify_file("thesis.docx").unwrap();
/// for p in &classification.paragraphs {
///     println!("{:>4} {:<24} {}", p.index, p.role, p.text);
/// }
/// ```
pub fn classify_file<P: AsRef<Path>>(path: P) -> Result<Classification> {
    let document = Document::open(path)?;
    VkrFormatter::default().classify_document(&document)
}

/// Load requirements from an optional JSON file, or use the built-in standard.
pub fn load_requirements<P: AsRef<Path>>(path: Option<P>) -> Result<Requirements> {
    match path {
        Some(path) => Requirements::from_path(path),
        None => Ok(Requirements::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_invalid_requirements() {
        let mut requirements = Requirements::default();
        requirements.h1_formatting.font_size = f64::NAN;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        Document::new().save(&input).unwrap();

        let outcome = format_file(&input, dir.path().join("out.docx"), &requirements);
        assert!(!outcome.success);
        assert!(!dir.path().join("out.docx").exists());
    }

    #[test]
    fn test_format_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let output = dir.path().join("out.docx");
        let mut doc = Document::new();
        doc.add_paragraph("ВВЕДЕНИЕ");
        doc.add_paragraph("1. ТЕОРИЯ");
        doc.save(&input).unwrap();

        let outcome = format_file(&input, &output, &Requirements::default());
        assert!(outcome.success);
        assert_eq!(outcome.statistics.statistics.h1_formatted, 1);
        assert!(is_docx(&output));
    }

    #[test]
    fn test_classify_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.docx");
        let mut doc = Document::new();
        doc.add_paragraph("Титульный лист");
        doc.add_paragraph("ВВЕДЕНИЕ");
        doc.add_paragraph("ЗАКЛЮЧЕНИЕ");
        doc.save(&input).unwrap();

        let classification = classify_file(&input).unwrap();
        assert_eq!(classification.paragraphs.len(), 3);
        assert_eq!(classification.paragraphs[0].role, ParagraphRole::Skip);
        assert!(matches!(
            classification.paragraphs[2].role,
            ParagraphRole::Special(_)
        ));
        assert!(classification.state.found_main_content());
    }

    #[test]
    fn test_load_requirements_default() {
        let requirements = load_requirements(None::<&Path>).unwrap();
        assert_eq!(requirements, Requirements::default());
    }

    #[test]
    fn test_detect_format_empty_data() {
        let result = detect_format_from_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }
}
