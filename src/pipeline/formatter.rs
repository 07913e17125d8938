//! The document formatter.

use super::options::FormatOptions;
use super::statistics::{Statistics, StatisticsReport};
use crate::classify::{ParagraphClassifier, ParagraphInput, ParagraphRole, ScanState};
use crate::error::Result;
use crate::format::{apply_global_settings, format_table, ParagraphFormatter};
use crate::model::Document;
use crate::requirements::Requirements;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Result of formatting a file. The run never fails past this point;
/// `success` is false only when the input could not be loaded or the
/// output could not be written.
#[derive(Debug, Clone, Serialize)]
pub struct FormatOutcome {
    /// The output file was written
    pub success: bool,
    /// What the run did
    pub statistics: StatisticsReport,
}

/// Role of one body paragraph, from a dry run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedParagraph {
    /// Zero-based position among body paragraphs
    pub index: usize,
    pub role: ParagraphRole,
    /// Resolved style name
    pub style: String,
    pub text: String,
}

/// Roles of every body paragraph and the final scan state.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub paragraphs: Vec<ClassifiedParagraph>,
    pub state: ScanState,
}

impl Classification {
    /// Number of paragraphs with a role.
    pub fn count(&self, role: ParagraphRole) -> usize {
        self.paragraphs.iter().filter(|p| p.role == role).count()
    }
}

/// Formats thesis documents against a set of requirements.
///
/// A formatter holds only read-only configuration. Each run creates its
/// own classifier, scan state and statistics, so one formatter can serve
/// many documents, also from several threads.
///
/// # Example
///
/// ```no_run
/// use vkrfmt::{FormatOptions, Requirements, VkrFormatter};
///
/// let formatter = VkrFormatter::new(Requirements::default())?
///     .with_options(FormatOptions::new().strict());
/// let outcome = formatter.format_file("thesis.docx", "thesis_formatted.docx");
/// println!("success: {}, headings: {}", outcome.success, outcome.statistics.statistics.h1_formatted);
/// # Ok::<(), vkrfmt::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct VkrFormatter {
    requirements: Requirements,
    options: FormatOptions,
}

impl VkrFormatter {
    /// Create a formatter. The requirements are validated once here.
    pub fn new(requirements: Requirements) -> Result<Self> {
        requirements.validate()?;
        Ok(Self {
            requirements,
            options: FormatOptions::default(),
        })
    }

    /// Set the options.
    pub fn with_options(mut self, options: FormatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Format a document in memory.
    ///
    /// Failures of single paragraphs, tables or the global settings are
    /// logged and counted in `errors`; they never stop the run.
    pub fn format_document(&self, document: &mut Document) -> Result<StatisticsReport> {
        self.run(document, Utc::now())
    }

    /// Load, format and save a document.
    pub fn format_file<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> FormatOutcome {
        let (input, output) = (input.as_ref(), output.as_ref());
        let started_at = Utc::now();
        log::info!("Formatting {} -> {}", input.display(), output.display());

        let mut document = match Document::open(input) {
            Ok(document) => document,
            Err(e) => {
                log::error!("Cannot load {}: {}", input.display(), e);
                return self.failed(started_at);
            }
        };
        let report = match self.run(&mut document, started_at) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Formatting {} failed: {}", input.display(), e);
                return self.failed(started_at);
            }
        };

        match document.save(output) {
            Ok(()) => {
                log::info!("Saved {}", output.display());
                FormatOutcome {
                    success: true,
                    statistics: report,
                }
            }
            Err(e) => {
                log::error!("Cannot save {}: {}", output.display(), e);
                FormatOutcome {
                    success: false,
                    statistics: report,
                }
            }
        }
    }

    /// Like [`format_file`](Self::format_file), but reports load and save
    /// failures as errors.
    pub fn try_format_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<StatisticsReport> {
        let started_at = Utc::now();
        let mut document = Document::open(input)?;
        let report = self.run(&mut document, started_at)?;
        document.save(output)?;
        Ok(report)
    }

    /// Format a document held in memory and return the new bytes.
    pub fn format_bytes(&self, data: &[u8]) -> Result<(Vec<u8>, StatisticsReport)> {
        let started_at = Utc::now();
        let mut document = Document::from_bytes(data)?;
        let report = self.run(&mut document, started_at)?;
        Ok((document.to_bytes()?, report))
    }

    /// Classify every body paragraph without changing the document.
    pub fn classify_document(&self, document: &Document) -> Result<Classification> {
        let mut classifier = ParagraphClassifier::new(&self.requirements, self.options.strategy)?;
        let paragraphs = document
            .paragraphs()
            .enumerate()
            .map(|(index, paragraph)| {
                let input = ParagraphInput::from_paragraph(document, paragraph);
                let role = classifier.classify(&input);
                ClassifiedParagraph {
                    index,
                    role,
                    style: input.style_name,
                    text: input.text,
                }
            })
            .collect();
        Ok(Classification {
            paragraphs,
            state: classifier.state().clone(),
        })
    }

    /// Format a file on the blocking thread pool, reading and writing with
    /// async I/O. Dropping the future abandons the run as a whole.
    #[cfg(feature = "async")]
    pub async fn format_file_async<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> FormatOutcome {
        let (input, output) = (input.as_ref(), output.as_ref());
        let started_at = Utc::now();

        let data = match tokio::fs::read(input).await {
            Ok(data) => data,
            Err(e) => {
                log::error!("Cannot load {}: {}", input.display(), e);
                return self.failed(started_at);
            }
        };

        let formatter = self.clone();
        let formatted = tokio::task::spawn_blocking(move || formatter.format_bytes(&data)).await;
        let (bytes, report) = match formatted {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                log::error!("Formatting {} failed: {}", input.display(), e);
                return self.failed(started_at);
            }
            Err(e) => {
                log::error!("Formatting task failed: {}", e);
                return self.failed(started_at);
            }
        };

        let success = match tokio::fs::write(output, bytes).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Cannot save {}: {}", output.display(), e);
                false
            }
        };
        FormatOutcome {
            success,
            statistics: report,
        }
    }

    fn run(&self, document: &mut Document, started_at: DateTime<Utc>) -> Result<StatisticsReport> {
        let mut stats = Statistics::new();
        let mut classifier = ParagraphClassifier::new(&self.requirements, self.options.strategy)?;

        if self.options.apply_global_settings {
            log::info!("Applying global settings");
            if let Err(e) = apply_global_settings(document, &self.requirements) {
                log::warn!("Global settings: {}", e);
                stats.add_error();
            }
        }

        let inputs: Vec<ParagraphInput> = {
            let doc: &Document = document;
            doc.paragraphs()
                .map(|p| ParagraphInput::from_paragraph(doc, p))
                .collect()
        };
        log::info!("Scanning {} paragraphs", inputs.len());

        let mut formatter = ParagraphFormatter::new(&self.requirements)
            .with_page_break_mode(self.options.page_break_mode);
        for (index, (paragraph, input)) in document.paragraphs_mut().zip(&inputs).enumerate() {
            stats.add_paragraph();
            let role = classifier.classify(input);
            match formatter.apply(role, paragraph) {
                Ok(()) => {
                    log::debug!("#{} {}: {}", index + 1, role, preview(&input.text));
                    stats.record_role(role);
                }
                Err(e) => {
                    log::warn!("Paragraph {} ({}): {}", index + 1, role, e);
                    stats.add_error();
                }
            }
        }

        if self.options.process_tables {
            for (index, table) in document.tables_mut().enumerate() {
                stats.add_table();
                match format_table(table, &self.requirements) {
                    Ok(()) => stats.table_formatted(),
                    Err(e) => {
                        log::warn!("Table {}: {}", index + 1, e);
                        stats.add_error();
                    }
                }
            }
            log::info!("Formatted {} of {} tables", stats.tables_formatted, stats.total_tables);
        }

        let report = StatisticsReport::new(stats, classifier.state(), self.options.strategy, started_at);
        log::info!(
            "Done: {} paragraphs, {} skipped, {} errors",
            report.statistics.total_paragraphs,
            report.statistics.skipped_paragraphs,
            report.statistics.errors
        );
        Ok(report)
    }

    fn failed(&self, started_at: DateTime<Utc>) -> FormatOutcome {
        FormatOutcome {
            success: false,
            statistics: StatisticsReport::empty(self.options.strategy, started_at),
        }
    }
}

impl Default for VkrFormatter {
    fn default() -> Self {
        Self {
            requirements: Requirements::default(),
            options: FormatOptions::default(),
        }
    }
}

fn preview(text: &str) -> String {
    text.trim().chars().take(60).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::StrategyKind;
    use crate::requirements::HeadingLevel;

    fn thesis() -> Document {
        let mut doc = Document::new();
        for text in [
            "МИНИСТЕРСТВО НАУКИ И ВЫСШЕГО ОБРАЗОВАНИЯ",
            "ВЫПУСКНАЯ КВАЛИФИКАЦИОННАЯ РАБОТА",
            "СОДЕРЖАНИЕ",
            "Введение...........3",
            "1. Анализ    5",
            "ВВЕДЕНИЕ",
            "Актуальность темы обусловлена ростом объёма документов.",
            "1. АНАЛИЗ",
            "Текст первой главы.",
            "– первый пункт;",
            "2. РАЗРАБОТКА",
            "Текст второй главы.",
            "СПИСОК ЛИТЕРАТУРЫ",
            "1. Иванов И.И. Книга. — М., 2020.",
            "— 200 с.",
        ] {
            doc.add_paragraph(text);
        }
        doc
    }

    #[test]
    fn test_format_document_statistics() {
        let formatter = VkrFormatter::default();
        let mut doc = thesis();

        let report = formatter.format_document(&mut doc).unwrap();
        let stats = &report.statistics;

        assert_eq!(stats.total_paragraphs, 15);
        assert_eq!(stats.skipped_paragraphs, 5);
        assert_eq!(stats.h1_formatted, 2);
        assert_eq!(stats.lists_formatted, 1);
        assert_eq!(stats.regular_formatted, 3);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.role_count(ParagraphRole::ReferencesHeader), 1);
        assert_eq!(stats.role_count(ParagraphRole::BibliographyEntry), 1);
        assert_eq!(stats.role_count(ParagraphRole::BibliographyContinuation), 1);
        assert!(report.main_content_found);
        assert!(report.contents_section_detected);
        assert!(report.references_section_detected);
    }

    #[test]
    fn test_first_chapter_has_no_page_break() {
        let formatter = VkrFormatter::default();
        let mut doc = thesis();
        formatter.format_document(&mut doc).unwrap();

        let breaks: Vec<Option<bool>> = doc
            .paragraphs()
            .filter(|p| p.text() == "1. АНАЛИЗ" || p.text() == "2. РАЗРАБОТКА")
            .map(|p| p.page_break_before())
            .collect();
        assert_eq!(breaks, vec![None, Some(true)]);
    }

    #[test]
    fn test_errors_are_counted_not_fatal() {
        let mut requirements = Requirements::default();
        requirements.base_formatting.line_spacing = -1.0;
        let formatter = VkrFormatter {
            requirements,
            options: FormatOptions::default(),
        };
        let mut doc = thesis();

        let report = formatter.format_document(&mut doc).unwrap();

        assert_eq!(report.statistics.errors, 3);
        assert_eq!(report.statistics.regular_formatted, 0);
        assert_eq!(report.statistics.h1_formatted, 2);
    }

    #[test]
    fn test_invalid_requirements_rejected() {
        let mut requirements = Requirements::default();
        requirements.lists.bullet_lists.detection_patterns.clear();
        assert!(VkrFormatter::new(requirements).is_err());
    }

    #[test]
    fn test_classify_document_is_dry_run() {
        let formatter = VkrFormatter::default();
        let doc = thesis();
        let before: Vec<_> = doc.paragraphs().cloned().collect();

        let classification = formatter.classify_document(&doc).unwrap();

        assert_eq!(classification.paragraphs.len(), 15);
        assert_eq!(classification.count(ParagraphRole::Heading(HeadingLevel::H1)), 2);
        assert_eq!(classification.paragraphs[3].role, ParagraphRole::Skip);
        assert!(classification.state.in_references_section());
        assert!(doc.paragraphs().eq(before.iter()));
    }

    #[test]
    fn test_tables_pass() {
        let formatter = VkrFormatter::default();
        let mut doc = thesis();
        doc.add_table(2, 2);
        doc.add_table(1, 3);

        let report = formatter.format_document(&mut doc).unwrap();
        assert_eq!(report.statistics.total_tables, 2);
        assert_eq!(report.statistics.tables_formatted, 2);

        let formatter = formatter.with_options(FormatOptions::new().with_tables(false));
        let report = formatter.format_document(&mut doc).unwrap();
        assert_eq!(report.statistics.total_tables, 0);
    }

    #[test]
    fn test_missing_input_fails_softly() {
        let formatter = VkrFormatter::default();
        let outcome = formatter.format_file("/nonexistent/thesis.docx", "/tmp/out.docx");
        assert!(!outcome.success);
        assert_eq!(outcome.statistics.statistics.total_paragraphs, 0);
        assert!(formatter
            .try_format_file("/nonexistent/thesis.docx", "/tmp/out.docx")
            .is_err());
    }

    #[test]
    fn test_format_bytes() {
        let formatter =
            VkrFormatter::default().with_options(FormatOptions::new().with_strategy(StrategyKind::Pattern));
        let data = thesis().to_bytes().unwrap();

        let (bytes, report) = formatter.format_bytes(&data).unwrap();
        let reopened = Document::from_bytes(&bytes).unwrap();

        assert_eq!(report.strategy, StrategyKind::Pattern);
        assert!(reopened.paragraphs().any(|p| p.text() == "1. АНАЛИЗ"));
    }
}
