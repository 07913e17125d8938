//! Run statistics.

use crate::classify::{ParagraphRole, ScanState, StrategyKind};
use crate::requirements::HeadingLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters accumulated during one formatting run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Body paragraphs seen
    pub total_paragraphs: u32,

    /// Paragraphs classified as `skip`
    pub skipped_paragraphs: u32,

    pub h1_formatted: u32,
    pub h2_formatted: u32,
    pub h3_formatted: u32,
    pub h4_formatted: u32,
    pub lists_formatted: u32,
    pub regular_formatted: u32,

    /// Tables seen
    pub total_tables: u32,

    /// Tables formatted without error
    pub tables_formatted: u32,

    /// Paragraphs, tables and global settings that failed to format
    pub errors: u32,

    /// Successfully handled paragraphs by role name
    pub roles: BTreeMap<String, u32>,
}

impl Statistics {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a paragraph.
    pub fn add_paragraph(&mut self) {
        self.total_paragraphs += 1;
    }

    /// Count a paragraph whose role was applied.
    pub fn record_role(&mut self, role: ParagraphRole) {
        *self.roles.entry(role.as_str().to_string()).or_default() += 1;
        match role {
            ParagraphRole::Skip => self.skipped_paragraphs += 1,
            ParagraphRole::Heading(HeadingLevel::H1) => self.h1_formatted += 1,
            ParagraphRole::Heading(HeadingLevel::H2) => self.h2_formatted += 1,
            ParagraphRole::Heading(HeadingLevel::H3) => self.h3_formatted += 1,
            ParagraphRole::Heading(HeadingLevel::H4) => self.h4_formatted += 1,
            ParagraphRole::List => self.lists_formatted += 1,
            ParagraphRole::Regular => self.regular_formatted += 1,
            _ => {}
        }
    }

    /// Count a table.
    pub fn add_table(&mut self) {
        self.total_tables += 1;
    }

    /// Count a formatted table.
    pub fn table_formatted(&mut self) {
        self.tables_formatted += 1;
    }

    /// Count a failure.
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Number of paragraphs handled with a role.
    pub fn role_count(&self, role: ParagraphRole) -> u32 {
        self.roles.get(role.as_str()).copied().unwrap_or(0)
    }
}

/// Statistics of a finished run, with what the scanner found and timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    /// Counters
    #[serde(flatten)]
    pub statistics: Statistics,

    /// The main body was found
    pub main_content_found: bool,

    /// A bibliography title was found
    pub references_section_detected: bool,

    /// A table of contents was passed before the main body
    pub contents_section_detected: bool,

    /// Title pages skipped before the main body
    pub title_pages_detected: u32,

    /// Strategy used
    pub strategy: StrategyKind,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Run time in milliseconds
    pub duration_ms: i64,
}

impl StatisticsReport {
    /// Combine counters with the final scan state.
    pub fn new(
        statistics: Statistics,
        state: &ScanState,
        strategy: StrategyKind,
        started_at: DateTime<Utc>,
    ) -> Self {
        let finished_at = Utc::now();
        Self {
            statistics,
            main_content_found: state.found_main_content(),
            references_section_detected: state.in_references_section(),
            contents_section_detected: state.contents_seen() && state.found_main_content(),
            title_pages_detected: u32::from(state.found_main_content()),
            strategy,
            started_at,
            finished_at,
            duration_ms: (finished_at - started_at).num_milliseconds(),
        }
    }

    /// Report for a run that never reached the paragraph pass.
    pub fn empty(strategy: StrategyKind, started_at: DateTime<Utc>) -> Self {
        Self::new(Statistics::new(), &ScanState::new(), strategy, started_at)
    }
}
