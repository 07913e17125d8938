//! Formatting options.

use crate::classify::StrategyKind;
use crate::format::PageBreakMode;
use serde::{Deserialize, Serialize};

/// Options for a formatting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// How headings and lists are recognized
    pub strategy: StrategyKind,

    /// How page breaks before chapters are written
    pub page_break_mode: PageBreakMode,

    /// Whether to set page margins and the default font
    pub apply_global_settings: bool,

    /// Whether to format tables
    pub process_tables: bool,
}

impl FormatOptions {
    /// Create new format options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Trust paragraph styles only; plain paragraphs are body text.
    pub fn strict(mut self) -> Self {
        self.strategy = StrategyKind::StrictStyle;
        self
    }

    /// Set the page-break mode.
    pub fn with_page_break_mode(mut self, mode: PageBreakMode) -> Self {
        self.page_break_mode = mode;
        self
    }

    /// Enable or disable margins and default font.
    pub fn with_global_settings(mut self, apply: bool) -> Self {
        self.apply_global_settings = apply;
        self
    }

    /// Enable or disable table formatting.
    pub fn with_tables(mut self, process: bool) -> Self {
        self.process_tables = process;
        self
    }

    /// Format paragraphs only.
    pub fn paragraphs_only(mut self) -> Self {
        self.apply_global_settings = false;
        self.process_tables = false;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Style,
            page_break_mode: PageBreakMode::Property,
            apply_global_settings: true,
            process_tables: true,
        }
    }
}
