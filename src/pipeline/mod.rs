//! The formatting run: load, global settings, paragraphs, tables, save.

mod batch;
mod formatter;
mod options;
mod statistics;

pub use batch::{default_output_path, BatchItem};
pub use formatter::{ClassifiedParagraph, Classification, FormatOutcome, VkrFormatter};
pub use options::FormatOptions;
pub use statistics::{Statistics, StatisticsReport};
