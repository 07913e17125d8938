//! Formatting many files at once.

use super::formatter::{FormatOutcome, VkrFormatter};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Suffix added to the stem of formatted files.
const OUTPUT_SUFFIX: &str = "_formatted";

/// Outcome of one file in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
    pub outcome: FormatOutcome,
}

impl BatchItem {
    pub fn succeeded(&self) -> bool {
        self.outcome.success
    }
}

/// Output path next to the input: `thesis.docx` becomes `thesis_formatted.docx`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_file_name(output_file_name(input))
}

fn output_file_name(input: &Path) -> String {
    numbered_output_name(input, 1)
}

/// `<stem>_formatted.docx`, or `<stem>_formatted_<n>.docx` for n > 1.
fn numbered_output_name(input: &Path, n: usize) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    if n > 1 {
        format!("{}{}_{}.docx", stem, OUTPUT_SUFFIX, n)
    } else {
        format!("{}{}.docx", stem, OUTPUT_SUFFIX)
    }
}

/// One output path per input. Inputs sharing a file stem are numbered in
/// input order; names are compared ignoring case.
fn batch_output_paths(inputs: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    inputs
        .iter()
        .map(|input| {
            let key = output_file_name(input).to_lowercase();
            let n = seen.entry(key).or_insert(0);
            *n += 1;
            if *n > 1 {
                log::warn!(
                    "{} shares its name with an earlier input, numbering output {}",
                    input.display(),
                    n
                );
            }
            output_dir.join(numbered_output_name(input, *n))
        })
        .collect()
}

impl VkrFormatter {
    /// Format several files in parallel.
    ///
    /// Each file gets its own run; a failed file does not affect the
    /// others. Outputs are written to `output_dir` as `<stem>_formatted.docx`,
    /// numbered when stems repeat, and results come back in input order.
    pub fn format_batch(&self, inputs: &[PathBuf], output_dir: &Path) -> Vec<BatchItem> {
        log::info!(
            "Formatting {} files into {}",
            inputs.len(),
            output_dir.display()
        );

        let outputs = batch_output_paths(inputs, output_dir);
        let items: Vec<BatchItem> = inputs
            .par_iter()
            .zip(outputs.into_par_iter())
            .map(|(input, output)| {
                let outcome = self.format_file(input, &output);
                BatchItem {
                    input: input.clone(),
                    output,
                    outcome,
                }
            })
            .collect();

        let failed = items.iter().filter(|item| !item.succeeded()).count();
        if failed > 0 {
            log::warn!("{} of {} files failed", failed, items.len());
        }
        items
    }
}
