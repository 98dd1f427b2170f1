//! Aggregation of per-file results into per-language and grand totals.
//!
//! The [`Aggregator`] is fed by a single consumer, so it needs no locking.
//! Reduction is a plain sum, which makes the result independent of the order
//! in which files arrive.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::debug;

use super::stats::{FileRecord, LanguageAggregate, Locs, Report, SkippedFile};

/// The result of processing one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Counted(FileRecord),
    Skipped(SkippedFile),
}

/// Sequential reducer for [`FileOutcome`]s.
#[derive(Debug, Default)]
pub struct Aggregator {
    per_file: bool,
    file_count: u64,
    total: Locs,
    languages: BTreeMap<String, LanguageAggregate>,
    files: Vec<FileRecord>,
    skipped: Vec<SkippedFile>,
}

impl Aggregator {
    /// Create an aggregator. With `per_file`, file records are retained.
    pub fn new(per_file: bool) -> Self {
        Self {
            per_file,
            ..Self::default()
        }
    }

    /// Fold one outcome into the running totals.
    pub fn push(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Counted(record) => self.add_file(record),
            FileOutcome::Skipped(skipped) => {
                debug!("skipped {}: {}", skipped.path, skipped.reason);
                self.skipped.push(skipped);
            }
        }
    }

    /// Fold one file record into the running totals.
    pub fn add_file(&mut self, record: FileRecord) {
        self.file_count += 1;
        self.total += record.stats;
        self.languages
            .entry(record.language.clone())
            .or_insert_with(|| LanguageAggregate::new(record.language.clone()))
            .add_file(&record);
        if self.per_file {
            self.files.push(record);
        }
    }

    /// Number of files counted so far.
    pub fn file_count(&self) -> u64 {
        self.file_count
    }

    /// Produce the report. Rows are grouped but not yet in presentation order.
    pub fn finish(mut self, root: impl Into<PathBuf>, branch: Option<String>) -> Report {
        self.skipped.sort_by(|a, b| a.path.cmp(&b.path));

        Report {
            root: root.into(),
            branch,
            file_count: self.file_count,
            total: self.total,
            languages: self.languages.into_values().collect(),
            files: self.files,
            per_file: self.per_file,
            skipped: self.skipped,
        }
    }
}

impl Extend<FileOutcome> for Aggregator {
    fn extend<I: IntoIterator<Item = FileOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.push(outcome);
        }
    }
}
