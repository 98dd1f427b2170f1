//! High-level scanning API.
//!
//! A scan runs three stages at once:
//!
//! - a walker thread enumerates eligible files into a bounded channel;
//! - a worker pool classifies them, sending one [`FileOutcome`] per file;
//! - the calling thread folds outcomes into an [`Aggregator`].
//!
//! The outcome channel disconnects once the walker and every worker are done,
//! which is the barrier before the report is finalized. Configuration is
//! validated before any thread is started.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::PolylocError;
use crate::output::write_reports;
use crate::query::{sort_report, ScanConfig};
use crate::source::{relative_path, Candidate, Provisioner, Walker};
use crate::Result;

use super::aggregate::{Aggregator, FileOutcome};
use super::languages::LanguageRegistry;
use super::stats::{FileRecord, Report, SkipReason, SkippedFile};
use super::visitor::Visitor;

/// Candidates buffered between the walker and the workers.
const CHANNEL_CAPACITY: usize = 1024;

/// Bytes inspected for a null byte before a file is treated as binary.
const BINARY_PROBE_LEN: usize = 8 * 1024;

const UTF8_BOM: char = '\u{feff}';

/// Result of [`run`]: the report, plus the outcome of writing it.
///
/// A failed write does not discard the report.
#[derive(Debug)]
pub struct RunOutcome {
    /// Root that was scanned. A provisioned root is left in place for the
    /// caller to remove.
    pub root: PathBuf,
    pub report: Report,
    /// Paths of written artifacts, or the write error
    pub artifacts: Result<Vec<PathBuf>>,
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes[..bytes.len().min(BINARY_PROBE_LEN)].contains(&0)
}

/// Classify one candidate file.
///
/// Never fails: problems with the file become a skip outcome.
pub fn process_file(candidate: &Candidate, registry: &LanguageRegistry) -> FileOutcome {
    let skip = |reason: SkipReason| {
        FileOutcome::Skipped(SkippedFile {
            path: candidate.relative.clone(),
            reason,
        })
    };

    let Some(language) = registry.language_for(candidate.file_name()) else {
        return skip(SkipReason::UnrecognizedLanguage);
    };

    let bytes = match fs::read(&candidate.path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("cannot read {}: {}", candidate.relative, e);
            return skip(SkipReason::Unreadable(e.to_string()));
        }
    };

    if is_binary(&bytes) {
        return skip(SkipReason::Binary);
    }

    let Ok(source) = std::str::from_utf8(&bytes) else {
        return skip(SkipReason::Encoding);
    };
    let source = source.strip_prefix(UTF8_BOM).unwrap_or(source);

    let mut visitor = Visitor::new(language, &candidate.relative);
    visitor.visit_source(source);

    FileOutcome::Counted(FileRecord::new(
        candidate.relative.clone(),
        language.name.clone(),
        visitor.finish(),
    ))
}

/// Count a single file, outside of any scan.
pub fn count_file(path: impl AsRef<Path>, registry: &LanguageRegistry) -> Result<FileOutcome> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PolylocError::PathNotFound(path.to_path_buf()));
    }

    let relative = match path.parent() {
        Some(parent) => relative_path(parent, path),
        None => path.to_string_lossy().into_owned(),
    };
    let candidate = Candidate {
        extension: path
            .extension()
            .map(|e| e.to_string_lossy().into_owned()),
        path: path.to_path_buf(),
        relative,
    };
    Ok(process_file(&candidate, registry))
}

fn build_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .thread_name(|idx| format!("polyloc-worker-{}", idx))
        .build()
        .map_err(|e| PolylocError::ThreadPool(e.to_string()))
}

/// Scan the configured root and return the sorted report.
///
/// Fails only before classification starts (invalid configuration, missing
/// root, worker pool creation). Nothing is written and the output directory
/// is not checked.
pub fn scan(config: &ScanConfig, registry: &LanguageRegistry) -> Result<Report> {
    config.validate_scan()?;

    let pool = build_pool(config.threads)?;
    info!(
        "scanning {} with {} workers",
        config.root.display(),
        pool.current_num_threads()
    );

    let (candidate_tx, candidate_rx) = bounded::<Candidate>(CHANNEL_CAPACITY);
    let (outcome_tx, outcome_rx) = unbounded::<FileOutcome>();
    let mut aggregator = Aggregator::new(config.per_file);

    thread::scope(|scope| {
        scope.spawn(move || {
            for candidate in Walker::new(&config.root, &config.filter) {
                if candidate_tx.send(candidate).is_err() {
                    break;
                }
            }
        });

        scope.spawn(move || {
            pool.install(|| {
                candidate_rx.into_iter().par_bridge().for_each_with(
                    outcome_tx,
                    |tx, candidate| {
                        // The receiver outlives every worker.
                        let _ = tx.send(process_file(&candidate, registry));
                    },
                );
            });
        });

        for outcome in outcome_rx {
            aggregator.push(outcome);
        }
    });

    let mut report = aggregator.finish(&config.root, config.branch.clone());
    sort_report(&mut report, config.ordering);

    info!(
        "counted {} files in {} languages ({} skipped)",
        report.file_count,
        report.languages.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Scan, then write every requested report format.
///
/// The output directory is validated before the scan starts. A write failure
/// after that is reported in [`RunOutcome::artifacts`], never as an `Err`.
pub fn run(config: &ScanConfig, registry: &LanguageRegistry) -> Result<RunOutcome> {
    config.validate()?;
    let report = scan(config, registry)?;
    let artifacts = write_reports(&report, config);
    if let Err(e) = &artifacts {
        warn!("report kept in memory only: {}", e);
    }

    Ok(RunOutcome {
        root: config.root.clone(),
        report,
        artifacts,
    })
}

/// Acquire `location` through a provisioner, then [`run`] on the result.
///
/// The configuration's root is replaced by the provisioned directory; its
/// branch is handed to the provisioner.
pub fn run_provisioned<P: Provisioner + ?Sized>(
    provisioner: &P,
    location: &str,
    config: ScanConfig,
    registry: &LanguageRegistry,
) -> Result<RunOutcome> {
    let root = provisioner.provision(location, config.branch.as_deref())?;
    debug!("provisioned {} at {}", location, root.display());

    let config = ScanConfig { root, ..config };
    run(&config, registry)
}
