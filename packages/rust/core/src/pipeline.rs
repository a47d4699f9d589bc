//! End-to-end `update` pipeline: records → assets → fragments → splice → write.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, instrument, warn};

use fairsync_markup::{RenderOptions, assemble, render};
use fairsync_shared::{AnchorConfig, AppConfig, FairSyncError, MediaConfig, Record, Result};

use crate::assets::AssetLocator;
use crate::records::RecordSource;
use crate::splice::{MarkerSplicer, Splicer};

/// Configuration for the `sync_page` pipeline.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// HTML document to rewrite.
    pub document: PathBuf,
    /// Media inventory settings.
    pub media: MediaConfig,
    /// Fragment rendering options.
    pub render: RenderOptions,
    /// Container markers.
    pub anchor: AnchorConfig,
    /// Compute the outcome but never write the document.
    pub dry_run: bool,
}

impl From<&AppConfig> for SyncConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            document: config.paths.document.clone(),
            media: config.media.clone(),
            render: RenderOptions::from(config),
            anchor: config.anchor.clone(),
            dry_run: false,
        }
    }
}

/// Why there was nothing to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoInputReason {
    /// The record source does not exist.
    SourceMissing,
    /// The source exists but holds no records.
    Empty,
}

/// Terminal state of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum SyncOutcome {
    /// Nothing to render; the document was not touched.
    NoInput { reason: NoInputReason },
    /// The document has no container anchor.
    AnchorNotFound,
    /// The container anchor matched more than once.
    AnchorAmbiguous { matches: usize },
    /// Regenerated content is identical to what is already there.
    Unchanged,
    /// The listing changed. `written` is false for dry runs.
    Updated { written: bool },
}

impl SyncOutcome {
    /// Stable short name used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoInput { .. } => "no-input",
            Self::AnchorNotFound => "anchor-not-found",
            Self::AnchorAmbiguous { .. } => "anchor-ambiguous",
            Self::Unchanged => "unchanged",
            Self::Updated { .. } => "updated",
        }
    }

    /// Process exit code: 0 for success states, 2 for no input, 3 for anchor problems.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Updated { .. } | Self::Unchanged => 0,
            Self::NoInput { .. } => 2,
            Self::AnchorNotFound | Self::AnchorAmbiguous { .. } => 3,
        }
    }
}

/// Per-record summary for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub identifier: String,
    pub title: String,
    pub date: String,
    pub location: String,
    pub asset_count: usize,
}

impl RecordSummary {
    fn new(record: &Record, asset_count: usize) -> Self {
        Self {
            identifier: record.identifier.clone(),
            title: record.title.clone(),
            date: record.date.clone(),
            location: record.location.clone(),
            asset_count,
        }
    }
}

/// Result of the `sync_page` pipeline.
#[derive(Debug)]
pub struct SyncReport {
    pub outcome: SyncOutcome,
    /// Records in input order (empty for `NoInput`).
    pub records: Vec<RecordSummary>,
    /// Document that was (or would have been) rewritten.
    pub document: PathBuf,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each record's fragment is rendered.
    fn record_rendered(&self, identifier: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &SyncReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_rendered(&self, _identifier: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &SyncReport) {}
}

/// Run the full pipeline with the marker-based splicer from `config.anchor`.
pub fn sync_page(
    config: &SyncConfig,
    source: &dyn RecordSource,
    progress: &dyn ProgressReporter,
) -> Result<SyncReport> {
    let splicer = MarkerSplicer::new(&config.anchor)?;
    sync_page_with(config, source, &splicer, progress)
}

/// Run the full pipeline.
///
/// 1. Load records (stop with `NoInput` if there are none)
/// 2. Locate assets and render a fragment per record, in input order
/// 3. Assemble the container block
/// 4. Splice it into the document
/// 5. Write the document back only if it changed
#[instrument(skip_all, fields(source = %source.describe(), document = %config.document.display()))]
pub fn sync_page_with(
    config: &SyncConfig,
    source: &dyn RecordSource,
    splicer: &dyn Splicer,
    progress: &dyn ProgressReporter,
) -> Result<SyncReport> {
    let start = Instant::now();
    let finish = |outcome: SyncOutcome, records: Vec<RecordSummary>| {
        let report = SyncReport {
            outcome,
            records,
            document: config.document.clone(),
            elapsed: start.elapsed(),
        };
        progress.done(&report);
        report
    };

    // --- Phase 1: Records ---
    progress.phase("Reading records");
    let records = match source.load()? {
        None => {
            warn!("record source not found, leaving document untouched");
            let reason = NoInputReason::SourceMissing;
            return Ok(finish(SyncOutcome::NoInput { reason }, Vec::new()));
        }
        Some(records) if records.is_empty() => {
            warn!("record source is empty, leaving document untouched");
            let reason = NoInputReason::Empty;
            return Ok(finish(SyncOutcome::NoInput { reason }, Vec::new()));
        }
        Some(records) => records,
    };

    // --- Phase 2: Render ---
    progress.phase("Rendering records");
    let locator = AssetLocator::from_config(&config.media);
    let total = records.len();
    let mut fragments = Vec::with_capacity(total);
    let mut summaries = Vec::with_capacity(total);

    for (i, record) in records.iter().enumerate() {
        let assets = locator.locate(&record.identifier)?;
        fragments.push(render(record, &assets, &config.render));
        summaries.push(RecordSummary::new(record, assets.len()));
        progress.record_rendered(&record.identifier, i + 1, total);
    }

    // --- Phase 3: Splice ---
    progress.phase("Updating document");
    let block = assemble(&fragments, &config.anchor);
    let document = read_document(&config.document)?;
    let splice = splicer.splice(&document, &block);

    let outcome = match splice.matches {
        0 => {
            warn!("could not find the listing container, no changes made");
            SyncOutcome::AnchorNotFound
        }
        1 if !splice.changed => {
            info!(records = total, "listing already up to date");
            SyncOutcome::Unchanged
        }
        1 => {
            if config.dry_run {
                info!(records = total, "dry run, document not written");
            } else {
                write_document(&config.document, &splice.text)?;
                info!(records = total, "document updated");
            }
            SyncOutcome::Updated {
                written: !config.dry_run,
            }
        }
        matches => {
            warn!(matches, "listing container matched more than once, no changes made");
            SyncOutcome::AnchorAmbiguous { matches }
        }
    };

    Ok(finish(outcome, summaries))
}

/// Load records and count each one's assets without rendering anything.
///
/// Returns `None` when the source does not exist.
#[instrument(skip_all, fields(source = %source.describe()))]
pub fn list_records(
    media: &MediaConfig,
    source: &dyn RecordSource,
) -> Result<Option<Vec<RecordSummary>>> {
    let Some(records) = source.load()? else {
        return Ok(None);
    };

    let locator = AssetLocator::from_config(media);
    records
        .iter()
        .map(|record| {
            let assets = locator.locate(&record.identifier)?;
            Ok(RecordSummary::new(record, assets.len()))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| FairSyncError::io("read", path, e))
}

/// Write to a sibling temp file first, then rename over the target.
///
/// The replacement keeps the target's permissions. The temp file is removed
/// if any step after creating it fails.
pub(crate) fn write_document(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            FairSyncError::validation(format!("{} is not a file path", path.display()))
        })?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| FairSyncError::io("write", &temp, e))?;
    let replaced = copy_permissions(path, &temp).and_then(|()| {
        std::fs::rename(&temp, path).map_err(|e| FairSyncError::io("rename", path, e))
    });

    if replaced.is_err() {
        if let Err(e) = std::fs::remove_file(&temp) {
            warn!(path = %temp.display(), error = %e, "could not remove temp file");
        }
    }
    replaced
}

fn copy_permissions(from: &Path, to: &Path) -> Result<()> {
    match std::fs::metadata(from) {
        Ok(meta) => std::fs::set_permissions(to, meta.permissions())
            .map_err(|e| FairSyncError::io("set permissions on", to, e)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FairSyncError::io("stat", from, e)),
    }
}
