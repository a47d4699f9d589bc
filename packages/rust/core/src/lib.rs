//! Core pipeline orchestration for fairsync.
//!
//! This crate ties together record loading, asset discovery, fragment
//! rendering and document splicing into the end-to-end `sync_page` workflow,
//! and builds the JSON image manifest for the front-end carousel.

pub mod assets;
pub mod manifest;
pub mod pipeline;
pub mod records;
pub mod splice;

pub use assets::AssetLocator;
pub use manifest::{ImageManifest, build_manifest, write_manifest};
pub use pipeline::{
    NoInputReason, ProgressReporter, RecordSummary, SilentProgress, SyncConfig, SyncOutcome,
    SyncReport, list_records, sync_page, sync_page_with,
};
pub use records::{CsvRecordSource, RecordSource};
pub use splice::{MarkerSplicer, Splice, Splicer};
