//! Record sources.
//!
//! The CSV file is the production source; any `Vec<Record>` also works as a
//! source, which keeps the pipeline testable without touching disk.

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use fairsync_shared::{FairSyncError, Record, Result};

/// Something that yields the ordered list of records to render.
pub trait RecordSource {
    /// Load every record in source order.
    ///
    /// `Ok(None)` means the source does not exist at all, which callers treat
    /// as "nothing to render" rather than a failure.
    fn load(&self) -> Result<Option<Vec<Record>>>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Records CSV with a header row (`Folder Name, Title, Date, Location, Time, Description`).
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvRecordSource {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<Vec<Record>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("records file not found");
                return Ok(None);
            }
            Err(e) => return Err(FairSyncError::io("read", &self.path, e)),
        };

        let mut reader = csv::Reader::from_reader(file);
        let records = reader
            .deserialize::<Record>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| FairSyncError::parse(format!("{}: {e}", self.path.display())))?;

        info!(count = records.len(), "read records");
        Ok(Some(records))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl RecordSource for Vec<Record> {
    fn load(&self) -> Result<Option<Vec<Record>>> {
        Ok(Some(self.clone()))
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.len())
    }
}
