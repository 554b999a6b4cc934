//! Roster upload use-case.
//!
//! # Responsibility
//! - Run loader, normalizer and integrity check over one upload.
//! - Replace the stored roster only when the whole batch is valid.
//!
//! # Invariants
//! - A rejected upload leaves the previous roster untouched.

use crate::ingest::{check_unique_roll_numbers, load_table, normalize_records, IngestError, RawTable};
use crate::repo::student_repo::{StoreError, StudentStore};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

/// Errors from the upload use-case.
#[derive(Debug)]
pub enum UploadError {
    /// The upload itself is invalid; the caller can fix the file.
    Ingest(IngestError),
    /// Storage failed while replacing the roster.
    Store(StoreError),
}

impl Display for UploadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingest(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UploadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ingest(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<IngestError> for UploadError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<StoreError> for UploadError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// Number of stored students.
    pub count: usize,
    /// Distinct `department - year` labels, sorted.
    pub cohorts: Vec<String>,
}

/// Upload use-case over a roster store.
pub struct UploadService<S: StudentStore> {
    store: S,
}

impl<S: StudentStore> UploadService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads a spreadsheet from disk and imports it.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<UploadSummary, UploadError> {
        let started_at = Instant::now();
        let table = load_table(path).map_err(|err| {
            log_rejected(&err, started_at);
            UploadError::Ingest(err)
        })?;
        self.import_table(&table)
    }

    /// Normalizes, checks and stores an already loaded table.
    pub fn import_table(&self, table: &RawTable) -> Result<UploadSummary, UploadError> {
        let started_at = Instant::now();
        let records = normalize_records(table)
            .and_then(|records| check_unique_roll_numbers(&records).map(|()| records))
            .map_err(|err| {
                log_rejected(&err, started_at);
                UploadError::Ingest(err)
            })?;

        let count = self.store.replace_all(&records).map_err(|err| {
            error!(
                "event=upload module=service status=error duration_ms={} error_code=store_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            UploadError::Store(err)
        })?;

        let cohorts: Vec<String> = records
            .iter()
            .map(|record| record.cohort())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        info!(
            "event=upload module=service status=ok students={} cohorts={} duration_ms={}",
            count,
            cohorts.len(),
            started_at.elapsed().as_millis()
        );
        Ok(UploadSummary { count, cohorts })
    }
}

fn log_rejected(err: &IngestError, started_at: Instant) {
    warn!(
        "event=upload module=service status=rejected duration_ms={} error={}",
        started_at.elapsed().as_millis(),
        err
    );
}
