//! Roster import pipeline.
//!
//! # Responsibility
//! - Load an uploaded spreadsheet into a raw string table.
//! - Reconcile headers, clean rows and reject non-unique roll numbers.
//!
//! # Invariants
//! - The pipeline is pure: nothing here touches storage.
//! - Any failure rejects the whole batch.

use crate::model::student::StudentRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod integrity;
pub mod normalize;
pub mod table;

pub use integrity::check_unique_roll_numbers;
pub use normalize::{normalize_records, CanonicalField};
pub use table::{load_table, RawTable, MAX_UPLOAD_BYTES};

pub type IngestResult<T> = Result<T, IngestError>;

/// Errors raised while turning an upload into roster records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// File extension is not a supported spreadsheet format.
    UnsupportedFormat { extension: Option<String> },
    /// File exceeds [`MAX_UPLOAD_BYTES`].
    FileTooLarge { size: u64, limit: u64 },
    /// Sheet has no header row.
    EmptyFile,
    /// Workbook or CSV could not be read.
    Read { message: String },
    /// A canonical column has no matching header.
    Schema {
        field: CanonicalField,
        tried_alternatives: Vec<String>,
        available_columns: Vec<String>,
    },
    /// No row kept a name and roll number after cleaning.
    EmptyResult,
    /// Roll numbers occur more than once.
    Duplicate {
        /// Number of rows involved in duplication.
        count: usize,
        /// Up to three offending rows, in input order.
        examples: Vec<StudentRecord>,
    },
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat {
                extension: Some(extension),
            } => write!(f, "unsupported spreadsheet extension `{extension}`"),
            Self::UnsupportedFormat { extension: None } => {
                write!(f, "upload has no file extension")
            }
            Self::FileTooLarge { size, limit } => {
                write!(f, "upload is {size} bytes, limit is {limit} bytes")
            }
            Self::EmptyFile => write!(f, "the file is empty"),
            Self::Read { message } => write!(f, "failed to read spreadsheet: {message}"),
            Self::Schema {
                field,
                available_columns,
                ..
            } => write!(
                f,
                "required column `{}` not found; available columns: [{}]",
                field.as_str(),
                available_columns.join(", ")
            ),
            Self::EmptyResult => write!(f, "no rows with both name and roll number"),
            Self::Duplicate { count, .. } => {
                write!(f, "{count} rows share a duplicated roll number")
            }
        }
    }
}

impl Error for IngestError {}

impl From<csv::Error> for IngestError {
    fn from(value: csv::Error) -> Self {
        Self::Read {
            message: value.to_string(),
        }
    }
}

impl From<calamine::Error> for IngestError {
    fn from(value: calamine::Error) -> Self {
        Self::Read {
            message: value.to_string(),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(value: std::io::Error) -> Self {
        Self::Read {
            message: value.to_string(),
        }
    }
}
