//! Raw spreadsheet loading.
//!
//! # Responsibility
//! - Enforce upload guards (extension allow-list, size limit).
//! - Read the first worksheet (or a CSV file) into string cells.
//!
//! # Invariants
//! - The first row is always the header row.
//! - Missing or empty cells are `None`; no type inference beyond rendering
//!   integral numbers without a fractional part.

use super::{IngestError, IngestResult};
use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use std::io::Read;
use std::path::Path;

/// Largest accepted upload, 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "ods"];
const CSV_EXTENSION: &str = "csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetFormat {
    Workbook,
    Csv,
}

impl SheetFormat {
    fn from_path(path: &Path) -> IngestResult<Self> {
        let extension = path
            .extension()
            .and_then(|value| value.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some(CSV_EXTENSION) => Ok(Self::Csv),
            Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => Ok(Self::Workbook),
            _ => Err(IngestError::UnsupportedFormat { extension }),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Workbook => "workbook",
            Self::Csv => "csv",
        }
    }
}

/// Header row plus data rows, all as optional strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Builds a table from string literals, treating `""` as a missing cell.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self {
            headers: headers.iter().map(|header| header.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| non_empty(cell)).collect())
                .collect(),
        }
    }

    /// Reads CSV text; the first record is the header row.
    pub fn from_csv_reader(reader: impl Read) -> IngestResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(index, header)| header_or_placeholder(non_empty(header), index))
            .collect();
        if headers.is_empty() {
            return Err(IngestError::EmptyFile);
        }

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(non_empty).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Returns the cell at `column` in `row`, `None` for short rows.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }
}

/// Loads an uploaded spreadsheet from disk.
///
/// # Errors
/// - `UnsupportedFormat` for extensions outside the allow-list.
/// - `FileTooLarge` above [`MAX_UPLOAD_BYTES`].
/// - `EmptyFile` when the sheet has no header row.
/// - `Read` when the workbook or CSV cannot be parsed.
pub fn load_table(path: impl AsRef<Path>) -> IngestResult<RawTable> {
    let path = path.as_ref();
    let format = SheetFormat::from_path(path)?;

    let size = std::fs::metadata(path)?.len();
    if size > MAX_UPLOAD_BYTES {
        return Err(IngestError::FileTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    debug!(
        "event=table_load module=ingest status=start format={} size_bytes={}",
        format.as_str(),
        size
    );

    let table = match format {
        SheetFormat::Csv => RawTable::from_csv_reader(std::fs::File::open(path)?)?,
        SheetFormat::Workbook => load_first_worksheet(path)?,
    };

    info!(
        "event=table_load module=ingest status=ok format={} columns={} rows={}",
        format.as_str(),
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

fn load_first_worksheet(path: &Path) -> IngestResult<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyFile)??;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(index, cell)| header_or_placeholder(cell_text(cell), index))
            .collect(),
        None => return Err(IngestError::EmptyFile),
    };

    let rows = sheet_rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    Ok(RawTable { headers, rows })
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(value) => Some(value.clone()),
        Data::Float(value) if value.fract() == 0.0 && fits_i64(*value) => {
            Some(format!("{}", *value as i64))
        }
        other => Some(other.to_string()),
    }
}

// 2^63 is exactly representable; anything at or above it would saturate.
fn fits_i64(value: f64) -> bool {
    (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&value)
}

fn header_or_placeholder(header: Option<String>, index: usize) -> String {
    header.unwrap_or_else(|| format!("Unnamed: {index}"))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
