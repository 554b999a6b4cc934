//! Header reconciliation and row cleaning.
//!
//! # Responsibility
//! - Map arbitrary spreadsheet headers onto the four canonical fields.
//! - Trim every field, lower-case departments, drop rows missing a name or
//!   roll number.
//!
//! # Invariants
//! - Output preserves input row order.
//! - Every returned record has a non-empty `name` and `roll_number`.
//! - `year` is never parsed; `"Sem 3"` survives as-is.

use super::table::RawTable;
use super::{IngestError, IngestResult};
use crate::model::student::StudentRecord;
use log::debug;

/// Canonical roster column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Name,
    RollNumber,
    Department,
    Year,
}

impl CanonicalField {
    /// Fields in the order they are resolved and reported.
    pub const ALL: [CanonicalField; 4] = [
        CanonicalField::Name,
        CanonicalField::RollNumber,
        CanonicalField::Department,
        CanonicalField::Year,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::RollNumber => "roll_number",
            Self::Department => "department",
            Self::Year => "year",
        }
    }

    /// Accepted normalized header names, first match wins.
    pub fn alternatives(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name", "student_name", "student"],
            Self::RollNumber => &["roll_number", "roll", "id", "student_id"],
            Self::Department => &["department", "dept", "branch", "program"],
            Self::Year => &["year", "class", "semester", "current_year"],
        }
    }
}

/// Column positions of the canonical fields within a [`RawTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub roll_number: usize,
    pub department: usize,
    pub year: usize,
}

/// Trims, lower-cases and replaces spaces with underscores.
///
/// Only U+0020 is replaced; tabs and other inner whitespace are kept.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Resolves each canonical field to a column.
///
/// # Errors
/// - `Schema` naming the first unresolved field, the alternatives tried and
///   the normalized headers present.
pub fn resolve_columns(headers: &[String]) -> IngestResult<ColumnMap> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let find = |field: CanonicalField| -> IngestResult<usize> {
        field
            .alternatives()
            .iter()
            .find_map(|alt| normalized.iter().position(|header| header == alt))
            .ok_or_else(|| IngestError::Schema {
                field,
                tried_alternatives: field
                    .alternatives()
                    .iter()
                    .map(|alt| alt.to_string())
                    .collect(),
                available_columns: normalized.clone(),
            })
    };

    Ok(ColumnMap {
        name: find(CanonicalField::Name)?,
        roll_number: find(CanonicalField::RollNumber)?,
        department: find(CanonicalField::Department)?,
        year: find(CanonicalField::Year)?,
    })
}

/// Turns a raw table into cleaned roster records.
///
/// # Errors
/// - `Schema` when a canonical column cannot be matched.
/// - `EmptyResult` when no row keeps both a name and a roll number.
pub fn normalize_records(table: &RawTable) -> IngestResult<Vec<StudentRecord>> {
    let columns = resolve_columns(&table.headers)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let cleaned = |column: usize| table.cell(row, column).map(str::trim).unwrap_or("");

        let roll_number = cleaned(columns.roll_number);
        let name = cleaned(columns.name);
        if roll_number.is_empty() || name.is_empty() {
            dropped += 1;
            continue;
        }

        records.push(StudentRecord::new(
            name,
            roll_number,
            cleaned(columns.department).to_lowercase(),
            cleaned(columns.year),
        ));
    }

    debug!(
        "event=normalize module=ingest status=ok kept={} dropped={}",
        records.len(),
        dropped
    );
    if records.is_empty() {
        return Err(IngestError::EmptyResult);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{normalize_header, resolve_columns, CanonicalField};
    use crate::ingest::IngestError;

    #[test]
    fn header_normalization_trims_lowercases_and_underscores() {
        assert_eq!(normalize_header("  Student Name "), "student_name");
        assert_eq!(normalize_header("Current\tYear"), "current\tyear");
        assert_eq!(normalize_header("Roll  No"), "roll__no");
    }

    #[test]
    fn tab_separated_header_does_not_resolve() {
        let headers: Vec<String> = ["Name", "Roll", "Dept", "Current\tYear"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        match resolve_columns(&headers).unwrap_err() {
            IngestError::Schema {
                field,
                available_columns,
                ..
            } => {
                assert_eq!(field, CanonicalField::Year);
                assert_eq!(available_columns[3], "current\tyear");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_listed_alternative_wins() {
        let headers: Vec<String> = ["Student", "Name", "ID", "Roll", "Branch", "Class"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let map = resolve_columns(&headers).unwrap();
        assert_eq!(map.name, 1);
        assert_eq!(map.roll_number, 3);
        assert_eq!(map.department, 4);
        assert_eq!(map.year, 5);
    }

    #[test]
    fn missing_field_reports_alternatives_and_columns() {
        let headers: Vec<String> = ["Name", "Roll", "Year"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        match resolve_columns(&headers).unwrap_err() {
            IngestError::Schema {
                field,
                tried_alternatives,
                available_columns,
            } => {
                assert_eq!(field, CanonicalField::Department);
                assert_eq!(
                    tried_alternatives,
                    vec!["department", "dept", "branch", "program"]
                );
                assert_eq!(available_columns, vec!["name", "roll", "year"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
