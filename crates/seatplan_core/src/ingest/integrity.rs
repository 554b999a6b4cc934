//! Batch-level integrity checks.
//!
//! # Invariants
//! - A batch with any repeated roll number is rejected whole; no row is
//!   silently preferred over another.

use super::{IngestError, IngestResult};
use crate::model::student::StudentRecord;
use std::collections::HashMap;

/// Number of duplicate rows echoed back for diagnostics.
pub const DUPLICATE_EXAMPLE_LIMIT: usize = 3;

/// Fails with `Duplicate` when any roll number occurs more than once.
///
/// `count` is the number of rows taking part in a duplication, so two rows
/// sharing `A1` yield `count == 2`.
pub fn check_unique_roll_numbers(records: &[StudentRecord]) -> IngestResult<()> {
    let mut occurrences: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for record in records {
        *occurrences.entry(record.roll_number.as_str()).or_default() += 1;
    }

    let duplicated: Vec<&StudentRecord> = records
        .iter()
        .filter(|record| occurrences[record.roll_number.as_str()] > 1)
        .collect();
    if duplicated.is_empty() {
        return Ok(());
    }

    Err(IngestError::Duplicate {
        count: duplicated.len(),
        examples: duplicated
            .into_iter()
            .take(DUPLICATE_EXAMPLE_LIMIT)
            .cloned()
            .collect(),
    })
}
