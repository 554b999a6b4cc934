//! Student roster records and seat assignments.
//!
//! # Responsibility
//! - Hold one cleaned roster row.
//! - Derive the `department - year` cohort label used for filtering.
//!
//! # Invariants
//! - `department` is stored lower-cased.
//! - `year` is free-form text (`"2"`, `"2nd Year"`, `"Sem 3"`).

use serde::{Deserialize, Serialize};

/// Separator between department and year in a cohort label.
pub const COHORT_SEPARATOR: &str = " - ";

/// Builds the cohort label for a department/year pair.
pub fn cohort_label(department: &str, year: &str) -> String {
    format!("{department}{COHORT_SEPARATOR}{year}")
}

/// One normalized student row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    /// Unique, non-empty identifier within a stored roster.
    pub roll_number: String,
    pub department: String,
    pub year: String,
}

impl StudentRecord {
    pub fn new(
        name: impl Into<String>,
        roll_number: impl Into<String>,
        department: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            roll_number: roll_number.into(),
            department: department.into(),
            year: year.into(),
        }
    }

    /// Returns the `department - year` display label.
    pub fn cohort(&self) -> String {
        cohort_label(&self.department, &self.year)
    }
}

/// Seat given to one student for one seating request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub student: StudentRecord,
    /// Zero-based room position in the plan.
    pub room_index: usize,
    /// One-based seat within the room.
    pub seat: usize,
}

impl SeatAssignment {
    /// Display label of the room, `Room 1` for index 0.
    pub fn room(&self) -> String {
        format!("Room {}", self.room_index + 1)
    }
}
