//! Success and error payloads.

use crate::ingest::IngestError;
use crate::model::student::{SeatAssignment, StudentRecord};
use crate::repo::student_repo::StoreError;
use crate::seating::SeatingPlan;
use crate::service::seating_service::{DataCheck, SeatingError};
use crate::service::upload_service::{UploadError, UploadSummary};
use serde::Serialize;

/// Body returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    /// Sorted distinct `department - year` labels.
    pub departments: Vec<String>,
}

impl From<UploadSummary> for UploadResponse {
    fn from(summary: UploadSummary) -> Self {
        Self {
            success: true,
            message: format!("Uploaded {} student records", summary.count),
            count: summary.count,
            departments: summary.cohorts,
        }
    }
}

/// One seated student as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatRow {
    pub name: String,
    pub roll_number: String,
    pub department: String,
    pub year: String,
    pub room: String,
    pub seat: usize,
}

impl From<&SeatAssignment> for SeatRow {
    fn from(assignment: &SeatAssignment) -> Self {
        Self {
            name: assignment.student.name.clone(),
            roll_number: assignment.student.roll_number.clone(),
            department: assignment.student.department.clone(),
            year: assignment.student.year.clone(),
            room: assignment.room(),
            seat: assignment.seat,
        }
    }
}

/// Flattens a plan into rows, room 1 first.
pub fn seat_rows(plan: &SeatingPlan) -> Vec<SeatRow> {
    plan.assignments.iter().map(SeatRow::from).collect()
}

/// Body returned by the roster diagnostics check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataCheckResponse {
    pub student_count: usize,
    pub sample_students: Vec<StudentRecord>,
    pub available_departments: Vec<String>,
}

impl From<DataCheck> for DataCheckResponse {
    fn from(check: DataCheck) -> Self {
        Self {
            student_count: check.student_count,
            sample_students: check.sample,
            available_departments: check.cohorts,
        }
    }
}

/// Structured error body. Optional fields are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<StudentRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<String>>,
}

impl ErrorPayload {
    fn new(status: u16, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
            solution: None,
            requested: None,
            available: None,
            count: None,
            examples: None,
            available_columns: None,
            expected_names: None,
            departments: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    /// Whether the caller can fix the request (4xx) rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    fn from_store(err: &StoreError, error: &str, solution: &str) -> Self {
        match err {
            StoreError::Conflict { message } => {
                Self::new(409, "Another upload is in progress")
                    .with_details(message.clone())
                    .with_solution("Retry once the current upload finishes")
            }
            other => Self::new(500, error)
                .with_details(other.to_string())
                .with_solution(solution),
        }
    }
}

impl From<&IngestError> for ErrorPayload {
    fn from(err: &IngestError) -> Self {
        match err {
            IngestError::UnsupportedFormat { .. } => {
                Self::new(400, "Only .xls, .xlsx, .xlsm, .ods and .csv files allowed")
            }
            IngestError::FileTooLarge { .. } => {
                Self::new(413, "File exceeds the 5 MiB upload limit").with_details(err.to_string())
            }
            IngestError::EmptyFile => Self::new(400, "The file is empty"),
            IngestError::Read { message } => Self::new(500, "Upload failed")
                .with_details(message.clone())
                .with_solution("Check your file format and try again"),
            IngestError::Schema {
                field,
                tried_alternatives,
                available_columns,
            } => {
                let mut payload = Self::new(
                    400,
                    format!("Required column '{}' not found", field.as_str()),
                );
                payload.available_columns = Some(available_columns.clone());
                payload.expected_names = Some(tried_alternatives.clone());
                payload
            }
            IngestError::EmptyResult => Self::new(400, "No valid student rows found")
                .with_solution("Ensure every row has a name and a roll number"),
            IngestError::Duplicate { count, examples } => {
                let mut payload = Self::new(400, "Duplicate roll numbers found");
                payload.count = Some(*count);
                payload.examples = Some(examples.clone());
                payload
            }
        }
    }
}

impl From<&UploadError> for ErrorPayload {
    fn from(err: &UploadError) -> Self {
        match err {
            UploadError::Ingest(err) => Self::from(err),
            UploadError::Store(err) => Self::from_store(
                err,
                "Upload failed",
                "Check your file format and try again",
            ),
        }
    }
}

impl From<&SeatingError> for ErrorPayload {
    fn from(err: &SeatingError) -> Self {
        match err {
            SeatingError::MalformedRequest(message) => Self::new(400, "Request must be JSON")
                .with_details(message.clone())
                .with_solution("Send a JSON object body"),
            SeatingError::NoCohortsRequested => Self::new(400, "No valid departments provided")
                .with_solution("Provide at least one department"),
            SeatingError::InvalidParameter { .. } => Self::new(400, "Invalid numeric parameters")
                .with_details(err.to_string())
                .with_solution("Provide valid integers for classrooms and studentsPerClass"),
            SeatingError::NoMatch {
                requested,
                available,
            } => {
                let mut payload = Self::new(400, "No matching departments found");
                payload.requested = Some(requested.clone());
                payload.available = Some(available.clone());
                payload
            }
            SeatingError::NoStudents { cohorts } => {
                let mut payload = Self::new(404, "No students found");
                payload.departments = Some(cohorts.clone());
                payload
            }
            SeatingError::Store(err) => Self::from_store(
                err,
                "Unexpected error",
                "Check the seatplan log for more information",
            ),
        }
    }
}
