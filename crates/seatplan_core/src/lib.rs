//! Core domain logic for the exam seating planner.
//! This crate is the single source of truth for roster and seating invariants.

pub mod api;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod repo;
pub mod seating;
pub mod service;

pub use ingest::{CanonicalField, IngestError, RawTable};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::student::{SeatAssignment, StudentRecord};
pub use repo::student_repo::{SqliteStudentStore, StoreError, StoreResult, StudentStore};
pub use seating::{allocate_seats, AllocationOptions, SeatingPlan};
pub use service::seating_service::{
    DataCheck, SeatingError, SeatingRequest, SeatingService, DATA_CHECK_SAMPLE_LIMIT,
};
pub use service::upload_service::{UploadError, UploadService, UploadSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
