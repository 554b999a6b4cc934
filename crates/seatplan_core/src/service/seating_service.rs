//! Seating plan and roster diagnostics use-cases.
//!
//! # Responsibility
//! - Match requested cohorts against the stored roster.
//! - Run the allocator over the matching students.
//! - Serve a read-only roster sample for operational checks.
//!
//! # Invariants
//! - Cohort validation and the student query read the same snapshot.
//! - The advisory room size is reported, never enforced.

use crate::model::student::StudentRecord;
use crate::repo::student_repo::{StoreError, StudentStore};
use crate::seating::{allocate_seats, AllocationOptions, SeatingPlan};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Rooms used when a request does not name a count.
pub const DEFAULT_CLASSROOMS: usize = 3;
/// Advisory room size used when a request does not name one.
pub const DEFAULT_STUDENTS_PER_CLASS: usize = 30;
/// Maximum number of students returned by [`SeatingService::data_check`].
pub const DATA_CHECK_SAMPLE_LIMIT: usize = 50;

/// Validated seating request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatingRequest {
    /// Requested `department - year` labels, trimmed and non-empty.
    pub cohorts: Vec<String>,
    /// Number of rooms, at least 1.
    pub classrooms: usize,
    /// Advisory room size, at least 1.
    pub students_per_class: usize,
}

impl SeatingRequest {
    /// Builds a request with default room settings.
    pub fn for_cohorts<I, C>(cohorts: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            cohorts: cohorts.into_iter().map(Into::into).collect(),
            classrooms: DEFAULT_CLASSROOMS,
            students_per_class: DEFAULT_STUDENTS_PER_CLASS,
        }
    }
}

/// Errors from seating use-cases.
#[derive(Debug)]
pub enum SeatingError {
    /// Request body is not a JSON object.
    MalformedRequest(String),
    /// No usable cohort label in the request.
    NoCohortsRequested,
    /// A numeric parameter is not an integer.
    InvalidParameter { field: &'static str, value: String },
    /// None of the requested cohorts exists in the roster.
    NoMatch {
        requested: Vec<String>,
        available: Vec<String>,
    },
    /// Cohorts matched but no student rows were returned.
    NoStudents { cohorts: Vec<String> },
    /// Roster storage failed.
    Store(StoreError),
}

impl Display for SeatingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRequest(message) => write!(f, "malformed seating request: {message}"),
            Self::NoCohortsRequested => write!(f, "no valid departments provided"),
            Self::InvalidParameter { field, value } => {
                write!(f, "`{field}` must be an integer, got `{value}`")
            }
            Self::NoMatch {
                requested,
                available,
            } => write!(
                f,
                "no matching departments: requested [{}], available [{}]",
                requested.join(", "),
                available.join(", ")
            ),
            Self::NoStudents { cohorts } => {
                write!(f, "no students found for [{}]", cohorts.join(", "))
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SeatingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SeatingError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Read-only roster overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataCheck {
    pub student_count: usize,
    /// Up to [`DATA_CHECK_SAMPLE_LIMIT`] students in insertion order.
    pub sample: Vec<StudentRecord>,
    pub cohorts: Vec<String>,
}

/// Seating use-case over a roster store.
pub struct SeatingService<S: StudentStore> {
    store: S,
}

impl<S: StudentStore> SeatingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Builds a seating plan for the requested cohorts.
    ///
    /// Requested labels missing from the roster are skipped as long as one
    /// label matches.
    ///
    /// # Errors
    /// - `NoCohortsRequested` when `request.cohorts` is empty.
    /// - `NoMatch` when no requested label exists in the roster.
    /// - `NoStudents` when matched labels return no rows.
    /// - `Store` on storage failure.
    pub fn generate(&self, request: &SeatingRequest) -> Result<SeatingPlan, SeatingError> {
        let started_at = Instant::now();
        if request.cohorts.is_empty() {
            return Err(SeatingError::NoCohortsRequested);
        }

        let (matched, students) = self
            .store
            .with_snapshot(|store| {
                let available = store.list_distinct_cohorts()?;
                let matched: Vec<String> = request
                    .cohorts
                    .iter()
                    .filter(|cohort| available.contains(*cohort))
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    return Ok(Err(SeatingError::NoMatch {
                        requested: request.cohorts.clone(),
                        available,
                    }));
                }
                let students = store.query_by_cohorts(&matched)?;
                Ok(Ok((matched, students)))
            })
            .map_err(|err| {
                error!(
                    "event=seating module=service status=error duration_ms={} error_code=store_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                SeatingError::Store(err)
            })??;

        if students.is_empty() {
            return Err(SeatingError::NoStudents { cohorts: matched });
        }

        let options = AllocationOptions::new(request.classrooms, request.students_per_class);
        let plan = allocate_seats(&students, options);

        for room_index in plan.rooms_over_capacity() {
            warn!(
                "event=seating module=service status=over_capacity room={} seated={} advisory_capacity={}",
                room_index + 1,
                plan.occupancy(room_index),
                plan.students_per_room()
            );
        }
        info!(
            "event=seating module=service status=ok cohorts={} students={} rooms={} duration_ms={}",
            matched.len(),
            plan.len(),
            plan.room_count(),
            started_at.elapsed().as_millis()
        );
        Ok(plan)
    }

    /// Returns the roster size, a sample and every cohort label.
    pub fn data_check(&self) -> Result<DataCheck, SeatingError> {
        let check = self.store.with_snapshot(|store| {
            Ok(DataCheck {
                student_count: store.count_students()?,
                sample: store.sample_students(DATA_CHECK_SAMPLE_LIMIT)?,
                cohorts: store.list_distinct_cohorts()?,
            })
        });
        check.map_err(|err| {
            error!("event=data_check module=service status=error error={}", err);
            SeatingError::Store(err)
        })
    }
}
