//! Student store contract and SQLite implementation.
//!
//! # Responsibility
//! - Replace the stored roster atomically.
//! - Serve cohort listings and cohort-filtered reads.
//!
//! # Invariants
//! - `replace_all` runs under `BEGIN IMMEDIATE`: one replace in flight per
//!   database file. A second writer waits for the busy timeout, then fails
//!   with `StoreError::Conflict`.
//! - `with_snapshot` reads share one read transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::student::{cohort_label, StudentRecord};
use log::info;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, ErrorCode, Row, Transaction, TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const STUDENT_SELECT_SQL: &str = "SELECT
    name,
    roll_number,
    department,
    year
FROM students";

const COHORT_SQL_EXPR: &str = "(department || ' - ' || year)";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from roster persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Another writer holds the roster lock past the busy timeout.
    Conflict { message: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict { message } => {
                write!(f, "roster is locked by another upload: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "student store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Conflict { .. } | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => Self::Conflict {
                message: value.to_string(),
            },
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Roster store used by the import and seating services.
pub trait StudentStore {
    /// Clears the roster and inserts `records`, returning the stored count.
    fn replace_all(&self, records: &[StudentRecord]) -> StoreResult<usize>;
    /// Returns students whose `department - year` label is in `cohorts`.
    fn query_by_cohorts(&self, cohorts: &[String]) -> StoreResult<Vec<StudentRecord>>;
    /// Returns every distinct `department - year` label, sorted.
    fn list_distinct_cohorts(&self) -> StoreResult<Vec<String>>;
    /// Returns the number of stored students.
    fn count_students(&self) -> StoreResult<usize>;
    /// Returns up to `limit` students in insertion order.
    fn sample_students(&self, limit: usize) -> StoreResult<Vec<StudentRecord>>;
    /// Runs `read` against one consistent snapshot of the roster.
    ///
    /// Writes from inside `read` are not supported.
    fn with_snapshot<T>(&self, read: impl FnOnce(&Self) -> StoreResult<T>) -> StoreResult<T>
    where
        Self: Sized;
}

/// SQLite-backed roster store.
pub struct SqliteStudentStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentStore<'conn> {
    /// Creates a store over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl StudentStore for SqliteStudentStore<'_> {
    fn replace_all(&self, records: &[StudentRecord]) -> StoreResult<usize> {
        let started_at = Instant::now();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let removed = tx.execute("DELETE FROM students;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO students (
                    name,
                    roll_number,
                    department,
                    year
                ) VALUES (?1, ?2, ?3, ?4);",
            )?;
            for record in records {
                insert.execute(params![
                    record.name.as_str(),
                    record.roll_number.as_str(),
                    record.department.as_str(),
                    record.year.as_str(),
                ])?;
            }
        }
        tx.commit()?;

        info!(
            "event=roster_replace module=repo status=ok removed={} inserted={} duration_ms={}",
            removed,
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records.len())
    }

    fn query_by_cohorts(&self, cohorts: &[String]) -> StoreResult<Vec<StudentRecord>> {
        if cohorts.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; cohorts.len()].join(", ");
        let sql = format!(
            "{STUDENT_SELECT_SQL}
             WHERE {COHORT_SQL_EXPR} IN ({placeholders})
             ORDER BY department ASC, roll_number ASC;"
        );
        let bind_values = cohorts.iter().map(|cohort| Value::Text(cohort.clone()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn list_distinct_cohorts(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT department, year
             FROM students
             ORDER BY department ASC, year ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut cohorts = Vec::new();
        while let Some(row) = rows.next()? {
            let department: String = row.get(0)?;
            let year: String = row.get(1)?;
            cohorts.push(cohort_label(&department, &year));
        }
        // Label order can differ from column order ("cs - 10" vs "cs - 2").
        cohorts.sort();
        Ok(cohorts)
    }

    fn count_students(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn sample_students(&self, limit: usize) -> StoreResult<Vec<StudentRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY id ASC LIMIT ?1;"))?;
        let mut rows = stmt.query([limit])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }

    fn with_snapshot<T>(&self, read: impl FnOnce(&Self) -> StoreResult<T>) -> StoreResult<T> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let value = read(self)?;
        tx.commit()?;
        Ok(value)
    }
}

fn parse_student_row(row: &Row<'_>) -> StoreResult<StudentRecord> {
    Ok(StudentRecord {
        name: row.get("name")?,
        roll_number: row.get("roll_number")?,
        department: row.get("department")?,
        year: row.get("year")?,
    })
}
