//! Roster database bootstrap.
//!
//! # Responsibility
//! - Open the roster file (or an in-memory copy for tests) with the pragmas
//!   the student store relies on.
//! - Bring the `students` schema up to date before any roster access.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the last applied roster migration.

mod error;
pub mod migrations;
mod open;

pub use error::{DbError, DbResult};
pub use open::{open_db, open_db_in_memory, DEFAULT_BUSY_TIMEOUT};
