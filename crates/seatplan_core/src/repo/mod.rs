//! Persistence gateway for the student roster.
//!
//! # Responsibility
//! - Define the store contract the import and seating services depend on.
//! - Isolate SQLite query and transaction details from business logic.
//!
//! # Invariants
//! - Replacing the roster is all-or-nothing.
//! - Readers never observe a half-replaced roster.

pub mod student_repo;
