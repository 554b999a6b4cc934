//! Domain model for the exam roster and seating plans.
//!
//! # Responsibility
//! - Define the canonical student record shared by import, storage and
//!   allocation.
//! - Define the ephemeral seat assignment produced per seating request.
//!
//! # Invariants
//! - `roll_number` is the only identity of a student.
//! - A cohort label is always derived, never stored.

pub mod student;
