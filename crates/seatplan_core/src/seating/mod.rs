//! Exam seating allocation.
//!
//! # Responsibility
//! - Interleave department groups round-robin across classrooms.
//! - Number seats per room as students are placed.
//!
//! # Invariants
//! - Allocation is deterministic for identical input and options.
//! - Every input student receives exactly one seat.

pub mod allocate;

pub use allocate::{allocate_seats, AllocationOptions, SeatingPlan};
