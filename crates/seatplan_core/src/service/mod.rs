//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate import, storage and allocation into use-case level APIs.
//! - Keep CLI layers decoupled from storage details.

pub mod seating_service;
pub mod upload_service;
