//! External request/response shapes.
//!
//! # Responsibility
//! - Parse loosely typed seating requests into validated core requests.
//! - Render success and error payloads with HTTP-style status semantics.
//!
//! # Invariants
//! - Every core error maps to exactly one payload and status.

pub mod request;
pub mod response;

pub use request::{parse_seating_request, parse_seating_request_str};
pub use response::{seat_rows, DataCheckResponse, ErrorPayload, SeatRow, UploadResponse};
