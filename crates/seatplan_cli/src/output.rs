//! JSON output and exit status mapping.

use seatplan_core::api::ErrorPayload;
use serde::Serialize;
use std::process::ExitCode;

/// Result of one subcommand, already printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ClientError,
    ServerError,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::ClientError => ExitCode::from(1),
            Self::ServerError => ExitCode::from(2),
        }
    }
}

/// Prints a success body to stdout.
pub fn print_success<T: Serialize>(body: &T) -> anyhow::Result<Outcome> {
    println!("{}", serde_json::to_string_pretty(body)?);
    Ok(Outcome::Success)
}

/// Prints an error body to stdout and maps its status to an outcome.
pub fn print_failure(payload: &ErrorPayload) -> anyhow::Result<Outcome> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    if payload.is_client_error() {
        Ok(Outcome::ClientError)
    } else {
        Ok(Outcome::ServerError)
    }
}

pub fn print_bootstrap_error(err: &anyhow::Error) {
    eprintln!("seatplan: {err:#}");
}
