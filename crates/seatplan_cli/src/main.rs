//! seatplan - exam seating planner CLI.
//!
//! # Responsibility
//! - Bootstrap `.env`, logging and the roster database.
//! - Dispatch subcommands and print JSON bodies.
//!
//! # Invariants
//! - Exit code 0 on success, 1 for caller errors, 2 for server-side or
//!   bootstrap failures.

mod commands;
mod output;

use clap::Parser;
use commands::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Missing `.env` is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    match cli.run() {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => {
            output::print_bootstrap_error(&err);
            ExitCode::from(2)
        }
    }
}
