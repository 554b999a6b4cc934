//! Command definitions and dispatch.

use crate::output::{print_failure, print_success, Outcome};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use seatplan_core::api::{
    parse_seating_request, parse_seating_request_str, seat_rows, DataCheckResponse, ErrorPayload,
    UploadResponse,
};
use seatplan_core::db::open_db;
use seatplan_core::{
    core_version, default_log_level, init_logging, LogTarget, SeatingError, SeatingService,
    SqliteStudentStore, UploadService,
};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Exam seating planner.
#[derive(Debug, Parser)]
#[command(name = "seatplan", version, about)]
pub struct Cli {
    /// Roster database file.
    #[arg(long, global = true, env = "SEATPLAN_DB", default_value = "seatplan.sqlite3")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "SEATPLAN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files; logs go to stderr when unset.
    #[arg(long, global = true, env = "SEATPLAN_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace the roster with the students in a spreadsheet or CSV file.
    Upload {
        /// .xlsx, .xls, .xlsm, .ods or .csv file.
        file: PathBuf,
    },
    /// Generate a seating plan for one or more `department - year` cohorts.
    Seat {
        /// Cohort label, e.g. "cs - 1". Repeat for several cohorts.
        #[arg(long = "department", short = 'd')]
        departments: Vec<String>,

        /// Number of rooms.
        #[arg(long)]
        classrooms: Option<String>,

        /// Advisory room size.
        #[arg(long)]
        students_per_class: Option<String>,

        /// Raw JSON request body; overrides the flags above.
        #[arg(long, conflicts_with_all = ["departments", "classrooms", "students_per_class"])]
        request: Option<String>,
    },
    /// Show roster size, a sample and the available cohorts.
    Check,
    /// Print the core version.
    Version,
}

impl Cli {
    pub fn run(self) -> Result<Outcome> {
        let Cli {
            db,
            log_level,
            log_dir,
            command,
        } = self;

        // Version needs neither logging nor the database.
        if let Command::Version = command {
            return print_version();
        }

        bootstrap_logging(log_level, log_dir)?;
        let conn = open_db(&db).context("roster database unavailable")?;
        let store = SqliteStudentStore::try_new(&conn).context("roster database not ready")?;
        dispatch(command, store)
    }
}

fn dispatch(command: Command, store: SqliteStudentStore<'_>) -> Result<Outcome> {
    match command {
        Command::Upload { file } => {
            info!("event=cli_upload module=cli status=start");
            match UploadService::new(store).import_file(&file) {
                Ok(summary) => print_success(&UploadResponse::from(summary)),
                Err(err) => print_failure(&ErrorPayload::from(&err)),
            }
        }
        Command::Seat {
            departments,
            classrooms,
            students_per_class,
            request,
        } => {
            let parsed = match request {
                Some(body) => parse_seating_request_str(&body),
                None => parse_seating_request(&request_from_flags(
                    departments,
                    classrooms,
                    students_per_class,
                )),
            };
            let plan = parsed.and_then(|request| SeatingService::new(store).generate(&request));
            match plan {
                Ok(plan) => print_success(&seat_rows(&plan)),
                Err(err) => print_seating_failure(&err),
            }
        }
        Command::Check => match SeatingService::new(store).data_check() {
            Ok(check) => print_success(&DataCheckResponse::from(check)),
            Err(err) => print_seating_failure(&err),
        },
        Command::Version => print_version(),
    }
}

fn bootstrap_logging(level: Option<String>, dir: Option<PathBuf>) -> Result<()> {
    let level = level.unwrap_or_else(|| default_log_level().to_string());
    let target = match dir {
        Some(dir) if dir.is_absolute() => LogTarget::Directory(dir),
        Some(dir) => LogTarget::Directory(
            std::env::current_dir()
                .context("failed to resolve current directory")?
                .join(dir),
        ),
        None => LogTarget::Stderr,
    };
    init_logging(&level, target).map_err(anyhow::Error::msg)
}

fn print_version() -> Result<Outcome> {
    println!("{}", core_version());
    Ok(Outcome::Success)
}

fn print_seating_failure(err: &SeatingError) -> Result<Outcome> {
    print_failure(&ErrorPayload::from(err))
}

/// Builds the same JSON body the request parser accepts, so flags and
/// `--request` share one validation path.
fn request_from_flags(
    departments: Vec<String>,
    classrooms: Option<String>,
    students_per_class: Option<String>,
) -> Value {
    let mut body = Map::new();
    body.insert(
        "departments".to_string(),
        Value::Array(departments.into_iter().map(Value::String).collect()),
    );
    if let Some(value) = classrooms {
        body.insert("classrooms".to_string(), Value::String(value));
    }
    if let Some(value) = students_per_class {
        body.insert("studentsPerClass".to_string(), Value::String(value));
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::{request_from_flags, Cli};
    use clap::CommandFactory;
    use seatplan_core::api::parse_seating_request;
    use seatplan_core::SeatingError;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_go_through_request_parser() {
        let body = request_from_flags(
            vec!["cs - 1".to_string(), " ".to_string()],
            Some("2".to_string()),
            None,
        );
        let request = parse_seating_request(&body).unwrap();
        assert_eq!(request.cohorts, vec!["cs - 1"]);
        assert_eq!(request.classrooms, 2);
        assert_eq!(request.students_per_class, 30);
    }

    #[test]
    fn non_integer_flag_is_invalid_parameter() {
        let body = request_from_flags(vec!["cs - 1".to_string()], Some("two".to_string()), None);
        assert!(matches!(
            parse_seating_request(&body).unwrap_err(),
            SeatingError::InvalidParameter { field: "classrooms", .. }
        ));
    }
}
