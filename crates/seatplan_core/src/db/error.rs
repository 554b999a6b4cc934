use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening, migrating or querying the roster database.
#[derive(Debug)]
pub enum DbError {
    /// SQLite could not open the roster file (`None` for in-memory).
    Open {
        path: Option<PathBuf>,
        source: rusqlite::Error,
    },
    /// A roster migration step failed; the schema stays at its prior version.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file was written by a newer seatplan build.
    SchemaTooNew { db_version: u32, latest_supported: u32 },
    /// Any other SQLite failure.
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open {
                path: Some(path),
                source,
            } => write!(f, "cannot open roster database `{}`: {source}", path.display()),
            Self::Open { path: None, source } => {
                write!(f, "cannot open in-memory roster database: {source}")
            }
            Self::Migration { version, source } => {
                write!(f, "roster schema migration {version} failed: {source}")
            }
            Self::SchemaTooNew {
                db_version,
                latest_supported,
            } => write!(
                f,
                "roster schema version {db_version} was written by a newer build (this build reads up to {latest_supported})"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
