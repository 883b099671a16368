// src/error.rs

//! Error types for the muster datastore.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the datastore
#[derive(Debug, Error)]
pub enum Error {
    /// Raw database failure with no additional context
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Database failure wrapped with the operation that produced it
    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// An aggregate was used before it was persisted or initialized
    #[error("init error: {0}")]
    InitError(String),

    /// A retried transaction exhausted its attempt budget
    #[error("transaction failed after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap a database error with the operation that produced it
    pub fn store(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Error::Store {
            context: context.into(),
            source,
        }
    }

    /// Whether this error is a transient conflict worth retrying.
    ///
    /// SQLite reports lock contention as `SQLITE_BUSY` or `SQLITE_LOCKED`;
    /// everything else (constraint violations, malformed SQL, I/O) is
    /// persistent and must not be retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Sqlite(e) | Error::Store { source: e, .. } => is_busy(e),
            _ => false,
        }
    }
}

fn is_busy(e: &rusqlite::Error) -> bool {
    matches!(
        e.sqlite_error_code(),
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked)
    )
}
