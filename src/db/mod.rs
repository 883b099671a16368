// src/db/mod.rs

//! Database layer: connection management, schema, and models.
//!
//! All persistent state lives in SQLite. Connections are opened through
//! [`open`] so every connection gets the same pragmas (foreign keys on, a
//! busy timeout for cross-connection contention). Multi-statement writes go
//! through [`with_retry_tx`], which retries the whole transaction body on
//! transient lock conflicts.

pub mod migrations;
pub mod models;
pub mod schema;

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction};
use tracing::warn;

use crate::error::{Error, Result};

/// Attempt budget for retried transactions
pub const MAX_TX_ATTEMPTS: u32 = 5;

/// How long a connection waits on another connection's lock before
/// reporting SQLITE_BUSY
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a database connection with standard pragmas applied
pub fn open(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)
        .map_err(|e| Error::store("open database", e))?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (tests, scratch use)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| Error::store("open in-memory database", e))?;
    apply_pragmas(&conn)?;
    Ok(conn)
}

fn apply_pragmas(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Run `f` inside a transaction, retrying the whole body on transient
/// conflicts.
///
/// The body is re-executed from scratch on every attempt, so it must be
/// safe to re-run: reads, selects, and conflict-tolerant inserts are;
/// anything else should not live inside a retried transaction. Backoff is
/// incremental (100ms, 200ms, 400ms, ...). Exhausting the budget returns
/// [`Error::RetryExhausted`].
pub fn with_retry_tx<T, F>(conn: &mut Connection, mut f: F) -> Result<T>
where
    F: FnMut(&Transaction<'_>) -> Result<T>,
{
    let mut attempt: u32 = 0;
    loop {
        let result = run_tx(conn, &mut f);
        match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                attempt += 1;
                if attempt >= MAX_TX_ATTEMPTS {
                    return Err(Error::RetryExhausted {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                let delay = Duration::from_millis(100u64 << (attempt - 1));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient database conflict, retrying transaction"
                );
                std::thread::sleep(delay);
            }
            Err(e) => return Err(e),
        }
    }
}

fn run_tx<T, F>(conn: &mut Connection, f: &mut F) -> Result<T>
where
    F: FnMut(&Transaction<'_>) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}
