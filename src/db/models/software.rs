// src/db/models/software.rs

//! Software catalog record
//!
//! A `Software` row is a globally unique (name, version, source) triple.
//! Rows are shared by every host that reports the same triple; no host owns
//! a catalog entry and this crate never deletes one.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};

/// Maximum stored length of a software name, in bytes
pub const MAX_NAME_LEN: usize = 255;
/// Maximum stored length of a software version, in bytes
pub const MAX_VERSION_LEN: usize = 255;
/// Maximum stored length of a software source, in bytes
pub const MAX_SOURCE_LEN: usize = 64;

/// A catalog entry for one distinct piece of software
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    /// Durable catalog identifier; `None` until resolved against the store
    pub id: Option<i64>,
    pub name: String,
    pub version: String,
    /// Where the entry was observed (package manager, app bundle, ...)
    pub source: String,
}

impl Software {
    /// Create a new unsaved catalog entry
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            version: version.into(),
            source: source.into(),
        }
    }

    /// Find a catalog entry by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, version, source FROM software WHERE id = ?1")?;

        let software = stmt.query_row([id], Self::from_row).optional()?;

        Ok(software)
    }

    /// Find a catalog entry by its identity triple
    pub fn find_by_triple(
        conn: &Connection,
        name: &str,
        version: &str,
        source: &str,
    ) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, version, source FROM software
             WHERE name = ?1 AND version = ?2 AND source = ?3",
        )?;

        let software = stmt
            .query_row(params![name, version, source], Self::from_row)
            .optional()?;

        Ok(software)
    }

    /// Count all catalog entries
    pub fn count(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM software", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a Software record
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            version: row.get(2)?,
            source: row.get(3)?,
        })
    }
}

/// Truncate a string to at most `max_len` bytes, backing off to the nearest
/// character boundary so the result is still valid UTF-8.
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
