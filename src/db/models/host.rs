// src/db/models/host.rs

//! Host aggregate
//!
//! A `Host` carries, besides its persisted row, the in-memory
//! [`HostSoftware`] staging area: the software collection most recently
//! observed on the machine, together with whether it still awaits
//! reconciliation. [`Host::stage_software`] is the only place that marks the
//! state modified; the reconciliation orchestrator clears it after a
//! successful commit.

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension, Row};

use super::software::Software;

/// In-memory software state staged on a host aggregate
#[derive(Debug, Clone, Default)]
pub struct HostSoftware {
    /// Unordered collection of observed software entries
    pub software: Vec<Software>,
    /// True while the staged collection has not been durably reconciled
    pub modified: bool,
}

/// A managed host
#[derive(Debug, Clone)]
pub struct Host {
    pub id: Option<i64>,
    pub hostname: String,
    pub seen_at: Option<String>,
    /// Staged software inventory, not persisted as host columns
    pub software: HostSoftware,
}

impl Host {
    /// Create a new unsaved host
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            id: None,
            hostname: hostname.into(),
            seen_at: None,
            software: HostSoftware::default(),
        }
    }

    /// Insert this host into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        conn.execute(
            "INSERT INTO hosts (hostname) VALUES (?1)",
            [&self.hostname],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a host by ID
    pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Self>> {
        let mut stmt = conn.prepare("SELECT id, hostname, seen_at FROM hosts WHERE id = ?1")?;

        let host = stmt.query_row([id], Self::from_row).optional()?;

        Ok(host)
    }

    /// Stage an observed software collection for reconciliation.
    ///
    /// This is the write-side handoff from inventory collection: it replaces
    /// any previously staged collection and marks the state modified so the
    /// next `save_host_software` call reconciles it.
    pub fn stage_software(&mut self, software: Vec<Software>) {
        self.software = HostSoftware {
            software,
            modified: true,
        };
    }

    /// Convert a database row to a Host
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            hostname: row.get(1)?,
            seen_at: row.get(2)?,
            software: HostSoftware::default(),
        })
    }
}
