// src/db/migrations.rs
//! Database migration implementations
//!
//! This module contains the individual migration functions for evolving
//! the muster database schema. Each migration function handles a specific
//! version upgrade.

use crate::error::Result;
use rusqlite::Connection;
use tracing::debug;

/// Initial schema - Version 1
///
/// Creates the core tables:
/// - hosts: Managed hosts reporting software inventory
/// - software: Global deduplicated catalog of distinct software entries
/// - host_software: Per-host membership rows joining hosts to the catalog
pub fn migrate_v1(conn: &Connection) -> Result<()> {
    debug!("Creating schema version 1");

    conn.execute_batch(
        "
        -- Hosts: managed machines reporting inventory
        CREATE TABLE hosts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            hostname TEXT NOT NULL,
            seen_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX idx_hosts_hostname ON hosts(hostname);

        -- Software: the global catalog. A row is identified by its
        -- (name, version, source) triple, unique across all hosts.
        CREATE TABLE software (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            version TEXT NOT NULL,
            source TEXT NOT NULL,
            UNIQUE(name, version, source)
        );

        CREATE INDEX idx_software_name ON software(name);

        -- Host software: which catalog entries are installed on which host
        CREATE TABLE host_software (
            host_id INTEGER NOT NULL,
            software_id INTEGER NOT NULL,
            PRIMARY KEY (host_id, software_id),
            FOREIGN KEY (host_id) REFERENCES hosts(id) ON DELETE CASCADE,
            FOREIGN KEY (software_id) REFERENCES software(id)
        ) WITHOUT ROWID;

        CREATE INDEX idx_host_software_software_id ON host_software(software_id);
        ",
    )?;

    debug!("Schema version 1 created successfully");
    Ok(())
}
