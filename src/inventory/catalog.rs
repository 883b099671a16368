// src/inventory/catalog.rs

//! Get-or-create resolution against the global software catalog

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::db::models::{MAX_NAME_LEN, MAX_SOURCE_LEN, MAX_VERSION_LEN, Software, truncate};
use crate::error::{Error, Result};

/// Resolve a software triple to its durable catalog identifier, creating
/// the catalog row if one does not yet exist.
///
/// Fields are truncated to their stored maximums before any lookup, so the
/// row actually persisted always round-trips through the textual key form.
/// Concurrent resolvers racing on the same new triple are expected: the
/// insert tolerates the uniqueness conflict, and when it reports zero
/// changed rows the identifier is re-queried by triple rather than read
/// from any last-written-id signal.
pub fn resolve_or_create(conn: &Connection, software: &Software) -> Result<i64> {
    let name = truncate(&software.name, MAX_NAME_LEN);
    let version = truncate(&software.version, MAX_VERSION_LEN);
    let source = truncate(&software.source, MAX_SOURCE_LEN);

    if let Some(id) = select_id(conn, name, version, source)? {
        return Ok(id);
    }

    insert_or_requery(conn, name, version, source)
}

/// Insert a catalog row that was just found missing, tolerating a
/// concurrent insert of the same triple.
fn insert_or_requery(conn: &Connection, name: &str, version: &str, source: &str) -> Result<i64> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO software (name, version, source) VALUES (?1, ?2, ?3)",
            params![name, version, source],
        )
        .map_err(|e| Error::store("insert software", e))?;

    if inserted == 1 {
        return Ok(conn.last_insert_rowid());
    }

    // The insert was ignored: another resolver won the race between our
    // lookup and our insert. Re-query by triple; last_insert_rowid would
    // be stale here.
    debug!(name, version, source, "software insert raced, re-querying catalog");
    select_id(conn, name, version, source)?.ok_or_else(|| {
        Error::InitError(format!(
            "software row vanished after ignored insert: {name} {version} ({source})"
        ))
    })
}

fn select_id(conn: &Connection, name: &str, version: &str, source: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM software WHERE name = ?1 AND version = ?2 AND source = ?3",
            params![name, version, source],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| Error::store("select software id", e))?;
    Ok(id)
}
