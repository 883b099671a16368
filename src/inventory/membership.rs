// src/inventory/membership.rs

//! Batched writes to the host_software membership relation
//!
//! Both passes issue one statement per chunk regardless of row count. An
//! empty pass constructs no SQL at all. Chunking keeps each statement below
//! SQLite's default bind-parameter limit of 999.

use std::collections::{HashMap, HashSet};
use std::iter;

use rusqlite::{Connection, params_from_iter};
use tracing::debug;

use crate::error::{Error, Result};

use super::catalog;
use super::key::SoftwareKey;

/// Software ids deleted per statement (plus one parameter for the host id)
const DELETE_CHUNK: usize = 900;
/// (host_id, software_id) pairs inserted per statement
const INSERT_CHUNK: usize = 450;

/// Delete membership rows for every current entry absent from the incoming
/// set. No-op when nothing is stale.
pub fn delete_uninstalled(
    conn: &Connection,
    host_id: i64,
    current_ids: &HashMap<SoftwareKey, i64>,
    incoming_keys: &HashSet<SoftwareKey>,
) -> Result<()> {
    let stale: Vec<i64> = current_ids
        .iter()
        .filter(|(key, _)| !incoming_keys.contains(*key))
        .map(|(_, id)| *id)
        .collect();

    if stale.is_empty() {
        return Ok(());
    }
    debug!(host_id, count = stale.len(), "deleting stale host software");

    for chunk in stale.chunks(DELETE_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(",");
        let sql = format!(
            "DELETE FROM host_software WHERE host_id = ? AND software_id IN ({placeholders})"
        );
        conn.execute(
            &sql,
            params_from_iter(iter::once(host_id).chain(chunk.iter().copied())),
        )
        .map_err(|e| Error::store("delete host software", e))?;
    }

    Ok(())
}

/// Insert membership rows for every incoming entry absent from the current
/// set, resolving catalog identifiers first. No-op when nothing is new.
pub fn insert_installed(
    conn: &Connection,
    host_id: i64,
    current_ids: &HashMap<SoftwareKey, i64>,
    incoming_keys: &HashSet<SoftwareKey>,
) -> Result<()> {
    let mut rows: Vec<(i64, i64)> = Vec::new();
    for key in incoming_keys {
        if current_ids.contains_key(key) {
            continue;
        }
        let software_id = catalog::resolve_or_create(conn, &key.to_software())?;
        rows.push((host_id, software_id));
    }

    if rows.is_empty() {
        return Ok(());
    }
    debug!(host_id, count = rows.len(), "inserting new host software");

    for chunk in rows.chunks(INSERT_CHUNK) {
        let values = vec!["(?, ?)"; chunk.len()].join(", ");
        let sql = format!("INSERT INTO host_software (host_id, software_id) VALUES {values}");
        conn.execute(
            &sql,
            params_from_iter(chunk.iter().flat_map(|(h, s)| [*h, *s])),
        )
        .map_err(|e| Error::store("insert host software", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Host, Software};
    use crate::db::{self, schema};
    use rusqlite::Connection;
    use tempfile::NamedTempFile;

    fn create_test_db() -> (NamedTempFile, Connection, i64) {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = db::open(temp_file.path()).unwrap();
        schema::migrate(&conn).unwrap();
        let mut host = Host::new("worker-1");
        let host_id = host.insert(&conn).unwrap();
        (temp_file, conn, host_id)
    }

    fn membership_rows(conn: &Connection, host_id: i64) -> Vec<i64> {
        let mut stmt = conn
            .prepare(
                "SELECT software_id FROM host_software WHERE host_id = ?1 ORDER BY software_id",
            )
            .unwrap();
        stmt.query_map([host_id], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    fn key(name: &str) -> SoftwareKey {
        SoftwareKey::new(name, "1.0", "apt")
    }

    fn total_changes(conn: &Connection) -> i64 {
        conn.query_row("SELECT total_changes()", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_insert_pass_creates_catalog_and_membership() {
        let (_temp, conn, host_id) = create_test_db();

        let current_ids = HashMap::new();
        let incoming: HashSet<SoftwareKey> = [key("a"), key("b")].into_iter().collect();

        insert_installed(&conn, host_id, &current_ids, &incoming).unwrap();

        assert_eq!(Software::count(&conn).unwrap(), 2);
        assert_eq!(membership_rows(&conn, host_id).len(), 2);
    }

    #[test]
    fn test_insert_pass_skips_existing_entries() {
        let (_temp, conn, host_id) = create_test_db();

        let a_id = catalog::resolve_or_create(&conn, &key("a").to_software()).unwrap();
        conn.execute(
            "INSERT INTO host_software (host_id, software_id) VALUES (?1, ?2)",
            [host_id, a_id],
        )
        .unwrap();

        let current_ids: HashMap<SoftwareKey, i64> = [(key("a"), a_id)].into_iter().collect();
        let incoming: HashSet<SoftwareKey> = [key("a"), key("b")].into_iter().collect();

        insert_installed(&conn, host_id, &current_ids, &incoming).unwrap();

        // Only the genuinely new entry got a membership row
        assert_eq!(membership_rows(&conn, host_id).len(), 2);
        assert_eq!(Software::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_delete_pass_removes_only_stale_rows() {
        let (_temp, conn, host_id) = create_test_db();

        let a_id = catalog::resolve_or_create(&conn, &key("a").to_software()).unwrap();
        let b_id = catalog::resolve_or_create(&conn, &key("b").to_software()).unwrap();
        for id in [a_id, b_id] {
            conn.execute(
                "INSERT INTO host_software (host_id, software_id) VALUES (?1, ?2)",
                [host_id, id],
            )
            .unwrap();
        }

        let current_ids: HashMap<SoftwareKey, i64> =
            [(key("a"), a_id), (key("b"), b_id)].into_iter().collect();
        let incoming: HashSet<SoftwareKey> = [key("a")].into_iter().collect();

        delete_uninstalled(&conn, host_id, &current_ids, &incoming).unwrap();

        assert_eq!(membership_rows(&conn, host_id), vec![a_id]);
        // Catalog rows are never touched by the delete pass
        assert_eq!(Software::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_empty_passes_are_noops() {
        let (_temp, conn, host_id) = create_test_db();

        let a_id = catalog::resolve_or_create(&conn, &key("a").to_software()).unwrap();
        conn.execute(
            "INSERT INTO host_software (host_id, software_id) VALUES (?1, ?2)",
            [host_id, a_id],
        )
        .unwrap();

        let current_ids: HashMap<SoftwareKey, i64> = [(key("a"), a_id)].into_iter().collect();
        let incoming: HashSet<SoftwareKey> = [key("a")].into_iter().collect();

        let before = total_changes(&conn);
        delete_uninstalled(&conn, host_id, &current_ids, &incoming).unwrap();
        insert_installed(&conn, host_id, &current_ids, &incoming).unwrap();
        assert_eq!(total_changes(&conn), before);
    }

    #[test]
    fn test_passes_chunk_large_batches() {
        let (_temp, conn, host_id) = create_test_db();

        // Enough entries to force both passes past a single statement's
        // bind-parameter budget
        let incoming: HashSet<SoftwareKey> = (0..1000)
            .map(|i| SoftwareKey::new(format!("pkg-{i}"), "1.0", "apt"))
            .collect();

        insert_installed(&conn, host_id, &HashMap::new(), &incoming).unwrap();
        assert_eq!(membership_rows(&conn, host_id).len(), 1000);

        let current_ids: HashMap<SoftwareKey, i64> = incoming
            .iter()
            .map(|k| {
                let id = catalog::resolve_or_create(&conn, &k.to_software()).unwrap();
                (k.clone(), id)
            })
            .collect();

        delete_uninstalled(&conn, host_id, &current_ids, &HashSet::new()).unwrap();
        assert!(membership_rows(&conn, host_id).is_empty());
    }
}
