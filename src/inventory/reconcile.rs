// src/inventory/reconcile.rs

//! Reconciliation orchestrator
//!
//! Entry points for synchronizing a host's staged software collection with
//! the store. The whole reconciliation for one host runs inside a single
//! retried transaction: the delete batch and insert batch commit together
//! or not at all. The staged state's `modified` flag is cleared only after
//! a successful commit, so a failed attempt stays eligible for retry on a
//! later cycle.
//!
//! Concurrent reconciliation of *different* hosts is expected and safe; the
//! only contended resource is the global catalog, which the resolver
//! handles. Concurrent reconciliation of the *same* host is not serialized
//! here and must be prevented by the caller.

use std::collections::{HashMap, HashSet};

use rusqlite::Connection;
use tracing::debug;

use crate::db;
use crate::db::models::{Host, HostSoftware, Software};
use crate::error::{Error, Result};

use super::diff;
use super::key::SoftwareKey;
use super::loader;
use super::membership;

/// Persist a host's staged software collection.
///
/// Returns immediately without opening a transaction when the staged state
/// is not modified. An empty staged collection clears every membership row
/// for the host in one statement, skipping diffing and catalog resolution
/// entirely; catalog rows are never touched.
pub fn save_host_software(conn: &mut Connection, host: &mut Host) -> Result<()> {
    if !host.software.modified {
        return Ok(());
    }

    let host_id = host
        .id
        .ok_or_else(|| Error::InitError("cannot save software for an unsaved host".to_string()))?;

    let incoming = &host.software.software;
    db::with_retry_tx(conn, |tx| {
        if incoming.is_empty() {
            debug!(host_id, "clearing all host software memberships");
            tx.execute("DELETE FROM host_software WHERE host_id = ?1", [host_id])
                .map_err(|e| Error::store("clear host software", e))?;
            return Ok(());
        }

        apply_software_changes(tx, host_id, incoming)
    })?;

    host.software.modified = false;
    Ok(())
}

/// Load a host's persisted software collection into its aggregate state,
/// replacing whatever was staged. The result is clean (`modified = false`).
pub fn load_host_software(conn: &Connection, host: &mut Host) -> Result<()> {
    let host_id = host
        .id
        .ok_or_else(|| Error::InitError("cannot load software for an unsaved host".to_string()))?;

    let software = loader::host_software_for_host(conn, host_id)?;
    host.software = HostSoftware {
        software,
        modified: false,
    };
    Ok(())
}

/// Diff the staged collection against the persisted one and apply the
/// minimal membership changes. Runs inside the caller's transaction.
///
/// Deletions go first and operate only on identifiers loaded with the
/// current baseline; they never depend on identifiers created by the
/// insert pass.
fn apply_software_changes(conn: &Connection, host_id: i64, incoming: &[Software]) -> Result<()> {
    let current = loader::host_software_for_host(conn, host_id)?;

    if diff::nothing_changed(&current, incoming) {
        debug!(host_id, "host software unchanged, skipping writes");
        return Ok(());
    }

    let mut current_ids: HashMap<SoftwareKey, i64> = HashMap::with_capacity(current.len());
    for software in &current {
        let id = software.id.ok_or_else(|| {
            Error::InitError("catalog row loaded without an id".to_string())
        })?;
        current_ids.insert(SoftwareKey::from(software), id);
    }
    let incoming_keys: HashSet<SoftwareKey> = incoming.iter().map(SoftwareKey::from).collect();

    membership::delete_uninstalled(conn, host_id, &current_ids, &incoming_keys)?;
    membership::insert_installed(conn, host_id, &current_ids, &incoming_keys)?;

    Ok(())
}
