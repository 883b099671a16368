// src/inventory/loader.rs

//! Read path for a host's persisted software collection

use rusqlite::Connection;

use crate::db::models::Software;
use crate::error::{Error, Result};

/// Load the catalog rows currently joined to a host through membership.
///
/// Takes any `&Connection`, so it runs identically inside an open
/// `rusqlite::Transaction` (which derefs to `Connection`) or standalone.
/// Used both as a public read API and as the orchestrator's baseline for
/// diffing.
pub fn host_software_for_host(conn: &Connection, host_id: i64) -> Result<Vec<Software>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, version, source FROM software
             WHERE id IN (SELECT software_id FROM host_software WHERE host_id = ?1)",
        )
        .map_err(|e| Error::store("load host software", e))?;

    let software = stmt
        .query_map([host_id], Software::from_row)
        .map_err(|e| Error::store("load host software", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::store("load host software", e))?;

    Ok(software)
}
