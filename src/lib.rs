// src/lib.rs

//! Muster host software inventory datastore
//!
//! Managed hosts report the set of software currently installed on them;
//! muster reconciles each report against a SQLite store that keeps a single
//! deduplicated catalog of distinct software entries and a per-host
//! membership relation over it.
//!
//! # Architecture
//!
//! - Database-first: all durable state lives in SQLite, schema-versioned
//! - Global catalog: one row per distinct (name, version, source) triple,
//!   shared across hosts, never deleted by this crate
//! - Per-host membership: reconciled with minimal batched writes inside one
//!   retried transaction per host
//! - Synchronous, blocking calls; cross-host concurrency is handled by the
//!   store's uniqueness constraints, not application locks

pub mod db;
mod error;
pub mod inventory;

pub use db::models::{Host, HostSoftware, Software};
pub use error::{Error, Result};
pub use inventory::{host_software_for_host, load_host_software, save_host_software};
