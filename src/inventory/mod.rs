// src/inventory/mod.rs

//! Software inventory reconciliation engine
//!
//! Synchronizes a host's observed set of installed software against the
//! store while keeping the global catalog deduplicated:
//!
//! - [`key`]: canonical identity key for a software triple
//! - [`diff`]: set comparison between persisted and observed collections
//! - [`catalog`]: get-or-create resolution of catalog identifiers
//! - [`membership`]: batched membership inserts and deletes
//! - [`loader`]: read path joining catalog rows through membership
//! - [`reconcile`]: the orchestrator tying the above into one retried
//!   transaction per host

pub mod catalog;
pub mod diff;
pub mod key;
pub mod loader;
pub mod membership;
pub mod reconcile;

pub use catalog::resolve_or_create;
pub use diff::nothing_changed;
pub use key::SoftwareKey;
pub use loader::host_software_for_host;
pub use reconcile::{load_host_software, save_host_software};
