// src/db/models/mod.rs

//! Data models for muster database entities
//!
//! This module defines Rust structs that correspond to database tables
//! and provides methods for creating and reading records. All writes to
//! the software catalog and membership rows go through
//! [`crate::inventory`] instead, which owns the reconciliation rules.

mod host;
mod software;

pub use host::{Host, HostSoftware};
pub use software::{MAX_NAME_LEN, MAX_SOURCE_LEN, MAX_VERSION_LEN, Software, truncate};
