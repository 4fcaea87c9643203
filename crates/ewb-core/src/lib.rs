//! Core types and trait definitions for the Electrical Workbench data core.
//!
//! This crate is free of persistence details. It owns the record types, the
//! shape of the on-disk documents, storage-location rules and the
//! [`store::Datastore`] abstraction that backends implement.

pub mod client;
pub mod config;
pub mod error;
mod field;
pub mod loaded;
pub mod paths;
pub mod project;
pub mod store;

use chrono::{DateTime, SubsecRound, Utc};

pub use error::{Error, Result};
pub use loaded::{Loaded, ReadIssue};
pub use paths::{PathResolver, StorageMode};

/// The current UTC time, truncated to the microsecond precision that
/// persisted timestamps keep.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }
