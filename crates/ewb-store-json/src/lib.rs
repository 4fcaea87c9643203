//! JSON-file backend for the workbench datastore.
//!
//! Each collection is a single pretty-printed JSON document that is always
//! replaced whole, through a write-to-temporary-then-rename so readers never
//! observe a partially written file.

pub mod atomic;
mod settings;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use settings::SettingsStore;
pub use store::JsonStore;
