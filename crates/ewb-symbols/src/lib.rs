//! Catalog of drawing symbols.
//!
//! A symbol is a pair of files sharing a base name in one directory: a JSON
//! metadata document (`<name>.json`) and its vector image (`<name>.svg`).
//! Symbols are authored elsewhere; this crate only reads them.

mod catalog;

pub mod error;

pub use catalog::{IMAGE_EXTENSION, IMAGE_KEY, METADATA_EXTENSION, SymbolCatalog};
pub use error::{Error, Result};
