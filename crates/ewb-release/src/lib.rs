//! Release packaging: a project directory archived into a single zip file.
//!
//! Packaging is always a full walk and a full rewrite of the output archive;
//! nothing is incremental.

mod packager;

pub mod error;

pub use error::{Error, Result};
pub use packager::{ReleasePackager, ReleaseReport};
