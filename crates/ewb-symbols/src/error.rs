//! Error type for `ewb-symbols`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// One of the two files making up a symbol is missing.
  #[error("symbol file not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("symbol metadata is not a JSON object: {}", .0.display())]
  NotAnObject(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("json error in {}: {source}", path.display())]
  Json {
    path:   PathBuf,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
