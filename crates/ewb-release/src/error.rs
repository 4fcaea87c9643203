//! Error type for `ewb-release`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("project directory not found: {}", .0.display())]
  ProjectNotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("walk error: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("path outside project root: {0}")]
  StripPrefix(#[from] std::path::StripPrefixError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
