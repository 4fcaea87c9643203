//! Read results that never fail but still say why they fell back.
//!
//! Reads of the local documents are availability-first: a missing or broken
//! file yields the empty default. [`Loaded`] keeps the reason around so
//! callers (and tests) can tell "empty because missing" apart from "empty
//! because malformed".

use std::{fmt, path::PathBuf};

/// Why a read fell back to the default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadIssue {
  /// The document does not exist.
  Missing { path: PathBuf },
  /// The document exists but could not be read.
  Io { path: PathBuf, message: String },
  /// The document was read but is not valid for its schema.
  Malformed { path: PathBuf, message: String },
}

impl ReadIssue {
  pub fn path(&self) -> &PathBuf {
    match self {
      Self::Missing { path } | Self::Io { path, .. } | Self::Malformed { path, .. } => path,
    }
  }
}

impl fmt::Display for ReadIssue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Missing { path } => write!(f, "{} does not exist", path.display()),
      Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
      Self::Malformed { path, message } => {
        write!(f, "{} is malformed: {message}", path.display())
      }
    }
  }
}

/// A value read from disk plus the diagnostic, if the read fell back.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
  pub value: T,
  pub issue: Option<ReadIssue>,
}

impl<T> Loaded<T> {
  pub fn ok(value: T) -> Self { Self { value, issue: None } }

  /// `true` when the value came straight from a valid document.
  pub fn is_clean(&self) -> bool { self.issue.is_none() }

  pub fn into_value(self) -> T { self.value }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
    Loaded { value: f(self.value), issue: self.issue }
  }
}

impl<T: Default> Loaded<T> {
  /// The default value, annotated with why it was used.
  pub fn fallback(issue: ReadIssue) -> Self {
    Self { value: T::default(), issue: Some(issue) }
  }
}
