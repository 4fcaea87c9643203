//! Runtime configuration, deserialised by the binary from `ewb.toml` and the
//! environment.

use std::path::PathBuf;

use serde::Deserialize;

use crate::paths::{PathResolver, StorageMode};

/// Fallback for the host's user application directory when none is
/// configured.
pub const DEFAULT_USER_APP_DIR: &str = ".local/share/FreeCAD";

#[derive(Debug, Clone, Deserialize)]
pub struct WorkbenchConfig {
  /// Keep data inside the workbench checkout instead of the user directory.
  #[serde(default)]
  pub dev_mode:      bool,
  #[serde(default = "default_workbench_dir")]
  pub workbench_dir: PathBuf,
  /// Host-provided per-user application data directory.
  #[serde(default)]
  pub user_app_dir:  Option<PathBuf>,
  /// Overrides `<data dir>/symbols`.
  #[serde(default)]
  pub symbols_dir:   Option<PathBuf>,
}

impl Default for WorkbenchConfig {
  fn default() -> Self {
    Self {
      dev_mode:      false,
      workbench_dir: default_workbench_dir(),
      user_app_dir:  None,
      symbols_dir:   None,
    }
  }
}

fn default_workbench_dir() -> PathBuf { PathBuf::from(".") }

impl WorkbenchConfig {
  pub fn storage_mode(&self) -> StorageMode { StorageMode::from_dev_flag(self.dev_mode) }

  /// The configured user application directory, or `$HOME/.local/share/FreeCAD`.
  pub fn user_app_dir(&self) -> PathBuf {
    self.user_app_dir.clone().unwrap_or_else(|| {
      std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_USER_APP_DIR)
    })
  }

  pub fn resolver(&self) -> PathResolver {
    PathResolver::new(self.storage_mode(), &self.workbench_dir, self.user_app_dir())
  }

  pub fn symbols_dir(&self) -> PathBuf {
    self
      .symbols_dir
      .clone()
      .unwrap_or_else(|| self.resolver().symbols_dir())
  }
}
