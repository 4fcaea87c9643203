//! Storage locations for the workbench's local data.
//!
//! Where the JSON documents live depends on a [`StorageMode`] chosen at
//! construction time: development keeps everything inside the workbench
//! checkout, production uses the per-user application directory handed to us
//! by the host.

use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{Error, Result, project::ProjectsDocument};

/// Sub-folder of the host's user application directory owned by the workbench.
pub const APP_DIR_NAME: &str = "ElectricalWorkbench";

/// Data folder inside the workbench checkout, used in development.
pub const DEV_DATA_DIR_NAME: &str = ".data";

pub const CLIENTS_FILE: &str = "clients.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const CONFIG_FILE: &str = "config.json";
pub const SYMBOLS_DIR_NAME: &str = "symbols";

/// Selects where local data is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
  /// `<workbench>/.data`, for quick iteration and tests.
  Development,
  /// `<user app dir>/ElectricalWorkbench`.
  #[default]
  Production,
}

impl StorageMode {
  pub fn from_dev_flag(dev_mode: bool) -> Self {
    if dev_mode { Self::Development } else { Self::Production }
  }
}

/// Computes every path the workbench reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
  mode:          StorageMode,
  workbench_dir: PathBuf,
  user_app_dir:  PathBuf,
}

impl PathResolver {
  pub fn new(
    mode: StorageMode,
    workbench_dir: impl Into<PathBuf>,
    user_app_dir: impl Into<PathBuf>,
  ) -> Self {
    Self {
      mode,
      workbench_dir: workbench_dir.into(),
      user_app_dir: user_app_dir.into(),
    }
  }

  pub fn mode(&self) -> StorageMode { self.mode }

  /// The workbench installation (or checkout) root.
  pub fn root_path(&self) -> &Path { &self.workbench_dir }

  pub fn icon_path(&self, icon_name: &str) -> PathBuf {
    self.workbench_dir.join("resources").join("icons").join(icon_name)
  }

  /// The workbench's folder inside the host's user application directory.
  pub fn user_app_dir(&self) -> PathBuf { self.user_app_dir.join(APP_DIR_NAME) }

  /// Where the JSON documents live for the configured mode.
  ///
  /// Pure; see [`Self::ensure_data_dir`] to create it.
  pub fn data_dir(&self) -> PathBuf {
    match self.mode {
      StorageMode::Development => self.workbench_dir.join(DEV_DATA_DIR_NAME),
      StorageMode::Production => self.user_app_dir(),
    }
  }

  /// [`Self::data_dir`], created if absent. Succeeds if it already exists.
  pub fn ensure_data_dir(&self) -> Result<PathBuf> {
    let dir = self.data_dir();
    fs::create_dir_all(&dir).map_err(|source| Error::DataDir {
      path: dir.clone(),
      source,
    })?;
    Ok(dir)
  }

  pub fn clients_db_path(&self) -> PathBuf { self.data_dir().join(CLIENTS_FILE) }

  pub fn projects_db_path(&self) -> PathBuf { self.data_dir().join(PROJECTS_FILE) }

  pub fn symbols_dir(&self) -> PathBuf { self.data_dir().join(SYMBOLS_DIR_NAME) }

  /// Settings file. Always under the user application directory, whatever
  /// the storage mode.
  pub fn config_path(&self) -> PathBuf { self.user_app_dir().join(CONFIG_FILE) }

  /// The on-disk directory of the current project.
  ///
  /// Any problem along the way (no document, unreadable document, no
  /// pointer, dangling pointer, empty path) yields `None`.
  pub fn current_project_path(&self) -> Option<PathBuf> {
    let raw = fs::read_to_string(self.projects_db_path()).ok()?;
    let doc: ProjectsDocument = serde_json::from_str(&raw).ok()?;
    doc
      .current()
      .map(|p| p.path.as_str())
      .filter(|path| !path.is_empty())
      .map(PathBuf::from)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use tempfile::tempdir;

  use super::*;

  fn resolver(mode: StorageMode, root: &Path) -> PathResolver {
    PathResolver::new(mode, root.join("wb"), root.join("appdata"))
  }

  #[test]
  fn data_dir_follows_mode() {
    let root = Path::new("/opt");
    let dev = resolver(StorageMode::Development, root);
    let prod = resolver(StorageMode::Production, root);

    assert_eq!(dev.data_dir(), Path::new("/opt/wb/.data"));
    assert_eq!(prod.data_dir(), Path::new("/opt/appdata/ElectricalWorkbench"));
    assert_eq!(dev.clients_db_path(), Path::new("/opt/wb/.data/clients.json"));
    assert_eq!(
      prod.projects_db_path(),
      Path::new("/opt/appdata/ElectricalWorkbench/projects.json")
    );
    assert_eq!(
      dev.config_path(),
      Path::new("/opt/appdata/ElectricalWorkbench/config.json")
    );
    assert_eq!(
      dev.icon_path("EW_icon.svg"),
      Path::new("/opt/wb/resources/icons/EW_icon.svg")
    );
  }

  #[test]
  fn ensure_data_dir_is_idempotent() {
    let tmp = tempdir().unwrap();
    let r = resolver(StorageMode::Development, tmp.path());

    let first = r.ensure_data_dir().unwrap();
    let second = r.ensure_data_dir().unwrap();
    assert_eq!(first, second);
    assert!(first.is_dir());
  }

  #[test]
  fn current_project_path_degrades_to_none() {
    let tmp = tempdir().unwrap();
    let r = resolver(StorageMode::Development, tmp.path());

    // No document at all.
    assert_eq!(r.current_project_path(), None);

    r.ensure_data_dir().unwrap();
    let write = |value: serde_json::Value| {
      fs::write(r.projects_db_path(), value.to_string()).unwrap();
    };

    write(json!({ "projects": [], "current_project_id": null }));
    assert_eq!(r.current_project_path(), None);

    write(json!({ "projects": [{ "id": "a", "path": "/p/a" }], "current_project_id": "b" }));
    assert_eq!(r.current_project_path(), None);

    fs::write(r.projects_db_path(), "{ not json").unwrap();
    assert_eq!(r.current_project_path(), None);

    write(json!({ "projects": [{ "id": "a", "path": "/p/a" }], "current_project_id": "a" }));
    assert_eq!(r.current_project_path(), Some(PathBuf::from("/p/a")));
  }
}
