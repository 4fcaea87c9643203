//! [`SettingsStore`] — small string settings addressed by group and key.
//!
//! Stored as a flat JSON object in `config.json`, one `"<group>/<key>"`
//! entry per setting. Entries edited by hand may hold any JSON value; they
//! are read back as their JSON text and preserved on write.

use std::path::{Path, PathBuf};

use ewb_core::ReadIssue;
use serde_json::{Map, Value};

use crate::atomic::{read_json, write_json_atomic};

type SettingsDocument = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct SettingsStore {
  path: PathBuf,
}

impl SettingsStore {
  pub fn open(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

  pub fn path(&self) -> &Path { &self.path }

  /// The stored value, or `None` if it is unset or the file is unusable.
  pub fn get_setting(&self, group: &str, key: &str) -> Option<String> {
    let loaded = read_json::<SettingsDocument>(&self.path);
    if let Some(issue) = &loaded.issue {
      tracing::debug!("{issue}");
    }
    match loaded.value.get(&setting_key(group, key))? {
      Value::Null => None,
      Value::String(s) => Some(s.clone()),
      other => Some(other.to_string()),
    }
  }

  /// Store `value`, rewriting the whole settings document. Returns `false`
  /// if the write failed, or if the existing document could not be parsed
  /// and would otherwise be replaced.
  pub fn save_setting(&self, group: &str, key: &str, value: &str) -> bool {
    let loaded = read_json::<SettingsDocument>(&self.path);
    if let Some(issue) = &loaded.issue
      && !matches!(issue, ReadIssue::Missing { .. })
    {
      tracing::error!(group, key, "refusing to overwrite settings: {issue}");
      return false;
    }
    let mut settings = loaded.into_value();
    settings.insert(setting_key(group, key), Value::String(value.to_owned()));

    if let Some(parent) = self.path.parent()
      && let Err(e) = std::fs::create_dir_all(parent)
    {
      tracing::error!(path = %parent.display(), "cannot create settings directory: {e}");
      return false;
    }

    match write_json_atomic(&self.path, &settings) {
      Ok(()) => {
        tracing::debug!(group, key, "setting saved");
        true
      }
      Err(e) => {
        tracing::error!(group, key, "failed to save setting: {e}");
        false
      }
    }
  }
}

fn setting_key(group: &str, key: &str) -> String { format!("{group}/{key}") }
