//! Project records and the `projects.json` document.
//!
//! Exactly one project may be "current". The marker is a single
//! document-level pointer (`current_project_id`), never a per-record flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::field::{lenient_bool, lenient_string, merge_into, provided, timestamp};

/// Status given to projects created without one.
pub const DEFAULT_STATUS: &str = "En proceso";

/// Version given to projects created without one.
pub const DEFAULT_VERSION: &str = "0.1.0";

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
  #[serde(deserialize_with = "lenient_string")]
  pub id:         String,
  #[serde(deserialize_with = "lenient_string")]
  pub name:       String,
  #[serde(deserialize_with = "lenient_string")]
  pub code:       String,
  /// Directory holding the project's files on disk.
  #[serde(deserialize_with = "lenient_string")]
  pub path:       String,
  #[serde(deserialize_with = "lenient_string")]
  pub template:   String,
  #[serde(rename = "type", deserialize_with = "lenient_string")]
  pub kind:       String,
  #[serde(deserialize_with = "lenient_string")]
  pub purpose:    String,
  /// Refers to [`crate::client::Client::id`]; not enforced.
  #[serde(deserialize_with = "lenient_string")]
  pub client_id:  String,
  #[serde(deserialize_with = "lenient_string")]
  pub status:     String,
  #[serde(deserialize_with = "lenient_string")]
  pub version:    String,
  #[serde(deserialize_with = "lenient_bool")]
  pub is_macro:   bool,
  #[serde(with = "timestamp")]
  pub created_at: DateTime<Utc>,
  #[serde(with = "timestamp")]
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub extra:      Map<String, Value>,
}

impl Default for Project {
  fn default() -> Self {
    Self {
      id:         String::new(),
      name:       String::new(),
      code:       String::new(),
      path:       String::new(),
      template:   String::new(),
      kind:       String::new(),
      purpose:    String::new(),
      client_id:  String::new(),
      status:     DEFAULT_STATUS.to_owned(),
      version:    DEFAULT_VERSION.to_owned(),
      is_macro:   false,
      created_at: DateTime::<Utc>::default(),
      updated_at: DateTime::<Utc>::default(),
      extra:      Map::new(),
    }
  }
}

impl Project {
  /// Build a fresh record with a new UUID. Any `id` in `input` is ignored.
  pub fn create(input: ProjectInput, now: DateTime<Utc>) -> Self {
    let defaults = Self::default();
    Self {
      id: Uuid::new_v4().to_string(),
      name: input.name.unwrap_or_default(),
      code: input.code.unwrap_or_default(),
      path: input.path.unwrap_or_default(),
      template: input.template.unwrap_or_default(),
      kind: input.kind.unwrap_or_default(),
      purpose: input.purpose.unwrap_or_default(),
      client_id: input.client_id.unwrap_or_default(),
      status: input
        .status
        .filter(|s| !s.is_empty())
        .unwrap_or(defaults.status),
      version: input
        .version
        .filter(|v| !v.is_empty())
        .unwrap_or(defaults.version),
      is_macro: input.is_macro.unwrap_or(false),
      created_at: now,
      updated_at: now,
      extra: Map::new(),
    }
  }

  /// Merge the provided fields of `input` onto this record and bump
  /// `updated_at`. The `id` never changes.
  pub fn merge(&mut self, input: ProjectInput, now: DateTime<Utc>) {
    merge_into(&mut self.name, input.name);
    merge_into(&mut self.code, input.code);
    merge_into(&mut self.path, input.path);
    merge_into(&mut self.template, input.template);
    merge_into(&mut self.kind, input.kind);
    merge_into(&mut self.purpose, input.purpose);
    merge_into(&mut self.client_id, input.client_id);
    merge_into(&mut self.status, input.status);
    merge_into(&mut self.version, input.version);
    if let Some(is_macro) = input.is_macro {
      self.is_macro = is_macro;
    }
    self.updated_at = now;
  }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Input to [`crate::store::Datastore::add_or_update_project`].
///
/// The target record is resolved by `id` when given, otherwise by `path`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
  pub id:        Option<String>,
  pub name:      Option<String>,
  pub code:      Option<String>,
  pub path:      Option<String>,
  pub template:  Option<String>,
  #[serde(rename = "type")]
  pub kind:      Option<String>,
  pub purpose:   Option<String>,
  pub client_id: Option<String>,
  pub status:    Option<String>,
  pub version:   Option<String>,
  pub is_macro:  Option<bool>,
}

impl ProjectInput {
  pub fn id(&self) -> Option<&str> { provided(&self.id) }

  pub fn path(&self) -> Option<&str> { provided(&self.path) }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// The on-disk shape of `projects.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectsDocument {
  #[serde(default)]
  pub projects:           Vec<Project>,
  /// Serialised as `null` when no project is current.
  #[serde(default)]
  pub current_project_id: Option<String>,
}

impl ProjectsDocument {
  /// The current project id, treating an empty string as unset.
  pub fn current_id(&self) -> Option<&str> {
    self.current_project_id.as_deref().filter(|id| !id.is_empty())
  }

  pub fn find(&self, id: &str) -> Option<&Project> {
    if id.is_empty() {
      return None;
    }
    self.projects.iter().find(|p| p.id == id)
  }

  /// The project the current pointer refers to, if it still exists.
  pub fn current(&self) -> Option<&Project> {
    self.current_id().and_then(|id| self.find(id))
  }
}
