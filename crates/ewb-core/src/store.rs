//! The `Datastore` trait.
//!
//! Implemented by storage backends (e.g. `ewb-store-json`). The CLI and any
//! host integration depend on this abstraction, not on a concrete backend.
//!
//! Every operation is synchronous and availability-first: reads fall back to
//! empty defaults (see [`Loaded`]), writes report failure through their
//! return value and the log, never through an error.

use crate::{
  client::{Client, ClientInput},
  loaded::Loaded,
  project::{Project, ProjectInput, ProjectsDocument},
};

pub trait Datastore {
  // ── Clients ───────────────────────────────────────────────────────────

  fn load_clients(&self) -> Loaded<Vec<Client>>;

  /// Replace the whole client collection. Returns `false` if the write failed.
  fn save_clients(&self, clients: &[Client]) -> bool;

  /// Linear scan by tax id. A blank `cuit` is never found.
  fn find_client_by_cuit(&self, cuit: &str) -> Option<Client>;

  /// Look a client up by `id`, falling back to `cuit`.
  fn find_client(&self, id_or_cuit: &str) -> Option<Client>;

  /// Merge `input` onto the client with the same tax id, or create one.
  ///
  /// Always returns the resulting record, even when persisting it failed.
  fn add_or_update_client(&self, input: ClientInput) -> Client;

  /// Drop every client whose `id` or `cuit` equals `id_or_cuit`.
  fn remove_client(&self, id_or_cuit: &str) -> bool;

  // ── Projects ──────────────────────────────────────────────────────────

  fn load_projects_data(&self) -> Loaded<ProjectsDocument>;

  fn load_projects(&self) -> Loaded<Vec<Project>> {
    self.load_projects_data().map(|doc| doc.projects)
  }

  /// Replace the whole projects document. Returns `false` if the write failed.
  fn save_projects_data(&self, data: &ProjectsDocument) -> bool;

  fn find_project_by_id(&self, id: &str) -> Option<Project>;

  /// Merge `input` onto the project with the same `id` (or, without an id,
  /// the same `path`), or create one. With `mark_current`, the result
  /// becomes the current project in the same write.
  fn add_or_update_project(&self, input: ProjectInput, mark_current: bool) -> Project;

  /// Overwrite the current-project pointer; `None` clears it.
  fn set_current_project(&self, id: Option<&str>) -> bool;

  fn get_current_project(&self) -> Option<Project>;

  /// Remove a project record. Files under its `path` are left alone.
  fn remove_project(&self, id: &str) -> bool;
}
