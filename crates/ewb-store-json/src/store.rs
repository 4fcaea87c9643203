//! [`JsonStore`] — the JSON-file implementation of [`Datastore`].

use std::path::{Path, PathBuf};

use ewb_core::{
  Loaded, PathResolver, ReadIssue,
  client::{Client, ClientInput, ClientsDocument, normalize_cuit},
  project::{Project, ProjectInput, ProjectsDocument},
  store::Datastore,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::atomic::{ensure_json_exists, read_json, write_json_atomic};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Clients and projects kept in two JSON documents.
///
/// There is no in-memory cache: every operation reads the document from disk
/// and every mutation rewrites it whole.
#[derive(Debug, Clone)]
pub struct JsonStore {
  clients_path:  PathBuf,
  projects_path: PathBuf,
}

impl JsonStore {
  /// Open the store at the locations chosen by `resolver`, creating the data
  /// directory and empty documents as needed.
  pub fn open(resolver: &PathResolver) -> Self {
    if let Err(e) = resolver.ensure_data_dir() {
      tracing::warn!("{e}");
    }
    Self::at(resolver.clients_db_path(), resolver.projects_db_path())
  }

  /// Open the store over explicit document paths.
  ///
  /// Missing documents are created with their empty structure; existing ones
  /// are left untouched. Creation failures are logged and otherwise ignored,
  /// since reads tolerate missing files.
  pub fn at(clients_path: impl Into<PathBuf>, projects_path: impl Into<PathBuf>) -> Self {
    let store = Self {
      clients_path:  clients_path.into(),
      projects_path: projects_path.into(),
    };
    store.bootstrap();
    store
  }

  pub fn clients_path(&self) -> &Path { &self.clients_path }

  pub fn projects_path(&self) -> &Path { &self.projects_path }

  fn bootstrap(&self) {
    bootstrap_document(&self.clients_path, &ClientsDocument::default());
    bootstrap_document(&self.projects_path, &ProjectsDocument::default());
  }
}

fn bootstrap_document<T: Serialize>(path: &Path, fallback: &T) {
  match ensure_json_exists(path, fallback) {
    Ok(true) => tracing::debug!(path = %path.display(), "created empty document"),
    Ok(false) => {}
    Err(e) => tracing::warn!(path = %path.display(), "could not create document: {e}"),
  }
}

fn load_logged<T: DeserializeOwned + Default>(path: &Path) -> Loaded<T> {
  let loaded = read_json(path);
  match &loaded.issue {
    None => {}
    Some(issue @ ReadIssue::Missing { .. }) => tracing::warn!("{issue}"),
    Some(issue) => tracing::error!("{issue}"),
  }
  loaded
}

fn persist<T: Serialize>(path: &Path, document: &T) -> bool {
  match write_json_atomic(path, document) {
    Ok(()) => true,
    Err(e) => {
      tracing::error!(path = %path.display(), "failed to save: {e}");
      false
    }
  }
}

// ─── Datastore impl ──────────────────────────────────────────────────────────

impl Datastore for JsonStore {
  // ── Clients ───────────────────────────────────────────────────────────────

  fn load_clients(&self) -> Loaded<Vec<Client>> {
    load_logged::<ClientsDocument>(&self.clients_path).map(|doc| doc.clients)
  }

  fn save_clients(&self, clients: &[Client]) -> bool {
    let document = ClientsDocument { clients: clients.to_vec() };
    let ok = persist(&self.clients_path, &document);
    if ok {
      tracing::info!(count = clients.len(), "clients.json updated");
    }
    ok
  }

  fn find_client_by_cuit(&self, cuit: &str) -> Option<Client> {
    let cuit = normalize_cuit(cuit)?;
    self
      .load_clients()
      .into_value()
      .into_iter()
      .find(|c| c.has_cuit(cuit))
  }

  fn find_client(&self, id_or_cuit: &str) -> Option<Client> {
    if id_or_cuit.is_empty() {
      return None;
    }
    let clients = self.load_clients().into_value();
    let by_id = clients.iter().position(|c| c.id == id_or_cuit);
    let by_cuit = || {
      normalize_cuit(id_or_cuit).and_then(|cuit| clients.iter().position(|c| c.has_cuit(cuit)))
    };
    by_id.or_else(by_cuit).map(|i| clients[i].clone())
  }

  fn add_or_update_client(&self, input: ClientInput) -> Client {
    let now = ewb_core::now();
    let mut clients = self.load_clients().into_value();

    let position = input
      .cuit()
      .and_then(|cuit| clients.iter().position(|c| c.has_cuit(cuit)));

    let (saved, action) = match position {
      Some(i) => {
        clients[i].merge(input, now);
        (clients[i].clone(), "updated")
      }
      None => {
        let client = Client::create(input, now);
        clients.push(client.clone());
        (client, "created")
      }
    };

    if self.save_clients(&clients) {
      tracing::info!(id = %saved.id, name = %saved.name, "client {action}");
    } else {
      tracing::error!(id = %saved.id, "could not persist clients.json");
    }

    saved
  }

  fn remove_client(&self, id_or_cuit: &str) -> bool {
    if id_or_cuit.trim().is_empty() {
      tracing::warn!("refusing to remove clients by an empty id");
      return false;
    }

    let mut clients = self.load_clients().into_value();
    let before = clients.len();
    clients.retain(|c| c.id != id_or_cuit && c.cuit != id_or_cuit);
    tracing::debug!(removed = before - clients.len(), key = %id_or_cuit, "removing client");

    self.save_clients(&clients)
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  fn load_projects_data(&self) -> Loaded<ProjectsDocument> {
    load_logged(&self.projects_path)
  }

  fn save_projects_data(&self, data: &ProjectsDocument) -> bool {
    let ok = persist(&self.projects_path, data);
    if ok {
      tracing::info!(count = data.projects.len(), "projects.json updated");
    }
    ok
  }

  fn find_project_by_id(&self, id: &str) -> Option<Project> {
    self.load_projects_data().value.find(id).cloned()
  }

  fn add_or_update_project(&self, input: ProjectInput, mark_current: bool) -> Project {
    let now = ewb_core::now();
    let mut data = self.load_projects_data().into_value();

    let position = match (input.id(), input.path()) {
      (Some(id), _) => data.projects.iter().position(|p| p.id == id),
      (None, Some(path)) => data.projects.iter().position(|p| p.path == path),
      (None, None) => None,
    };

    let (saved, action) = match position {
      Some(i) => {
        data.projects[i].merge(input, now);
        (data.projects[i].clone(), "updated")
      }
      None => {
        let project = Project::create(input, now);
        data.projects.push(project.clone());
        (project, "created")
      }
    };

    if mark_current {
      data.current_project_id = Some(saved.id.clone());
    }

    if self.save_projects_data(&data) {
      tracing::info!(id = %saved.id, name = %saved.name, "project {action}");
    } else {
      tracing::error!(id = %saved.id, "could not persist projects.json");
    }

    saved
  }

  fn set_current_project(&self, id: Option<&str>) -> bool {
    let mut data = self.load_projects_data().into_value();
    data.current_project_id = id.map(str::to_owned);
    self.save_projects_data(&data)
  }

  fn get_current_project(&self) -> Option<Project> {
    self.load_projects_data().value.current().cloned()
  }

  fn remove_project(&self, id: &str) -> bool {
    let mut data = self.load_projects_data().into_value();
    data.projects.retain(|p| p.id != id);
    if data.current_project_id.as_deref() == Some(id) {
      data.current_project_id = None;
    }
    self.save_projects_data(&data)
  }
}
