//! Command dispatcher: wires configuration, storage and the catalogs together.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail, ensure};
use ewb_core::{PathResolver, config::WorkbenchConfig, store::Datastore};
use ewb_release::ReleasePackager;
use ewb_store_json::{JsonStore, SettingsStore};
use ewb_symbols::SymbolCatalog;
use serde::Serialize;

use crate::{
  ClientCommand, Command, ProjectCommand, SettingCommand, SymbolCommand,
  registry::CommandRegistry,
};

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  resolver: PathResolver,
  store:    JsonStore,
  symbols:  SymbolCatalog,
  settings: SettingsStore,
  registry: CommandRegistry,
}

impl App {
  pub fn new(config: WorkbenchConfig) -> Self {
    let resolver = config.resolver();
    tracing::debug!(
      mode = ?resolver.mode(),
      data_dir = %resolver.data_dir().display(),
      "resolved storage"
    );

    Self {
      store: JsonStore::open(&resolver),
      symbols: SymbolCatalog::new(config.symbols_dir()),
      settings: SettingsStore::open(resolver.config_path()),
      registry: CommandRegistry::builtin(),
      resolver,
    }
  }

  pub fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::Client(cmd) => self.client(cmd),
      Command::Project(cmd) => self.project(cmd),
      Command::Symbol(cmd) => self.symbol(cmd),
      Command::Release { project, output } => self.release(project, output),
      Command::Setting(cmd) => self.setting(cmd),
      Command::Commands => {
        let has_current = self.store.get_current_project().is_some();
        print_json(&self.registry.status(&self.resolver, has_current))
      }
    }
  }

  // ── Clients ───────────────────────────────────────────────────────────────

  fn client(&self, cmd: ClientCommand) -> Result<()> {
    match cmd {
      ClientCommand::Add(args) => print_json(&self.store.add_or_update_client(args.into())),
      ClientCommand::List => print_json(&self.store.load_clients().value),
      ClientCommand::Show { id_or_cuit } => {
        let client = self
          .store
          .find_client(&id_or_cuit)
          .ok_or_else(|| anyhow!("client not found: {id_or_cuit}"))?;
        print_json(&client)
      }
      ClientCommand::Remove { id_or_cuit } => {
        ensure!(
          self.store.remove_client(&id_or_cuit),
          "could not update {}",
          self.store.clients_path().display()
        );
        Ok(())
      }
    }
  }

  // ── Projects ──────────────────────────────────────────────────────────────

  fn project(&self, cmd: ProjectCommand) -> Result<()> {
    match cmd {
      ProjectCommand::Add { args, no_current } => {
        print_json(&self.store.add_or_update_project(args.into(), !no_current))
      }
      ProjectCommand::List => print_json(&self.store.load_projects().value),
      ProjectCommand::Show { id } => {
        let project = self
          .store
          .find_project_by_id(&id)
          .ok_or_else(|| anyhow!("project not found: {id}"))?;
        print_json(&project)
      }
      ProjectCommand::Current => print_json(&self.store.get_current_project()),
      ProjectCommand::Path => {
        let path = self
          .resolver
          .current_project_path()
          .context("no current project")?;
        println!("{}", path.display());
        Ok(())
      }
      ProjectCommand::SetCurrent { id } => {
        ensure!(
          self.store.find_project_by_id(&id).is_some(),
          "project not found: {id}"
        );
        self.write_projects(self.store.set_current_project(Some(&id)))
      }
      ProjectCommand::ClearCurrent => self.write_projects(self.store.set_current_project(None)),
      ProjectCommand::Remove { id } => self.write_projects(self.store.remove_project(&id)),
    }
  }

  fn write_projects(&self, ok: bool) -> Result<()> {
    ensure!(ok, "could not update {}", self.store.projects_path().display());
    Ok(())
  }

  // ── Symbols ───────────────────────────────────────────────────────────────

  fn symbol(&self, cmd: SymbolCommand) -> Result<()> {
    match cmd {
      SymbolCommand::List => {
        let names = self.symbols.list_symbols().with_context(|| {
          format!("cannot list symbols in {}", self.symbols.base_path().display())
        })?;
        for name in names {
          println!("{name}");
        }
        Ok(())
      }
      SymbolCommand::Show { name } => print_json(&self.symbols.load_symbol(&name)?),
    }
  }

  // ── Release ───────────────────────────────────────────────────────────────

  fn release(&self, project: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let project_dir = self.release_source(project)?;
    let report = ReleasePackager::default()
      .create_release(&project_dir, &output)
      .with_context(|| format!("failed to package {}", project_dir.display()))?;
    println!("{}  {}", report.sha256, report.output.display());
    Ok(())
  }

  /// The directory to package: the one given, else the current project's.
  fn release_source(&self, project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
      Some(dir) => Ok(dir),
      None => match self.resolver.current_project_path() {
        Some(dir) => Ok(dir),
        None => bail!("no --project given and no current project is set"),
      },
    }
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  fn setting(&self, cmd: SettingCommand) -> Result<()> {
    match cmd {
      SettingCommand::Get { group, key } => {
        let value = self
          .settings
          .get_setting(&group, &key)
          .ok_or_else(|| anyhow!("setting {group}/{key} is not set"))?;
        println!("{value}");
        Ok(())
      }
      SettingCommand::Set { group, key, value } => {
        ensure!(
          self.settings.save_setting(&group, &key, &value),
          "could not write {}",
          self.settings.path().display()
        );
        Ok(())
      }
    }
  }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use ewb_core::project::ProjectInput;
  use tempfile::{TempDir, tempdir};

  use super::*;

  fn app() -> (TempDir, App) {
    let dir = tempdir().unwrap();
    let config = WorkbenchConfig {
      dev_mode: true,
      workbench_dir: dir.path().join("wb"),
      user_app_dir: Some(dir.path().join("home")),
      symbols_dir: None,
    };
    (dir, App::new(config))
  }

  #[test]
  fn dev_mode_keeps_documents_in_the_checkout() {
    let (dir, app) = app();
    assert!(dir.path().join("wb/.data/clients.json").is_file());
    assert!(dir.path().join("wb/.data/projects.json").is_file());
    assert_eq!(app.symbols.base_path(), dir.path().join("wb/.data/symbols"));
  }

  #[test]
  fn release_defaults_to_the_current_project() {
    let (dir, app) = app();

    assert!(app.release_source(None).is_err());

    let project_dir = dir.path().join("tablero");
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(project_dir.join("plano.svg"), "<svg/>").unwrap();
    app.store.add_or_update_project(
      ProjectInput {
        name: Some("Tablero".into()),
        path: Some(project_dir.to_string_lossy().into_owned()),
        ..Default::default()
      },
      true,
    );

    assert_eq!(app.release_source(None).unwrap(), project_dir);

    let output = dir.path().join("tablero.zip");
    app.release(None, output.clone()).unwrap();
    assert!(output.is_file());
  }

  #[test]
  fn set_current_rejects_unknown_projects() {
    let (_dir, app) = app();
    let err = app
      .project(ProjectCommand::SetCurrent { id: "ghost".into() })
      .unwrap_err();
    assert!(err.to_string().contains("ghost"));
  }

  #[test]
  fn settings_roundtrip_through_the_cli() {
    let (dir, app) = app();
    app
      .setting(SettingCommand::Set {
        group: "release".into(),
        key:   "author".into(),
        value: "Ing. Pérez".into(),
      })
      .unwrap();

    assert!(dir.path().join("home/ElectricalWorkbench/config.json").is_file());
    assert!(
      app
        .setting(SettingCommand::Get { group: "release".into(), key: "author".into() })
        .is_ok()
    );
    assert!(
      app
        .setting(SettingCommand::Get { group: "release".into(), key: "missing".into() })
        .is_err()
    );
  }
}
