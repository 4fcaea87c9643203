//! `ewb` — command-line front end for the Electrical Workbench data core.
//!
//! # Usage
//!
//! ```text
//! ewb client add --cuit 30-71234567-8 --name "Acme SA"
//! ewb project add --name Tablero --path ~/proyectos/tablero
//! ewb release --output tablero-0.1.0.zip
//! ewb --dev --config ewb.toml commands
//! ```

mod app;
mod registry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::App;
use clap::{Args, Parser, Subcommand};
use ewb_core::{client::ClientInput, config::WorkbenchConfig, project::ProjectInput};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "ewb", version, about = "Electrical Workbench clients, projects, symbols and releases")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "ewb.toml")]
  config: PathBuf,

  /// Keep data inside the workbench directory (`<workbench>/.data`).
  #[arg(long)]
  dev: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage clients.
  #[command(subcommand)]
  Client(ClientCommand),

  /// Manage projects and the current-project pointer.
  #[command(subcommand)]
  Project(ProjectCommand),

  /// Browse the symbol catalog.
  #[command(subcommand)]
  Symbol(SymbolCommand),

  /// Package a project directory into a zip archive.
  Release {
    /// Project directory; defaults to the current project's path.
    #[arg(long, value_name = "DIR")]
    project: Option<PathBuf>,

    /// Archive to write.
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
  },

  /// Read or write persisted settings.
  #[command(subcommand)]
  Setting(SettingCommand),

  /// List the registered workbench commands and whether they are active.
  Commands,
}

#[derive(Subcommand, Debug)]
pub enum ClientCommand {
  /// Create a client, or update the one with the same CUIT.
  Add(ClientArgs),
  List,
  /// Show a client by id or CUIT.
  Show { id_or_cuit: String },
  /// Remove every client whose id or CUIT matches.
  Remove { id_or_cuit: String },
}

#[derive(Args, Debug)]
pub struct ClientArgs {
  #[arg(long)]
  name:          Option<String>,
  /// Tax identifier; becomes the client id.
  #[arg(long)]
  cuit:          Option<String>,
  #[arg(long)]
  address:       Option<String>,
  #[arg(long)]
  contact_name:  Option<String>,
  #[arg(long)]
  contact_email: Option<String>,
  #[arg(long)]
  contact_phone: Option<String>,
}

impl From<ClientArgs> for ClientInput {
  fn from(args: ClientArgs) -> Self {
    Self {
      name:          args.name,
      cuit:          args.cuit,
      address:       args.address,
      contact_name:  args.contact_name,
      contact_email: args.contact_email,
      contact_phone: args.contact_phone,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
  /// Create a project, or update the one with the same id (or path).
  Add {
    #[command(flatten)]
    args: ProjectArgs,

    /// Do not make this the current project.
    #[arg(long)]
    no_current: bool,
  },
  List,
  Show { id: String },
  /// Show the current project.
  Current,
  /// Print the current project's directory.
  Path,
  SetCurrent { id: String },
  /// Unset the current project.
  ClearCurrent,
  /// Remove a project record; its files are kept.
  Remove { id: String },
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
  /// Update this project instead of matching by path.
  #[arg(long)]
  id:        Option<String>,
  #[arg(long)]
  name:      Option<String>,
  #[arg(long)]
  code:      Option<String>,
  #[arg(long)]
  path:      Option<String>,
  #[arg(long)]
  template:  Option<String>,
  #[arg(long = "type")]
  kind:      Option<String>,
  #[arg(long)]
  purpose:   Option<String>,
  #[arg(long)]
  client_id: Option<String>,
  #[arg(long)]
  status:    Option<String>,
  #[arg(long)]
  version:   Option<String>,
  #[arg(long = "macro")]
  is_macro:  Option<bool>,
}

impl From<ProjectArgs> for ProjectInput {
  fn from(args: ProjectArgs) -> Self {
    Self {
      id:        args.id,
      name:      args.name,
      code:      args.code,
      path:      args.path,
      template:  args.template,
      kind:      args.kind,
      purpose:   args.purpose,
      client_id: args.client_id,
      status:    args.status,
      version:   args.version,
      is_macro:  args.is_macro,
    }
  }
}

#[derive(Subcommand, Debug)]
pub enum SymbolCommand {
  List,
  /// Print a symbol's metadata with its image path.
  Show { name: String },
}

#[derive(Subcommand, Debug)]
pub enum SettingCommand {
  Get { group: String, key: String },
  Set { group: String, key: String, value: String },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Config file, overridden by `EWB_*` environment variables.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("EWB").try_parsing(true))
    .build()
    .with_context(|| format!("failed to read config file {}", cli.config.display()))?;

  let mut workbench_cfg: WorkbenchConfig = settings
    .try_deserialize()
    .context("failed to deserialise WorkbenchConfig")?;
  if cli.dev {
    workbench_cfg.dev_mode = true;
  }

  // Development mode is chatty by default, like the plugin's console log.
  let default_level = if workbench_cfg.dev_mode { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  let app = App::new(workbench_cfg);
  app.run(cli.command)
}
