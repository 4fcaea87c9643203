//! Static registry of the workbench commands.
//!
//! Commands are listed explicitly here rather than discovered at runtime.
//! Each entry describes how the host presents the command and which `ewb`
//! invocation performs it.

use ewb_core::PathResolver;
use serde::Serialize;

/// Prefix shared by every registered command name.
pub const COMMAND_PREFIX: &str = "EW_";

/// Presentation and activation rules for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  /// Registered name, `EW_<Name>`.
  pub name:             String,
  pub menu_text:        &'static str,
  pub tooltip:          &'static str,
  /// File name under `resources/icons`.
  pub icon:             &'static str,
  /// Inactive while no project is current.
  pub requires_project: bool,
  /// The `ewb` subcommand that performs it.
  pub invocation:       &'static str,
}

impl CommandSpec {
  pub fn new(
    name: &str,
    menu_text: &'static str,
    tooltip: &'static str,
    icon: &'static str,
  ) -> Self {
    Self {
      name: format!("{COMMAND_PREFIX}{name}"),
      menu_text,
      tooltip,
      icon,
      requires_project: false,
      invocation: "",
    }
  }

  pub fn requires_project(mut self) -> Self {
    self.requires_project = true;
    self
  }

  pub fn invoked_by(mut self, invocation: &'static str) -> Self {
    self.invocation = invocation;
    self
  }

  pub fn is_active(&self, has_current_project: bool) -> bool {
    !self.requires_project || has_current_project
  }
}

/// A command as shown by `ewb commands`.
#[derive(Debug, Serialize)]
pub struct CommandStatus {
  pub name:       String,
  pub menu_text:  &'static str,
  pub tooltip:    &'static str,
  pub icon:       String,
  pub active:     bool,
  pub invocation: &'static str,
}

/// Ordered set of commands with unique names.
#[derive(Debug, Default)]
pub struct CommandRegistry {
  commands: Vec<CommandSpec>,
}

impl CommandRegistry {
  pub fn new() -> Self { Self::default() }

  /// The commands the workbench ships with, in menu order.
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    for spec in [
      CommandSpec::new(
        "OpenSymbolManager",
        "Administrar Símbolos",
        "Carga y administración de símbolos SVG+JSON",
        "EW_SymbolManager.svg",
      )
      .invoked_by("ewb symbol list"),
      CommandSpec::new(
        "CreateProject",
        "Crear Proyecto",
        "Registra un proyecto nuevo y lo marca como actual",
        "EW_CreateProject.svg",
      )
      .invoked_by("ewb project add"),
      CommandSpec::new(
        "GenerateRelease",
        "Generar Release",
        "Empaqueta el proyecto actual en un archivo zip",
        "EW_GenerateRelease.svg",
      )
      .requires_project()
      .invoked_by("ewb release"),
      CommandSpec::new(
        "CloseProject",
        "Cerrar Proyecto",
        "Desmarca el proyecto actual",
        "EW_CloseProject.svg",
      )
      .requires_project()
      .invoked_by("ewb project clear-current"),
    ] {
      registry.register(spec);
    }
    registry
  }

  /// Add `spec` unless a command with the same name is already registered.
  pub fn register(&mut self, spec: CommandSpec) -> bool {
    if self.get(&spec.name).is_some() {
      tracing::warn!(command = %spec.name, "command already registered");
      return false;
    }
    tracing::debug!(command = %spec.name, "command registered");
    self.commands.push(spec);
    true
  }

  pub fn get(&self, name: &str) -> Option<&CommandSpec> {
    self.commands.iter().find(|c| c.name == name)
  }

  pub fn names(&self) -> Vec<&str> { self.commands.iter().map(|c| c.name.as_str()).collect() }

  /// Every command with its icon resolved and its current activation state.
  pub fn status(&self, resolver: &PathResolver, has_current_project: bool) -> Vec<CommandStatus> {
    self
      .commands
      .iter()
      .map(|c| CommandStatus {
        name:       c.name.clone(),
        menu_text:  c.menu_text,
        tooltip:    c.tooltip,
        icon:       resolver.icon_path(c.icon).to_string_lossy().into_owned(),
        active:     c.is_active(has_current_project),
        invocation: c.invocation,
      })
      .collect()
  }
}
