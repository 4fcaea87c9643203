//! [`SymbolCatalog`] — lists and loads symbols from a directory.

use std::{
  collections::BTreeSet,
  fs,
  path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{Error, Result};

pub const METADATA_EXTENSION: &str = "json";
pub const IMAGE_EXTENSION: &str = "svg";

/// Key under which [`SymbolCatalog::load_symbol`] stores the image path.
pub const IMAGE_KEY: &str = "svg";

#[derive(Debug, Clone)]
pub struct SymbolCatalog {
  base_path: PathBuf,
}

impl SymbolCatalog {
  pub fn new(base_path: impl Into<PathBuf>) -> Self { Self { base_path: base_path.into() } }

  pub fn base_path(&self) -> &Path { &self.base_path }

  pub fn metadata_path(&self, name: &str) -> PathBuf {
    self.base_path.join(format!("{name}.{METADATA_EXTENSION}"))
  }

  pub fn image_path(&self, name: &str) -> PathBuf {
    self.base_path.join(format!("{name}.{IMAGE_EXTENSION}"))
  }

  /// Base names of every metadata file in the directory, sorted.
  ///
  /// Whether the matching image exists is not checked here.
  pub fn list_symbols(&self) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();

    for entry in fs::read_dir(&self.base_path)? {
      let entry = entry?;
      if !entry.file_type()?.is_file() {
        continue;
      }
      let path = entry.path();
      if path.extension().and_then(|e| e.to_str()) != Some(METADATA_EXTENSION) {
        continue;
      }
      if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        names.insert(stem.to_owned());
      }
    }

    tracing::debug!(dir = %self.base_path.display(), count = names.len(), "listed symbols");
    Ok(names.into_iter().collect())
  }

  /// Load a symbol's metadata, augmented with the path of its image under
  /// [`IMAGE_KEY`].
  ///
  /// Both files must exist; the error names the first one missing.
  pub fn load_symbol(&self, name: &str) -> Result<Value> {
    let metadata_path = self.metadata_path(name);
    let image_path = self.image_path(name);

    if !metadata_path.is_file() {
      return Err(Error::NotFound(metadata_path));
    }
    if !image_path.is_file() {
      return Err(Error::NotFound(image_path));
    }

    let raw = fs::read_to_string(&metadata_path)?;
    let mut metadata: Value = serde_json::from_str(&raw).map_err(|source| Error::Json {
      path: metadata_path.clone(),
      source,
    })?;

    let Some(object) = metadata.as_object_mut() else {
      return Err(Error::NotAnObject(metadata_path));
    };
    object.insert(
      IMAGE_KEY.to_owned(),
      Value::String(image_path.to_string_lossy().into_owned()),
    );

    tracing::debug!(symbol = name, "loaded symbol");
    Ok(metadata)
  }
}
