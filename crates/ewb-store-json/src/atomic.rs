//! Whole-document JSON persistence.
//!
//! Writes go to a sibling `<file>.tmp` which is then renamed over the
//! target, so a reader sees either the old document or the new one. Reads
//! never fail; they fall back to the document's default and report why.

use std::{
  ffi::OsString,
  fs::{self, File},
  io::{self, Write as _},
  path::{Path, PathBuf},
};

use ewb_core::{Loaded, ReadIssue};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::PrettyFormatter;

use crate::Result;

const INDENT: &[u8] = b"    ";

/// The temporary sibling used while writing `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(".tmp");
  PathBuf::from(name)
}

/// Serialise with four-space indentation and a trailing newline. Non-ASCII
/// characters are written as-is.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
  let mut buf = Vec::new();
  let mut ser =
    serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
  value.serialize(&mut ser)?;
  buf.push(b'\n');
  Ok(buf)
}

/// Atomically replace `path` with the JSON form of `value`.
///
/// On failure the temporary file is removed and the target is untouched.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
  let bytes = to_pretty_json(value)?;
  let tmp = tmp_path(path);

  if let Err(e) = write_then_rename(&tmp, path, &bytes) {
    if tmp.exists() {
      let _ = fs::remove_file(&tmp);
    }
    return Err(e.into());
  }
  Ok(())
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
  let mut file = File::create(tmp)?;
  file.write_all(bytes)?;
  file.sync_all()?;
  drop(file);
  fs::rename(tmp, path)
}

/// Read and parse `path`, falling back to `T::default()` on any problem.
pub fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Loaded<T> {
  let raw = match fs::read_to_string(path) {
    Ok(raw) => raw,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Loaded::fallback(ReadIssue::Missing { path: path.to_path_buf() });
    }
    Err(e) => {
      return Loaded::fallback(ReadIssue::Io {
        path:    path.to_path_buf(),
        message: e.to_string(),
      });
    }
  };

  match serde_json::from_str(&raw) {
    Ok(value) => Loaded::ok(value),
    Err(e) => Loaded::fallback(ReadIssue::Malformed {
      path:    path.to_path_buf(),
      message: e.to_string(),
    }),
  }
}

/// Create `path` holding `fallback` unless something already exists there.
///
/// Returns whether a document was written.
pub fn ensure_json_exists<T: Serialize + ?Sized>(path: &Path, fallback: &T) -> Result<bool> {
  if path.exists() {
    return Ok(false);
  }
  write_json_atomic(path, fallback)?;
  Ok(true)
}

#[cfg(test)]
mod tests {
  use serde_json::{Value, json};
  use tempfile::tempdir;

  use super::*;

  #[test]
  fn write_then_read_roundtrip_leaves_no_tmp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    let doc = json!({ "clients": [{ "id": "1", "name": "Eléctrica Ñandú" }] });

    write_json_atomic(&path, &doc).unwrap();

    let loaded: Loaded<Value> = read_json(&path);
    assert!(loaded.is_clean());
    assert_eq!(loaded.value, doc);
    assert!(!tmp_path(&path).exists());
  }

  #[test]
  fn output_is_four_space_indented_and_unescaped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");

    write_json_atomic(&path, &json!({ "name": "Ñandú" })).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw, "{\n    \"name\": \"Ñandú\"\n}\n");
  }

  #[test]
  fn failed_write_keeps_previous_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    write_json_atomic(&path, &json!({ "v": 1 })).unwrap();

    // A directory squatting on the temporary path makes the write fail.
    fs::create_dir(tmp_path(&path)).unwrap();
    assert!(write_json_atomic(&path, &json!({ "v": 2 })).is_err());

    let loaded: Loaded<Value> = read_json(&path);
    assert_eq!(loaded.value, json!({ "v": 1 }));
  }

  #[test]
  fn write_into_missing_directory_fails_without_artifacts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("doc.json");

    assert!(write_json_atomic(&path, &json!({})).is_err());
    assert!(!path.exists());
    assert!(!tmp_path(&path).exists());
  }

  #[test]
  fn read_distinguishes_missing_from_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");

    let missing: Loaded<Value> = read_json(&path);
    assert!(matches!(missing.issue, Some(ReadIssue::Missing { .. })));
    assert_eq!(missing.value, Value::Null);

    fs::write(&path, "{\"clients\": [").unwrap();
    let malformed: Loaded<Value> = read_json(&path);
    assert!(matches!(malformed.issue, Some(ReadIssue::Malformed { .. })));
  }

  #[test]
  fn ensure_json_exists_does_not_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");

    assert!(ensure_json_exists(&path, &json!({ "a": 1 })).unwrap());
    assert!(!ensure_json_exists(&path, &json!({ "a": 2 })).unwrap());

    let loaded: Loaded<Value> = read_json(&path);
    assert_eq!(loaded.value, json!({ "a": 1 }));
  }
}
