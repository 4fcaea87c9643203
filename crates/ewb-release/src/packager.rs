//! [`ReleasePackager`] — zips a project tree, preserving relative paths.

use std::{
  ffi::OsString,
  fs::{self, File},
  io::{self, BufReader, BufWriter},
  path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{Error, Result};

/// What [`ReleasePackager::create_release`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
  pub output: PathBuf,
  /// Number of files stored in the archive.
  pub files:  usize,
  /// Size of the finished archive in bytes.
  pub bytes:  u64,
  /// Hex-encoded SHA-256 of the finished archive.
  pub sha256: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ReleasePackager {
  compression: CompressionMethod,
}

impl Default for ReleasePackager {
  fn default() -> Self { Self { compression: CompressionMethod::Deflated } }
}

impl ReleasePackager {
  pub fn with_compression(compression: CompressionMethod) -> Self { Self { compression } }

  /// Archive every file under `project_dir` into `output_zip`.
  ///
  /// Entry names are relative to `project_dir` and use `/` separators. The
  /// archive is assembled next to the output and renamed into place, so an
  /// existing release is only replaced by a complete one. If the output lies
  /// inside the project tree it is not archived into itself.
  pub fn create_release(&self, project_dir: &Path, output_zip: &Path) -> Result<ReleaseReport> {
    if !project_dir.is_dir() {
      return Err(Error::ProjectNotFound(project_dir.to_path_buf()));
    }
    tracing::info!(project = %project_dir.display(), "packaging project");

    let root = fs::canonicalize(project_dir)?;
    if let Some(parent) = output_zip.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)?;
    }
    let output = absolute_output(output_zip)?;
    let tmp = tmp_path(&output);

    let files = match self.write_archive(&root, &tmp, &[&output, &tmp]) {
      Ok(files) => files,
      Err(e) => {
        let _ = fs::remove_file(&tmp);
        return Err(e);
      }
    };
    if let Err(e) = fs::rename(&tmp, &output) {
      let _ = fs::remove_file(&tmp);
      return Err(e.into());
    }

    let (bytes, sha256) = digest(&output)?;
    tracing::info!(output = %output.display(), files, bytes, "release written");

    Ok(ReleaseReport { output, files, bytes, sha256 })
  }

  fn write_archive(&self, root: &Path, archive: &Path, skip: &[&Path]) -> Result<usize> {
    let options = SimpleFileOptions::default().compression_method(self.compression);
    let mut writer = ZipWriter::new(BufWriter::new(File::create(archive)?));
    let mut files = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
      let entry = entry?;
      if !entry.file_type().is_file() || skip.contains(&entry.path()) {
        continue;
      }

      let name = entry_name(entry.path().strip_prefix(root)?);
      tracing::debug!(entry = %name, "adding file");
      writer.start_file(name, options)?;
      io::copy(&mut BufReader::new(File::open(entry.path())?), &mut writer)?;
      files += 1;
    }

    let mut inner = writer.finish()?;
    io::Write::flush(&mut inner)?;
    inner.get_ref().sync_all()?;
    Ok(files)
  }
}

/// The output path with its directory canonicalised, so it compares equal to
/// the paths produced while walking the canonical project root.
fn absolute_output(output: &Path) -> Result<PathBuf> {
  let parent = match output.parent() {
    Some(p) if !p.as_os_str().is_empty() => fs::canonicalize(p)?,
    _ => std::env::current_dir()?,
  };
  let file_name = output
    .file_name()
    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output has no file name"))?;
  Ok(parent.join(file_name))
}

fn tmp_path(path: &Path) -> PathBuf {
  let mut name = OsString::from(path.as_os_str());
  name.push(".tmp");
  PathBuf::from(name)
}

fn entry_name(relative: &Path) -> String {
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

fn digest(path: &Path) -> Result<(u64, String)> {
  let mut hasher = Sha256::new();
  let bytes = io::copy(&mut BufReader::new(File::open(path)?), &mut hasher)?;
  Ok((bytes, hex::encode(hasher.finalize())))
}
