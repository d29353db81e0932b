//! Locating the buildable source tree inside an extraction folder.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::MANIFEST_FILE;
use crate::error::{BuildError, IoResultExt, Result};

/// Find the source root inside `extraction_dir`.
///
/// Archives usually hold a single top-level project folder; when exactly one
/// child directory exists it is the candidate, otherwise the extraction folder
/// itself is. The candidate must contain the build manifest at its top level.
pub fn locate_source_root(extraction_dir: &Path) -> Result<PathBuf> {
  let mut subdirs = Vec::new();
  for child in fs::read_dir(extraction_dir).at_path(extraction_dir)? {
    let child = child.at_path(extraction_dir)?;
    if child.file_type().at_path(child.path())?.is_dir() {
      subdirs.push(child.path());
    }
  }

  let candidate = match <[PathBuf; 1]>::try_from(subdirs) {
    Ok([only]) => only,
    Err(_) => extraction_dir.to_path_buf(),
  };

  debug!(candidate = ?candidate, "source root candidate");

  if !candidate.join(MANIFEST_FILE).is_file() {
    return Err(BuildError::configuration(format!(
      "invalid source folder {}: no {} found",
      candidate.display(),
      MANIFEST_FILE
    )));
  }

  Ok(candidate)
}
