use std::path::{Path, PathBuf};

use crate::error::{BuildError, Result};

/// Returns the user's home directory
pub fn home_dir() -> Result<PathBuf> {
  dirs::home_dir().ok_or_else(|| BuildError::configuration("failed to determine home directory"))
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
  match path.strip_prefix("~") {
    Ok(rest) => Ok(home_dir()?.join(rest)),
    Err(_) => Ok(path.to_path_buf()),
  }
}

/// Expand `~` and resolve relative paths against the current directory.
///
/// The path does not need to exist.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
  let expanded = expand_tilde(path)?;
  let absolute = std::path::absolute(&expanded).map_err(|e| BuildError::io(&expanded, e))?;
  Ok(dunce::simplified(&absolute).to_path_buf())
}
