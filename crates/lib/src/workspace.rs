//! Workspace layout.
//!
//! ```text
//! <root>/
//!   downloads/<entry>/source.<ext>   raw archive
//!   builds/<entry>/...               extracted sources and build outputs
//! ```
//!
//! Both per-entry folders are transient: they are deleted and recreated
//! before each use, so nothing from a previous run leaks into the next one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IoResultExt, Result};

const DOWNLOADS_DIR: &str = "downloads";
const BUILDS_DIR: &str = "builds";

/// Root folder owned by a pipeline run.
#[derive(Debug, Clone)]
pub struct Workspace {
  root: PathBuf,
}

impl Workspace {
  /// Use `root` as the workspace, creating it if needed.
  pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root).at_path(&root)?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn downloads_dir(&self, entry_name: &str) -> PathBuf {
    self.root.join(DOWNLOADS_DIR).join(entry_name)
  }

  pub fn builds_dir(&self, entry_name: &str) -> PathBuf {
    self.root.join(BUILDS_DIR).join(entry_name)
  }
}

/// Delete `dir` if present, then create it empty (with parents).
pub fn recreate_dir(dir: &Path) -> Result<()> {
  if dir.exists() {
    debug!(path = ?dir, "removing previous contents");
    make_owner_writable(dir)?;
    fs::remove_dir_all(dir).at_path(dir)?;
  }
  fs::create_dir_all(dir).at_path(dir)
}

/// Module caches and archives may contain read-only folders, which block `remove_dir_all` on Unix.
#[cfg(unix)]
fn make_owner_writable(dir: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let meta = fs::symlink_metadata(dir).at_path(dir)?;
  if !meta.is_dir() {
    return Ok(());
  }

  let mode = meta.permissions().mode();
  if mode & 0o700 != 0o700 {
    fs::set_permissions(dir, fs::Permissions::from_mode(mode | 0o700)).at_path(dir)?;
  }

  for child in fs::read_dir(dir).at_path(dir)? {
    let child = child.at_path(dir)?;
    make_owner_writable(&child.path())?;
  }
  Ok(())
}

#[cfg(not(unix))]
fn make_owner_writable(_dir: &Path) -> Result<()> {
  Ok(())
}
