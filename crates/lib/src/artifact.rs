//! Post-build handling of the executable and its native libraries.
//!
//! After a successful build the native libraries of the pinned dependency
//! are copied next to the executable, the executable's runtime search path
//! is patched where the platform supports it, and everything is published
//! to the entry's destination folder.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::consts::{FILE_MODE_NICE, LOADER_RELATIVE_RPATH, NATIVE_LIBRARY_DIRS};
use crate::error::{BuildError, IoResultExt, Result};
use crate::platform::PlatformCapabilities;
use crate::workspace::recreate_dir;

/// Native libraries found in the `wasmer` and `wasmer2` folders of `cache_folder`.
///
/// Missing folders contribute nothing. The result is sorted.
pub fn collect_native_libraries(cache_folder: &Path, capabilities: &PlatformCapabilities) -> Result<Vec<PathBuf>> {
  let mut libraries = Vec::new();

  for dir in NATIVE_LIBRARY_DIRS.iter().map(|name| cache_folder.join(name)) {
    if !dir.is_dir() {
      debug!(path = ?dir, "no native library folder");
      continue;
    }

    for child in fs::read_dir(&dir).at_path(&dir)? {
      let child = child.at_path(&dir)?;
      let path = child.path();
      let is_library = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| capabilities.is_native_library(name));

      if is_library && path.is_file() {
        libraries.push(path);
      }
    }
  }

  libraries.sort();
  Ok(libraries)
}

/// Copy `libraries` into `dest_dir` and make each copy executable.
///
/// Module caches keep files read-only, so the copies get a fixed mode
/// instead of inheriting the source's. Returns the paths of the copies.
pub fn copy_native_libraries(libraries: &[PathBuf], dest_dir: &Path) -> Result<Vec<PathBuf>> {
  let mut copied = Vec::with_capacity(libraries.len());

  for library in libraries {
    let Some(file_name) = library.file_name() else {
      continue;
    };
    let dest = dest_dir.join(file_name);

    debug!(from = ?library, to = ?dest, "copying native library");
    if dest.exists() {
      fs::remove_file(&dest).at_path(&dest)?;
    }
    fs::copy(library, &dest).at_path(library)?;
    set_nice_mode(&dest)?;

    copied.push(dest);
  }

  Ok(copied)
}

#[cfg(unix)]
fn set_nice_mode(path: &Path) -> Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, fs::Permissions::from_mode(FILE_MODE_NICE)).at_path(path)
}

#[cfg(not(unix))]
fn set_nice_mode(path: &Path) -> Result<()> {
  let mut permissions = fs::metadata(path).at_path(path)?.permissions();
  permissions.set_readonly(false);
  fs::set_permissions(path, permissions).at_path(path)
}

/// Result of the runtime search path patch.
#[derive(Debug)]
pub enum PatchOutcome {
  /// The platform has no runtime search path patch; the tool was not run.
  Skipped,
  Patched,
  /// The tool failed. The executable is still usable through other lookup mechanisms.
  Failed(BuildError),
}

/// Add a loader-relative runtime search path to `executable` on platforms that support it.
///
/// Never fails: a tool failure is reported as [`PatchOutcome::Failed`].
pub async fn patch_runtime_path(capabilities: &PlatformCapabilities, tool: &str, executable: &Path) -> PatchOutcome {
  if !capabilities.supports_runtime_path_patch {
    debug!(os = ?capabilities.os, "runtime search path patch not supported, skipping");
    return PatchOutcome::Skipped;
  }

  info!(tool = %tool, executable = ?executable, "adding runtime search path");

  let output = Command::new(tool)
    .arg("-add_rpath")
    .arg(LOADER_RELATIVE_RPATH)
    .arg(executable)
    .output()
    .await;

  match output {
    Ok(output) if output.status.success() => PatchOutcome::Patched,
    Ok(output) => {
      let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
      warn!(tool = %tool, code = ?output.status.code(), stderr = %stderr, "runtime search path patch failed");
      PatchOutcome::Failed(BuildError::best_effort(
        format!("{} exited with code {:?}: {}", tool, output.status.code(), stderr),
        None,
      ))
    }
    Err(e) => {
      warn!(tool = %tool, error = %e, "runtime search path patch could not run");
      PatchOutcome::Failed(BuildError::best_effort(
        format!("could not run {}", tool),
        Some(Box::new(e)),
      ))
    }
  }
}

/// Recreate `destination` empty and copy the executable and libraries into it.
///
/// Returns the published paths, executable first.
pub fn publish_artifacts(executable: &Path, libraries: &[PathBuf], destination: &Path) -> Result<Vec<PathBuf>> {
  recreate_dir(destination)?;

  let mut published = Vec::with_capacity(libraries.len() + 1);
  for artifact in std::iter::once(executable).chain(libraries.iter().map(PathBuf::as_path)) {
    let file_name = artifact
      .file_name()
      .ok_or_else(|| BuildError::configuration(format!("artifact {} has no file name", artifact.display())))?;
    let dest = destination.join(file_name);

    fs::copy(artifact, &dest).at_path(artifact)?;
    published.push(dest);
  }

  info!(destination = ?destination, count = published.len(), "artifacts published");
  Ok(published)
}
