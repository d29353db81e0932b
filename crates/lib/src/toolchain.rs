//! Invoking the external compiler toolchain.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use crate::consts::{DEFAULT_TOOLCHAIN, ENTRY_POINT_DIR, EXECUTABLE_NAME};
use crate::error::{BuildError, Result};

/// The command that compiles the entry point folder in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
  pub program: String,
  pub args: Vec<String>,
}

impl Default for Toolchain {
  /// `go build`, resolved through `PATH`.
  fn default() -> Self {
    Self {
      program: DEFAULT_TOOLCHAIN.to_string(),
      args: vec!["build".to_string()],
    }
  }
}

impl Toolchain {
  pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
    Self {
      program: program.into(),
      args: args.into_iter().map(Into::into).collect(),
    }
  }

  fn display(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Build the project at `source_root`.
  ///
  /// Runs in `<source_root>/cmd/node` and returns that folder, which then
  /// holds the produced executable.
  pub async fn build(&self, source_root: &Path) -> Result<PathBuf> {
    let entry_point = entry_point_dir(source_root);
    if !entry_point.is_dir() {
      return Err(BuildError::configuration(format!(
        "entry point folder {} does not exist",
        entry_point.display()
      )));
    }

    info!(cmd = %self.display(), cwd = ?entry_point, "building");

    let output = Command::new(&self.program)
      .args(&self.args)
      .current_dir(&entry_point)
      .output()
      .await
      .map_err(|e| BuildError::io(&self.program, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "toolchain stdout");
    }
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "toolchain stderr");
    }

    if !output.status.success() {
      return Err(BuildError::CmdFailed {
        cmd: self.display(),
        code: output.status.code(),
        output: format!("{}{}", stdout, stderr),
      });
    }

    let executable = executable_path(&entry_point);
    if !executable.is_file() {
      return Err(BuildError::configuration(format!(
        "build succeeded but produced no executable at {}",
        executable.display()
      )));
    }

    Ok(entry_point)
  }
}

/// `<source_root>/cmd/node`
pub fn entry_point_dir(source_root: &Path) -> PathBuf {
  ENTRY_POINT_DIR
    .iter()
    .fold(source_root.to_path_buf(), |path, segment| path.join(segment))
}

/// Path of the executable inside the entry point folder.
pub fn executable_path(entry_point: &Path) -> PathBuf {
  entry_point.join(format!("{}{}", EXECUTABLE_NAME, std::env::consts::EXE_SUFFIX))
}
