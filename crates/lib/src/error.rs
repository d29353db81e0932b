//! Error type shared by every pipeline step.
//!
//! Each failure carries an [`ErrorKind`] so the caller can decide how to react:
//! configuration and usage problems are never worth retrying, transient ones
//! (network) might be, and best-effort failures are reported but never abort
//! a build.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Broad classification of a [`BuildError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Configuration,
  Usage,
  Transient,
  BestEffort,
  Command,
  Io,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Configuration => "configuration",
      Self::Usage => "usage",
      Self::Transient => "transient",
      Self::BestEffort => "best-effort",
      Self::Command => "command",
      Self::Io => "io",
    }
  }

  /// Whether a failure of this kind must stop the run.
  pub fn is_fatal(&self) -> bool {
    !matches!(self, Self::BestEffort)
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Errors that can occur while building an entry.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Invalid configuration, manifest or archive layout.
  #[error("bad configuration: {message}")]
  Configuration {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  /// Invalid invocation of the tool.
  #[error("bad usage: {message}")]
  Usage { message: String },

  /// A condition that may succeed when retried, such as a failed download.
  #[error("transient error: {message}")]
  Transient {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  /// An optional step failed; the build can still be used.
  #[error("best-effort step failed: {message}")]
  BestEffort {
    message: String,
    #[source]
    source: Option<BoxError>,
  },

  /// An external tool exited unsuccessfully. `output` holds what it printed.
  #[error("command `{cmd}` failed with exit code {code:?}{}", format_output(.output))]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    output: String,
  },

  /// Filesystem or process-spawn failure.
  #[error("io error at '{}'", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl BuildError {
  pub fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration {
      message: message.into(),
      source: None,
    }
  }

  pub fn configuration_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
    Self::Configuration {
      message: message.into(),
      source: Some(source.into()),
    }
  }

  pub fn usage(message: impl Into<String>) -> Self {
    Self::Usage {
      message: message.into(),
    }
  }

  pub fn transient(message: impl Into<String>, source: Option<BoxError>) -> Self {
    Self::Transient {
      message: message.into(),
      source,
    }
  }

  pub fn best_effort(message: impl Into<String>, source: Option<BoxError>) -> Self {
    Self::BestEffort {
      message: message.into(),
      source,
    }
  }

  pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.as_ref().to_path_buf(),
      source,
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Configuration { .. } => ErrorKind::Configuration,
      Self::Usage { .. } => ErrorKind::Usage,
      Self::Transient { .. } => ErrorKind::Transient,
      Self::BestEffort { .. } => ErrorKind::BestEffort,
      Self::CmdFailed { .. } => ErrorKind::Command,
      Self::Io { .. } => ErrorKind::Io,
    }
  }

  /// The message followed by the inner cause, if any, on its own line.
  pub fn pretty(&self) -> String {
    match std::error::Error::source(self) {
      Some(inner) => format!("{}\n... {}", self, inner),
      None => self.to_string(),
    }
  }
}

pub type Result<T> = std::result::Result<T, BuildError>;

fn format_output(output: &str) -> String {
  let output = output.trim_end();
  if output.is_empty() {
    String::new()
  } else {
    format!(", output:\n{}", output)
  }
}

/// Attach a path to I/O failures, in the spirit of `anyhow::Context`.
pub(crate) trait IoResultExt<T> {
  fn at_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
  fn at_path(self, path: impl AsRef<Path>) -> Result<T> {
    self.map_err(|e| BuildError::io(path, e))
  }
}
