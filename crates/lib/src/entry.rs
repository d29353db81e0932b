//! Build entries and the JSON configuration they are loaded from.
//!
//! The configuration file is a JSON array of records:
//!
//! ```json
//! [
//!   { "name": "v1", "sourceUrl": "https://example/a.zip", "destinationFolder": "~/out/v1" }
//! ]
//! ```
//!
//! Every record is validated into a [`BuildEntry`] before any build starts.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{BuildError, IoResultExt, Result};
use crate::platform::paths::absolutize;

/// One configured unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
  name: String,
  source_url: String,
  destination_folder: PathBuf,
}

impl BuildEntry {
  /// Create an entry, rejecting empty fields.
  ///
  /// The name becomes a folder under `downloads/` and `builds/`, so it must
  /// be a single plain path component.
  pub fn new(
    name: impl Into<String>,
    source_url: impl Into<String>,
    destination_folder: impl Into<PathBuf>,
  ) -> Result<Self> {
    let name = name.into();
    let source_url = source_url.into();
    let destination_folder = destination_folder.into();

    if name.is_empty() {
      return Err(BuildError::configuration("build 'name' is required"));
    }
    if !is_single_folder_name(&name) {
      return Err(BuildError::configuration(format!(
        "build 'name' must be a plain folder name, got '{}'",
        name
      )));
    }
    if source_url.is_empty() {
      return Err(BuildError::configuration("build 'source' is required"));
    }
    if destination_folder.as_os_str().is_empty() {
      return Err(BuildError::configuration("build 'destination' is required"));
    }

    Ok(Self {
      name,
      source_url,
      destination_folder,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn source_url(&self) -> &str {
    &self.source_url
  }

  pub fn destination_folder(&self) -> &Path {
    &self.destination_folder
  }
}

fn is_single_folder_name(name: &str) -> bool {
  let mut components = Path::new(name).components();
  matches!(
    (components.next(), components.next()),
    (Some(Component::Normal(part)), None) if part == name
  )
}

/// A record as it appears in the configuration file, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
  name: Option<String>,
  source_url: Option<String>,
  destination_folder: Option<String>,
}

impl RawEntry {
  fn into_entry(self) -> Result<BuildEntry> {
    let destination = self.destination_folder.unwrap_or_default();
    let destination = if destination.is_empty() {
      PathBuf::new()
    } else {
      absolutize(Path::new(&destination))?
    };

    BuildEntry::new(self.name.unwrap_or_default(), self.source_url.unwrap_or_default(), destination)
  }
}

/// Parse configuration text into validated entries, preserving order.
pub fn parse_config(text: &str) -> Result<Vec<BuildEntry>> {
  let raw: Vec<RawEntry> =
    serde_json::from_str(text).map_err(|e| BuildError::configuration_with("malformed build configuration", e))?;

  raw.into_iter().map(RawEntry::into_entry).collect()
}

/// Load and validate the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Vec<BuildEntry>> {
  debug!(path = ?path, "loading build configuration");
  let text = std::fs::read_to_string(path).at_path(path)?;
  let entries = parse_config(&text)?;
  debug!(count = entries.len(), "build configuration loaded");
  Ok(entries)
}
