//! Pinned native dependency resolution.
//!
//! The build manifest pins the module that ships prebuilt native libraries.
//! Its version selects a folder in the Go module cache:
//!
//! ```text
//! $GOPATH/pkg/mod/<module>@<version>/{wasmer,wasmer2}/*.so
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::NATIVE_DEPENDENCY_MODULE;
use crate::error::{BuildError, IoResultExt, Result};
use crate::platform::paths::expand_tilde;

const GOPATH_VAR: &str = "GOPATH";
const DEFAULT_GOPATH: &str = "~/go";
const MODULE_CACHE_SEGMENTS: [&str; 2] = ["pkg", "mod"];
const REQUIRE_DIRECTIVE: &str = "require";

/// A module and the version the manifest pins it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReference {
  pub module: String,
  pub version: String,
}

impl DependencyReference {
  /// Folder name of this module version in the module cache.
  pub fn cache_folder_name(&self) -> String {
    format!("{}@{}", self.module, self.version)
  }
}

impl fmt::Display for DependencyReference {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.module, self.version)
  }
}

/// Find the single manifest line mentioning `module` and read its version.
///
/// Both the block form (`\t<module> <version>` inside `require (...)`) and the
/// single-line `require <module> <version>` form are understood. Zero or
/// several matching lines are rejected rather than guessed at.
pub fn find_dependency(manifest: &str, module: &str) -> Result<DependencyReference> {
  let matches: Vec<&str> = manifest.lines().filter(|line| line.contains(module)).collect();

  let line = match matches.as_slice() {
    [line] => *line,
    [] => {
      return Err(BuildError::configuration(format!(
        "dependency {} not found in manifest",
        module
      )));
    }
    several => {
      return Err(BuildError::configuration(format!(
        "dependency {} is referenced by {} manifest lines, expected exactly one",
        module,
        several.len()
      )));
    }
  };

  // Single-line form: `require <module> <version>`.
  let mut parts = line.split_whitespace().skip_while(|token| *token == REQUIRE_DIRECTIVE);
  match (parts.next(), parts.next()) {
    (Some(module), Some(version)) => Ok(DependencyReference {
      module: module.to_string(),
      version: version.to_string(),
    }),
    _ => Err(BuildError::configuration(format!(
      "malformed manifest line for {}: '{}'",
      module,
      line.trim()
    ))),
  }
}

/// The Go module cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCache {
  root: PathBuf,
}

impl ModuleCache {
  /// Module cache under `gopath`, i.e. `<gopath>/pkg/mod`.
  pub fn new(gopath: impl AsRef<Path>) -> Self {
    let root = MODULE_CACHE_SEGMENTS
      .iter()
      .fold(gopath.as_ref().to_path_buf(), |path, segment| path.join(segment));
    Self { root }
  }

  /// Module cache of the first `GOPATH` entry, or of `~/go` when unset.
  pub fn from_env() -> Result<Self> {
    let gopath = env::var_os(GOPATH_VAR)
      .and_then(|value| env::split_paths(&value).find(|p| !p.as_os_str().is_empty()))
      .unwrap_or_else(|| PathBuf::from(DEFAULT_GOPATH));

    Ok(Self::new(expand_tilde(&gopath)?))
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn module_dir(&self, dependency: &DependencyReference) -> PathBuf {
    self.root.join(dependency.cache_folder_name())
  }
}

/// Resolve the cache folder of the native dependency pinned by `manifest_path`.
pub fn resolve_native_library_cache_folder(manifest_path: &Path, cache: &ModuleCache) -> Result<PathBuf> {
  resolve_module_cache_folder(manifest_path, NATIVE_DEPENDENCY_MODULE, cache)
}

pub fn resolve_module_cache_folder(manifest_path: &Path, module: &str, cache: &ModuleCache) -> Result<PathBuf> {
  let manifest = std::fs::read_to_string(manifest_path).at_path(manifest_path)?;
  let dependency = find_dependency(&manifest, module)?;
  let folder = cache.module_dir(&dependency);

  if !folder.is_dir() {
    return Err(BuildError::configuration(format!(
      "module cache folder {} for {} does not exist, run `go mod download` first",
      folder.display(),
      dependency
    )));
  }

  debug!(dependency = %dependency, folder = ?folder, "resolved dependency cache folder");
  Ok(folder)
}
