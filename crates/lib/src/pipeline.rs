//! The build pipeline driver.
//!
//! Entries are built one after the other. For each entry:
//! - Recreate `downloads/<name>` and `builds/<name>` in the workspace
//! - Download the source archive and unpack it
//! - Locate the source root and build it with the toolchain
//! - Copy the pinned dependency's native libraries next to the executable
//! - Patch the executable's runtime search path (macOS only, best effort)
//! - Publish the executable and libraries to the destination folder
//!
//! The first failing entry stops the run. Transient folders are left in
//! place for inspection.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::artifact::{self, PatchOutcome};
use crate::consts::{MANIFEST_FILE, RUNTIME_PATH_PATCH_TOOL};
use crate::deps::{ModuleCache, resolve_native_library_cache_folder};
use crate::entry::BuildEntry;
use crate::error::{BuildError, Result};
use crate::platform::PlatformCapabilities;
use crate::report::Reporter;
use crate::source;
use crate::toolchain::{Toolchain, entry_point_dir, executable_path};
use crate::workspace::{Workspace, recreate_dir};

/// Everything the pipeline needs besides the workspace and the entries.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
  pub toolchain: Toolchain,
  /// Program used to add the runtime search path where supported.
  pub patch_tool: String,
  pub module_cache: ModuleCache,
  pub capabilities: PlatformCapabilities,
}

impl PipelineOptions {
  /// Production settings: `go build`, `install_name_tool`, `$GOPATH` and the current platform.
  pub fn from_env() -> Result<Self> {
    let capabilities = PlatformCapabilities::current()
      .ok_or_else(|| BuildError::usage(format!("unsupported platform: {}", std::env::consts::OS)))?;

    Ok(Self {
      toolchain: Toolchain::default(),
      patch_tool: RUNTIME_PATH_PATCH_TOOL.to_string(),
      module_cache: ModuleCache::from_env()?,
      capabilities,
    })
  }
}

/// What a successful entry produced.
#[derive(Debug, Clone)]
pub struct EntryResult {
  pub name: String,
  pub destination: PathBuf,
  /// Published files, executable first.
  pub artifacts: Vec<PathBuf>,
  pub runtime_path_patched: bool,
}

pub struct Pipeline<'a> {
  workspace: Workspace,
  options: PipelineOptions,
  reporter: &'a dyn Reporter,
}

impl<'a> Pipeline<'a> {
  pub fn new(workspace: Workspace, options: PipelineOptions, reporter: &'a dyn Reporter) -> Self {
    Self {
      workspace,
      options,
      reporter,
    }
  }

  /// Build every entry in order, stopping at the first failure.
  pub async fn run(&self, entries: &[BuildEntry]) -> Result<Vec<EntryResult>> {
    let mut results = Vec::with_capacity(entries.len());

    for entry in entries {
      self.reporter.section(entry.name());
      results.push(self.build_entry(entry).await?);
    }

    info!(count = results.len(), "all builds complete");
    Ok(results)
  }

  /// Run the whole pipeline for a single entry.
  pub async fn build_entry(&self, entry: &BuildEntry) -> Result<EntryResult> {
    let extraction_dir = self.fetch_sources(entry).await?;

    let source_root = source::locate_source_root(&extraction_dir)?;
    self
      .reporter
      .info(&format!("Building {} ...", entry_point_dir(&source_root).display()));
    let build_dir = self.options.toolchain.build(&source_root).await?;
    let executable = executable_path(&build_dir);

    let cache_folder =
      resolve_native_library_cache_folder(&source_root.join(MANIFEST_FILE), &self.options.module_cache)?;
    self
      .reporter
      .info(&format!("Copying native libraries from {} ...", cache_folder.display()));
    let found = artifact::collect_native_libraries(&cache_folder, &self.options.capabilities)?;
    let libraries = artifact::copy_native_libraries(&found, &build_dir)?;

    let runtime_path_patched =
      match artifact::patch_runtime_path(&self.options.capabilities, &self.options.patch_tool, &executable).await {
        PatchOutcome::Patched => true,
        PatchOutcome::Skipped => false,
        PatchOutcome::Failed(err) => {
          self.reporter.error(&err.pretty());
          false
        }
      };

    let destination = entry.destination_folder();
    self
      .reporter
      .info(&format!("Copying artifacts to {} ...", destination.display()));
    let artifacts = artifact::publish_artifacts(&executable, &libraries, destination)?;

    Ok(EntryResult {
      name: entry.name().to_string(),
      destination: destination.to_path_buf(),
      artifacts,
      runtime_path_patched,
    })
  }

  /// Recreate the entry's transient folders, download and unpack its archive.
  ///
  /// Returns the extraction folder.
  async fn fetch_sources(&self, entry: &BuildEntry) -> Result<PathBuf> {
    let download_dir = self.workspace.downloads_dir(entry.name());
    let extraction_dir = self.workspace.builds_dir(entry.name());

    self.reporter.info(&format!("Re-creating {} ...", download_dir.display()));
    let dir = download_dir.clone();
    run_blocking(&download_dir, move || recreate_dir(&dir)).await?;

    self.reporter.info(&format!("Re-creating {} ...", extraction_dir.display()));
    let dir = extraction_dir.clone();
    run_blocking(&extraction_dir, move || recreate_dir(&dir)).await?;

    self.reporter.info(&format!(
      "Downloading archive {} to {}",
      entry.source_url(),
      download_dir.display()
    ));
    let archive = source::download_archive(entry.source_url(), &download_dir).await?;

    self.reporter.info(&format!(
      "Unpacking archive {} to {}",
      archive.display(),
      extraction_dir.display()
    ));
    let (from, dest) = (archive.clone(), extraction_dir.clone());
    run_blocking(&archive, move || source::extract_archive(&from, &dest)).await?;

    Ok(extraction_dir)
  }
}

/// Run synchronous filesystem work about `path` on the blocking thread pool.
async fn run_blocking<T, F>(path: &Path, work: F) -> Result<T>
where
  F: FnOnce() -> Result<T> + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(work)
    .await
    .map_err(|e| BuildError::io(path, std::io::Error::other(e)))?
}
