//! Implementation of the build run.
//!
//! Loads the build configuration, then builds every entry in order inside
//! the workspace, stopping at the first failure.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use multiversion_lib::entry::load_config;
use multiversion_lib::pipeline::{Pipeline, PipelineOptions};
use multiversion_lib::platform::paths::absolutize;
use multiversion_lib::workspace::Workspace;

use crate::output::{ConsoleReporter, format_duration, print_stat, print_success};

/// Execute a build run.
///
/// - Resolves `~` and relative paths for the workspace and configuration
/// - Validates every configured entry before building anything
/// - Builds each entry, publishing artifacts to its destination folder
///
/// Prints a summary with each published destination.
pub fn cmd_build(workspace: &Path, config: &Path) -> Result<()> {
  let start = Instant::now();

  let workspace = Workspace::open(absolutize(workspace)?).context("Failed to prepare workspace")?;
  let config = absolutize(config)?;
  let entries = load_config(&config).with_context(|| format!("Failed to load {}", config.display()))?;
  debug!(workspace = ?workspace.root(), entries = entries.len(), "starting build run");

  let options = PipelineOptions::from_env()?;
  let reporter = ConsoleReporter;
  let pipeline = Pipeline::new(workspace, options, &reporter);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let results = rt.block_on(pipeline.run(&entries)).context("Build failed")?;

  println!();
  print_success("All builds complete!");
  for result in &results {
    print_stat(&result.name, &result.destination.display().to_string());
  }
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}
