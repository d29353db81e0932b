mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::output::print_error_report;

/// multiversion - build several versions of the same executable side by side
#[derive(Parser)]
#[command(name = "multiversion")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path of the build workspace
  #[arg(long)]
  workspace: PathBuf,

  /// Path of the build configuration file (JSON)
  #[arg(long)]
  config: PathBuf,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cli = Cli::parse();

  match cmd::cmd_build(&cli.workspace, &cli.config) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error_report(&err);
      ExitCode::FAILURE
    }
  }
}
