//! Human-readable progress reporting.
//!
//! The pipeline never prints directly. It talks to a [`Reporter`], which the
//! CLI implements with colored terminal output. Structured diagnostics go
//! through `tracing` independently of this.

use tracing::{error, info};

pub trait Reporter {
  /// Mark the start of a new section, typically one build entry.
  fn section(&self, name: &str);

  fn info(&self, message: &str);

  fn error(&self, message: &str);
}

/// Forwards every report to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
  fn section(&self, name: &str) {
    info!(section = %name, "starting");
  }

  fn info(&self, message: &str) {
    info!("{}", message);
  }

  fn error(&self, message: &str) {
    error!("{}", message);
  }
}
