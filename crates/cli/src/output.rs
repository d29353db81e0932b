//! CLI output formatting utilities.
//!
//! Provides the console [`Reporter`] used during a build run, colored status
//! messages, boxed error panels and human-readable durations.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use multiversion_lib::BuildError;
use multiversion_lib::report::Reporter;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
  pub const RULE: &str = "─";
}

const RULE_WIDTH: usize = 72;

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

/// A horizontal rule with `title` in the middle.
pub fn render_rule(title: &str) -> String {
  let used = title.chars().count() + 2;
  let side = RULE_WIDTH.saturating_sub(used) / 2;
  let left = symbols::RULE.repeat(side);
  let right = symbols::RULE.repeat(RULE_WIDTH.saturating_sub(used + side));
  format!("{} {} {}", left, title, right)
}

/// Draw a rounded box around `text`.
pub fn render_panel(text: &str) -> String {
  let lines: Vec<&str> = text.lines().collect();
  let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

  let mut out = format!("╭{}╮\n", "─".repeat(width + 2));
  for line in &lines {
    let pad = width - line.chars().count();
    out.push_str(&format!("│ {}{} │\n", line, " ".repeat(pad)));
  }
  out.push_str(&format!("╰{}╯", "─".repeat(width + 2)));
  out
}

pub fn print_rule(title: &str) {
  println!(
    "{}",
    render_rule(title).if_supports_color(Stream::Stdout, |s| s.yellow().bold().to_string())
  );
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

fn print_panel(text: &str) {
  eprintln!("{}", render_panel(text).if_supports_color(Stream::Stderr, |s| s.red()));
}

/// Short summary of a failed run: the pipeline error with its inner cause, if there is one.
pub fn error_summary(err: &anyhow::Error) -> String {
  match err.chain().find_map(|cause| cause.downcast_ref::<BuildError>()) {
    Some(build_err) => format!("[{}] {}", build_err.kind(), build_err.pretty()),
    None => err.to_string(),
  }
}

/// Print the full cause chain and a summary, each in its own panel.
pub fn print_error_report(err: &anyhow::Error) {
  print_panel(&format!("{:?}", err));
  print_panel(&error_summary(err));
}

/// Prints pipeline progress to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
  fn section(&self, name: &str) {
    println!();
    print_rule(name);
  }

  fn info(&self, message: &str) {
    print_info(message);
  }

  fn error(&self, message: &str) {
    print_error(message);
  }
}
