//! Test utilities for multiversion-lib.

use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

use crate::toolchain::Toolchain;

/// Write a zip archive at `path` holding `files` as `(name, content)` pairs.
pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
  let file = std::fs::File::create(path).unwrap();
  let mut writer = zip::ZipWriter::new(file);
  for (name, content) in files {
    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
    writer.write_all(content.as_bytes()).unwrap();
  }
  writer.finish().unwrap();
}

/// A toolchain that runs `script` with `/bin/sh -c`.
pub fn shell_toolchain(script: &str) -> Toolchain {
  Toolchain::new("/bin/sh", ["-c", script])
}
