//! Shared test helpers for CLI integration tests.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const VM_MODULE: &str = "github.com/multiversx/mx-chain-vm-go";

/// Zip archive bytes of a project in one top-level folder, pinning the VM module at `version`.
pub fn project_archive(version: &str) -> Vec<u8> {
  let manifest = format!("module github.com/multiversx/mx-chain-go\n\nrequire {} {}\n", VM_MODULE, version);
  let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
  for (name, content) in [
    ("mx-chain-go/go.mod", manifest.as_str()),
    ("mx-chain-go/cmd/node/main.go", "package main\n"),
  ] {
    writer.start_file(name, SimpleFileOptions::default()).unwrap();
    writer.write_all(content.as_bytes()).unwrap();
  }
  writer.finish().unwrap().into_inner()
}

/// Isolated test environment.
///
/// Each test gets its own workspace, GOPATH, output folder and a fake `go`
/// on `PATH` that writes a `node` executable into its working directory.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("build.json");
    let env = Self { temp, config_path };
    env.install_fake_go();
    env
  }

  pub fn workspace_path(&self) -> PathBuf {
    self.temp.path().join("ws")
  }

  pub fn gopath(&self) -> PathBuf {
    self.temp.path().join("go")
  }

  pub fn out_path(&self, name: &str) -> PathBuf {
    self.temp.path().join("out").join(name)
  }

  fn bin_path(&self) -> PathBuf {
    self.temp.path().join("bin")
  }

  /// Write the build configuration.
  pub fn write_config(&self, entries: &serde_json::Value) {
    std::fs::write(&self.config_path, serde_json::to_string_pretty(entries).unwrap()).unwrap();
  }

  /// Put a native library into the module cache for `version`.
  pub fn add_cached_library(&self, version: &str, backend: &str, file_name: &str) {
    let dir = self
      .gopath()
      .join("pkg/mod")
      .join(format!("{}@{}", VM_MODULE, version))
      .join(backend);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(file_name), version).unwrap();
  }

  fn install_fake_go(&self) {
    let bin = self.bin_path();
    std::fs::create_dir_all(&bin).unwrap();
    let go = bin.join("go");
    std::fs::write(
      &go,
      "#!/bin/sh\n[ \"$1\" = build ] || exit 3\npwd > built-in.txt\nprintf 'node binary' > node\n",
    )
    .unwrap();
    make_executable(&go);
  }

  /// Get a pre-configured Command for the multiversion binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `GOPATH`: Isolated module cache
  /// - `PATH`: Fake `go` first
  pub fn multiversion_cmd(&self) -> Command {
    let path = std::env::var_os("PATH").unwrap_or_default();
    let paths = std::iter::once(self.bin_path()).chain(std::env::split_paths(&path));

    let mut cmd: Command = cargo_bin_cmd!("multiversion");
    cmd.env("GOPATH", self.gopath());
    cmd.env("PATH", std::env::join_paths(paths).unwrap());
    cmd.arg("--workspace").arg(self.workspace_path());
    cmd.arg("--config").arg(&self.config_path);
    cmd
  }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
  use std::os::unix::fs::PermissionsExt;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
