//! Build run integration tests.
#![cfg(unix)]

use predicates::prelude::*;
use serde_json::json;

use super::common::{TestEnv, project_archive};

#[test]
fn builds_entry_end_to_end() {
  let env = TestEnv::new();
  env.add_cached_library("v1.5.26", "wasmer", "libwasmer_linux_amd64.so");
  env.add_cached_library("v1.5.26", "wasmer2", "libvmexeccapi.so");

  let mut server = mockito::Server::new();
  let mock = server.mock("GET", "/a.zip").with_body(project_archive("v1.5.26")).create();

  env.write_config(&json!([
    {"name": "v1", "sourceUrl": format!("{}/a.zip", server.url()), "destinationFolder": env.out_path("v1")}
  ]));

  env
    .multiversion_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains(" v1 "))
    .stdout(predicate::str::contains("All builds complete"));

  mock.assert();
  let ws = env.workspace_path();
  assert!(ws.join("downloads/v1/source.zip").is_file());

  let entry_point = ws.join("builds/v1/mx-chain-go/cmd/node");
  let built_in = std::fs::read_to_string(entry_point.join("built-in.txt")).unwrap();
  assert_eq!(
    std::fs::canonicalize(built_in.trim()).unwrap(),
    std::fs::canonicalize(&entry_point).unwrap()
  );

  let out = env.out_path("v1");
  assert_eq!(std::fs::read_to_string(out.join("node")).unwrap(), "node binary");
  assert!(out.join("libwasmer_linux_amd64.so").is_file());
  assert!(out.join("libvmexeccapi.so").is_file());
}

#[test]
fn failed_download_exits_non_zero() {
  let env = TestEnv::new();
  let mut server = mockito::Server::new();
  let _mock = server.mock("GET", "/a.zip").with_status(503).create();

  env.write_config(&json!([
    {"name": "v1", "sourceUrl": format!("{}/a.zip", server.url()), "destinationFolder": env.out_path("v1")}
  ]));

  env
    .multiversion_cmd()
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("transient error"))
    .stderr(predicate::str::contains("503"));

  assert!(!env.out_path("v1").exists());
}

#[test]
fn missing_pinned_dependency_fails() {
  let env = TestEnv::new();
  let archive = {
    use std::io::{Cursor, Write};
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
      .start_file("proj/go.mod", zip::write::SimpleFileOptions::default())
      .unwrap();
    writer.write_all(b"module example.com/proj\n").unwrap();
    writer
      .start_file("proj/cmd/node/main.go", zip::write::SimpleFileOptions::default())
      .unwrap();
    writer.write_all(b"package main\n").unwrap();
    writer.finish().unwrap().into_inner()
  };

  let mut server = mockito::Server::new();
  let _mock = server.mock("GET", "/a.zip").with_body(archive).create();

  env.write_config(&json!([
    {"name": "v1", "sourceUrl": format!("{}/a.zip", server.url()), "destinationFolder": env.out_path("v1")}
  ]));

  env
    .multiversion_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("not found in manifest"));
}

#[test]
fn rerun_replaces_destination_contents() {
  let env = TestEnv::new();
  env.add_cached_library("v1.5.26", "wasmer2", "libvmexeccapi.so");

  let mut server = mockito::Server::new();
  let _mock = server
    .mock("GET", "/a.zip")
    .with_body(project_archive("v1.5.26"))
    .expect(2)
    .create();

  env.write_config(&json!([
    {"name": "v1", "sourceUrl": format!("{}/a.zip", server.url()), "destinationFolder": env.out_path("v1")}
  ]));

  env.multiversion_cmd().assert().success();
  std::fs::write(env.out_path("v1").join("stale.so"), "stale").unwrap();
  env.multiversion_cmd().assert().success();

  let mut names: Vec<String> = std::fs::read_dir(env.out_path("v1"))
    .unwrap()
    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  assert_eq!(names, ["libvmexeccapi.so", "node"]);
}
