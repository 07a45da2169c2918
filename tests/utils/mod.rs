// Integration test utilities
//
// Every test works on its own copy of a fixture inside a temp dir, since the
// CLI rewrites table files in place.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy a fixture into `dir` and return the copy's path
pub fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let target = dir.path().join(name);
    fs::copy(fixture_path(name), &target).unwrap();
    target
}

/// Write a table file from literal TSV text
pub fn write_table(dir: &TempDir, name: &str, tsv: &str) -> PathBuf {
    let target = dir.path().join(name);
    fs::write(&target, tsv).unwrap();
    target
}

pub fn sad() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("sad")
}
