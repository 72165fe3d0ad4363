//! Shared test utilities for integration and E2E tests.
//!
//! Every scenario here drives the real `git` binary against throwaway
//! repositories: an "upstream" repository playing the remote, and a build
//! workspace the engine synchronizes into.

#![allow(dead_code)]

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a git command in a fixture repository, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a repository with a configured identity in `dir`.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q", "-b", "master"]);
    git(dir, &["config", "user.name", "author"]);
    git(dir, &["config", "user.email", "author@test.com"]);
}

/// Write `content` to `path` and commit it, returning the commit sha.
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) -> String {
    let full = dir.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&full, content).unwrap();
    git(dir, &["add", path]);
    git(dir, &["commit", "-q", "-m", message]);
    head_sha(dir)
}

/// Remove `path` and commit the deletion, returning the commit sha.
pub fn delete_file(dir: &Path, path: &str, message: &str) -> String {
    git(dir, &["rm", "-q", path]);
    git(dir, &["commit", "-q", "-m", message]);
    head_sha(dir)
}

/// The sha `HEAD` currently points at.
pub fn head_sha(dir: &Path) -> String {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(dir)
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Create an upstream repository with one initial commit.
///
/// Returns the repository directory and the initial commit sha.
pub fn upstream_with_commit() -> (TempDir, String) {
    let upstream = TempDir::new().unwrap();
    init_repo(upstream.path());
    let sha = commit_file(upstream.path(), "file.txt", "content", "initial commit");
    (upstream, sha)
}

/// Write a build-sync YAML configuration tracking the given
/// `(uri, directory)` pairs on the default branch.
pub fn write_config(path: &Path, repos: &[(&str, &str)]) {
    let mut yaml = String::from("repositories:\n");
    for (uri, directory) in repos {
        yaml.push_str(&format!("  - uri: \"{uri}\"\n"));
        if !directory.is_empty() {
            yaml.push_str(&format!("    directory: \"{directory}\"\n"));
        }
    }
    std::fs::write(path, yaml).unwrap();
}
