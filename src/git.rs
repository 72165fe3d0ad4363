//! Git subprocess plumbing.
//!
//! Every interaction with the object store, refs and transport goes through
//! the system `git` executable; this module is the single place that spawns
//! it. Callers get trimmed stdout back, and failures carry the command line
//! and captured stderr so boundary modules can re-classify them into their
//! own error kinds (remote transport, checkout conflict, history walk).
//!
//! This uses the system git command, which automatically handles:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

fn command_line(args: &[&str]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

fn spawn(dir: &Path, args: &[&str]) -> Result<Output> {
    log::debug!("running `{}` in {}", command_line(args), dir.display());
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: command_line(args),
            message: format!("failed to run git: {e}"),
        })
}

/// Run a git command in `dir` and return its trimmed stdout.
///
/// A non-zero exit status is an error carrying the captured stderr.
pub(crate) fn run(dir: &Path, args: &[&str]) -> Result<String> {
    let output = spawn(dir, args)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitCommand {
            command: command_line(args),
            message: stderr.trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a git command where a status of 1 means "nothing found".
///
/// Exit 0 yields the trimmed stdout, exit 1 yields `None` (the convention
/// of `git rev-parse --verify --quiet`); any other status is an error.
pub(crate) fn run_opt(dir: &Path, args: &[&str]) -> Result<Option<String>> {
    let output = spawn(dir, args)?;
    match output.status.code() {
        Some(0) => Ok(Some(
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
        )),
        Some(1) => Ok(None),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::GitCommand {
                command: command_line(args),
                message: stderr.trim().to_string(),
            })
        }
    }
}

/// Run a git command whose exit status is its answer.
///
/// Exit 0 maps to `true` and exit 1 to `false` (the convention of probes
/// like `git merge-base --is-ancestor`); any other status is an error.
pub(crate) fn succeeds(dir: &Path, args: &[&str]) -> Result<bool> {
    let output = spawn(dir, args)?;
    match output.status.code() {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::GitCommand {
                command: command_line(args),
                message: stderr.trim().to_string(),
            })
        }
    }
}
