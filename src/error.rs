//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `build-sync` engine. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the engine. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the engine to simplify function signatures.
//!
//! ## Error Classification
//!
//! The variants deliberately mirror the boundaries of the engine:
//!
//! - Configuration errors are fatal at construction or parse time and are
//!   never retried.
//! - `LocalResolve` covers I/O failures while opening local repository
//!   storage; a repository that simply does not exist is *not* an error
//!   (resolution reports absence through `Option` instead).
//! - `RemoteTransport` normalizes every way of failing to talk to a remote
//!   (unreachable host, invalid ref, internal transport fault) into a single
//!   kind, so callers never need to distinguish transport failure modes.
//! - `CheckoutConflict`, `RefUpdate` and `HistoryWalk` map one-to-one to the
//!   tree synchronization and change-log stages of a checkout.
//!
//! There is no retry logic anywhere in the engine: a checkout error aborts
//! the whole build, and polling maps recoverable ambiguity to a rebuild
//! decision before any of these kinds can surface.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for build-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The build configuration is invalid.
    ///
    /// Raised when parsing a configuration document fails or when a
    /// repository descriptor fails validation. Includes an optional hint
    /// about how to fix the configuration.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// Opening an existing local repository failed for a reason other than
    /// the repository being absent.
    #[error("Local repository error at {}: {message}", path.display())]
    LocalResolve { path: PathBuf, message: String },

    /// Contacting the remote failed.
    ///
    /// All transport failure modes are normalized to this kind: unreachable
    /// remote, invalid ref, or any internal fault of the underlying
    /// transport.
    #[error("Remote transport error for {url}: {message}")]
    RemoteTransport { url: String, message: String },

    /// An error occurred while cloning a repository.
    #[error("Git clone error for {url}@{branch}: {message}")]
    GitClone {
        url: String,
        branch: String,
        message: String,
    },

    /// An error occurred while executing a Git command.
    #[error("Git command failed: {command} - {message}")]
    GitCommand { command: String, message: String },

    /// The working tree could not be synchronized to the target commit.
    #[error("Checkout could not complete: {message}")]
    CheckoutConflict { message: String },

    /// Advancing the branch pointer produced an unacceptable result.
    #[error("Ref update failed: {message}")]
    RefUpdate { message: String },

    /// Walking commit history or diffing trees failed.
    #[error("History walk error: {message}")]
    HistoryWalk { message: String },

    /// A value that should have been an object id was malformed.
    #[error("Invalid object id: {value}")]
    InvalidId { value: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
