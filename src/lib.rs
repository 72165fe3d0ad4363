//! # Build Synchronization Library
//!
//! This library provides the core functionality for keeping a build
//! workspace synchronized with one or more tracked Git repositories. It is
//! designed to be used by the `build-sync` command-line tool but can also
//! be embedded in a build orchestrator that supplies its own workspace
//! allocation and scheduling.
//!
//! ## Quick Example
//!
//! ```
//! use build_sync::repository::{RepositoryDescriptor, DEFAULT_BRANCH};
//! use build_sync::state::{CommitId, RepositoryStateSnapshot};
//!
//! // Describe a tracked repository
//! let repo = RepositoryDescriptor::new("git://server/app.git", DEFAULT_BRANCH, "app");
//! assert_eq!(repo.branch(), "refs/heads/master");
//!
//! // Record what a build saw for it
//! let mut snapshot = RepositoryStateSnapshot::new();
//! let commit = CommitId::from_hex("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
//! snapshot.put(repo.clone(), commit);
//! assert_eq!(snapshot.get(&repo), Some(commit));
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Descriptors (`repository`)**: immutable `(uri, branch, directory)`
//!   values identifying each tracked repository; an ordered list of them is
//!   one build's atomic input.
//! - **State Snapshots (`state`)**: a mapping from descriptor to the commit
//!   last seen, persisted by the host between builds and used as the
//!   polling baseline.
//! - **Workspace Operations (`operation`, `resolve`, `mirror`, `remote`,
//!   `fetch`, `checkout`)**: the individual steps of a synchronization —
//!   resolving or creating a local mirror, inspecting the remote, fetching
//!   a branch, checking out a tree and advancing the pointer.
//! - **Change Logs (`history`, `changelog`)**: the commits a checkout made
//!   newly visible, walked with ancestry exclusion and written
//!   incrementally as a JSON array.
//! - **Orchestration (`poll`, `build`, `manager`)**: the poll decision and
//!   the per-build checkout across all tracked repositories, strictly
//!   sequential and in configured order.
//!
//! ## Execution Flow
//!
//! A build host drives the `manager::RepositoryManager` through three
//! entry points:
//!
//! 1.  **Poll**: compare each repository's remote tip against the baseline
//!     snapshot; decide `BUILD_NOW`, `SIGNIFICANT` or `NO_CHANGES`.
//! 2.  **Checkout**: for each repository in order, resolve or initialize
//!     the mirror, fetch the configured branch, write the newly visible
//!     commits to the change log, and synchronize tree and pointer.
//! 3.  **State capture**: record the commit each repository ended up at,
//!     producing the next baseline.
//!
//! Everything blocks on plain process and filesystem I/O; there is no
//! internal concurrency, no retry logic and no timeout handling — those
//! belong to the invoking host.

pub mod build;
pub mod changelog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod fetch;
mod git;
pub mod history;
pub mod manager;
pub mod mirror;
pub mod operation;
pub mod poll;
pub mod progress;
pub mod remote;
pub mod repository;
pub mod resolve;
pub mod state;

#[cfg(test)]
mod model_proptest;
