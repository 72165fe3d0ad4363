//! # Tracked Repository Descriptors
//!
//! This module defines `RepositoryDescriptor`, the immutable value type that
//! identifies one tracked repository participating in a build: the remote
//! URI, the fully-qualified branch ref to follow, and the subdirectory of the
//! build workspace the repository is synchronized into.
//!
//! Descriptors are pure value types. Equality and hashing are structural over
//! all three fields so that a descriptor can be used as a map key in a
//! [`RepositoryStateSnapshot`](crate::state::RepositoryStateSnapshot) and
//! round-trip through persisted build configuration unchanged. Fields are
//! private and there are no setters; once constructed, a descriptor never
//! changes.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default branch ref followed when the configuration names none.
pub const DEFAULT_BRANCH: &str = "refs/heads/master";

/// One tracked repository bound to a build.
///
/// A build tracks an ordered list of these; together they form the build's
/// atomic input. The `directory` is a path relative to the build workspace
/// root, with the empty string and `"."` both meaning the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Remote repository URI.
    uri: String,
    /// Fully-qualified branch ref, e.g. `refs/heads/master`.
    branch: String,
    /// Workspace-relative directory the repository lives in.
    directory: String,
}

impl RepositoryDescriptor {
    /// Create a descriptor from its three configuration fields.
    pub fn new(
        uri: impl Into<String>,
        branch: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            branch: branch.into(),
            directory: directory.into(),
        }
    }

    /// Remote repository URI.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Fully-qualified branch ref.
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// The branch name without its `refs/heads/` prefix, as understood by
    /// porcelain commands like `git clone --branch`.
    pub fn branch_short_name(&self) -> &str {
        self.branch
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.branch)
    }

    /// Workspace-relative directory, possibly empty.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Resolve the local repository path under the given workspace root.
    ///
    /// An empty directory or `"."` resolves to the root itself; anything
    /// else is joined onto the root.
    pub fn work_dir(&self, root: &Path) -> PathBuf {
        if self.directory.is_empty() || self.directory == "." {
            root.to_path_buf()
        } else {
            root.join(&self.directory)
        }
    }
}

impl fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] - {}", self.uri, self.branch, self.directory)
    }
}
