//! # Repository State Snapshots
//!
//! Polling needs a baseline: "what did we last see for each tracked
//! repository?" This module provides the two value types that carry it and
//! the operation that captures it after a build.
//!
//! ## Key Components
//!
//! - **`CommitId`**: a fixed-width commit hash. It is `Copy`, so a snapshot
//!   always holds its own immutable value — later repository operations can
//!   never corrupt a held snapshot.
//!
//! - **`RepositoryStateSnapshot`**: a mapping from descriptor to the commit
//!   last seen for it. The empty snapshot is a valid, distinguished "no
//!   baseline" value. Snapshots serialize as a list of
//!   `{ repository, commit }` entries (descriptors cannot be JSON object
//!   keys) in a stable order, so persisted state diffs cleanly.
//!
//! - **`RepositoryStateOperation`**: captures post-build state from a
//!   workspace, recording the last fetched commit for every resolvable
//!   repository and falling back to `HEAD` for mirrors that were never
//!   fetched. Repositories without a local mirror are skipped; a workspace
//!   with nothing to record yields `None`, the "no baseline" sentinel.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::operation::WorkspaceOperation;
use crate::repository::RepositoryDescriptor;
use crate::resolve::ResolveOperation;

/// Length of a commit hash in bytes.
const RAW_LENGTH: usize = 20;

/// A commit identifier: a fixed-width content hash, displayed as hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId([u8; RAW_LENGTH]);

impl CommitId {
    /// Parse a commit id from its 40-character hex form.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        if hex.len() != RAW_LENGTH * 2 {
            return Err(Error::InvalidId {
                value: hex.to_string(),
            });
        }
        let mut raw = [0u8; RAW_LENGTH];
        for (i, byte) in raw.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| {
                Error::InvalidId {
                    value: hex.to_string(),
                }
            })?;
        }
        Ok(Self(raw))
    }

    /// Raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; RAW_LENGTH] {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitId({})", self)
    }
}

impl FromStr for CommitId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl Serialize for CommitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CommitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// One persisted snapshot entry.
#[derive(Serialize, Deserialize)]
struct StateEntry {
    repository: RepositoryDescriptor,
    commit: CommitId,
}

/// Mapping from tracked repository to the commit last seen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<StateEntry>", from = "Vec<StateEntry>")]
pub struct RepositoryStateSnapshot {
    states: HashMap<RepositoryDescriptor, CommitId>,
}

impl RepositoryStateSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the commit seen for a repository, replacing any previous
    /// entry for an equal descriptor.
    pub fn put(&mut self, repo: RepositoryDescriptor, id: CommitId) {
        self.states.insert(repo, id);
    }

    /// The commit recorded for a repository, if any.
    pub fn get(&self, repo: &RepositoryDescriptor) -> Option<CommitId> {
        self.states.get(repo).copied()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of recorded repositories.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Iterate over recorded entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&RepositoryDescriptor, CommitId)> {
        self.states.iter().map(|(repo, id)| (repo, *id))
    }
}

impl From<RepositoryStateSnapshot> for Vec<StateEntry> {
    fn from(snapshot: RepositoryStateSnapshot) -> Self {
        let mut entries: Vec<StateEntry> = snapshot
            .states
            .into_iter()
            .map(|(repository, commit)| StateEntry { repository, commit })
            .collect();
        // Stable order so persisted snapshots diff cleanly.
        entries.sort_by(|a, b| {
            let ka = (a.repository.uri(), a.repository.branch(), a.repository.directory());
            let kb = (b.repository.uri(), b.repository.branch(), b.repository.directory());
            ka.cmp(&kb)
        });
        entries
    }
}

impl From<Vec<StateEntry>> for RepositoryStateSnapshot {
    fn from(entries: Vec<StateEntry>) -> Self {
        let mut snapshot = Self::new();
        for entry in entries {
            snapshot.put(entry.repository, entry.commit);
        }
        snapshot
    }
}

/// Operation that captures the post-build state of every tracked repository
/// in a workspace.
pub struct RepositoryStateOperation<'a> {
    repos: &'a [RepositoryDescriptor],
}

impl<'a> RepositoryStateOperation<'a> {
    /// Create a state capture operation over the given descriptors.
    pub fn new(repos: &'a [RepositoryDescriptor]) -> Self {
        Self { repos }
    }
}

impl WorkspaceOperation for RepositoryStateOperation<'_> {
    type Output = Option<RepositoryStateSnapshot>;

    fn run(&mut self, root: &Path) -> Result<Self::Output> {
        let mut state = RepositoryStateSnapshot::new();
        for repo in self.repos {
            let Some(local) = ResolveOperation::new(repo).run(root)? else {
                continue;
            };
            let commit = match local.fetch_head_commit()? {
                Some(commit) => Some(commit),
                None => local.head_commit()?,
            };
            if let Some(commit) = commit {
                state.put(repo.clone(), commit);
            }
        }
        Ok(if state.is_empty() { None } else { Some(state) })
    }
}
