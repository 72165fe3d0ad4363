//! # Change Polling
//!
//! Between builds, a scheduler repeatedly asks: does anything upstream
//! differ from what the last build saw? `PollOperation` answers with one of
//! three outcomes, evaluated over the tracked repositories in configured
//! order and short-circuiting on the first that decides:
//!
//! - **`BuildNow`** — the state cannot be compared (no local mirror, no
//!   advertised remote tip, or no recorded commit for a repository), so the
//!   safe answer is to build. First runs land here by design.
//! - **`Significant`** — a remote tip differs from the recorded commit: a
//!   real upstream change.
//! - **`NoChanges`** — every tracked repository's remote tip matches its
//!   recorded commit.
//!
//! Polling never mutates repository state; the only I/O is the remote
//! advertisement query. With an unchanged world, polling is idempotent.

use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::operation::WorkspaceOperation;
use crate::remote::LsRemoteOperation;
use crate::repository::RepositoryDescriptor;
use crate::resolve::ResolveOperation;
use crate::state::RepositoryStateSnapshot;

/// Aggregate result of polling the tracked repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Something requires an immediate build.
    BuildNow,
    /// An upstream change was detected.
    Significant,
    /// Everything matches the recorded state.
    NoChanges,
}

impl PollOutcome {
    /// Whether a scheduler should trigger a build for this outcome.
    pub fn requires_build(&self) -> bool {
        !matches!(self, PollOutcome::NoChanges)
    }
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollOutcome::BuildNow => "BUILD_NOW",
            PollOutcome::Significant => "SIGNIFICANT",
            PollOutcome::NoChanges => "NO_CHANGES",
        };
        f.write_str(name)
    }
}

/// Operation that compares remote tips against a recorded baseline.
pub struct PollOperation<'a> {
    baseline: &'a RepositoryStateSnapshot,
    repos: &'a [RepositoryDescriptor],
}

impl<'a> PollOperation<'a> {
    /// Create a poll operation over the given baseline and descriptors.
    pub fn new(
        baseline: &'a RepositoryStateSnapshot,
        repos: &'a [RepositoryDescriptor],
    ) -> Self {
        Self { baseline, repos }
    }
}

impl WorkspaceOperation for PollOperation<'_> {
    type Output = PollOutcome;

    fn run(&mut self, root: &Path) -> Result<Self::Output> {
        for repo in self.repos {
            let Some(local) = ResolveOperation::new(repo).run(root)? else {
                log::debug!("{repo}: no local mirror, building");
                return Ok(PollOutcome::BuildNow);
            };
            let Some(latest) = LsRemoteOperation::new(repo, &local).call()? else {
                log::debug!("{repo}: remote does not advertise the branch, building");
                return Ok(PollOutcome::BuildNow);
            };
            let Some(current) = self.baseline.get(repo) else {
                log::debug!("{repo}: no recorded commit, building");
                return Ok(PollOutcome::BuildNow);
            };
            if latest != current {
                log::info!("{repo}: remote moved {current} -> {latest}");
                return Ok(PollOutcome::Significant);
            }
        }
        Ok(PollOutcome::NoChanges)
    }
}
