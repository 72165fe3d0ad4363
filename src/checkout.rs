//! # Tree Synchronization
//!
//! Once a build knows which commit to build, the working tree must match
//! that commit exactly — whatever the tree looked like before. This module
//! does that in two steps with a hard ordering guarantee between them:
//!
//! 1. `TreeCheckoutOperation` replaces index and working tree with the
//!    target commit's tree. The checkout is conflict tolerant: pre-existing
//!    uncommitted differences are overwritten unconditionally rather than
//!    failing the build.
//! 2. `advance_head` force-updates the repository's `HEAD` to the target
//!    commit and classifies what kind of pointer movement that was.
//!
//! The pointer is only ever touched after the tree fully materialized, so a
//! failed checkout never leaves a repository claiming to be at a commit
//! whose tree it does not have.

use std::fmt;

use crate::error::{Error, Result};
use crate::git;
use crate::resolve::LocalRepository;
use crate::state::CommitId;

/// Acceptable ways a pointer update can turn out.
///
/// Anything the engine cannot classify as one of these is a fatal
/// [`Error::RefUpdate`] for the repository concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefUpdateOutcome {
    /// The pointer did not exist before.
    Created,
    /// The new commit is a descendant of the old one.
    FastForwarded,
    /// The pointer was moved to an unrelated or diverged commit.
    Forced,
    /// The pointer already had the target value.
    NoChange,
}

impl fmt::Display for RefUpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefUpdateOutcome::Created => "created",
            RefUpdateOutcome::FastForwarded => "fast-forwarded",
            RefUpdateOutcome::Forced => "forced",
            RefUpdateOutcome::NoChange => "no change",
        };
        f.write_str(name)
    }
}

/// Operation that checks out a specific commit's tree.
pub struct TreeCheckoutOperation<'a> {
    local: &'a LocalRepository,
    commit: CommitId,
}

impl<'a> TreeCheckoutOperation<'a> {
    /// Create a tree checkout operation.
    pub fn new(local: &'a LocalRepository, commit: CommitId) -> Self {
        Self { local, commit }
    }

    /// Replace index and working tree with the commit's tree.
    ///
    /// Local uncommitted state is overwritten; the branch pointer is not
    /// touched.
    pub fn call(&mut self) -> Result<()> {
        git::run(
            self.local.dir(),
            &["read-tree", "--reset", "-u", &self.commit.to_string()],
        )
        .map_err(|e| Error::CheckoutConflict {
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// Force `HEAD` to the given commit and report how the pointer moved.
///
/// The movement is classified against the pointer's prior value before the
/// update is applied, so classification failures leave the pointer alone.
pub fn advance_head(local: &LocalRepository, commit: CommitId) -> Result<RefUpdateOutcome> {
    let old = local.head_commit().map_err(|e| Error::RefUpdate {
        message: e.to_string(),
    })?;

    let outcome = match old {
        None => RefUpdateOutcome::Created,
        Some(old) if old == commit => RefUpdateOutcome::NoChange,
        Some(old) => {
            let fast_forward = local.is_ancestor(old, commit).map_err(|e| Error::RefUpdate {
                message: e.to_string(),
            })?;
            if fast_forward {
                RefUpdateOutcome::FastForwarded
            } else {
                RefUpdateOutcome::Forced
            }
        }
    };

    git::run(
        local.dir(),
        &["update-ref", "--no-deref", "HEAD", &commit.to_string()],
    )
    .map_err(|e| Error::RefUpdate {
        message: e.to_string(),
    })?;

    log::debug!("advanced HEAD in {} to {} ({})", local.dir().display(), commit, outcome);
    Ok(outcome)
}
