//! # Local Mirror Creation
//!
//! When a tracked repository has no local mirror yet, one of two operations
//! creates it:
//!
//! - **`CloneOperation`** clones exactly the configured branch from the
//!   remote, without populating the working tree. Unrelated branches are
//!   never transferred, and the deferred checkout avoids materializing a
//!   tree that the tree synchronizer would immediately overwrite.
//!
//! - **`InitOperation`** creates an empty repository at the resolved path.
//!   The checkout orchestration uses this when a fetch needs a destination
//!   and none exists; the first fetch then populates it.
//!
//! Both fail with an I/O-classified error when the target cannot be created
//! or initialized.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::git;
use crate::operation::WorkspaceOperation;
use crate::repository::RepositoryDescriptor;
use crate::resolve::LocalRepository;

/// Operation that clones the configured branch into a new local mirror.
pub struct CloneOperation<'a> {
    repo: &'a RepositoryDescriptor,
}

impl<'a> CloneOperation<'a> {
    /// Create a clone operation for the given descriptor.
    pub fn new(repo: &'a RepositoryDescriptor) -> Self {
        Self { repo }
    }
}

impl WorkspaceOperation for CloneOperation<'_> {
    type Output = LocalRepository;

    fn run(&mut self, root: &Path) -> Result<Self::Output> {
        let dir = self.repo.work_dir(root);
        let target = dir.to_string_lossy().into_owned();
        log::info!("cloning {} into {}", self.repo.uri(), target);
        git::run(
            root,
            &[
                "clone",
                "--no-checkout",
                "--single-branch",
                "--branch",
                self.repo.branch_short_name(),
                "--",
                self.repo.uri(),
                &target,
            ],
        )
        .map_err(|e| Error::GitClone {
            url: self.repo.uri().to_string(),
            branch: self.repo.branch().to_string(),
            message: e.to_string(),
        })?;
        Ok(LocalRepository::new(dir))
    }
}

/// Operation that initializes an empty local repository.
pub struct InitOperation<'a> {
    repo: &'a RepositoryDescriptor,
}

impl<'a> InitOperation<'a> {
    /// Create an init operation for the given descriptor.
    pub fn new(repo: &'a RepositoryDescriptor) -> Self {
        Self { repo }
    }
}

impl WorkspaceOperation for InitOperation<'_> {
    type Output = LocalRepository;

    fn run(&mut self, root: &Path) -> Result<Self::Output> {
        let dir = self.repo.work_dir(root);
        fs::create_dir_all(&dir)?;
        log::info!("initializing empty repository at {}", dir.display());
        git::run(&dir, &["init", "-q"])?;
        Ok(LocalRepository::new(dir))
    }
}
