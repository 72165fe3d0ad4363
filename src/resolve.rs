//! # Local Repository Resolution
//!
//! Before fetching or polling, the engine needs to know whether a tracked
//! repository already has a local mirror inside the build workspace.
//! `ResolveOperation` answers that deterministically and without any network
//! access: it computes the local path from the descriptor (workspace root
//! when the configured directory is empty or `"."`, the joined subpath
//! otherwise) and attempts to open the repository metadata there.
//!
//! Absence is a normal answer, not an error — callers use `None` to decide
//! between fetch-into-existing and clone/init. Only I/O failures unrelated
//! to absence (a corrupt metadata store, permission problems) surface as
//! `Error::LocalResolve`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::git;
use crate::operation::WorkspaceOperation;
use crate::repository::RepositoryDescriptor;
use crate::state::CommitId;

/// Handle to an opened local repository inside the build workspace.
///
/// The handle carries the working directory and exposes the read-only
/// plumbing queries the engine needs; mutating operations live in their own
/// operation types.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    dir: PathBuf,
}

impl LocalRepository {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Working directory of the repository.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a revision to a commit id, or `None` when it does not exist.
    pub(crate) fn rev_parse(&self, rev: &str) -> Result<Option<CommitId>> {
        let peeled = format!("{rev}^{{commit}}");
        match git::run_opt(&self.dir, &["rev-parse", "--verify", "--quiet", &peeled])? {
            Some(hex) => Ok(Some(CommitId::from_hex(&hex)?)),
            None => Ok(None),
        }
    }

    /// The commit `HEAD` points at, or `None` on an unborn branch.
    pub fn head_commit(&self) -> Result<Option<CommitId>> {
        self.rev_parse("HEAD")
    }

    /// The commit recorded by the last fetch, or `None` if never fetched.
    pub fn fetch_head_commit(&self) -> Result<Option<CommitId>> {
        self.rev_parse("FETCH_HEAD")
    }

    /// Whether `ancestor` is an ancestor of (or equal to) `descendant`.
    pub(crate) fn is_ancestor(&self, ancestor: CommitId, descendant: CommitId) -> Result<bool> {
        git::succeeds(
            &self.dir,
            &[
                "merge-base",
                "--is-ancestor",
                &ancestor.to_string(),
                &descendant.to_string(),
            ],
        )
    }
}

/// Operation that opens the local repository for a descriptor, reporting
/// absence as `None`.
pub struct ResolveOperation<'a> {
    repo: &'a RepositoryDescriptor,
}

impl<'a> ResolveOperation<'a> {
    /// Create a resolve operation for the given descriptor.
    pub fn new(repo: &'a RepositoryDescriptor) -> Self {
        Self { repo }
    }
}

impl WorkspaceOperation for ResolveOperation<'_> {
    type Output = Option<LocalRepository>;

    fn run(&mut self, root: &Path) -> Result<Self::Output> {
        let dir = self.repo.work_dir(root);

        // Presence is judged by the repository's own metadata directory, not
        // by what `git` discovers walking upward: a plain subdirectory of a
        // workspace whose root is itself a repository must resolve as absent.
        let metadata = dir.join(".git");
        match fs::symlink_metadata(&metadata) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::LocalResolve {
                    path: dir,
                    message: e.to_string(),
                });
            }
        }

        match git::run(&dir, &["rev-parse", "--git-dir"]) {
            Ok(_) => Ok(Some(LocalRepository::new(dir))),
            Err(Error::GitCommand { message, .. }) => Err(Error::LocalResolve {
                path: dir,
                message,
            }),
            Err(e) => Err(e),
        }
    }
}
