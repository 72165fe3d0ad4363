//! # Branch Fetching
//!
//! `FetchOperation` brings the configured branch of a tracked repository
//! into its local mirror and reports which commit arrived. It fetches
//! exactly the configured ref — never the whole remote — and reads the
//! result back from `FETCH_HEAD`, which is the commit the checkout
//! orchestration then synchronizes the tree to.
//!
//! A progress sink, when provided, sees one coarse task around the whole
//! transfer; the engine does not forward fine-grained object counts. Every
//! failure mode of the underlying transport is normalized to
//! [`Error::RemoteTransport`] so callers need not distinguish an
//! unreachable host from an invalid ref.

use std::io;

use crate::error::{Error, Result};
use crate::git;
use crate::progress::ProgressSink;
use crate::repository::RepositoryDescriptor;
use crate::resolve::LocalRepository;
use crate::state::CommitId;

/// Operation that fetches the configured branch into a local repository.
pub struct FetchOperation<'a> {
    repo: &'a RepositoryDescriptor,
    local: &'a LocalRepository,
    progress: Option<&'a mut dyn ProgressSink>,
}

impl<'a> FetchOperation<'a> {
    /// Create a fetch operation without progress reporting.
    pub fn new(repo: &'a RepositoryDescriptor, local: &'a LocalRepository) -> Self {
        Self {
            repo,
            local,
            progress: None,
        }
    }

    /// Create a fetch operation that reports task boundaries to `progress`.
    pub fn with_progress(
        repo: &'a RepositoryDescriptor,
        local: &'a LocalRepository,
        progress: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            repo,
            local,
            progress: Some(progress),
        }
    }

    /// Fetch the configured branch and return the fetched commit, or `None`
    /// when the fetch completed without recording one.
    pub fn call(&mut self) -> Result<Option<CommitId>> {
        if let Some(progress) = self.progress.as_deref_mut() {
            if progress.is_cancelled() {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "fetch cancelled",
                )));
            }
            progress.begin_task(&format!("Fetching {}", self.repo.uri()), None);
        }

        let result = git::run(
            self.local.dir(),
            &["fetch", self.repo.uri(), self.repo.branch()],
        );

        if let Some(progress) = self.progress.as_deref_mut() {
            progress.end_task();
        }

        result.map_err(|e| Error::RemoteTransport {
            url: self.repo.uri().to_string(),
            message: e.to_string(),
        })?;

        self.local
            .fetch_head_commit()
            .map_err(|e| Error::RemoteTransport {
                url: self.repo.uri().to_string(),
                message: e.to_string(),
            })
    }
}
