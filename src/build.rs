//! # Checkout Orchestration
//!
//! `CheckoutOperation` is the per-build entry point: it walks the tracked
//! repositories in configured order and brings each one to the tip of its
//! configured branch, while streaming the commits that became newly visible
//! into the change log.
//!
//! Per repository the sequence is fixed: resolve the local mirror
//! (initializing an empty one when absent), capture the pre-fetch `HEAD` as
//! the old boundary, fetch the configured branch, write the change records
//! for the fetched range, then synchronize the tree and advance the
//! pointer. A fetch that yields no commit fails the whole build — tracked
//! repositories are one atomic build input, so there is no per-repository
//! recovery.
//!
//! The change log is written incrementally and finalized on every exit
//! path; a build that produced no commits still leaves a well-formed empty
//! array behind.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::changelog::CommitLogWriter;
use crate::checkout::{advance_head, TreeCheckoutOperation};
use crate::error::Result;
use crate::fetch::FetchOperation;
use crate::history::{commit_record, RevWalk};
use crate::mirror::InitOperation;
use crate::operation::WorkspaceOperation;
use crate::progress::ProgressSink;
use crate::repository::RepositoryDescriptor;
use crate::resolve::ResolveOperation;

/// Operation that checks out every tracked repository and writes the
/// aggregated change log.
pub struct CheckoutOperation<'a> {
    repos: &'a [RepositoryDescriptor],
    log_path: PathBuf,
    progress: Option<&'a mut dyn ProgressSink>,
}

impl<'a> CheckoutOperation<'a> {
    /// Create a checkout operation writing its change log to `log_path`.
    pub fn new(repos: &'a [RepositoryDescriptor], log_path: impl Into<PathBuf>) -> Self {
        Self {
            repos,
            log_path: log_path.into(),
            progress: None,
        }
    }

    /// Attach a progress sink for fetch task boundaries.
    pub fn with_progress(mut self, progress: &'a mut dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    fn checkout_all<W: std::io::Write>(
        &mut self,
        root: &Path,
        writer: &mut CommitLogWriter<W>,
    ) -> Result<bool> {
        for repo in self.repos {
            let (local, current) = match ResolveOperation::new(repo).run(root)? {
                Some(local) => {
                    let current = local.head_commit()?;
                    (local, current)
                }
                None => (InitOperation::new(repo).run(root)?, None),
            };

            let fetched = match self.progress.as_deref_mut() {
                Some(progress) => FetchOperation::with_progress(repo, &local, progress).call()?,
                None => FetchOperation::new(repo, &local).call()?,
            };
            let Some(fetched) = fetched else {
                log::warn!("{repo}: fetch produced no commit, failing the build");
                return Ok(false);
            };

            for id in RevWalk::between(&local, fetched, current)? {
                let record = commit_record(&local, id?)?;
                writer.write(&record)?;
            }

            TreeCheckoutOperation::new(&local, fetched).call()?;
            let outcome = advance_head(&local, fetched)?;
            log::info!("{repo}: checked out {fetched} ({outcome})");
        }
        Ok(true)
    }
}

impl WorkspaceOperation for CheckoutOperation<'_> {
    type Output = bool;

    fn run(&mut self, root: &Path) -> Result<Self::Output> {
        let file = File::create(&self.log_path)?;
        let mut writer = CommitLogWriter::new(BufWriter::new(file));
        // The log must be finalized whether or not the checkout survived,
        // so the close happens before the checkout result is inspected.
        let result = self.checkout_all(root, &mut writer);
        let closed = writer.close();
        let success = result?;
        closed?;
        Ok(success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::CommitLogReader;
    use crate::error::Error;
    use crate::git::testutil::{commit_file, init_repo};
    use crate::repository::DEFAULT_BRANCH;
    use tempfile::TempDir;

    #[test]
    fn test_first_checkout_writes_single_record() {
        let upstream = TempDir::new().unwrap();
        init_repo(upstream.path());
        let sha = commit_file(upstream.path(), "file.txt", "content", "initial");

        let root = TempDir::new().unwrap();
        let log = root.path().join("changelog.json");
        let repos = [RepositoryDescriptor::new(
            upstream.path().to_str().unwrap(),
            DEFAULT_BRANCH,
            "module",
        )];

        let success = CheckoutOperation::new(&repos, &log).run(root.path()).unwrap();
        assert!(success);

        let changelog = CommitLogReader::read_path(&log).unwrap();
        assert_eq!(changelog.len(), 1);
        assert_eq!(changelog.commits()[0].id.to_string(), sha);
        // The tree materialized in the configured subdirectory.
        let content = std::fs::read_to_string(root.path().join("module/file.txt")).unwrap();
        assert_eq!(content, "content");
    }

    #[test]
    fn test_failed_fetch_still_finalizes_log() {
        let root = TempDir::new().unwrap();
        let log = root.path().join("changelog.json");
        let repos = [RepositoryDescriptor::new("/no/such/remote", DEFAULT_BRANCH, "module")];

        let err = CheckoutOperation::new(&repos, &log).run(root.path()).unwrap_err();
        assert!(matches!(err, Error::RemoteTransport { .. }));

        // Even the failed build leaves a well-formed, empty log behind.
        let changelog = CommitLogReader::read_path(&log).unwrap();
        assert!(changelog.is_empty());
    }
}
