//! # Repository Manager
//!
//! `RepositoryManager` is the facade a build host talks to. It owns the
//! validated, ordered list of tracked repositories and exposes the three
//! lifecycle entry points:
//!
//! - **`calc_state`** — after a build, capture what each repository is at.
//! - **`poll`** — between builds, compare remote tips against a baseline
//!   snapshot; no baseline means build.
//! - **`checkout`** — for a build, synchronize every repository and write
//!   the change log.
//!
//! Descriptor validation happens once, at construction, and is fatal: an
//! empty list, an empty URI or branch, or a directory escaping the
//! workspace never gets as far as touching a repository. Each entry point
//! funnels through [`act`](RepositoryManager::act), which checks that the
//! workspace root exists before handing it to the operation.

use std::fs;
use std::io;
use std::path::Path;

use url::Url;

use crate::build::CheckoutOperation;
use crate::error::{Error, Result};
use crate::operation::WorkspaceOperation;
use crate::poll::{PollOperation, PollOutcome};
use crate::progress::ProgressSink;
use crate::repository::RepositoryDescriptor;
use crate::state::{RepositoryStateOperation, RepositoryStateSnapshot};

/// Facade over the tracked repositories of one build job.
#[derive(Debug, Clone)]
pub struct RepositoryManager {
    repos: Vec<RepositoryDescriptor>,
}

impl RepositoryManager {
    /// Create a manager over the given descriptors, validating each.
    pub fn new(repos: Vec<RepositoryDescriptor>) -> Result<Self> {
        if repos.is_empty() {
            return Err(Error::Config {
                message: "no repositories configured".to_string(),
                hint: Some("a build needs at least one tracked repository".to_string()),
            });
        }
        for repo in &repos {
            validate(repo)?;
        }
        Ok(Self { repos })
    }

    /// The tracked repositories, in configured order.
    pub fn repositories(&self) -> &[RepositoryDescriptor] {
        &self.repos
    }

    /// Run a workspace operation against an existing workspace root.
    pub fn act<O: WorkspaceOperation>(&self, root: &Path, mut op: O) -> Result<O::Output> {
        if !root.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("workspace {} does not exist", root.display()),
            )));
        }
        op.run(root)
    }

    /// Capture the post-build state of the workspace.
    ///
    /// A missing workspace, like a workspace with nothing recorded, is the
    /// "no baseline" sentinel `None`.
    pub fn calc_state(&self, root: &Path) -> Result<Option<RepositoryStateSnapshot>> {
        if !root.is_dir() {
            return Ok(None);
        }
        self.act(root, RepositoryStateOperation::new(&self.repos))
    }

    /// Poll the tracked repositories against a baseline.
    ///
    /// No baseline always builds; everything else is the short-circuiting
    /// evaluation of [`PollOperation`].
    pub fn poll(
        &self,
        root: &Path,
        baseline: Option<&RepositoryStateSnapshot>,
    ) -> Result<PollOutcome> {
        let Some(baseline) = baseline else {
            return Ok(PollOutcome::BuildNow);
        };
        self.act(root, PollOperation::new(baseline, &self.repos))
    }

    /// Check out every tracked repository, writing the change log to
    /// `log_path`. Creates the workspace root when it does not exist yet.
    pub fn checkout(
        &self,
        root: &Path,
        log_path: &Path,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<bool> {
        fs::create_dir_all(root)?;
        let op = CheckoutOperation::new(&self.repos, log_path);
        match progress {
            Some(progress) => self.act(root, op.with_progress(progress)),
            None => self.act(root, op),
        }
    }
}

fn validate(repo: &RepositoryDescriptor) -> Result<()> {
    if repo.uri().is_empty() {
        return Err(Error::Config {
            message: format!("repository has no uri: {repo}"),
            hint: Some("set 'uri:' to the remote repository location".to_string()),
        });
    }
    if repo.branch().is_empty() {
        return Err(Error::Config {
            message: format!("repository has no branch: {repo}"),
            hint: Some(format!("set 'branch:' to a fully-qualified ref such as {}", crate::repository::DEFAULT_BRANCH)),
        });
    }
    let directory = Path::new(repo.directory());
    if directory.is_absolute()
        || directory
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(Error::Config {
            message: format!("repository directory escapes the workspace: {repo}"),
            hint: Some("use a relative directory inside the workspace".to_string()),
        });
    }
    // URL-shaped URIs get syntax checking; scp-style and plain-path remotes
    // are passed through to git untouched.
    if repo.uri().contains("://") {
        Url::parse(repo.uri()).map_err(|e| Error::Config {
            message: format!("invalid repository uri '{}': {}", repo.uri(), e),
            hint: None,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::DEFAULT_BRANCH;

    fn descriptor(uri: &str, branch: &str, directory: &str) -> RepositoryDescriptor {
        RepositoryDescriptor::new(uri, branch, directory)
    }

    #[test]
    fn test_new_keeps_configured_order() {
        let manager = RepositoryManager::new(vec![
            descriptor("first.git", DEFAULT_BRANCH, "a"),
            descriptor("second.git", DEFAULT_BRANCH, "b"),
        ])
        .unwrap();
        let uris: Vec<_> = manager
            .repositories()
            .iter()
            .map(RepositoryDescriptor::uri)
            .collect();
        assert_eq!(uris, vec!["first.git", "second.git"]);
    }

    #[test]
    fn test_new_rejects_empty_list() {
        let err = RepositoryManager::new(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_new_rejects_empty_uri() {
        let err =
            RepositoryManager::new(vec![descriptor("", DEFAULT_BRANCH, "")]).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_new_rejects_empty_branch() {
        let err = RepositoryManager::new(vec![descriptor("uri.git", "", "")]).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_new_rejects_escaping_directory() {
        let err = RepositoryManager::new(vec![descriptor(
            "uri.git",
            DEFAULT_BRANCH,
            "../outside",
        )])
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        let err = RepositoryManager::new(vec![descriptor("uri.git", DEFAULT_BRANCH, "/abs")])
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_new_rejects_malformed_url() {
        let err = RepositoryManager::new(vec![descriptor(
            "http://exa mple.com/repo.git",
            DEFAULT_BRANCH,
            "",
        )])
        .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_new_accepts_scp_style_and_path_uris() {
        RepositoryManager::new(vec![
            descriptor("git@server:repo.git", DEFAULT_BRANCH, "a"),
            descriptor("/srv/git/repo.git", DEFAULT_BRANCH, "b"),
            descriptor("https://server/repo.git", DEFAULT_BRANCH, "c"),
        ])
        .unwrap();
    }

    #[test]
    fn test_poll_without_baseline_is_build_now() {
        let manager =
            RepositoryManager::new(vec![descriptor("uri.git", DEFAULT_BRANCH, "")]).unwrap();
        let outcome = manager.poll(Path::new("/nowhere"), None).unwrap();
        assert_eq!(outcome, PollOutcome::BuildNow);
    }

    #[test]
    fn test_calc_state_missing_workspace_is_none() {
        let manager =
            RepositoryManager::new(vec![descriptor("uri.git", DEFAULT_BRANCH, "")]).unwrap();
        let state = manager.calc_state(Path::new("/no/such/workspace")).unwrap();
        assert!(state.is_none());
    }

    #[test]
    fn test_act_requires_existing_workspace() {
        let manager =
            RepositoryManager::new(vec![descriptor("uri.git", DEFAULT_BRANCH, "")]).unwrap();
        let baseline = RepositoryStateSnapshot::new();
        let err = manager
            .poll(Path::new("/no/such/workspace"), Some(&baseline))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
