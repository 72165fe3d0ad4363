//! # Remote Inspection
//!
//! Change detection needs the current tip of the configured branch on the
//! remote, without touching local state. `LsRemoteOperation` asks the remote
//! for its ref advertisement (`git ls-remote`) and picks out the exact
//! configured branch name, reporting `None` when the remote does not
//! advertise it.
//!
//! The already-resolved local repository serves purely as client context
//! (working directory for the subprocess, so URL rewrites and credential
//! helpers configured there apply); it is never the data source. Polling is
//! the only caller — builds fetch instead.

use crate::error::{Error, Result};
use crate::git;
use crate::repository::RepositoryDescriptor;
use crate::resolve::LocalRepository;
use crate::state::CommitId;

/// Operation that looks up the remote tip of the configured branch.
pub struct LsRemoteOperation<'a> {
    repo: &'a RepositoryDescriptor,
    local: &'a LocalRepository,
}

impl<'a> LsRemoteOperation<'a> {
    /// Create an ls-remote operation for the descriptor, using the resolved
    /// local repository as client context.
    pub fn new(repo: &'a RepositoryDescriptor, local: &'a LocalRepository) -> Self {
        Self { repo, local }
    }

    /// Query the remote and return the advertised tip of the configured
    /// branch, or `None` when the branch is absent.
    pub fn call(&mut self) -> Result<Option<CommitId>> {
        let output = git::run(self.local.dir(), &["ls-remote", self.repo.uri()]).map_err(
            |e| Error::RemoteTransport {
                url: self.repo.uri().to_string(),
                message: e.to_string(),
            },
        )?;
        parse_advertisement(&output, self.repo.branch()).map_err(|e| Error::RemoteTransport {
            url: self.repo.uri().to_string(),
            message: e.to_string(),
        })
    }
}

/// Find the object id advertised for `branch` in ls-remote output.
///
/// Advertisement lines have the form `<hex>\t<refname>`; the branch must
/// match the full ref name exactly.
fn parse_advertisement(output: &str, branch: &str) -> Result<Option<CommitId>> {
    for line in output.lines() {
        let mut parts = line.splitn(2, '\t');
        let id = parts.next().unwrap_or_default();
        let Some(name) = parts.next() else {
            continue;
        };
        if name == branch {
            return Ok(Some(CommitId::from_hex(id)?));
        }
    }
    Ok(None)
}
