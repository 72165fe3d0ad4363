//! # Workspace Operations
//!
//! A build host hands the engine a workspace root and expects a unit of work
//! to run against it: resolve a repository, initialize a mirror, compute a
//! poll decision, perform the full checkout. `WorkspaceOperation` is the
//! one-method seam those units share.
//!
//! Modelling each operation as a small struct implementing one trait keeps
//! the call sites uniform (see [`RepositoryManager::act`]), lets tests drive
//! any operation directly against a temp directory, and leaves room for a
//! host to queue or wrap operations without knowing what they do.
//!
//! [`RepositoryManager::act`]: crate::manager::RepositoryManager::act

use std::path::Path;

use crate::error::Result;

/// A unit of work executed against a build workspace root.
pub trait WorkspaceOperation {
    /// Value produced by a successful run.
    type Output;

    /// Run the operation against the workspace rooted at `root`.
    ///
    /// Operations take `&mut self` because some carry call-scoped state
    /// (for example a progress sink); running one twice is allowed but
    /// never required by the engine.
    fn run(&mut self, root: &Path) -> Result<Self::Output>;
}
