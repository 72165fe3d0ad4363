//! # Build Configuration
//!
//! A build's tracked repositories are configured as an ordered YAML list:
//!
//! ```yaml
//! repositories:
//!   - uri: git://server/app.git
//!     branch: refs/heads/master
//!     directory: app
//!   - uri: git://server/lib.git
//!     directory: lib
//! ```
//!
//! `branch` defaults to [`DEFAULT_BRANCH`] and `directory` to the workspace
//! root. Order matters: it is the order repositories are polled and checked
//! out in, and the order their commits appear in the change log.
//!
//! Parsing is strict about shape but lenient about omissions with
//! documented defaults; a configuration that cannot be parsed is an
//! [`Error::Config`] with a hint. Semantic validation of each descriptor
//! happens when a [`RepositoryManager`](crate::manager::RepositoryManager)
//! is constructed from the parsed list.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::repository::{RepositoryDescriptor, DEFAULT_BRANCH};

/// One configured repository entry as written in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryEntry {
    /// Remote repository URI.
    pub uri: String,
    /// Fully-qualified branch ref to track.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Workspace-relative directory, empty for the root.
    #[serde(default)]
    pub directory: String,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

#[derive(Debug, Deserialize)]
struct ConfigDoc {
    repositories: Vec<RepositoryEntry>,
}

/// Parse a YAML configuration document into descriptors, in configured
/// order.
pub fn parse(content: &str) -> Result<Vec<RepositoryDescriptor>> {
    if content.trim().is_empty() {
        return Err(Error::Config {
            message: "configuration is empty".to_string(),
            hint: Some("list tracked repositories under a 'repositories:' key".to_string()),
        });
    }
    let doc: ConfigDoc = serde_yaml::from_str(content).map_err(|e| Error::Config {
        message: e.to_string(),
        hint: Some(
            "expected a 'repositories:' list of entries with uri, branch and directory"
                .to_string(),
        ),
    })?;
    Ok(doc
        .repositories
        .into_iter()
        .map(|entry| RepositoryDescriptor::new(entry.uri, entry.branch, entry.directory))
        .collect())
}

/// Load and parse a configuration file.
pub fn load(path: &Path) -> Result<Vec<RepositoryDescriptor>> {
    let content = fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("cannot read {}: {}", path.display(), e),
        hint: None,
    })?;
    parse(&content)
}
