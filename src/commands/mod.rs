//! Command implementations for the build-sync CLI

pub mod checkout;
pub mod poll;
pub mod state;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use build_sync::state::RepositoryStateSnapshot;

/// Read a persisted snapshot file, treating a missing file as "no baseline".
pub fn read_snapshot(path: &Path) -> Result<Option<RepositoryStateSnapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read state file {}", path.display()))?;
    let snapshot = serde_json::from_str(&content)
        .with_context(|| format!("malformed state file {}", path.display()))?;
    Ok(Some(snapshot))
}

/// Persist a snapshot as pretty-printed JSON.
pub fn write_snapshot(path: &Path, snapshot: &RepositoryStateSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)
        .with_context(|| format!("cannot write state file {}", path.display()))?;
    Ok(())
}
