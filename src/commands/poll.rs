//! Poll command implementation
//!
//! Compares every configured repository's remote tip against the recorded
//! baseline and prints the aggregate outcome: `BUILD_NOW`, `SIGNIFICANT` or
//! `NO_CHANGES`. A missing state file means no baseline, which always
//! builds.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use build_sync::config;
use build_sync::manager::RepositoryManager;

/// Arguments for the poll command
#[derive(Args, Debug)]
pub struct PollArgs {
    /// Build workspace root
    #[arg(short, long, value_name = "PATH", env = "BUILD_SYNC_WORKSPACE")]
    pub workspace: PathBuf,

    /// Path to config file
    #[arg(
        short,
        long,
        value_name = "PATH",
        env = "BUILD_SYNC_CONFIG",
        default_value = ".build-sync.yaml"
    )]
    pub config: PathBuf,

    /// Recorded baseline state from the previous build
    #[arg(short, long, value_name = "PATH")]
    pub state: Option<PathBuf>,
}

/// Execute the poll command
pub fn execute(args: PollArgs) -> Result<()> {
    let repos = config::load(&args.config)?;
    let manager = RepositoryManager::new(repos)?;

    let baseline = match &args.state {
        Some(path) => super::read_snapshot(path)?,
        None => None,
    };

    let outcome = manager.poll(&args.workspace, baseline.as_ref())?;
    println!("{outcome}");
    Ok(())
}
