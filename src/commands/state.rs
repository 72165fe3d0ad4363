//! State command implementation
//!
//! Captures the commit each configured repository currently sits at and
//! writes the snapshot as JSON, either to a file for the next poll or to
//! stdout for inspection.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;

use build_sync::config;
use build_sync::manager::RepositoryManager;

/// Arguments for the state command
#[derive(Args, Debug)]
pub struct StateArgs {
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

    /// Write the snapshot to this file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Execute the state command
pub fn execute(args: StateArgs) -> Result<()> {
    let repos = config::load(&args.config)?;
    let manager = RepositoryManager::new(repos)?;

    let Some(snapshot) = manager.calc_state(&args.workspace)? else {
        eprintln!(
            "{} no repository state recorded in {}",
            style("!").yellow(),
            args.workspace.display()
        );
        return Ok(());
    };

    match &args.out {
        Some(path) => super::write_snapshot(path, &snapshot)?,
        None => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }
    Ok(())
}
