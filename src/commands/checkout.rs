//! Checkout command implementation
//!
//! Runs the orchestrated checkout over every configured repository: resolve
//! or initialize the local mirror, fetch the tracked branch, write the newly
//! visible commits to the change log, and synchronize tree and pointer.
//! Optionally captures the post-build state for the next poll.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use console::style;
use indicatif::ProgressBar;

use build_sync::changelog::CommitLogReader;
use build_sync::config;
use build_sync::manager::RepositoryManager;
use build_sync::progress::ProgressSink;

/// Arguments for the checkout command
#[derive(Args, Debug)]
pub struct CheckoutArgs {
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

    /// Change log output file
    #[arg(short, long, value_name = "PATH", default_value = "changelog.json")]
    pub log: PathBuf,

    /// Write the post-checkout state snapshot to this file
    #[arg(long, value_name = "PATH")]
    pub state_out: Option<PathBuf>,

    /// Show fetch progress
    #[arg(short, long)]
    pub progress: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Progress sink backed by an indicatif spinner.
struct SpinnerProgress {
    bar: Option<ProgressBar>,
}

impl SpinnerProgress {
    fn new() -> Self {
        Self { bar: None }
    }
}

impl ProgressSink for SpinnerProgress {
    fn begin_task(&mut self, title: &str, total_work: Option<u32>) {
        self.end_task();
        let bar = match total_work {
            Some(total) => ProgressBar::new(u64::from(total)),
            None => ProgressBar::new_spinner(),
        };
        bar.set_message(title.to_string());
        self.bar = Some(bar);
    }

    fn update(&mut self, completed: u32) {
        if let Some(bar) = &self.bar {
            bar.inc(u64::from(completed));
        }
    }

    fn end_task(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Execute the checkout command
pub fn execute(args: CheckoutArgs) -> Result<()> {
    let repos = config::load(&args.config)?;
    let manager = RepositoryManager::new(repos)?;

    let mut spinner = SpinnerProgress::new();
    let progress: Option<&mut dyn ProgressSink> = if args.progress {
        Some(&mut spinner)
    } else {
        None
    };

    let success = manager.checkout(&args.workspace, &args.log, progress)?;
    if !success {
        bail!("checkout failed: a tracked repository could not be fetched");
    }

    if let Some(state_out) = &args.state_out {
        if let Some(snapshot) = manager.calc_state(&args.workspace)? {
            super::write_snapshot(state_out, &snapshot)?;
        }
    }

    if !args.quiet {
        let changelog = CommitLogReader::read_path(&args.log)?;
        println!(
            "{} checked out {} repositories, {} new commits (log: {})",
            style("✓").green(),
            manager.repositories().len(),
            changelog.len(),
            args.log.display()
        );
    }
    Ok(())
}
