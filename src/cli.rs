//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Build Sync - Synchronize build workspaces with tracked Git repositories
#[derive(Parser, Debug)]
#[command(name = "build-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check out every tracked repository and write the change log
    Checkout(commands::checkout::CheckoutArgs),

    /// Compare remote tips against a recorded baseline
    Poll(commands::poll::PollArgs),

    /// Capture the current state of the tracked repositories
    State(commands::state::StateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .format_timestamp(None)
        .init();

        match self.color.to_lowercase().as_str() {
            "always" => console::set_colors_enabled(true),
            "never" => console::set_colors_enabled(false),
            _ => {}
        }

        match self.command {
            Commands::Checkout(args) => commands::checkout::execute(args),
            Commands::Poll(args) => commands::poll::execute(args),
            Commands::State(args) => commands::state::execute(args),
        }
    }
}
