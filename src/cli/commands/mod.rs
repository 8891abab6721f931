//! Command implementations for the RX level processor CLI
//!
//! Each subcommand lives in its own module:
//! - `process`: batch aggregation with progress and error report
//! - `discover`: writes the batch path list from a directory walk

pub mod discover;
pub mod process;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// What a command run produced, for the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Everything requested was completed
    Completed,
    /// The batch completed but some files failed
    CompletedWithFailures,
    /// Interrupted before all files were processed
    Cancelled,
}

/// Dispatch to the subcommand handler
pub async fn run(
    command: Commands,
    cancellation_token: CancellationToken,
) -> Result<CommandStatus> {
    match command {
        Commands::Process(process_args) => {
            process::run_process(process_args, cancellation_token).await
        }
        Commands::Discover(discover_args) => discover::run_discover(discover_args),
    }
}

impl Args {
    /// Take the subcommand, if one was given
    pub fn into_command(self) -> Option<Commands> {
        self.command
    }
}
