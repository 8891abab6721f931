//! Discover command implementation

use super::CommandStatus;
use super::shared::setup_logging;
use crate::cli::args::DiscoverArgs;
use crate::processor::discovery::{discover_log_files, write_path_list};
use anyhow::{Context, Result};
use colored::*;
use tracing::info;

/// Walk the root directory and write every matching file to the path list
pub fn run_discover(args: DiscoverArgs) -> Result<CommandStatus> {
    setup_logging(args.get_log_level());

    if !args.root.is_dir() {
        anyhow::bail!("Not a directory: {}", args.root.display());
    }

    let files = discover_log_files(&args.root, &args.extension)
        .with_context(|| format!("Failed to scan {}", args.root.display()))?;
    write_path_list(&args.output, &files)
        .with_context(|| format!("Failed to write path list {}", args.output.display()))?;

    info!(
        "Wrote {} paths from {} to {}",
        files.len(),
        args.root.display(),
        args.output.display()
    );
    println!(
        "{} {} .{} files, list saved to {}",
        "Found".bright_green().bold(),
        files.len().to_string().bright_white().bold(),
        args.extension.trim_start_matches('.'),
        args.output.display()
    );

    Ok(CommandStatus::Completed)
}
