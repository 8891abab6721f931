//! Process command implementation
//!
//! Resolves the batch input list, runs the batch driver and prints the
//! summary.

use super::CommandStatus;
use super::shared::{print_batch_summary, setup_logging};
use crate::cli::args::ProcessArgs;
use crate::processor::BatchProcessor;
use crate::processor::discovery::read_path_list;
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the process command
pub async fn run_process(
    args: ProcessArgs,
    cancellation_token: CancellationToken,
) -> Result<CommandStatus> {
    setup_logging(args.get_log_level());

    let config = args.to_config().context("Invalid processing options")?;
    let paths = resolve_input_paths(&args)?;

    if paths.is_empty() {
        warn!("No input files to process");
    }

    if !args.quiet {
        println!(
            "{} {} files with {} workers",
            "Processing".bright_green().bold(),
            paths.len().to_string().bright_white().bold(),
            config.batch.workers.min(paths.len().max(1))
        );
    }

    let mut processor = BatchProcessor::new(config)
        .context("Failed to initialise batch processor")?
        .with_progress(args.show_progress())
        .with_cancellation_token(cancellation_token.clone());

    let report = processor.run(&paths).await;
    info!("{}", report.summary().replace('\n', " | "));

    if !args.quiet {
        print_batch_summary(&report);
    } else if let Some(error_log) = &report.error_log {
        println!("Errors logged to {}", error_log.display());
    }

    Ok(if cancellation_token.is_cancelled() {
        CommandStatus::Cancelled
    } else if report.files_failed() > 0 {
        CommandStatus::CompletedWithFailures
    } else {
        CommandStatus::Completed
    })
}

/// Positional paths win; otherwise the path list file is read
fn resolve_input_paths(args: &ProcessArgs) -> Result<Vec<PathBuf>> {
    if !args.paths.is_empty() {
        return Ok(args.paths.clone());
    }

    read_path_list(&args.paths_file).with_context(|| {
        format!(
            "Failed to read path list {} (run `discover` first or pass files directly)",
            args.paths_file.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Args, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn process_args(argv: &[&str]) -> ProcessArgs {
        match Args::parse_from(argv).command {
            Some(Commands::Process(args)) => args,
            _ => panic!("Expected process command"),
        }
    }

    #[test]
    fn test_positional_paths_win() {
        let args = process_args(&[
            "rxlevel-processor",
            "process",
            "--paths-file",
            "nope.txt",
            "x.log",
        ]);
        assert_eq!(resolve_input_paths(&args).unwrap(), vec![PathBuf::from("x.log")]);
    }

    #[test]
    fn test_missing_path_list_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let list = temp_dir.path().join("path.txt");
        let args = process_args(&["rxlevel-processor", "process", "-p", list.to_str().unwrap()]);

        let err = resolve_input_paths(&args).unwrap_err();
        assert!(err.to_string().contains("Failed to read path list"));
    }

    #[tokio::test]
    async fn test_run_process_from_path_list() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("good.log");
        let bad = temp_dir.path().join("bad.log");
        fs::write(&good, "meta\ntime,MX_RX_LEVEL\n00:00:00,2\n").unwrap();
        fs::write(&bad, "meta\nclock,MX_RX_LEVEL\n00:00:00,2\n").unwrap();

        let list = temp_dir.path().join("path.txt");
        fs::write(&list, format!("{}\n{}\n", good.display(), bad.display())).unwrap();
        let error_log = temp_dir.path().join("error_log.txt");

        let args = process_args(&[
            "rxlevel-processor",
            "process",
            "-q",
            "-p",
            list.to_str().unwrap(),
            "-e",
            error_log.to_str().unwrap(),
        ]);

        let status = run_process(args, CancellationToken::new()).await.unwrap();
        assert_eq!(status, CommandStatus::CompletedWithFailures);
        assert!(temp_dir.path().join("good_output.txt").exists());
        assert!(fs::read_to_string(error_log).unwrap().contains("bad.log"));
    }
}
