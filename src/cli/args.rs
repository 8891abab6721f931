//! Command-line argument definitions for the RX level processor
//!
//! Defines the CLI interface using the clap derive API and maps the
//! `process` arguments onto a [`ProcessorConfig`].

use crate::config::{EmptyBucketPolicy, ProcessorConfig};
use crate::constants::{DEFAULT_LOG_EXTENSION, DEFAULT_PATH_LIST};
use crate::error::{Result, RxError};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments for the RX level processor
///
/// Reduces per-device RX level logs into ten-second bucket tables written
/// next to each input file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rxlevel-processor",
    version,
    about = "Aggregate RX level device logs into ten-second bucket tables",
    long_about = "Processes a batch of RX level CSV logs in parallel. Each file is reduced into \
                  ten-second buckets over one day and written as <stem>_output.txt beside the \
                  input. Files that fail are listed in a consolidated error report."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process a batch of log files into bucket tables
    Process(ProcessArgs),
    /// Find log files under a directory and write the batch path list
    Discover(DiscoverArgs),
}

/// How empty buckets appear in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmptyBuckets {
    /// Leave empty buckets out
    Omit,
    /// Write empty buckets with 0.0
    Zero,
}

impl From<EmptyBuckets> for EmptyBucketPolicy {
    fn from(value: EmptyBuckets) -> Self {
        match value {
            EmptyBuckets::Omit => EmptyBucketPolicy::Omit,
            EmptyBuckets::Zero => EmptyBucketPolicy::Zero,
        }
    }
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Files to process; when empty, paths are read from --paths-file
    #[arg(value_name = "FILE")]
    pub paths: Vec<PathBuf>,

    /// Path list with one input file per line
    #[arg(
        short = 'p',
        long = "paths-file",
        value_name = "FILE",
        default_value = DEFAULT_PATH_LIST,
        help = "Path list with one input file per line"
    )]
    pub paths_file: PathBuf,

    /// JSON configuration file; flags given on the command line override it
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "JSON configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Consolidated error report, written only when a file fails
    #[arg(
        short = 'e',
        long = "error-log",
        value_name = "FILE",
        help = "Where to write the error report [default: error_log.txt]"
    )]
    pub error_log: Option<PathBuf>,

    /// Number of parallel workers (defaults to the number of CPUs)
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel workers"
    )]
    pub workers: Option<usize>,

    /// Lines skipped before the header row
    #[arg(
        long = "metadata-lines",
        value_name = "COUNT",
        help = "Lines skipped before the header row [default: 1]"
    )]
    pub metadata_lines: Option<usize>,

    /// Field delimiter, a single ASCII character
    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        help = "Field delimiter [default: ,]"
    )]
    pub delimiter: Option<char>,

    #[arg(
        long = "empty-buckets",
        value_enum,
        help = "How buckets without values are written [default: omit]"
    )]
    pub empty_buckets: Option<EmptyBuckets>,

    /// Sample count treated as a complete bucket
    #[arg(
        long = "expected-count",
        value_name = "COUNT",
        help = "Samples per complete bucket [default: 5]"
    )]
    pub expected_count: Option<usize>,

    /// Per-file time limit in seconds; 0 disables the limit
    #[arg(
        long = "timeout-secs",
        value_name = "SECONDS",
        help = "Per-file time limit in seconds, 0 disables [default: 300]"
    )]
    pub timeout_secs: Option<u64>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(long = "no-progress", help = "Disable the progress bar")]
    pub no_progress: bool,
}

/// Arguments for the discover command
#[derive(Debug, Clone, Parser)]
pub struct DiscoverArgs {
    /// Directory searched recursively
    #[arg(value_name = "DIR")]
    pub root: PathBuf,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = DEFAULT_PATH_LIST,
        help = "Path list to write"
    )]
    pub output: PathBuf,

    #[arg(
        long = "extension",
        value_name = "EXT",
        default_value = DEFAULT_LOG_EXTENSION,
        help = "File extension to collect"
    )]
    pub extension: String,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity"
    )]
    pub verbose: u8,
}

/// Map a `-v` count onto a tracing level; `info` is the default so per-file
/// "Results saved" lines are visible
pub fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl ProcessArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Build the processor configuration: the `--config` file (or the
    /// defaults), then any flag given on the command line
    pub fn to_config(&self) -> Result<ProcessorConfig> {
        let mut config = match &self.config {
            Some(path) => ProcessorConfig::from_json_file(path)?,
            None => ProcessorConfig::default(),
        };

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(RxError::configuration(format!(
                    "Delimiter must be a single ASCII character, got '{}'",
                    delimiter
                )));
            }
            config = config.with_delimiter(delimiter as u8);
        }
        if let Some(lines) = self.metadata_lines {
            config = config.with_metadata_lines(lines);
        }
        if let Some(policy) = self.empty_buckets {
            config = config.with_empty_bucket_policy(policy.into());
        }
        if let Some(count) = self.expected_count {
            config = config.with_expected_count(count);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_file_timeout((secs > 0).then(|| Duration::from_secs(secs)));
        }
        if let Some(error_log) = &self.error_log {
            config = config.with_error_log(error_log.clone());
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }

        config.validate()?;
        Ok(config)
    }
}

impl DiscoverArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, false)
    }
}
