//! Error handling for RX level processing operations.
//!
//! Every variant that names a file is fatal for that file only. The batch
//! driver converts them into [`FileFailure`](crate::models::FileFailure)
//! records, so none of these ever stop a batch.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No header row found in {path} after skipping {skipped} metadata line(s)")]
    EmptyInput { path: PathBuf, skipped: usize },

    #[error("'{column}' column not found in {path}")]
    MissingTimeColumn { path: PathBuf, column: String },

    #[error(
        "No valid value column found in {path}. Candidates: {candidates:?}. Available columns: {available:?}"
    )]
    MissingValueColumn {
        path: PathBuf,
        candidates: Vec<String>,
        available: Vec<String>,
    },

    #[error("Invalid time '{value}' at data row {row} in {path} (expected HH:MM:SS)")]
    TimeParse {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("Failed to write output file: {path} - {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Processing timed out after {limit:?} for file: {path}")]
    Timeout { path: PathBuf, limit: Duration },

    #[error("Processing abandoned before output was written: {path}")]
    Aborted { path: PathBuf },

    #[error("Worker terminated unexpectedly while processing {path}: {reason}")]
    WorkerCrashed { path: PathBuf, reason: String },

    #[error("Processing cancelled before {path} completed")]
    Cancelled { path: PathBuf },

    #[error("Failed to write error report: {path} - {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid configuration file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a file-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Read,
    MissingTimeColumn,
    MissingValueColumn,
    TimeParse,
    OutputWrite,
    Timeout,
    WorkerCrashed,
    Cancelled,
    Configuration,
}

impl RxError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            RxError::Io(_) | RxError::Csv(_) | RxError::EmptyInput { .. } => FailureKind::Read,
            RxError::MissingTimeColumn { .. } => FailureKind::MissingTimeColumn,
            RxError::MissingValueColumn { .. } => FailureKind::MissingValueColumn,
            RxError::TimeParse { .. } => FailureKind::TimeParse,
            RxError::OutputWrite { .. } | RxError::ReportWrite { .. } => FailureKind::OutputWrite,
            RxError::Timeout { .. } | RxError::Aborted { .. } => FailureKind::Timeout,
            RxError::WorkerCrashed { .. } => FailureKind::WorkerCrashed,
            RxError::Cancelled { .. } => FailureKind::Cancelled,
            RxError::Configuration { .. } | RxError::ConfigFile { .. } => {
                FailureKind::Configuration
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RxError>;
