//! Core data structures and types for RX level processing.
//!
//! Defines the time-of-day axis, samples, buckets, per-bucket results and
//! the per-file outcome that crosses from a worker back to the batch driver.

use crate::constants::{LAST_SECOND_OF_DAY, SECONDS_PER_DAY};
use crate::error::{FailureKind, RxError};
use std::fmt;
use std::path::{Path, PathBuf};

/// Wall-clock time within one day, stored as seconds since midnight (0..=86399)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const LAST_SECOND: TimeOfDay = TimeOfDay(LAST_SECOND_OF_DAY);

    /// Build from seconds since midnight; `None` past 23:59:59
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        (seconds < SECONDS_PER_DAY).then_some(TimeOfDay(seconds))
    }

    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(TimeOfDay(hour * 3600 + minute * 60 + second))
    }

    pub fn seconds(&self) -> u32 {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    pub fn minute(&self) -> u32 {
        (self.0 % 3600) / 60
    }

    pub fn second(&self) -> u32 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// One timestamped reading; `value` is `None` when the raw cell was not numeric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: TimeOfDay,
    pub value: Option<f64>,
}

impl Sample {
    pub fn new(time: TimeOfDay, value: Option<f64>) -> Self {
        Self { time, value }
    }
}

/// Non-fatal record of a value cell that could not be read as a number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCoercionWarning {
    /// 1-based data row (header excluded)
    pub row: usize,
    pub raw: String,
}

/// Half-open interval `[start, end)` in seconds since midnight
///
/// The final bucket of a day ends at 86400, so its inclusive upper label is
/// 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub index: usize,
    start_secs: u32,
    end_secs: u32,
}

impl Bucket {
    pub(crate) fn new(index: usize, start_secs: u32, end_secs: u32) -> Self {
        debug_assert!(start_secs < end_secs && end_secs <= SECONDS_PER_DAY);
        Self {
            index,
            start_secs,
            end_secs,
        }
    }

    pub fn start(&self) -> TimeOfDay {
        TimeOfDay(self.start_secs)
    }

    /// Exclusive end, clamped to 23:59:59 for the last bucket of the day
    pub fn end(&self) -> TimeOfDay {
        TimeOfDay(self.end_secs.min(LAST_SECOND_OF_DAY))
    }

    pub fn start_secs(&self) -> u32 {
        self.start_secs
    }

    pub fn end_secs(&self) -> u32 {
        self.end_secs
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start_secs <= time.seconds() && time.seconds() < self.end_secs
    }
}

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct BucketResult {
    pub index: usize,
    pub time_label: String,
    pub output_value: f64,
}

/// Successful per-file result
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFile {
    pub path: PathBuf,
    pub output_path: PathBuf,
    pub rows: Vec<BucketResult>,
    pub samples: usize,
    pub coerced_values: usize,
}

/// Failed per-file result, as written to the error report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn from_error(path: &Path, error: &RxError) -> Self {
        Self {
            path: path.to_path_buf(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// `<path>: <message>`
    pub fn report_line(&self) -> String {
        format!("{}: {}", self.path.display(), self.message)
    }
}

/// What a file pipeline hands back to the batch driver
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed(ProcessedFile),
    Failed(FileFailure),
}

impl FileOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FileOutcome::Processed(processed) => &processed.path,
            FileOutcome::Failed(failure) => &failure.path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FileOutcome::Failed(_))
    }

    pub fn failure(&self) -> Option<&FileFailure> {
        match self {
            FileOutcome::Failed(failure) => Some(failure),
            FileOutcome::Processed(_) => None,
        }
    }
}
