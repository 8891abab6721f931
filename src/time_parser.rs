//! Time axis parsing.
//!
//! Converts projected rows into [`Sample`]s. The time column is mandatory:
//! one unreadable timestamp fails the whole file. Value cells that are not
//! numeric become missing values and are reported as coercion warnings.

use crate::error::{Result, RxError};
use crate::models::{Sample, TimeOfDay, ValueCoercionWarning};
use crate::schema::Projection;
use chrono::{NaiveTime, Timelike};
use std::path::Path;
use tracing::debug;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Samples of one file plus the value cells that had to be dropped
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub samples: Vec<Sample>,
    pub warnings: Vec<ValueCoercionWarning>,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Parse `HH:MM:SS` (24-hour, no fractional seconds)
pub fn parse_time_of_day(raw: &str) -> Option<TimeOfDay> {
    let time = NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()?;
    // chrono encodes a leap second as nanosecond >= 1e9
    if time.nanosecond() != 0 {
        return None;
    }
    TimeOfDay::from_seconds(time.num_seconds_from_midnight())
}

/// Parse a numeric cell; blanks and non-numbers are missing
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| !value.is_nan())
}

/// Build the sample set of one file
pub fn parse_samples(projection: &Projection, file_path: &Path) -> Result<SampleSet> {
    let mut set = SampleSet {
        samples: Vec::with_capacity(projection.rows.len()),
        warnings: Vec::new(),
    };

    for (offset, row) in projection.rows.iter().enumerate() {
        let row_number = offset + 1;

        let time = parse_time_of_day(&row.time).ok_or_else(|| RxError::TimeParse {
            path: file_path.to_path_buf(),
            row: row_number,
            value: row.time.clone(),
        })?;

        let raw_value = row.value.as_deref().unwrap_or_default();
        let value = parse_value(raw_value);
        if value.is_none() {
            set.warnings.push(ValueCoercionWarning {
                row: row_number,
                raw: raw_value.to_string(),
            });
        }

        set.samples.push(Sample::new(time, value));
    }

    if !set.warnings.is_empty() {
        debug!(
            "{}: {} {} value(s) treated as missing",
            file_path.display(),
            set.warnings.len(),
            projection.value_column
        );
        for warning in set.warnings.iter().take(5) {
            debug!("  row {}: {:?}", warning.row, warning.raw);
        }
    }

    Ok(set)
}
