//! Configuration management and validation.
//!
//! A single [`ProcessorConfig`] value is threaded through the resolver,
//! bucket generator, aggregator and batch driver. Tests override individual
//! sections with the `with_*` builders instead of touching globals.

use crate::constants::{
    CANONICAL_VALUE_COLUMN, DEFAULT_BUCKET_WIDTH_SECS, DEFAULT_DELIMITER, DEFAULT_ERROR_LOG,
    DEFAULT_EXPECTED_COUNT, DEFAULT_FILE_TIMEOUT_SECS, DEFAULT_METADATA_LINES, OUTPUT_EXTENSION,
    OUTPUT_SUFFIX, SECONDS_PER_DAY, TIME_COLUMN, VALUE_COLUMN_CANDIDATES,
};
use crate::error::{Result, RxError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Layout of the raw input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFormat {
    /// Lines skipped before the header row
    pub metadata_lines: usize,

    /// Field delimiter
    pub delimiter: u8,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            metadata_lines: DEFAULT_METADATA_LINES,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Column names used by the schema resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Required time column, matched after trimming
    pub time_column: String,

    /// Accepted value columns, first present wins
    pub value_candidates: Vec<String>,

    /// Name the selected value column is renamed to
    pub canonical_value_column: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            time_column: TIME_COLUMN.to_string(),
            value_candidates: VALUE_COLUMN_CANDIDATES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            canonical_value_column: CANONICAL_VALUE_COLUMN.to_string(),
        }
    }
}

/// Bucket partition of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketConfig {
    pub width_secs: u32,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            width_secs: DEFAULT_BUCKET_WIDTH_SECS,
        }
    }
}

/// What to emit for a bucket with no usable values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyBucketPolicy {
    /// Leave the bucket out of the output table
    #[default]
    Omit,
    /// Write the bucket with a value of 0.0
    Zero,
}

/// Parameters of the count-sensitive reduction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Sample count treated as a complete bucket (sum instead of scaled mean)
    pub expected_count: usize,

    pub empty_buckets: EmptyBucketPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            expected_count: DEFAULT_EXPECTED_COUNT,
            empty_buckets: EmptyBucketPolicy::Omit,
        }
    }
}

/// Naming of per-file output tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub suffix: String,
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: OUTPUT_SUFFIX.to_string(),
            extension: OUTPUT_EXTENSION.to_string(),
        }
    }
}

/// Batch driver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of concurrent file workers
    pub workers: usize,

    /// Per-file limit; `None` waits indefinitely
    pub file_timeout: Option<Duration>,

    /// Consolidated error report, written only when a file fails
    pub error_log: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
            file_timeout: Some(Duration::from_secs(DEFAULT_FILE_TIMEOUT_SECS)),
            error_log: PathBuf::from(DEFAULT_ERROR_LOG),
        }
    }
}

/// Global configuration for RX level processing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub input: InputFormat,
    pub schema: SchemaConfig,
    pub buckets: BucketConfig,
    pub aggregation: AggregationConfig,
    pub output: OutputConfig,
    pub batch: BatchConfig,
}

impl ProcessorConfig {
    /// Load a JSON configuration file; omitted fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| RxError::ConfigFile {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Pretty-printed JSON, in the format `from_json_file` reads
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RxError::configuration(format!("Cannot serialize configuration: {e}")))
    }

    /// Set the number of worker threads
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.batch.workers = workers;
        self
    }

    /// Set the per-file timeout (`None` disables it)
    pub fn with_file_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.batch.file_timeout = timeout;
        self
    }

    /// Set where the consolidated error report is written
    pub fn with_error_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.batch.error_log = path.into();
        self
    }

    /// Set the number of lines preceding the header row
    pub fn with_metadata_lines(mut self, lines: usize) -> Self {
        self.input.metadata_lines = lines;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.input.delimiter = delimiter;
        self
    }

    pub fn with_empty_bucket_policy(mut self, policy: EmptyBucketPolicy) -> Self {
        self.aggregation.empty_buckets = policy;
        self
    }

    pub fn with_expected_count(mut self, expected_count: usize) -> Self {
        self.aggregation.expected_count = expected_count;
        self
    }

    pub fn with_bucket_width(mut self, width_secs: u32) -> Self {
        self.buckets.width_secs = width_secs;
        self
    }

    /// Replace the accepted value column names
    pub fn with_value_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema.value_candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Check the configuration for values that would make every file fail
    pub fn validate(&self) -> Result<()> {
        if self.batch.workers == 0 {
            return Err(RxError::configuration("worker count must be at least 1"));
        }
        if self.aggregation.expected_count == 0 {
            return Err(RxError::configuration("expected count must be at least 1"));
        }
        if self.buckets.width_secs == 0 || self.buckets.width_secs > SECONDS_PER_DAY {
            return Err(RxError::configuration(format!(
                "bucket width must be between 1 and {} seconds, got {}",
                SECONDS_PER_DAY, self.buckets.width_secs
            )));
        }
        if self.schema.time_column.trim().is_empty() {
            return Err(RxError::configuration("time column name is empty"));
        }
        if self.schema.value_candidates.is_empty() {
            return Err(RxError::configuration(
                "at least one value column candidate is required",
            ));
        }
        if self.schema.canonical_value_column.trim().is_empty() {
            return Err(RxError::configuration("canonical value column name is empty"));
        }
        if matches!(self.batch.file_timeout, Some(timeout) if timeout.is_zero()) {
            return Err(RxError::configuration("file timeout must be non-zero"));
        }

        debug!(
            "Configuration valid: {} workers, {}s buckets, expected count {}, empty buckets {:?}",
            self.batch.workers,
            self.buckets.width_secs,
            self.aggregation.expected_count,
            self.aggregation.empty_buckets
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.metadata_lines, 1);
        assert_eq!(config.buckets.width_secs, 10);
        assert_eq!(config.aggregation.expected_count, 5);
        assert_eq!(config.aggregation.empty_buckets, EmptyBucketPolicy::Omit);
        assert_eq!(
            config.schema.value_candidates,
            vec!["MX_RX_LEVEL".to_string(), "1803_RX_LEVEL".to_string()]
        );
        assert!(config.batch.workers >= 1);
    }

    #[test]
    fn test_builders_override_sections() {
        let config = ProcessorConfig::default()
            .with_workers(3)
            .with_metadata_lines(2)
            .with_empty_bucket_policy(EmptyBucketPolicy::Zero)
            .with_file_timeout(None)
            .with_value_candidates(["RX"]);

        assert_eq!(config.batch.workers, 3);
        assert_eq!(config.input.metadata_lines, 2);
        assert_eq!(config.aggregation.empty_buckets, EmptyBucketPolicy::Zero);
        assert_eq!(config.batch.file_timeout, None);
        assert_eq!(config.schema.value_candidates, vec!["RX".to_string()]);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ProcessorConfig::default()
            .with_workers(6)
            .with_metadata_lines(2)
            .with_delimiter(b';')
            .with_empty_bucket_policy(EmptyBucketPolicy::Zero)
            .with_file_timeout(Some(Duration::from_millis(1500)))
            .with_error_log("/var/log/rx/errors.txt");

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), config.to_json().unwrap()).unwrap();

        assert_eq!(ProcessorConfig::from_json_file(temp_file.path()).unwrap(), config);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fs::write(
            temp_file.path(),
            r#"{"aggregation": {"empty_buckets": "zero"}, "input": {"metadata_lines": 2}}"#,
        )
        .unwrap();

        let config = ProcessorConfig::from_json_file(temp_file.path()).unwrap();
        assert_eq!(config.aggregation.empty_buckets, EmptyBucketPolicy::Zero);
        assert_eq!(config.aggregation.expected_count, 5);
        assert_eq!(config.input.metadata_lines, 2);
        assert_eq!(config.input.delimiter, b',');
        assert_eq!(config.schema, SchemaConfig::default());
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "{ workers: ").unwrap();

        match ProcessorConfig::from_json_file(temp_file.path()) {
            Err(RxError::ConfigFile { path, .. }) => assert_eq!(path, temp_file.path()),
            other => panic!("Expected ConfigFile error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(ProcessorConfig::default().with_workers(0).validate().is_err());
        assert!(
            ProcessorConfig::default()
                .with_expected_count(0)
                .validate()
                .is_err()
        );
        assert!(ProcessorConfig::default().with_bucket_width(0).validate().is_err());
        assert!(
            ProcessorConfig::default()
                .with_bucket_width(SECONDS_PER_DAY + 1)
                .validate()
                .is_err()
        );
        assert!(
            ProcessorConfig::default()
                .with_value_candidates(Vec::<String>::new())
                .validate()
                .is_err()
        );
        assert!(
            ProcessorConfig::default()
                .with_file_timeout(Some(Duration::ZERO))
                .validate()
                .is_err()
        );
    }
}
