//! Single-file pipeline
//!
//! Reads one device log, resolves its columns, parses the time axis, reduces
//! the samples into buckets and writes the bucket table next to the input.
//! Every failure is returned as a [`FileOutcome::Failed`]; nothing escapes
//! as an error past [`FileProcessor::process`].

use super::writer::{output_path_for, write_bucket_table};
use crate::aggregator::Aggregator;
use crate::buckets::DayBuckets;
use crate::config::ProcessorConfig;
use crate::error::{Result, RxError};
use crate::models::{FileFailure, FileOutcome, ProcessedFile};
use crate::reader::read_raw_table;
use crate::schema::SchemaResolver;
use crate::time_parser::parse_samples;

use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Unit of work executed by batch workers
///
/// Implementations run synchronously on a blocking worker thread and must
/// convert every failure into a [`FileOutcome::Failed`]. Once `abort` is
/// cancelled the outcome is discarded, and nothing may be written.
pub trait FileProcessor: Send + Sync + 'static {
    fn process(&self, path: &Path, abort: &CancellationToken) -> FileOutcome;
}

/// Resolver, parser, bucket generator and aggregator composed for one file
#[derive(Debug, Clone)]
pub struct FilePipeline {
    config: Arc<ProcessorConfig>,
    resolver: SchemaResolver,
    buckets: Arc<DayBuckets>,
    aggregator: Aggregator,
}

impl FilePipeline {
    /// Build a pipeline; the bucket partition is generated once here
    pub fn new(config: Arc<ProcessorConfig>) -> Result<Self> {
        config.validate()?;
        let buckets = Arc::new(DayBuckets::from_config(&config.buckets)?);

        Ok(Self {
            resolver: SchemaResolver::new(config.schema.clone()),
            aggregator: Aggregator::new(config.aggregation.clone()),
            buckets,
            config,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn buckets(&self) -> &DayBuckets {
        &self.buckets
    }

    /// Run every stage for one file, propagating the first failure
    pub fn run(&self, file_path: &Path) -> Result<ProcessedFile> {
        self.run_until(file_path, &CancellationToken::new())
    }

    /// Like [`run`](Self::run), but gives up without writing once `abort` is cancelled
    pub fn run_until(
        &self,
        file_path: &Path,
        abort: &CancellationToken,
    ) -> Result<ProcessedFile> {
        debug!("Processing file: {}", file_path.display());

        let table = read_raw_table(file_path, &self.config.input)?;
        let projection = self.resolver.resolve(&table, file_path)?;
        let sample_set = parse_samples(&projection, file_path)?;
        let rows = self.aggregator.aggregate(&sample_set.samples, &self.buckets);

        let output_path = output_path_for(file_path, &self.config.output);
        if abort.is_cancelled() {
            return Err(RxError::Aborted {
                path: file_path.to_path_buf(),
            });
        }
        write_bucket_table(&output_path, &projection.value_column, &rows)?;

        Ok(ProcessedFile {
            path: file_path.to_path_buf(),
            output_path,
            rows,
            samples: sample_set.len(),
            coerced_values: sample_set.warnings.len(),
        })
    }
}

impl FileProcessor for FilePipeline {
    fn process(&self, path: &Path, abort: &CancellationToken) -> FileOutcome {
        match self.run_until(path, abort) {
            Ok(processed) => FileOutcome::Processed(processed),
            Err(e) => {
                debug!("{} failed: {}", path.display(), e);
                FileOutcome::Failed(FileFailure::from_error(path, &e))
            }
        }
    }
}
