//! Batch driver with a message-passing worker pool.
//!
//! Dispatches every input file to the worker pool, collects one outcome per
//! file in any completion order, and writes the consolidated error report.
//! A failing, panicking, hung or cancelled file never stops the batch.

pub mod discovery;
pub mod pipeline;
pub mod pool;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::pipeline::{FilePipeline, FileProcessor};
use self::pool::{IndexedOutcome, WorkItem, WorkerPool};
use self::writer::write_error_report;

use crate::config::ProcessorConfig;
use crate::constants::WORK_QUEUE_DEPTH_PER_WORKER;
use crate::error::{Result, RxError};
use crate::models::{FileFailure, FileOutcome};

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Lifecycle of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Dispatching,
    Collecting,
    Reporting,
    Done,
}

/// Per-file summary of a successful run (rows are not retained)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedSummary {
    pub path: PathBuf,
    pub output_path: PathBuf,
    pub rows: usize,
    pub samples: usize,
    pub coerced_values: usize,
}

/// Result of a whole batch, ordered by input position
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total_files: usize,
    pub processed: Vec<ProcessedSummary>,
    pub failures: Vec<FileFailure>,
    /// Where the error report was written, if any file failed
    pub error_log: Option<PathBuf>,
    pub processing_time: Duration,
}

impl BatchReport {
    pub fn files_processed(&self) -> usize {
        self.processed.len()
    }

    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total_rows(&self) -> usize {
        self.processed.iter().map(|p| p.rows).sum()
    }

    pub fn coerced_values(&self) -> usize {
        self.processed.iter().map(|p| p.coerced_values).sum()
    }

    pub fn failure_for(&self, path: &Path) -> Option<&FileFailure> {
        self.failures.iter().find(|f| f.path == path)
    }

    /// Calculate success rate percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_files > 0 {
            (self.files_processed() as f64 / self.total_files as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate files processed per second
    pub fn files_per_second(&self) -> f64 {
        if self.processing_time.as_secs_f64() > 0.0 {
            self.total_files as f64 / self.processing_time.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Batch Summary:\n\
             Files: {} total, {} processed, {} failed ({:.1}% success rate)\n\
             Rows: {} written, {} values treated as missing\n\
             Duration: {:.2}s ({:.1} files/sec)",
            self.total_files,
            self.files_processed(),
            self.files_failed(),
            self.success_rate(),
            self.total_rows(),
            self.coerced_values(),
            self.processing_time.as_secs_f64(),
            self.files_per_second()
        )
    }
}

/// Runs a [`FileProcessor`] over a list of files in parallel
pub struct BatchProcessor<P: FileProcessor = FilePipeline> {
    config: Arc<ProcessorConfig>,
    processor: Arc<P>,
    state: BatchState,
    show_progress: bool,
    cancellation_token: CancellationToken,
}

impl BatchProcessor<FilePipeline> {
    /// Create a batch processor running the standard file pipeline
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        let config = Arc::new(config);
        let pipeline = FilePipeline::new(config.clone())?;
        Self::from_parts(config, pipeline)
    }
}

impl<P: FileProcessor> BatchProcessor<P> {
    /// Create a batch processor around a custom file processor
    pub fn with_processor(config: ProcessorConfig, processor: P) -> Result<Self> {
        Self::from_parts(Arc::new(config), processor)
    }

    fn from_parts(config: Arc<ProcessorConfig>, processor: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            processor: Arc::new(processor),
            state: BatchState::Idle,
            show_progress: false,
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Show a progress bar on stderr while collecting
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Share a cancellation token (e.g. tied to Ctrl-C)
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn transition(&mut self, next: BatchState) {
        debug!("Batch state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Process every file and report; always completes with one entry per input
    pub async fn run(&mut self, paths: &[PathBuf]) -> BatchReport {
        let start_time = Instant::now();
        self.state = BatchState::Idle;

        info!(
            "Starting batch of {} files with {} workers",
            paths.len(),
            self.config.batch.workers.min(paths.len().max(1))
        );

        self.transition(BatchState::Dispatching);
        let (workers, dispatcher, result_rx) = self.dispatch(paths);

        self.transition(BatchState::Collecting);
        let outcomes = self.collect(paths, workers, dispatcher, result_rx).await;

        self.transition(BatchState::Reporting);
        let mut report = self.build_report(outcomes);
        report.processing_time = start_time.elapsed();

        self.transition(BatchState::Done);
        info!(
            "Batch complete: {} processed, {} failed in {:.2}s",
            report.files_processed(),
            report.files_failed(),
            report.processing_time.as_secs_f64()
        );
        report
    }

    #[allow(clippy::type_complexity)]
    fn dispatch(
        &self,
        paths: &[PathBuf],
    ) -> (
        tokio::task::JoinSet<usize>,
        tokio::task::JoinHandle<usize>,
        mpsc::Receiver<IndexedOutcome>,
    ) {
        let workers = self.config.batch.workers.min(paths.len()).max(1);
        let depth = workers * WORK_QUEUE_DEPTH_PER_WORKER;
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>(depth);
        let (result_tx, result_rx) = mpsc::channel::<IndexedOutcome>(depth);

        let pool = WorkerPool::new(
            self.processor.clone(),
            workers,
            self.config.batch.file_timeout,
            self.cancellation_token.clone(),
        );
        let worker_set = pool.spawn(work_rx, result_tx);

        let items: Vec<WorkItem> = paths
            .iter()
            .enumerate()
            .map(|(index, path)| WorkItem {
                index,
                path: path.clone(),
            })
            .collect();
        let token = self.cancellation_token.clone();

        let dispatcher = tokio::spawn(async move {
            let mut dispatched = 0;
            for item in items {
                tokio::select! {
                    _ = token.cancelled() => break,
                    sent = work_tx.send(item) => {
                        if sent.is_err() {
                            break;
                        }
                        dispatched += 1;
                    }
                }
            }
            dispatched
        });

        (worker_set, dispatcher, result_rx)
    }

    async fn collect(
        &self,
        paths: &[PathBuf],
        mut workers: tokio::task::JoinSet<usize>,
        dispatcher: tokio::task::JoinHandle<usize>,
        mut result_rx: mpsc::Receiver<IndexedOutcome>,
    ) -> Vec<FileOutcome> {
        let progress_bar = self.progress_bar(paths.len());
        let mut slots: Vec<Option<FileOutcome>> = vec![None; paths.len()];

        while let Some((index, outcome)) = result_rx.recv().await {
            if let Some(file_name) = outcome.path().file_name() {
                progress_bar.set_message(file_name.to_string_lossy().into_owned());
            }
            progress_bar.suspend(|| log_outcome(&outcome));
            progress_bar.inc(1);
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(outcome);
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!("File worker terminated abnormally: {}", e);
            }
        }

        let dispatched = match dispatcher.await {
            Ok(dispatched) => dispatched,
            Err(e) => {
                error!("Dispatcher terminated abnormally: {}", e);
                0
            }
        };
        let cancelled = self.cancellation_token.is_cancelled();
        if cancelled {
            warn!(
                "Batch cancelled after dispatching {} of {} files",
                dispatched,
                paths.len()
            );
        }

        progress_bar.finish_with_message("done");

        slots
            .into_iter()
            .zip(paths)
            .enumerate()
            .map(|(index, (slot, path))| {
                slot.unwrap_or_else(|| {
                    let err = if cancelled || index >= dispatched {
                        RxError::Cancelled { path: path.clone() }
                    } else {
                        RxError::WorkerCrashed {
                            path: path.clone(),
                            reason: "no outcome reported".to_string(),
                        }
                    };
                    let outcome = FileOutcome::Failed(FileFailure::from_error(path, &err));
                    log_outcome(&outcome);
                    outcome
                })
            })
            .collect()
    }

    fn build_report(&self, outcomes: Vec<FileOutcome>) -> BatchReport {
        let mut report = BatchReport {
            total_files: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                FileOutcome::Processed(processed) => report.processed.push(ProcessedSummary {
                    rows: processed.rows.len(),
                    path: processed.path,
                    output_path: processed.output_path,
                    samples: processed.samples,
                    coerced_values: processed.coerced_values,
                }),
                FileOutcome::Failed(failure) => report.failures.push(failure),
            }
        }

        let error_log = &self.config.batch.error_log;
        match write_error_report(error_log, &report.failures) {
            Ok(true) => report.error_log = Some(error_log.clone()),
            Ok(false) => {}
            Err(e) => error!("{}", e),
        }

        report
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress || total == 0 {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} ETA: {eta}",
        ) {
            progress_bar.set_style(style.progress_chars("#>-"));
        }
        progress_bar
    }
}

/// Per-file log line, emitted by the collector so it can pause the progress bar
fn log_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Processed(processed) => {
            if processed.coerced_values > 0 {
                warn!(
                    "{}: {} value(s) treated as missing",
                    processed.path.display(),
                    processed.coerced_values
                );
            }
            info!("Results saved to {}", processed.output_path.display());
        }
        FileOutcome::Failed(failure) => {
            error!(
                "Error processing file {}: {}",
                failure.path.display(),
                failure.message
            );
        }
    }
}
