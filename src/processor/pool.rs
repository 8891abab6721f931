//! Message-passing worker pool for file processing
//!
//! Workers pull `(index, path)` items from a shared work queue, run the
//! synchronous file processor on the blocking thread pool and push
//! `(index, outcome)` onto a result channel. Panics and timeouts inside a
//! processor are turned into failed outcomes here, so the driver always
//! receives one outcome for every item a worker accepted.

use super::pipeline::FileProcessor;
use crate::error::RxError;
use crate::models::{FileFailure, FileOutcome};

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::{self, JoinSet};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// One file queued for processing; `index` is its position in the batch
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub index: usize,
    pub path: PathBuf,
}

pub type IndexedOutcome = (usize, FileOutcome);

/// Fixed-size pool of file workers
pub struct WorkerPool<P: FileProcessor> {
    processor: Arc<P>,
    workers: usize,
    file_timeout: Option<Duration>,
    cancellation_token: CancellationToken,
}

impl<P: FileProcessor> WorkerPool<P> {
    pub fn new(
        processor: Arc<P>,
        workers: usize,
        file_timeout: Option<Duration>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            processor,
            workers: workers.max(1),
            file_timeout,
            cancellation_token,
        }
    }

    /// Spawn the workers; the result channel closes once every worker exits
    pub fn spawn(
        &self,
        work_queue: mpsc::Receiver<WorkItem>,
        results: mpsc::Sender<IndexedOutcome>,
    ) -> JoinSet<usize> {
        let work_queue = Arc::new(Mutex::new(work_queue));
        let mut workers = JoinSet::new();

        debug!("Spawning {} file workers", self.workers);

        for worker_id in 0..self.workers {
            workers.spawn(worker_loop(
                worker_id,
                self.processor.clone(),
                work_queue.clone(),
                results.clone(),
                self.file_timeout,
                self.cancellation_token.clone(),
            ));
        }

        workers
    }
}

async fn worker_loop<P: FileProcessor>(
    worker_id: usize,
    processor: Arc<P>,
    work_queue: Arc<Mutex<mpsc::Receiver<WorkItem>>>,
    results: mpsc::Sender<IndexedOutcome>,
    file_timeout: Option<Duration>,
    cancellation_token: CancellationToken,
) -> usize {
    let mut handled = 0;

    loop {
        let item = {
            let mut queue = work_queue.lock().await;
            tokio::select! {
                _ = cancellation_token.cancelled() => None,
                item = queue.recv() => item,
            }
        };

        let Some(item) = item else {
            debug!("Worker {} finished after {} file(s)", worker_id, handled);
            break;
        };

        if cancellation_token.is_cancelled() {
            debug!("Worker {} cancelled", worker_id);
            break;
        }

        let outcome = run_one(processor.clone(), &item.path, file_timeout).await;
        if results.send((item.index, outcome)).await.is_err() {
            debug!("Worker {}: result channel closed", worker_id);
            break;
        }
        handled += 1;
    }

    handled
}

/// Run one file on the blocking pool, supervising panics and the time limit
///
/// A file that exceeds the limit is reported as failed at once; its blocking
/// thread keeps running but is told to abort before writing any output.
pub async fn run_one<P: FileProcessor>(
    processor: Arc<P>,
    path: &Path,
    file_timeout: Option<Duration>,
) -> FileOutcome {
    let task_path = path.to_path_buf();
    let abort = CancellationToken::new();
    let task_abort = abort.clone();
    let handle = task::spawn_blocking(move || processor.process(&task_path, &task_abort));

    let joined = match file_timeout {
        Some(limit) => match time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                abort.cancel();
                let err = RxError::Timeout {
                    path: path.to_path_buf(),
                    limit,
                };
                debug!("{}", err);
                return FileOutcome::Failed(FileFailure::from_error(path, &err));
            }
        },
        None => handle.await,
    };

    match joined {
        Ok(outcome) => outcome,
        Err(join_error) => {
            let reason = if join_error.is_panic() {
                panic_message(join_error.into_panic())
            } else {
                join_error.to_string()
            };
            let err = RxError::WorkerCrashed {
                path: path.to_path_buf(),
                reason,
            };
            debug!("{}", err);
            FileOutcome::Failed(FileFailure::from_error(path, &err))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
