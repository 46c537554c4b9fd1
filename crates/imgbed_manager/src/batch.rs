//! Parallel batch uploads with per-file isolation.

use imgbed_core::{RepositoryTarget, StoredObject};
use imgbed_error::{StoreError, StoreErrorKind};
use imgbed_store::ImageStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, Semaphore, mpsc};
use tracing::{debug, info, instrument, warn};

/// Result slot of one upload task.
#[derive(Debug, Clone, Default)]
pub enum UploadOutcome {
    /// Not finished yet
    #[default]
    Pending,
    /// Uploaded
    Succeeded(StoredObject),
    /// Failed; siblings were not affected
    Failed(StoreError),
}

impl UploadOutcome {
    /// Whether the upload succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded(_))
    }
}

/// One local file and the object path it uploads to.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct UploadTask {
    /// Position in the input list
    index: usize,
    /// Local file to read
    source: PathBuf,
    /// Repository path to create
    object_path: String,
    /// Current outcome
    outcome: UploadOutcome,
}

impl UploadTask {
    /// Creates a pending task uploading `source` under the target's root path.
    pub fn new(index: usize, source: impl Into<PathBuf>, target: &RepositoryTarget) -> Self {
        let source = source.into();
        let object_path = target.object_path(&local_name(&source));
        Self {
            index,
            source,
            object_path,
            outcome: UploadOutcome::Pending,
        }
    }
}

fn local_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Progress event emitted after every task completion, in finish order.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadProgress {
    /// Input index of the task that just finished
    pub index: usize,
    /// Whether that task succeeded
    pub succeeded: bool,
    /// Tasks finished so far (monotonically increasing)
    pub completed: usize,
    /// Tasks in the batch
    pub total: usize,
    /// `completed` divided by seconds since the batch started
    pub throughput_per_second: f64,
}

/// Final aggregate of a batch, in input order.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct BatchReport {
    /// Tasks with their outcomes, in input order
    tasks: Vec<UploadTask>,
    /// Wall time from batch start to the last completion
    elapsed: Duration,
    /// Attempts per second over the whole batch
    throughput_per_second: f64,
}

impl BatchReport {
    /// Objects that were uploaded, in input order.
    pub fn succeeded(&self) -> Vec<&StoredObject> {
        self.tasks
            .iter()
            .filter_map(|task| match &task.outcome {
                UploadOutcome::Succeeded(object) => Some(object),
                _ => None,
            })
            .collect()
    }

    /// Failed tasks with their errors, in input order.
    pub fn failed(&self) -> Vec<(&UploadTask, &StoreError)> {
        self.tasks
            .iter()
            .filter_map(|task| match &task.outcome {
                UploadOutcome::Failed(e) => Some((task, e)),
                _ => None,
            })
            .collect()
    }

    /// Whether every task succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.tasks.iter().all(|task| task.outcome.is_success())
    }

    /// Consumes the report, returning its tasks.
    pub fn into_tasks(self) -> Vec<UploadTask> {
        self.tasks
    }
}

/// Uploads many files in parallel, each as an independent task.
///
/// A failing file never cancels its siblings. Parallelism is bounded by a semaphore when
/// `max_concurrent` is set, otherwise every file is in flight at once.
///
/// # Example
///
/// ```rust,ignore
/// let uploader = BatchUploader::new(store).with_max_concurrent(4);
/// let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
/// let report = uploader.run(&target, files, Some(tx)).await;
/// while let Some(p) = rx.recv().await {
///     println!("{}/{} ({:.1}/s)", p.completed, p.total, p.throughput_per_second);
/// }
/// ```
#[derive(Debug)]
pub struct BatchUploader<S: ?Sized> {
    store: Arc<S>,
    max_concurrent: Option<usize>,
}

impl<S: ?Sized> Clone for BatchUploader<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            max_concurrent: self.max_concurrent,
        }
    }
}

impl<S: ImageStore + ?Sized + 'static> BatchUploader<S> {
    /// Creates an unbounded uploader.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            max_concurrent: None,
        }
    }

    /// Limits the number of uploads in flight. `0` means unbounded.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = (max_concurrent > 0).then_some(max_concurrent);
        self
    }

    /// Configured bound, if any.
    pub fn max_concurrent(&self) -> Option<usize> {
        self.max_concurrent
    }

    /// Uploads `files` under the target's root path.
    ///
    /// Progress events go to `progress` in the order tasks finish; a closed receiver is
    /// ignored. The returned report preserves input order.
    #[instrument(skip(self, target, files, progress), fields(repo = %target.repo(), total = files.len()))]
    pub async fn run(
        &self,
        target: &RepositoryTarget,
        files: Vec<PathBuf>,
        progress: Option<mpsc::UnboundedSender<UploadProgress>>,
    ) -> BatchReport {
        let total = files.len();
        let started = Instant::now();
        let completed = Arc::new(Mutex::new(0usize));
        let semaphore = self.max_concurrent.map(|n| Arc::new(Semaphore::new(n)));
        let target = Arc::new(target.clone());

        let mut tasks: Vec<UploadTask> = files
            .into_iter()
            .enumerate()
            .map(|(index, source)| UploadTask::new(index, source, &target))
            .collect();

        let handles: Vec<_> = tasks
            .iter()
            .map(|task| {
                let store = Arc::clone(&self.store);
                let target = Arc::clone(&target);
                let completed = Arc::clone(&completed);
                let semaphore = semaphore.clone();
                let progress = progress.clone();
                let index = task.index;
                let source = task.source.clone();
                let object_path = task.object_path.clone();

                tokio::spawn(async move {
                    let _permit = match semaphore {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };

                    let result = store.upload(&target, &source, &object_path).await;
                    if let Err(e) = &result {
                        warn!(index, file = %source.display(), error = %e.kind(), "Upload failed");
                    }

                    record_completion(
                        &completed,
                        progress.as_ref(),
                        index,
                        result.is_ok(),
                        total,
                        started,
                    )
                    .await;
                    result
                })
            })
            .collect();

        for (task, handle) in tasks.iter_mut().zip(handles) {
            task.outcome = match handle.await {
                Ok(Ok(object)) => UploadOutcome::Succeeded(object),
                Ok(Err(e)) => UploadOutcome::Failed(e),
                Err(join_error) => {
                    warn!(index = task.index, error = %join_error, "Upload task aborted");
                    // The task died before reporting its own completion.
                    record_completion(
                        &completed,
                        progress.as_ref(),
                        task.index,
                        false,
                        total,
                        started,
                    )
                    .await;
                    UploadOutcome::Failed(StoreError::new(StoreErrorKind::RemoteUnavailable {
                        status: None,
                        message: format!("upload task did not complete: {}", join_error),
                    }))
                }
            };
        }

        let elapsed = started.elapsed();
        let report = BatchReport {
            throughput_per_second: per_second(total, elapsed),
            tasks,
            elapsed,
        };

        info!(
            succeeded = report.succeeded().len(),
            failed = report.failed().len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Batch upload finished"
        );
        debug!(throughput = report.throughput_per_second, "Batch throughput");
        report
    }
}

/// Counts one finished task and emits its progress event.
///
/// Events are sent under the counter lock, so `completed` arrives in increasing order.
async fn record_completion(
    completed: &Mutex<usize>,
    progress: Option<&mpsc::UnboundedSender<UploadProgress>>,
    index: usize,
    succeeded: bool,
    total: usize,
    started: Instant,
) {
    let mut done = completed.lock().await;
    *done += 1;
    if let Some(progress) = progress {
        // The receiver may have been dropped by an abandoning caller.
        let _ = progress.send(UploadProgress {
            index,
            succeeded,
            completed: *done,
            total,
            throughput_per_second: per_second(*done, started.elapsed()),
        });
    }
}

/// Cumulative rate; zero before any measurable time has passed.
fn per_second(count: usize, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds > 0.0 {
        count as f64 / seconds
    } else {
        0.0
    }
}
