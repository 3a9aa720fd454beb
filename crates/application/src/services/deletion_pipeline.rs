use super::{CandidateEnumerator, RunStats, TouchedDirectories};
use crate::ports::{AuditSink, FileSystem};
use archive_retention_domain::{AuditRecord, DomainError, FileCandidate, RetryPolicy, RunSettings};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub workers: usize,
    pub queue_high_water: usize,
    pub backpressure_delay: Duration,
    pub retry: RetryPolicy,
    pub dry_run: bool,
    pub quiet: bool,
}

impl From<&RunSettings> for PipelineSettings {
    fn from(settings: &RunSettings) -> Self {
        Self {
            workers: settings.workers.max(1),
            queue_high_water: settings.queue_high_water.max(1),
            backpressure_delay: settings.backpressure_delay,
            retry: settings.retry,
            dry_run: settings.dry_run,
            quiet: settings.quiet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Candidates handed to the queue
    pub enqueued: u64,
    /// Candidates a worker finished (deleted, failed or reported in dry-run)
    pub processed: u64,
    /// Candidates never processed because the run was cancelled
    pub skipped: u64,
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<FileCandidate>>>;

/// One producer (the enumerator) feeding a bounded queue drained by a fixed
/// pool of workers. A single worker is the sequential mode; the code path is
/// the same.
pub struct DeletionPipeline {
    fs: Arc<dyn FileSystem>,
    audit: Arc<dyn AuditSink>,
    settings: PipelineSettings,
}

impl DeletionPipeline {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        audit: Arc<dyn AuditSink>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fs,
            audit,
            settings,
        }
    }

    /// Drain `candidates` through the worker pool. Returns once enumeration is
    /// exhausted, the queue is empty and every worker has exited.
    pub async fn run(
        &self,
        candidates: CandidateEnumerator,
        stats: Arc<RunStats>,
        touched: Arc<TouchedDirectories>,
        cancel: CancellationToken,
    ) -> PipelineOutcome {
        let (tx, rx) = mpsc::channel::<FileCandidate>(self.settings.queue_high_water);
        let queue: SharedQueue = Arc::new(Mutex::new(rx));
        let processed = Arc::new(AtomicU64::new(0));

        info!(
            workers = self.settings.workers,
            queue_high_water = self.settings.queue_high_water,
            max_attempts = self.settings.retry.max_attempts(),
            dry_run = self.settings.dry_run,
            "Starting deletion pipeline"
        );

        let producer = spawn_producer(
            candidates,
            tx,
            self.settings.backpressure_delay,
            cancel.clone(),
        );

        let mut workers = JoinSet::new();
        for id in 0..self.settings.workers {
            let worker = Worker {
                id,
                queue: queue.clone(),
                fs: self.fs.clone(),
                audit: self.audit.clone(),
                stats: stats.clone(),
                touched: touched.clone(),
                retry: self.settings.retry,
                dry_run: self.settings.dry_run,
                quiet: self.settings.quiet,
                processed: processed.clone(),
                cancel: cancel.clone(),
            };
            workers.spawn(worker.run());
        }
        // workers own the receiver now; if they all exit the producer sees
        // a closed queue instead of waiting on backpressure forever
        drop(queue);

        let produced = match producer.await {
            Ok(produced) => produced,
            Err(e) => {
                error!(error = %e, "Candidate producer failed");
                Produced::default()
            }
        };
        let enqueued = produced.enqueued;

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Deletion worker failed");
            }
        }

        let processed = processed.load(Ordering::Relaxed);
        let skipped = enqueued.saturating_sub(processed) + produced.abandoned;
        if skipped > 0 {
            stats.record_skipped(skipped);
            warn!(skipped, "Queued candidates skipped after cancellation");
        }

        PipelineOutcome {
            enqueued,
            processed,
            skipped,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Produced {
    enqueued: u64,
    /// Counted by the enumerator but never enqueued because the producer
    /// stopped while holding it
    abandoned: u64,
}

/// Enumeration runs on a blocking thread. When the queue is at its
/// high-water mark the producer sleeps and retries.
fn spawn_producer(
    candidates: CandidateEnumerator,
    tx: mpsc::Sender<FileCandidate>,
    backpressure_delay: Duration,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<Produced> {
    tokio::task::spawn_blocking(move || {
        let mut produced = Produced::default();

        'candidates: for candidate in candidates {
            let mut pending = candidate;
            loop {
                if cancel.is_cancelled() {
                    produced.abandoned += 1;
                    break 'candidates;
                }
                match tx.try_send(pending) {
                    Ok(()) => {
                        produced.enqueued += 1;
                        break;
                    }
                    Err(TrySendError::Full(returned)) => {
                        pending = returned;
                        std::thread::sleep(backpressure_delay);
                    }
                    Err(TrySendError::Closed(_)) => {
                        warn!("Deletion queue closed before enumeration finished");
                        produced.abandoned += 1;
                        break 'candidates;
                    }
                }
            }
        }

        debug!(
            enqueued = produced.enqueued,
            abandoned = produced.abandoned,
            "Enumeration finished"
        );
        // dropping `tx` here is the completion signal for the workers
        produced
    })
}

struct Worker {
    id: usize,
    queue: SharedQueue,
    fs: Arc<dyn FileSystem>,
    audit: Arc<dyn AuditSink>,
    stats: Arc<RunStats>,
    touched: Arc<TouchedDirectories>,
    retry: RetryPolicy,
    dry_run: bool,
    quiet: bool,
    processed: Arc<AtomicU64>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) {
        loop {
            let next = {
                let mut queue = self.queue.lock().await;
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => None,
                    // None only once the producer is gone and the queue is empty
                    item = queue.recv() => item,
                }
            };

            let Some(candidate) = next else {
                break;
            };

            self.process(candidate).await;
            self.processed.fetch_add(1, Ordering::Relaxed);
        }
        debug!(worker = self.id, "Deletion worker exiting");
    }

    async fn process(&self, candidate: FileCandidate) {
        if self.dry_run {
            self.log_file(&candidate, "Would delete file");
            self.audit
                .record_attempt(&AuditRecord::dry_run(
                    candidate.path.clone(),
                    candidate.size_bytes,
                ))
                .await;
            return;
        }

        let mut attempt = 1;
        loop {
            match self.fs.remove_file(&candidate.path).await {
                Ok(()) => {
                    self.stats.record_deleted(candidate.size_bytes);
                    if let Some(parent) = candidate.parent_dir() {
                        self.touched.insert(parent);
                    }
                    self.log_file(&candidate, "Deleted file");
                    self.audit
                        .record_attempt(&AuditRecord::success(
                            candidate.path.clone(),
                            candidate.size_bytes,
                            attempt,
                        ))
                        .await;
                    return;
                }
                Err(e) => {
                    self.audit
                        .record_attempt(&AuditRecord::failed(
                            candidate.path.clone(),
                            candidate.size_bytes,
                            attempt,
                            e.to_string(),
                        ))
                        .await;

                    if !e.is_retryable() || !self.retry.has_attempts_after(attempt) {
                        self.stats.record_failed();
                        let terminal = DomainError::DeletionTerminal {
                            path: candidate.path.display().to_string(),
                            reason: e.to_string(),
                            attempts: attempt,
                        };
                        warn!(worker = self.id, error = %terminal, "Giving up on file");
                        return;
                    }

                    let delay = self.retry.delay_for_attempt(attempt);
                    let transient = DomainError::DeletionTransient {
                        path: candidate.path.display().to_string(),
                        reason: e.to_string(),
                    };
                    debug!(
                        worker = self.id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %transient,
                        "Retrying deletion"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn log_file(&self, candidate: &FileCandidate, message: &'static str) {
        if self.quiet {
            debug!(
                worker = self.id,
                path = %candidate.path.display(),
                size_bytes = candidate.size_bytes,
                "{message}"
            );
        } else {
            info!(
                worker = self.id,
                path = %candidate.path.display(),
                size_bytes = candidate.size_bytes,
                "{message}"
            );
        }
    }
}
