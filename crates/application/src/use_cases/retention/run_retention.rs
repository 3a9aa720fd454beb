use crate::ports::{AuditSink, FileSystem, LockStore, ProcessProbe, TreeWalker};
use crate::services::{
    CandidateEnumerator, DeletionPipeline, DirectoryReclaimer, ExecutionLock, PathResolver,
    PipelineSettings, ProgressReporter, RunStats, TouchedDirectories,
};
use archive_retention_domain::{DomainError, RunReport, RunSettings, RunSummary};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Use case: one retention run against one target.
///
/// Resolve target -> acquire lock -> stream candidates through the deletion
/// pipeline -> reclaim empty directories -> emit summary -> release lock.
/// Only an unreachable target or a held lock abort the run; everything else
/// is isolated to its file or subtree.
pub struct RunRetentionUseCase {
    resolver: PathResolver,
    lock_store: Arc<dyn LockStore>,
    probe: Arc<dyn ProcessProbe>,
    walker: Arc<dyn TreeWalker>,
    fs: Arc<dyn FileSystem>,
    audit: Arc<dyn AuditSink>,
}

impl RunRetentionUseCase {
    pub fn new(
        resolver: PathResolver,
        lock_store: Arc<dyn LockStore>,
        probe: Arc<dyn ProcessProbe>,
        walker: Arc<dyn TreeWalker>,
        fs: Arc<dyn FileSystem>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            resolver,
            lock_store,
            probe,
            walker,
            fs,
            audit,
        }
    }

    pub async fn execute(&self, settings: &RunSettings, cancel: CancellationToken) -> RunReport {
        let stats = Arc::new(RunStats::new());

        info!(
            target = %settings.target,
            retention = %settings.period,
            cutoff = %settings.policy.cutoff(),
            mode = if settings.dry_run { "DRY-RUN" } else { "EXECUTE" },
            workers = settings.workers,
            "Starting retention run"
        );

        let target = match self.resolver.resolve(&settings.target).await {
            Ok(target) => target,
            Err(e) => return self.abort(&stats, settings, e).await,
        };

        let lock = ExecutionLock::new(
            self.lock_store.clone(),
            self.probe.clone(),
            settings.lock.clone(),
        );
        let guard = match lock.acquire(target.root()) {
            Ok(guard) => guard,
            Err(e) => {
                target.release();
                return self.abort(&stats, settings, e).await;
            }
        };

        if target.is_network_share() && settings.workers == 1 {
            warn!("Sequential processing against a network share; expect low throughput");
        }

        self.run_locked(target.root(), settings, &stats, &cancel)
            .await;

        let summary = stats.summary(settings.dry_run, cancel.is_cancelled());
        self.emit_summary(&summary).await;

        guard.release();
        target.release();

        RunReport::completed(summary)
    }

    async fn run_locked(
        &self,
        root: &Path,
        settings: &RunSettings,
        stats: &Arc<RunStats>,
        cancel: &CancellationToken,
    ) {
        let touched = Arc::new(TouchedDirectories::new());
        let candidates = CandidateEnumerator::new(
            self.walker.walk(root),
            settings.policy.clone(),
            stats.clone(),
            cancel.clone(),
        );

        let reporter =
            ProgressReporter::start(settings.progress_interval, stats.clone(), self.audit.clone());

        let pipeline = DeletionPipeline::new(
            self.fs.clone(),
            self.audit.clone(),
            PipelineSettings::from(settings),
        );
        let outcome = pipeline
            .run(candidates, stats.clone(), touched.clone(), cancel.clone())
            .await;

        reporter.stop().await;

        info!(
            enqueued = outcome.enqueued,
            processed = outcome.processed,
            skipped = outcome.skipped,
            touched_directories = touched.len(),
            "Deletion phase finished"
        );

        if settings.dry_run {
            return;
        }
        DirectoryReclaimer::new(self.fs.clone())
            .reclaim(root, &touched, stats)
            .await;
    }

    async fn abort(
        &self,
        stats: &RunStats,
        settings: &RunSettings,
        error: DomainError,
    ) -> RunReport {
        error!(error = %error, "Retention run aborted before processing");
        let summary = stats.summary(settings.dry_run, false);
        self.emit_summary(&summary).await;
        RunReport::aborted(summary, error)
    }

    async fn emit_summary(&self, summary: &RunSummary) {
        info!(
            mode = if summary.dry_run { "DRY-RUN" } else { "EXECUTE" },
            scanned = summary.scanned,
            candidates = summary.candidates,
            deleted = summary.deleted,
            failed = summary.failed,
            skipped = summary.skipped,
            bytes_freed = summary.bytes_freed,
            projected_bytes = summary.projected_bytes,
            directories_removed = summary.directories_removed,
            subtree_errors = summary.subtree_errors,
            elapsed_secs = summary.elapsed.as_secs_f64(),
            files_per_sec = summary.files_per_sec(),
            cancelled = summary.cancelled,
            "Retention run completed"
        );
        self.audit.record_summary(summary).await;
    }
}
