use archive_retention_application::ports::AuditSink;
use archive_retention_domain::{AuditRecord, DeletionOutcome, ProgressRecord, RunSummary};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Mirrors audit records into the log under the `audit` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record_attempt(&self, record: &AuditRecord) {
        let path = record.path.display();
        match record.outcome {
            DeletionOutcome::Success => debug!(
                target: "audit",
                %path,
                size_bytes = record.size_bytes,
                attempt = record.attempt,
                "deleted"
            ),
            DeletionOutcome::DryRun => debug!(
                target: "audit",
                %path,
                size_bytes = record.size_bytes,
                "would delete"
            ),
            DeletionOutcome::Failed => warn!(
                target: "audit",
                %path,
                size_bytes = record.size_bytes,
                attempt = record.attempt,
                error = record.error.as_deref().unwrap_or("unknown"),
                "deletion attempt failed"
            ),
        }
    }

    async fn record_progress(&self, progress: &ProgressRecord) {
        debug!(
            target: "audit",
            scanned = progress.scanned,
            candidates = progress.candidates,
            deleted = progress.deleted,
            failed = progress.failed,
            "progress"
        );
    }

    async fn record_summary(&self, summary: &RunSummary) {
        info!(
            target: "audit",
            dry_run = summary.dry_run,
            cancelled = summary.cancelled,
            candidates = summary.candidates,
            deleted = summary.deleted,
            failed = summary.failed,
            skipped = summary.skipped,
            bytes_freed = summary.bytes_freed,
            "run summary"
        );
    }
}
