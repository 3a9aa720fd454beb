use archive_retention_domain::{AuditRecord, ProgressRecord, RunSummary};
use async_trait::async_trait;

/// Append-only consumer of the audit trail. Implementations log their own
/// failures; a broken sink never aborts a run.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// One record per deletion attempt
    async fn record_attempt(&self, record: &AuditRecord);

    /// Periodic cumulative progress
    async fn record_progress(&self, progress: &ProgressRecord);

    /// Run-level summary, emitted exactly once per run
    async fn record_summary(&self, summary: &RunSummary);
}
