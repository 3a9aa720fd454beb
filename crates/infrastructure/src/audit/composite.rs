use archive_retention_application::ports::AuditSink;
use archive_retention_domain::{AuditRecord, ProgressRecord, RunSummary};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

/// Fans every record out to all inner sinks.
#[derive(Default)]
pub struct CompositeAuditSink {
    sinks: Vec<Arc<dyn AuditSink>>,
}

impl CompositeAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl AuditSink for CompositeAuditSink {
    async fn record_attempt(&self, record: &AuditRecord) {
        join_all(self.sinks.iter().map(|s| s.record_attempt(record))).await;
    }

    async fn record_progress(&self, progress: &ProgressRecord) {
        join_all(self.sinks.iter().map(|s| s.record_progress(progress))).await;
    }

    async fn record_summary(&self, summary: &RunSummary) {
        join_all(self.sinks.iter().map(|s| s.record_summary(summary))).await;
    }
}
