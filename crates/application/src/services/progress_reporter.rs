use super::RunStats;
use crate::ports::AuditSink;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Samples the run counters on an interval and forwards them to the audit
/// sink. Runs on its own task so enumeration never waits on it.
pub struct ProgressReporter {
    stop: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// `None` interval disables reporting.
    pub fn start(
        interval: Option<Duration>,
        stats: Arc<RunStats>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        let stop = CancellationToken::new();
        let handle = interval.filter(|i| !i.is_zero()).map(|period| {
            let stop = stop.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                // first tick fires immediately
                ticker.tick().await;
                loop {
                    tokio::select! {
                        _ = stop.cancelled() => break,
                        _ = ticker.tick() => {
                            let progress = stats.progress();
                            info!(
                                scanned = progress.scanned,
                                candidates = progress.candidates,
                                deleted = progress.deleted,
                                failed = progress.failed,
                                "Progress"
                            );
                            audit.record_progress(&progress).await;
                        }
                    }
                }
            })
        });

        Self { stop, handle }
    }

    pub async fn stop(mut self) {
        self.stop.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
