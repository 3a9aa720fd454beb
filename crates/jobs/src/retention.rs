use archive_retention_application::use_cases::RunRetentionUseCase;
use archive_retention_domain::{Config, RunReport};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const DEFAULT_INTERVAL_SECS: u64 = 86_400;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub runs: u64,
    /// Runs that did not exit cleanly (failures, cancellation or abort)
    pub unclean_runs: u64,
}

/// Runs retention against the configured target on a fixed interval until
/// shut down. The cutoff is recomputed from the current time on every run.
pub struct RetentionJob {
    use_case: Arc<RunRetentionUseCase>,
    config: Arc<Config>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl RetentionJob {
    pub fn new(use_case: Arc<RunRetentionUseCase>, config: Arc<Config>) -> Self {
        let interval_secs = config
            .schedule
            .interval_secs
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        Self {
            use_case,
            config,
            interval_secs,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// One run now. `None` when the configuration cannot produce settings.
    pub async fn run_once(&self) -> Option<RunReport> {
        let settings = match self.config.run_settings(Utc::now()) {
            Ok(settings) => settings,
            Err(e) => {
                error!(error = %e, "Cannot build run settings");
                return None;
            }
        };

        // shutdown also cancels the run in flight
        let report = self
            .use_case
            .execute(&settings, self.shutdown.child_token())
            .await;
        Some(report)
    }

    /// First run starts immediately. Returns once shutdown is requested.
    pub async fn start(self: Arc<Self>) -> ScheduleOutcome {
        info!(
            interval_secs = self.interval_secs,
            "Starting scheduled retention job"
        );

        let mut outcome = ScheduleOutcome::default();
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("RetentionJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    outcome.runs += 1;
                    match self.run_once().await {
                        Some(report) if report.is_clean() => {
                            info!(
                                run = outcome.runs,
                                deleted = report.summary.deleted,
                                bytes_freed = report.summary.bytes_freed,
                                "Scheduled retention run completed"
                            );
                        }
                        Some(report) => {
                            outcome.unclean_runs += 1;
                            warn!(
                                run = outcome.runs,
                                exit_code = report.exit_code(),
                                failed = report.summary.failed,
                                "Scheduled retention run did not complete cleanly"
                            );
                        }
                        None => outcome.unclean_runs += 1,
                    }
                }
            }
        }

        outcome
    }
}
