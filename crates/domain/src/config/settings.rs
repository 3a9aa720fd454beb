use crate::policy::{RetentionPeriod, RetentionPolicy};
use crate::retry::RetryPolicy;
use crate::target::TargetSpec;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on deletion workers, to protect the remote server.
pub const MAX_WORKERS: usize = 16;

/// Worker count used for network shares when none is configured.
pub const DEFAULT_SHARE_WORKERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockSettings {
    pub directory: Option<PathBuf>,
    pub max_run_duration: Duration,
    pub force_clear: bool,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            directory: None,
            max_run_duration: Duration::from_secs(24 * 3600),
            force_clear: false,
        }
    }
}

/// Everything one run needs, passed explicitly to each component.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub target: TargetSpec,
    pub period: RetentionPeriod,
    pub policy: RetentionPolicy,
    pub dry_run: bool,
    pub workers: usize,
    pub queue_high_water: usize,
    pub backpressure_delay: Duration,
    pub retry: RetryPolicy,
    pub progress_interval: Option<Duration>,
    pub quiet: bool,
    pub lock: LockSettings,
}

impl RunSettings {
    /// Settings with defaults for everything except target and policy.
    pub fn new(target: TargetSpec, period: RetentionPeriod, policy: RetentionPolicy) -> Self {
        Self {
            target,
            period,
            policy,
            dry_run: true,
            workers: 1,
            queue_high_water: 10_000,
            backpressure_delay: Duration::from_millis(50),
            retry: RetryPolicy::default(),
            progress_interval: None,
            quiet: false,
            lock: LockSettings::default(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_queue_high_water(mut self, high_water: usize) -> Self {
        self.queue_high_water = high_water.max(1);
        self
    }

    pub fn with_lock(mut self, lock: LockSettings) -> Self {
        self.lock = lock;
        self
    }
}
