use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExecutionConfig {
    /// Report only; nothing is deleted unless this is false
    #[serde(default = "default_true")]
    pub dry_run: bool,

    /// Deletion workers. Unset means 1 for local targets, 8 for shares.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Force a single worker even for network shares
    #[serde(default)]
    pub sequential: bool,

    #[serde(default = "default_queue_high_water")]
    pub queue_high_water: usize,

    #[serde(default = "default_backpressure_delay_ms")]
    pub backpressure_delay_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// 0 disables progress reporting
    #[serde(default = "default_progress_interval_secs")]
    pub progress_interval_secs: u64,

    /// Log per-file successes at debug instead of info
    #[serde(default)]
    pub quiet: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            workers: None,
            sequential: false,
            queue_high_water: default_queue_high_water(),
            backpressure_delay_ms: default_backpressure_delay_ms(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            progress_interval_secs: default_progress_interval_secs(),
            quiet: false,
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_queue_high_water() -> usize {
    10_000
}
fn default_backpressure_delay_ms() -> u64 {
    50
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    500
}
fn default_progress_interval_secs() -> u64 {
    30
}
