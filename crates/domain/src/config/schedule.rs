use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleConfig {
    /// Repeat the run every N seconds instead of running once
    #[serde(default)]
    pub interval_secs: Option<u64>,
}
