use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LockConfig {
    /// Directory holding lock files; system temp dir when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Age after which any lock record is considered stale
    #[serde(default = "default_max_run_duration_hours")]
    pub max_run_duration_hours: u64,

    /// Remove an existing lock record unconditionally before acquiring
    #[serde(default)]
    pub force_clear: bool,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            directory: None,
            max_run_duration_hours: default_max_run_duration_hours(),
            force_clear: false,
        }
    }
}

fn default_max_run_duration_hours() -> u64 {
    24
}
