use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Persisted owner of a run against one target root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub owner_host: String,
    pub owner_pid: u32,
    pub acquired_at: DateTime<Utc>,
    pub target_root: PathBuf,
}

impl LockRecord {
    pub fn new(
        owner_host: impl Into<String>,
        owner_pid: u32,
        acquired_at: DateTime<Utc>,
        target_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            owner_host: owner_host.into(),
            owner_pid,
            acquired_at,
            target_root: target_root.into(),
        }
    }

    /// A record older than the maximum run duration is stale no matter who
    /// owns it.
    pub fn is_expired(&self, now: DateTime<Utc>, max_run_duration: Duration) -> bool {
        match (now - self.acquired_at).to_std() {
            Ok(age) => age > max_run_duration,
            // acquired_at lies in the future (clock skew between hosts)
            Err(_) => false,
        }
    }

    pub fn is_owned_by(&self, host: &str, pid: u32) -> bool {
        self.owner_pid == pid && self.owner_host.eq_ignore_ascii_case(host)
    }
}
