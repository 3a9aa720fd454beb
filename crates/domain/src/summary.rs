use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Final report of a run. Always produced, also on early abort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub dry_run: bool,
    pub cancelled: bool,
    pub scanned: u64,
    pub candidates: u64,
    pub deleted: u64,
    pub failed: u64,
    pub skipped: u64,
    pub bytes_freed: u64,
    pub projected_bytes: u64,
    pub directories_removed: u64,
    pub subtree_errors: u64,
}

impl RunSummary {
    pub fn empty(started_at: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            started_at,
            elapsed: Duration::ZERO,
            dry_run,
            cancelled: false,
            scanned: 0,
            candidates: 0,
            deleted: 0,
            failed: 0,
            skipped: 0,
            bytes_freed: 0,
            projected_bytes: 0,
            directories_removed: 0,
            subtree_errors: 0,
        }
    }

    /// Files processed per second (scanned files for a dry-run, deleted
    /// files otherwise).
    pub fn files_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        let processed = if self.dry_run { self.scanned } else { self.deleted };
        processed as f64 / secs
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub fatal: Option<DomainError>,
}

impl RunReport {
    pub fn completed(summary: RunSummary) -> Self {
        Self {
            summary,
            fatal: None,
        }
    }

    pub fn aborted(summary: RunSummary, error: DomainError) -> Self {
        Self {
            summary,
            fatal: Some(error),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.fatal.is_none() && self.summary.failed == 0 && !self.summary.cancelled
    }

    /// 0 on a clean run, 2 when the run never started, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.fatal.is_some() {
            2
        } else if self.is_clean() {
            0
        } else {
            1
        }
    }
}
