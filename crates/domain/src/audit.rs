use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionOutcome {
    Success,
    Failed,
    /// Dry-run: the file would have been deleted.
    DryRun,
}

/// One record per deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub timestamp: DateTime<Utc>,
    pub path: PathBuf,
    pub outcome: DeletionOutcome,
    pub size_bytes: u64,
    pub attempt: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditRecord {
    pub fn success(path: PathBuf, size_bytes: u64, attempt: u32) -> Self {
        Self::build(path, DeletionOutcome::Success, size_bytes, attempt, None)
    }

    pub fn failed(path: PathBuf, size_bytes: u64, attempt: u32, error: String) -> Self {
        Self::build(path, DeletionOutcome::Failed, size_bytes, attempt, Some(error))
    }

    pub fn dry_run(path: PathBuf, size_bytes: u64) -> Self {
        Self::build(path, DeletionOutcome::DryRun, size_bytes, 1, None)
    }

    fn build(
        path: PathBuf,
        outcome: DeletionOutcome,
        size_bytes: u64,
        attempt: u32,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            path,
            outcome,
            size_bytes,
            attempt,
            error,
        }
    }
}

/// Periodic cumulative progress signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub scanned: u64,
    pub candidates: u64,
    pub deleted: u64,
    pub failed: u64,
}
