use archive_retention_domain::{ProgressRecord, RunSummary};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Run counters shared by the enumerator and every deletion worker.
/// All updates are single atomic increments.
pub struct RunStats {
    pub scanned: AtomicU64,
    pub candidates: AtomicU64,
    pub projected_bytes: AtomicU64,
    pub deleted: AtomicU64,
    pub failed: AtomicU64,
    pub skipped: AtomicU64,
    pub bytes_freed: AtomicU64,
    pub directories_removed: AtomicU64,
    pub subtree_errors: AtomicU64,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            scanned: AtomicU64::new(0),
            candidates: AtomicU64::new(0),
            projected_bytes: AtomicU64::new(0),
            deleted: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            bytes_freed: AtomicU64::new(0),
            directories_removed: AtomicU64::new(0),
            subtree_errors: AtomicU64::new(0),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn record_scanned(&self) {
        self.scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_candidate(&self, size_bytes: u64) {
        self.candidates.fetch_add(1, Ordering::Relaxed);
        self.projected_bytes.fetch_add(size_bytes, Ordering::Relaxed);
    }

    pub fn record_deleted(&self, size_bytes: u64) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
        self.bytes_freed.fetch_add(size_bytes, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self, count: u64) {
        self.skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_directory_removed(&self) {
        self.directories_removed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subtree_error(&self) {
        self.subtree_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn progress(&self) -> ProgressRecord {
        ProgressRecord {
            scanned: self.scanned.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    pub fn summary(&self, dry_run: bool, cancelled: bool) -> RunSummary {
        RunSummary {
            started_at: self.started_at,
            elapsed: self.started.elapsed(),
            dry_run,
            cancelled,
            scanned: self.scanned.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            bytes_freed: self.bytes_freed.load(Ordering::Relaxed),
            projected_bytes: self.projected_bytes.load(Ordering::Relaxed),
            directories_removed: self.directories_removed.load(Ordering::Relaxed),
            subtree_errors: self.subtree_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
