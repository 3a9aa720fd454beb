use super::RunStats;
use crate::ports::WalkEntry;
use archive_retention_domain::{FileCandidate, RetentionPolicy};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Lazy, finite, non-restartable stream of candidates over a tree walk.
///
/// Every visited file counts towards `scanned`; only files the policy
/// selects are yielded. Unreadable subtrees are logged and skipped.
/// Cancellation ends the stream at the next entry.
pub struct CandidateEnumerator {
    entries: Box<dyn Iterator<Item = WalkEntry> + Send>,
    policy: RetentionPolicy,
    stats: Arc<RunStats>,
    cancel: CancellationToken,
}

impl CandidateEnumerator {
    pub fn new(
        entries: Box<dyn Iterator<Item = WalkEntry> + Send>,
        policy: RetentionPolicy,
        stats: Arc<RunStats>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            entries,
            policy,
            stats,
            cancel,
        }
    }
}

impl Iterator for CandidateEnumerator {
    type Item = FileCandidate;

    fn next(&mut self) -> Option<FileCandidate> {
        loop {
            if self.cancel.is_cancelled() {
                debug!("Enumeration stopped by cancellation");
                return None;
            }

            match self.entries.next()? {
                WalkEntry::File {
                    path,
                    size_bytes,
                    modified,
                } => {
                    self.stats.record_scanned();
                    if self.policy.selects(&path, modified) {
                        self.stats.record_candidate(size_bytes);
                        return Some(FileCandidate::new(path, size_bytes, modified));
                    }
                }
                WalkEntry::SubtreeError { path, reason } => {
                    self.stats.record_subtree_error();
                    warn!(path = %path.display(), reason = %reason, "Skipping unreadable subtree");
                }
            }
        }
    }
}
