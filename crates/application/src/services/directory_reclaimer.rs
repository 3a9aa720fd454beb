use super::{RunStats, TouchedDirectories};
use crate::ports::FileSystem;
use archive_retention_domain::DomainError;
use std::collections::{BinaryHeap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Removes directories left empty by the deletion phase.
///
/// Only directories in the touched set, and ancestors that become empty
/// because a child directory was just removed, are considered. The root
/// itself and anything outside it are never removed. Deepest directories
/// go first so a parent can become eligible within the same pass.
pub struct DirectoryReclaimer {
    fs: Arc<dyn FileSystem>,
}

impl DirectoryReclaimer {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Must only be called after the deletion pipeline has joined.
    pub async fn reclaim(
        &self,
        root: &Path,
        touched: &TouchedDirectories,
        stats: &RunStats,
    ) -> u64 {
        let mut queue: BinaryHeap<(usize, PathBuf)> = BinaryHeap::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for dir in touched.snapshot() {
            if is_reclaimable(root, &dir) && seen.insert(dir.clone()) {
                queue.push((depth(&dir), dir));
            }
        }

        info!(directories = queue.len(), "Starting empty directory cleanup");

        let mut removed = 0u64;
        while let Some((_, dir)) = queue.pop() {
            match self.fs.is_dir_empty(&dir).await {
                Ok(true) => {}
                Ok(false) => {
                    debug!(path = %dir.display(), "Directory still has entries");
                    continue;
                }
                Err(DomainError::NotFound(_)) => continue,
                Err(e) => {
                    warn!(error = %reclaim_error(&dir, &e), "Skipping directory");
                    continue;
                }
            }

            if let Err(e) = self.fs.remove_dir(&dir).await {
                warn!(error = %reclaim_error(&dir, &e), "Skipping directory");
                continue;
            }

            removed += 1;
            stats.record_directory_removed();
            info!(path = %dir.display(), "Removed empty directory");

            if let Some(parent) = dir.parent() {
                if is_reclaimable(root, parent) && seen.insert(parent.to_path_buf()) {
                    queue.push((depth(parent), parent.to_path_buf()));
                }
            }
        }

        info!(removed, "Empty directory cleanup completed");
        removed
    }
}

fn is_reclaimable(root: &Path, dir: &Path) -> bool {
    dir != root && dir.starts_with(root)
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

fn reclaim_error(dir: &Path, cause: &DomainError) -> DomainError {
    DomainError::DirectoryReclaim {
        path: dir.display().to_string(),
        reason: cause.to_string(),
    }
}
