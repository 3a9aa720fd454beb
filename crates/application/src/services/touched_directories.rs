use dashmap::DashSet;
use std::path::{Path, PathBuf};

/// Directories from which at least one file was deleted during this run.
/// Workers add concurrently; the reclaimer reads it after the pipeline join.
#[derive(Default)]
pub struct TouchedDirectories {
    dirs: DashSet<PathBuf>,
}

impl TouchedDirectories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn insert(&self, dir: &Path) {
        if !self.dirs.contains(dir) {
            self.dirs.insert(dir.to_path_buf());
        }
    }

    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.contains(dir)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn snapshot(&self) -> Vec<PathBuf> {
        self.dirs.iter().map(|d| d.key().clone()).collect()
    }
}
