use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A file selected by the retention policy as eligible for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
}

impl FileCandidate {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            modified,
        }
    }

    pub fn parent_dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}
