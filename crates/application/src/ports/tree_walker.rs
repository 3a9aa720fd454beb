use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum WalkEntry {
    File {
        path: PathBuf,
        size_bytes: u64,
        modified: DateTime<Utc>,
    },
    /// A subtree (or single entry) that could not be read and was skipped.
    SubtreeError { path: PathBuf, reason: String },
}

/// Streaming directory walk. The iterator must yield entries as it goes and
/// must not collect the whole tree first.
pub trait TreeWalker: Send + Sync {
    fn walk(&self, root: &Path) -> Box<dyn Iterator<Item = WalkEntry> + Send>;
}
