use archive_retention_application::ports::{TreeWalker, WalkEntry};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Depth-first streaming walk with `walkdir`. Symlinks are not followed;
/// only regular files are yielded.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkdirTreeWalker;

impl WalkdirTreeWalker {
    pub fn new() -> Self {
        Self
    }
}

impl TreeWalker for WalkdirTreeWalker {
    fn walk(&self, root: &Path) -> Box<dyn Iterator<Item = WalkEntry> + Send> {
        let fallback = root.to_path_buf();
        let entries = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) if entry.file_type().is_file() => Some(file_entry(entry)),
                Ok(_) => None,
                Err(err) => {
                    let path = err
                        .path()
                        .map(PathBuf::from)
                        .unwrap_or_else(|| fallback.clone());
                    Some(WalkEntry::SubtreeError {
                        path,
                        reason: err.to_string(),
                    })
                }
            });
        Box::new(entries)
    }
}

fn file_entry(entry: DirEntry) -> WalkEntry {
    let metadata = match entry.metadata() {
        Ok(metadata) => metadata,
        Err(err) => {
            return WalkEntry::SubtreeError {
                path: entry.into_path(),
                reason: err.to_string(),
            }
        }
    };

    match metadata.modified() {
        Ok(modified) => WalkEntry::File {
            path: entry.into_path(),
            size_bytes: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
        },
        Err(err) => WalkEntry::SubtreeError {
            path: entry.into_path(),
            reason: err.to_string(),
        },
    }
}
