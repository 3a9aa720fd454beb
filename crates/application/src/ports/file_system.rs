use archive_retention_domain::DomainError;
use async_trait::async_trait;
use std::path::Path;

/// Mutating filesystem operations used by the deletion pipeline and the
/// directory reclaimer.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Delete a single file. A missing file maps to `DomainError::NotFound`.
    async fn remove_file(&self, path: &Path) -> Result<(), DomainError>;

    /// Remove an empty directory (never recursive).
    async fn remove_dir(&self, path: &Path) -> Result<(), DomainError>;

    /// Whether the path exists and is a directory.
    async fn is_dir(&self, path: &Path) -> Result<bool, DomainError>;

    /// Whether a directory currently has no entries.
    async fn is_dir_empty(&self, path: &Path) -> Result<bool, DomainError>;
}
