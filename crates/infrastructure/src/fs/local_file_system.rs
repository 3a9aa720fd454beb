use archive_retention_application::ports::FileSystem;
use archive_retention_domain::DomainError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// `FileSystem` over the host filesystem (local disk or a mounted share).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn remove_file(&self, path: &Path) -> Result<(), DomainError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                // read-only attribute: clear it once and try again
                if clear_readonly(path).await {
                    debug!(path = %path.display(), "Cleared read-only flag");
                    fs::remove_file(path)
                        .await
                        .map_err(|e| DomainError::from_io(path, &e))
                } else {
                    Err(DomainError::from_io(path, &e))
                }
            }
            Err(e) => Err(DomainError::from_io(path, &e)),
        }
    }

    async fn remove_dir(&self, path: &Path) -> Result<(), DomainError> {
        fs::remove_dir(path)
            .await
            .map_err(|e| DomainError::from_io(path, &e))
    }

    async fn is_dir(&self, path: &Path) -> Result<bool, DomainError> {
        match fs::metadata(path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::from_io(path, &e)),
        }
    }

    async fn is_dir_empty(&self, path: &Path) -> Result<bool, DomainError> {
        let mut entries = fs::read_dir(path)
            .await
            .map_err(|e| DomainError::from_io(path, &e))?;
        let first = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::from_io(path, &e))?;
        Ok(first.is_none())
    }
}

async fn clear_readonly(path: &Path) -> bool {
    let Ok(meta) = fs::symlink_metadata(path).await else {
        return false;
    };
    let mut permissions = meta.permissions();
    if !permissions.readonly() {
        return false;
    }
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_remove_file_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.lca");
        std::fs::write(&file, b"data").unwrap();

        let fs = LocalFileSystem::new();
        fs.remove_file(&file).await.unwrap();
        assert!(!file.exists());

        let again = fs.remove_file(&file).await;
        assert!(matches!(again, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_dir_checks() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();

        let fs = LocalFileSystem::new();
        assert!(fs.is_dir(dir.path()).await.unwrap());
        assert!(!fs.is_dir(&dir.path().join("missing")).await.unwrap());
        assert!(!fs.is_dir_empty(dir.path()).await.unwrap());
        assert!(fs.is_dir_empty(&sub).await.unwrap());

        fs.remove_dir(&sub).await.unwrap();
        assert!(!sub.exists());
    }

    #[tokio::test]
    async fn test_remove_dir_refuses_non_empty() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("x"), b"x").unwrap();

        let result = LocalFileSystem::new().remove_dir(&sub).await;
        assert!(matches!(result, Err(DomainError::IoError(_))));
        assert!(sub.exists());
    }
}
