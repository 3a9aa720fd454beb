use archive_retention_application::ports::CredentialStore;
use archive_retention_domain::{DomainError, Secret, ShareCredential};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Credential store backed by a TOML file, one table per target name:
///
/// ```toml
/// [targets.nas]
/// share_path = "//nas01/archive"
/// principal = "CORP\\svc_retention"
/// secret = "..."
/// ```
///
/// The file is re-read on every lookup. On unix it must not be readable by
/// group or others.
pub struct TomlCredentialStore {
    path: PathBuf,
}

#[derive(Deserialize)]
struct CredentialFile {
    #[serde(default)]
    targets: HashMap<String, CredentialEntry>,
}

#[derive(Deserialize)]
struct CredentialEntry {
    share_path: String,
    principal: String,
    secret: String,
}

impl TomlCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<CredentialFile, DomainError> {
        check_permissions(&self.path).await?;

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::from_io(&self.path, &e))?;
        toml::from_str(&raw).map_err(|e| {
            DomainError::IoError(format!(
                "{}: invalid credential file: {}",
                self.path.display(),
                e.message()
            ))
        })
    }
}

#[async_trait]
impl CredentialStore for TomlCredentialStore {
    async fn resolve(&self, target_name: &str) -> Result<ShareCredential, DomainError> {
        let mut file = self.load().await?;
        let entry = file
            .targets
            .remove(target_name)
            .ok_or_else(|| DomainError::CredentialNotFound(target_name.to_string()))?;

        debug!(target = target_name, share = %entry.share_path, "Credential resolved");
        Ok(ShareCredential {
            share_path: entry.share_path,
            principal: entry.principal,
            secret: Secret::new(entry.secret),
        })
    }
}

#[cfg(unix)]
async fn check_permissions(path: &Path) -> Result<(), DomainError> {
    use std::os::unix::fs::PermissionsExt;

    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| DomainError::from_io(path, &e))?;
    let mode = meta.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(DomainError::IoError(format!(
            "{}: credential file is accessible by group or others (mode {:o}); chmod 600 it",
            path.display(),
            mode & 0o777
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
async fn check_permissions(_path: &Path) -> Result<(), DomainError> {
    Ok(())
}
