use crate::ports::{CredentialStore, FileSystem, ShareConnector, ShareSession};
use archive_retention_domain::{DomainError, TargetSpec};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// A reachable root directory, plus the share connection that makes it
/// reachable. The connection is torn down on `release` or on drop.
pub struct ResolvedTarget {
    root: PathBuf,
    session: Option<Box<dyn ShareSession>>,
}

impl ResolvedTarget {
    pub fn local(root: PathBuf) -> Self {
        Self {
            root,
            session: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_network_share(&self) -> bool {
        self.session.is_some()
    }

    pub fn release(mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            match session.disconnect() {
                Ok(()) => info!(root = %self.root.display(), "Share disconnected"),
                Err(e) => warn!(root = %self.root.display(), error = %e, "Share disconnect failed"),
            }
        }
    }
}

impl Drop for ResolvedTarget {
    fn drop(&mut self) {
        self.disconnect();
    }
}

pub struct PathResolver {
    credentials: Arc<dyn CredentialStore>,
    connector: Arc<dyn ShareConnector>,
    fs: Arc<dyn FileSystem>,
}

impl PathResolver {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        connector: Arc<dyn ShareConnector>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            credentials,
            connector,
            fs,
        }
    }

    /// Turn a target into a reachable root, or fail with `UnreachableTarget`.
    pub async fn resolve(&self, target: &TargetSpec) -> Result<ResolvedTarget, DomainError> {
        match target {
            TargetSpec::Local(path) => {
                self.ensure_directory(path).await?;
                Ok(ResolvedTarget::local(path.clone()))
            }
            TargetSpec::Share { credential } => {
                let material = self.credentials.resolve(credential).await.map_err(|e| {
                    DomainError::UnreachableTarget(format!("credential '{credential}': {e}"))
                })?;

                info!(
                    credential = %credential,
                    share = %material.share_path,
                    principal = %material.principal,
                    "Connecting to network share"
                );

                let session = self.connector.connect(&material).await.map_err(|e| {
                    DomainError::UnreachableTarget(format!("{}: {e}", material.share_path))
                })?;

                let resolved = ResolvedTarget {
                    root: session.root().to_path_buf(),
                    session: Some(session),
                };
                // dropping `resolved` on error disconnects the share again
                self.ensure_directory(resolved.root()).await?;
                Ok(resolved)
            }
        }
    }

    async fn ensure_directory(&self, path: &Path) -> Result<(), DomainError> {
        match self.fs.is_dir(path).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::UnreachableTarget(format!(
                "{} is not a directory",
                path.display()
            ))),
            Err(e) => Err(DomainError::UnreachableTarget(format!(
                "{}: {e}",
                path.display()
            ))),
        }
    }
}
