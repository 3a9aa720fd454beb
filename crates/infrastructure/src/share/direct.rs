use archive_retention_application::ports::{ShareConnector, ShareSession};
use archive_retention_domain::{DomainError, ShareCredential};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// For shares that are already reachable as a path: pre-mounted, or a UNC
/// path the OS resolves with the service account's own identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectShareConnector;

impl DirectShareConnector {
    pub fn new() -> Self {
        Self
    }
}

struct DirectSession {
    root: PathBuf,
}

impl ShareSession for DirectSession {
    fn root(&self) -> &Path {
        &self.root
    }

    fn disconnect(&mut self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl ShareConnector for DirectShareConnector {
    async fn connect(
        &self,
        credential: &ShareCredential,
    ) -> Result<Box<dyn ShareSession>, DomainError> {
        debug!(share = %credential.share_path, "Using share path directly");
        Ok(Box::new(DirectSession {
            root: PathBuf::from(&credential.share_path),
        }))
    }
}
