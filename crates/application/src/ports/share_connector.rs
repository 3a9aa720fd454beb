use archive_retention_domain::{DomainError, ShareCredential};
use async_trait::async_trait;
use std::path::Path;

/// An established connection to a network share.
pub trait ShareSession: Send + Sync {
    /// Local path under which the share is reachable
    fn root(&self) -> &Path;

    /// Tear the connection down. Must be safe to call more than once.
    fn disconnect(&mut self) -> Result<(), DomainError>;
}

#[async_trait]
pub trait ShareConnector: Send + Sync {
    async fn connect(&self, credential: &ShareCredential)
        -> Result<Box<dyn ShareSession>, DomainError>;
}
