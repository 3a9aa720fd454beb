use archive_retention_domain::{DomainError, ShareCredential};
use async_trait::async_trait;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up connection material for a named target.
    /// Returns `DomainError::CredentialNotFound` when the name is unknown.
    async fn resolve(&self, target_name: &str) -> Result<ShareCredential, DomainError>;
}
