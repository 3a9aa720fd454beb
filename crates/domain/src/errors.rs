use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Target unreachable: {0}")]
    UnreachableTarget(String),

    #[error("Another run holds the lock (host {owner_host}, pid {owner_pid}, since {acquired_at})")]
    ConcurrentRunRejected {
        owner_host: String,
        owner_pid: u32,
        acquired_at: DateTime<Utc>,
    },

    #[error("Subtree skipped at {path}: {reason}")]
    EnumerationSubtree { path: String, reason: String },

    #[error("Transient deletion failure for {path}: {reason}")]
    DeletionTransient { path: String, reason: String },

    #[error("Deletion failed for {path} after {attempts} attempt(s): {reason}")]
    DeletionTerminal {
        path: String,
        reason: String,
        attempts: u32,
    },

    #[error("Could not reclaim directory {path}: {reason}")]
    DirectoryReclaim { path: String, reason: String },

    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Lock store error: {0}")]
    LockStore(String),

    #[error("Invalid retention period: {0}")]
    InvalidRetention(String),
}

impl DomainError {
    /// Only the pre-run conditions abort a whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::UnreachableTarget(_) | DomainError::ConcurrentRunRejected { .. }
        )
    }

    /// Whether a failed filesystem operation is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DomainError::NotFound(_))
    }

    pub fn from_io(path: &std::path::Path, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => DomainError::NotFound(path.display().to_string()),
            _ => DomainError::IoError(format!("{}: {}", path.display(), err)),
        }
    }
}
