use archive_retention_domain::{DomainError, LockRecord};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockCreation {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockRead {
    Missing,
    Present(LockRecord),
    /// A lock file exists but its contents cannot be parsed
    Corrupt(String),
}

/// Persistence of lock records, one per target root. Synchronous so the
/// release path can run from `Drop`.
pub trait LockStore: Send + Sync {
    /// Create the record for `record.target_root` atomically; never
    /// overwrites an existing one.
    fn try_create(&self, record: &LockRecord) -> Result<LockCreation, DomainError>;

    fn read(&self, root: &Path) -> Result<LockRead, DomainError>;

    /// Remove the record. Removing an absent record is not an error.
    fn remove(&self, root: &Path) -> Result<(), DomainError>;
}
