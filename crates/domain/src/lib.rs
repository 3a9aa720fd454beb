//! Archive Retention Domain Layer
pub mod audit;
pub mod candidate;
pub mod config;
pub mod errors;
pub mod lock;
pub mod policy;
pub mod retry;
pub mod summary;
pub mod target;

pub use audit::{AuditRecord, DeletionOutcome, ProgressRecord};
pub use candidate::FileCandidate;
pub use config::{CliOverrides, Config, RunSettings};
pub use errors::DomainError;
pub use lock::LockRecord;
pub use policy::{ExtensionFilter, RetentionPeriod, RetentionPolicy};
pub use retry::RetryPolicy;
pub use summary::{RunReport, RunSummary};
pub use target::{Secret, ShareCredential, TargetSpec};
