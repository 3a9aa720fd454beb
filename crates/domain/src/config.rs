pub mod audit;
pub mod credentials;
pub mod errors;
pub mod execution;
pub mod lock;
pub mod logging;
pub mod retention;
pub mod root;
pub mod schedule;
pub mod settings;
pub mod target;

pub use audit::AuditConfig;
pub use credentials::{ConnectorKind, CredentialsConfig};
pub use errors::ConfigError;
pub use execution::ExecutionConfig;
pub use lock::LockConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use retention::RetentionConfig;
pub use root::{CliOverrides, Config};
pub use schedule::ScheduleConfig;
pub use settings::{LockSettings, RunSettings, DEFAULT_SHARE_WORKERS, MAX_WORKERS};
pub use target::TargetConfig;
