use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::audit::AuditConfig;
use super::credentials::CredentialsConfig;
use super::errors::ConfigError;
use super::execution::ExecutionConfig;
use super::lock::LockConfig;
use super::logging::LoggingConfig;
use super::retention::RetentionConfig;
use super::schedule::ScheduleConfig;
use super::settings::{LockSettings, RunSettings, DEFAULT_SHARE_WORKERS, MAX_WORKERS};
use super::target::TargetConfig;
use crate::policy::{ExtensionFilter, RetentionPeriod, RetentionPolicy};
use crate::retry::RetryPolicy;
use crate::target::TargetSpec;

const LOCAL_CONFIG_PATH: &str = "archive-retention.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/archive-retention/config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Directory or share to clean up
    #[serde(default)]
    pub target: TargetConfig,

    /// Age rule and extension filters
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Dry-run, workers, queue and retry tuning
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Single-instance execution lock
    #[serde(default)]
    pub lock: LockConfig,

    /// Audit trail sinks
    #[serde(default)]
    pub audit: AuditConfig,

    /// Credential store and share connector
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Periodic runs
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. archive-retention.toml in current directory
    /// 3. /etc/archive-retention/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(path) = overrides.archive_path {
            self.target.path = Some(path);
            self.target.credential = None;
        }
        if let Some(credential) = overrides.credential_target {
            self.target.credential = Some(credential);
            self.target.path = None;
        }
        if let Some(period) = overrides.retention {
            self.retention.period = Some(period);
        }
        if !overrides.include_extensions.is_empty() {
            self.retention.include_extensions = overrides.include_extensions;
        }
        if !overrides.exclude_extensions.is_empty() {
            self.retention.exclude_extensions = overrides.exclude_extensions;
        }
        if overrides.execute {
            self.execution.dry_run = false;
        }
        if let Some(workers) = overrides.workers {
            self.execution.workers = Some(workers);
        }
        if overrides.sequential {
            self.execution.sequential = true;
        }
        if let Some(secs) = overrides.progress_interval_secs {
            self.execution.progress_interval_secs = secs;
        }
        if overrides.quiet {
            self.execution.quiet = true;
        }
        if overrides.force_clear_lock {
            self.lock.force_clear = true;
        }
        if let Some(path) = overrides.audit_log {
            self.audit.path = Some(path);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(secs) = overrides.schedule_every_secs {
            self.schedule.interval_secs = Some(secs);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.target.path, &self.target.credential) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(
                    "Set either target.path or target.credential, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(ConfigError::Validation(
                    "No target configured (target.path or target.credential)".to_string(),
                ))
            }
            _ => {}
        }

        self.retention_period()?;

        if let Some(workers) = self.execution.workers {
            if workers == 0 || workers > MAX_WORKERS {
                return Err(ConfigError::Validation(format!(
                    "execution.workers must be between 1 and {MAX_WORKERS} (got {workers})"
                )));
            }
        }

        if self.execution.queue_high_water == 0 {
            return Err(ConfigError::Validation(
                "execution.queue_high_water cannot be 0".to_string(),
            ));
        }

        if self.execution.max_retries == 0 {
            return Err(ConfigError::Validation(
                "execution.max_retries must be at least 1".to_string(),
            ));
        }

        if self.lock.max_run_duration_hours == 0 {
            return Err(ConfigError::Validation(
                "lock.max_run_duration_hours cannot be 0".to_string(),
            ));
        }

        if matches!(self.schedule.interval_secs, Some(0)) {
            return Err(ConfigError::Validation(
                "schedule.interval_secs cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn target_spec(&self) -> Result<TargetSpec, ConfigError> {
        match (&self.target.path, &self.target.credential) {
            (Some(path), None) => Ok(TargetSpec::Local(path.clone())),
            (None, Some(credential)) => Ok(TargetSpec::Share {
                credential: credential.clone(),
            }),
            _ => Err(ConfigError::Validation(
                "Exactly one of target.path or target.credential must be set".to_string(),
            )),
        }
    }

    pub fn retention_period(&self) -> Result<RetentionPeriod, ConfigError> {
        let raw = self
            .retention
            .period
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("retention.period is required".to_string()))?;
        raw.parse()
            .map_err(|e: crate::DomainError| ConfigError::Validation(e.to_string()))
    }

    /// Worker count after applying the share default and the sequential switch.
    pub fn effective_workers(&self, target: &TargetSpec) -> usize {
        if self.execution.sequential {
            return 1;
        }
        match self.execution.workers {
            Some(workers) => workers.clamp(1, MAX_WORKERS),
            None if target.is_network_share() => DEFAULT_SHARE_WORKERS,
            None => 1,
        }
    }

    /// Build the explicit per-run settings, with the cutoff derived from `now`.
    pub fn run_settings(&self, now: DateTime<Utc>) -> Result<RunSettings, ConfigError> {
        let target = self.target_spec()?;
        let period = self.retention_period()?;
        let filter = ExtensionFilter::new(
            &self.retention.include_extensions,
            &self.retention.exclude_extensions,
        );
        let policy = RetentionPolicy::from_period(period, now, filter)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        let exec = &self.execution;
        let progress_interval =
            (exec.progress_interval_secs > 0).then(|| Duration::from_secs(exec.progress_interval_secs));

        Ok(RunSettings {
            workers: self.effective_workers(&target),
            target,
            period,
            policy,
            dry_run: exec.dry_run,
            queue_high_water: exec.queue_high_water.max(1),
            backpressure_delay: Duration::from_millis(exec.backpressure_delay_ms),
            retry: RetryPolicy::new(exec.max_retries, Duration::from_millis(exec.retry_delay_ms)),
            progress_interval,
            quiet: exec.quiet,
            lock: LockSettings {
                directory: self.lock.directory.clone(),
                max_run_duration: Duration::from_secs(self.lock.max_run_duration_hours * 3600),
                force_clear: self.lock.force_clear,
            },
        })
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub archive_path: Option<PathBuf>,
    pub credential_target: Option<String>,
    pub retention: Option<String>,
    pub include_extensions: Vec<String>,
    pub exclude_extensions: Vec<String>,
    pub execute: bool,
    pub workers: Option<usize>,
    pub sequential: bool,
    pub progress_interval_secs: Option<u64>,
    pub quiet: bool,
    pub force_clear_lock: bool,
    pub audit_log: Option<PathBuf>,
    pub log_level: Option<String>,
    pub schedule_every_secs: Option<u64>,
}
