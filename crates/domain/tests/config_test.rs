use archive_retention_domain::config::{ConfigError, LogFormat};
use archive_retention_domain::{CliOverrides, Config, TargetSpec};
use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use std::time::Duration;

fn parse(toml: &str) -> Config {
    Config::from_toml(toml).expect("valid toml")
}

#[test]
fn test_defaults_are_safe() {
    let config = Config::default();

    assert!(config.execution.dry_run);
    assert_eq!(config.execution.max_retries, 3);
    assert_eq!(config.execution.progress_interval_secs, 30);
    assert_eq!(config.lock.max_run_duration_hours, 24);
    assert!(!config.lock.force_clear);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_default_config_requires_target() {
    let err = Config::default().validate().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_target_must_be_exclusive() {
    let config = parse(
        r#"
        [target]
        path = "/srv/archive"
        credential = "NAS_CREDS"

        [retention]
        period = "365d"
        "#,
    );
    assert!(config.validate().is_err());
}

#[test]
fn test_retention_period_is_required_and_parsed() {
    let config = parse(
        r#"
        [target]
        path = "/srv/archive"
        "#,
    );
    assert!(config.validate().is_err());

    let config = parse(
        r#"
        [target]
        path = "/srv/archive"

        [retention]
        period = "1y6m"
        "#,
    );
    assert!(config.validate().is_ok());
    let period = config.retention_period().unwrap();
    assert_eq!((period.years, period.months), (1, 6));
}

#[test]
fn test_worker_bounds_are_enforced() {
    let config = parse(
        r#"
        [target]
        path = "/srv/archive"

        [retention]
        period = "30"

        [execution]
        workers = 64
        "#,
    );
    assert!(config.validate().is_err());
}

#[test]
fn test_share_targets_default_to_parallel_workers() {
    let mut config = parse(
        r#"
        [target]
        credential = "NAS_CREDS"

        [retention]
        period = "1095"
        "#,
    );
    let share = config.target_spec().unwrap();
    assert_eq!(config.effective_workers(&share), 8);
    assert_eq!(
        config.effective_workers(&TargetSpec::Local(PathBuf::from("/tmp"))),
        1
    );

    config.execution.sequential = true;
    assert_eq!(config.effective_workers(&share), 1);
}

#[test]
fn test_cli_overrides_replace_target_and_enable_execution() {
    let file = write_config(
        r#"
        [target]
        credential = "NAS_CREDS"

        [retention]
        period = "365"
        "#,
    );
    let config = Config::load(
        Some(file.path().to_str().unwrap()),
        CliOverrides {
            archive_path: Some(PathBuf::from("/mnt/local")),
            execute: true,
            workers: Some(4),
            retention: Some("91".to_string()),
            include_extensions: vec![".lca".to_string()],
            ..Default::default()
        },
    )
    .unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.target.path, Some(PathBuf::from("/mnt/local")));
    assert!(config.target.credential.is_none());
    assert!(!config.execution.dry_run);
    assert_eq!(config.retention.period.as_deref(), Some("91"));
}

#[test]
fn test_run_settings_derive_cutoff_and_tuning() {
    let config = parse(
        r#"
        [target]
        path = "/srv/archive"

        [retention]
        period = "10d"
        include_extensions = ["lca"]

        [execution]
        dry_run = false
        workers = 3
        max_retries = 5
        retry_delay_ms = 20
        progress_interval_secs = 0

        [lock]
        max_run_duration_hours = 2
        force_clear = true
        "#,
    );
    let now = Utc.with_ymd_and_hms(2025, 1, 11, 0, 0, 0).unwrap();
    let settings = config.run_settings(now).unwrap();

    assert_eq!(
        settings.policy.cutoff(),
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    );
    assert!(!settings.dry_run);
    assert_eq!(settings.workers, 3);
    assert_eq!(settings.retry.max_attempts(), 5);
    assert_eq!(settings.retry.delay_for_attempt(2), Duration::from_millis(40));
    assert!(settings.progress_interval.is_none());
    assert_eq!(settings.lock.max_run_duration, Duration::from_secs(7200));
    assert!(settings.lock.force_clear);
}

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}
