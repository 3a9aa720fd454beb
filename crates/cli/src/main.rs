use archive_retention_domain::CliOverrides;
use archive_retention_jobs::RetentionJob;
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod bootstrap;
mod di;

/// Exit code for runs that never started (bad config, unreachable target, lock held)
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "archive-retention")]
#[command(version)]
#[command(about = "Delete archived files older than a retention period")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Local directory to clean up
    #[arg(short = 'p', long, value_name = "DIR", conflicts_with = "credential_target")]
    archive_path: Option<PathBuf>,

    /// Network share target, looked up by name in the credential store
    #[arg(long, value_name = "NAME")]
    credential_target: Option<String>,

    /// Retention period: days ("365") or compound ("1y6m", "2y3d")
    #[arg(short = 'r', long, value_name = "PERIOD")]
    retention: Option<String>,

    /// Actually delete files (default is a dry run)
    #[arg(long)]
    execute: bool,

    /// Parallel deletion workers (1-16)
    #[arg(short = 'w', long, conflicts_with = "sequential")]
    workers: Option<usize>,

    /// Force a single worker
    #[arg(long)]
    sequential: bool,

    /// Only consider these extensions (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "EXT")]
    include: Vec<String>,

    /// Never consider these extensions (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "EXT")]
    exclude: Vec<String>,

    /// Seconds between progress reports (0 disables)
    #[arg(long, value_name = "SECS")]
    progress_interval: Option<u64>,

    /// Remove an existing execution lock before starting
    #[arg(long)]
    force_clear_lock: bool,

    /// Log per-file events at debug level only
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Append the audit trail as JSON lines to this file
    #[arg(long, value_name = "FILE")]
    audit_log: Option<PathBuf>,

    /// Keep running and repeat every SECS seconds
    #[arg(long, value_name = "SECS")]
    every: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            archive_path: self.archive_path.clone(),
            credential_target: self.credential_target.clone(),
            retention: self.retention.clone(),
            include_extensions: self.include.clone(),
            exclude_extensions: self.exclude.clone(),
            execute: self.execute,
            workers: self.workers,
            sequential: self.sequential,
            progress_interval_secs: self.progress_interval,
            quiet: self.quiet,
            force_clear_lock: self.force_clear_lock,
            audit_log: self.audit_log.clone(),
            log_level: self.log_level.clone(),
            schedule_every_secs: self.every,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match bootstrap::load_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("archive-retention: {e}");
            return Ok(ExitCode::from(EXIT_FATAL));
        }
    };

    bootstrap::init_logging(&config.logging);

    info!("Starting Archive Retention v{}", env!("CARGO_PKG_VERSION"));

    let adapters = match di::Adapters::new(&config).await {
        Ok(adapters) => adapters,
        Err(e) => {
            error!(error = %e, "Failed to initialize");
            return Ok(ExitCode::from(EXIT_FATAL));
        }
    };
    let use_case = Arc::new(di::build_retention_use_case(&adapters));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after in-flight deletions");
            signal_token.cancel();
        }
    });

    if config.schedule.interval_secs.is_some() {
        let job = Arc::new(
            RetentionJob::new(use_case, Arc::new(config)).with_cancellation(shutdown),
        );
        let outcome = job.start().await;
        info!(
            runs = outcome.runs,
            unclean_runs = outcome.unclean_runs,
            "Scheduler stopped"
        );
        return Ok(ExitCode::SUCCESS);
    }

    let settings = match config.run_settings(Utc::now()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid run settings");
            return Ok(ExitCode::from(EXIT_FATAL));
        }
    };

    let report = use_case.execute(&settings, shutdown).await;
    if let Some(fatal) = &report.fatal {
        error!(error = %fatal, "Run did not start");
    }

    Ok(ExitCode::from(report.exit_code()))
}
