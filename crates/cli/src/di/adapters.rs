use archive_retention_application::ports::{
    AuditSink, CredentialStore, FileSystem, LockStore, ProcessProbe, ShareConnector, TreeWalker,
};
use archive_retention_domain::config::ConnectorKind;
use archive_retention_domain::Config;
use archive_retention_infrastructure::audit::{
    CompositeAuditSink, JsonLinesAuditSink, TracingAuditSink,
};
use archive_retention_infrastructure::credentials::TomlCredentialStore;
use archive_retention_infrastructure::fs::{LocalFileSystem, WalkdirTreeWalker};
use archive_retention_infrastructure::lock::FileLockStore;
use archive_retention_infrastructure::share::{CifsShareConnector, DirectShareConnector};
use archive_retention_infrastructure::system::LocalProcessProbe;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const DEFAULT_CREDENTIALS_PATH: &str = "/etc/archive-retention/credentials.toml";

pub struct Adapters {
    pub fs: Arc<dyn FileSystem>,
    pub walker: Arc<dyn TreeWalker>,
    pub lock_store: Arc<dyn LockStore>,
    pub probe: Arc<dyn ProcessProbe>,
    pub credentials: Arc<dyn CredentialStore>,
    pub connector: Arc<dyn ShareConnector>,
    pub audit: Arc<dyn AuditSink>,
}

impl Adapters {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let credentials_path = config
            .credentials
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_PATH));

        let connector: Arc<dyn ShareConnector> = match config.credentials.connector {
            ConnectorKind::Direct => Arc::new(DirectShareConnector::new()),
            ConnectorKind::Cifs => {
                let mount_root = config
                    .credentials
                    .mount_root
                    .clone()
                    .unwrap_or_else(std::env::temp_dir);
                Arc::new(CifsShareConnector::new(mount_root))
            }
        };

        let lock_store = FileLockStore::in_directory_or_temp(config.lock.directory.as_deref());
        info!(lock_dir = %lock_store.directory().display(), "Lock store ready");

        Ok(Self {
            fs: Arc::new(LocalFileSystem::new()),
            walker: Arc::new(WalkdirTreeWalker::new()),
            lock_store: Arc::new(lock_store),
            probe: Arc::new(LocalProcessProbe::new()),
            credentials: Arc::new(TomlCredentialStore::new(credentials_path)),
            connector,
            audit: build_audit_sink(config).await?,
        })
    }
}

async fn build_audit_sink(config: &Config) -> anyhow::Result<Arc<dyn AuditSink>> {
    let mut sink = CompositeAuditSink::new();
    if config.audit.tracing {
        sink = sink.with(Arc::new(TracingAuditSink::new()));
    }
    if let Some(path) = &config.audit.path {
        let file = JsonLinesAuditSink::open(path).await?;
        info!(path = %path.display(), "Writing audit trail");
        sink = sink.with(Arc::new(file));
    }
    Ok(Arc::new(sink))
}
