#![allow(dead_code)]
#![allow(unused_imports)]

use archive_retention_application::ports::{
    AuditSink, CredentialStore, FileSystem, Liveness, LockCreation, LockRead, LockStore,
    ProcessIdentity, ProcessProbe, ShareConnector, ShareSession, TreeWalker, WalkEntry,
};
use archive_retention_application::services::PathResolver;
use archive_retention_application::use_cases::RunRetentionUseCase;
use archive_retention_domain::{
    AuditRecord, DeletionOutcome, DomainError, ExtensionFilter, LockRecord, ProgressRecord,
    RetentionPeriod, RetentionPolicy, RetryPolicy, RunSettings, RunSummary, Secret,
    ShareCredential, TargetSpec,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// In-memory filesystem (also serves as the tree walker)
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Node {
    Dir,
    File { size: u64, modified: DateTime<Utc> },
}

pub struct MemoryFileSystem {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
    transient_failures: RwLock<HashMap<PathBuf, u32>>,
    permanent_failures: RwLock<HashSet<PathBuf>>,
    unreadable: RwLock<HashSet<PathBuf>>,
    remove_calls: RwLock<HashMap<PathBuf, u32>>,
    cancel_triggers: RwLock<HashMap<PathBuf, CancellationToken>>,
    walks: AtomicU64,
}

impl MemoryFileSystem {
    pub fn new(root: &str) -> Self {
        let fs = Self {
            nodes: RwLock::new(BTreeMap::new()),
            transient_failures: RwLock::new(HashMap::new()),
            permanent_failures: RwLock::new(HashSet::new()),
            unreadable: RwLock::new(HashSet::new()),
            remove_calls: RwLock::new(HashMap::new()),
            cancel_triggers: RwLock::new(HashMap::new()),
            walks: AtomicU64::new(0),
        };
        fs.add_dir(root);
        fs
    }

    pub fn add_dir(&self, path: &str) {
        let path = PathBuf::from(path);
        let mut nodes = self.nodes.write().unwrap();
        for ancestor in path.ancestors() {
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    /// Add a file whose modification time is `age_days` in the past.
    pub fn add_file(&self, path: &str, size: u64, age_days: i64) {
        let modified = Utc::now() - TimeDelta::days(age_days);
        self.add_file_modified(path, size, modified);
    }

    pub fn add_file_modified(&self, path: &str, size: u64, modified: DateTime<Utc>) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            self.add_dir(&parent.to_string_lossy());
        }
        self.nodes
            .write()
            .unwrap()
            .insert(path, Node::File { size, modified });
    }

    /// The next `times` removals of `path` fail with an I/O error.
    pub fn fail_next(&self, path: &str, times: u32) {
        self.transient_failures
            .write()
            .unwrap()
            .insert(PathBuf::from(path), times);
    }

    pub fn fail_always(&self, path: &str) {
        self.permanent_failures
            .write()
            .unwrap()
            .insert(PathBuf::from(path));
    }

    /// Cancel `token` when the first removal of `path` starts.
    pub fn cancel_on_remove(&self, path: &str, token: CancellationToken) {
        self.cancel_triggers
            .write()
            .unwrap()
            .insert(PathBuf::from(path), token);
    }

    pub fn make_unreadable(&self, dir: &str) {
        self.unreadable.write().unwrap().insert(PathBuf::from(dir));
    }

    pub fn exists(&self, path: &str) -> bool {
        self.nodes.read().unwrap().contains_key(Path::new(path))
    }

    pub fn file_count(&self) -> usize {
        self.nodes
            .read()
            .unwrap()
            .values()
            .filter(|n| matches!(n, Node::File { .. }))
            .count()
    }

    pub fn remove_calls(&self, path: &str) -> u32 {
        self.remove_calls
            .read()
            .unwrap()
            .get(Path::new(path))
            .copied()
            .unwrap_or(0)
    }

    pub fn walk_count(&self) -> u64 {
        self.walks.load(Ordering::Relaxed)
    }

    fn has_children(nodes: &BTreeMap<PathBuf, Node>, dir: &Path) -> bool {
        nodes.keys().any(|p| p.parent() == Some(dir))
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn remove_file(&self, path: &Path) -> Result<(), DomainError> {
        *self
            .remove_calls
            .write()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(0) += 1;

        let trigger = self.cancel_triggers.write().unwrap().remove(path);
        if let Some(token) = trigger {
            token.cancel();
        }

        if self.permanent_failures.read().unwrap().contains(path) {
            return Err(DomainError::IoError(format!(
                "{}: access denied",
                path.display()
            )));
        }

        {
            let mut failures = self.transient_failures.write().unwrap();
            if let Some(remaining) = failures.get_mut(path) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(DomainError::IoError(format!(
                        "{}: sharing violation",
                        path.display()
                    )));
                }
            }
        }

        let mut nodes = self.nodes.write().unwrap();
        match nodes.get(path) {
            Some(Node::File { .. }) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Dir) => Err(DomainError::IoError(format!(
                "{} is a directory",
                path.display()
            ))),
            None => Err(DomainError::NotFound(path.display().to_string())),
        }
    }

    async fn remove_dir(&self, path: &Path) -> Result<(), DomainError> {
        let mut nodes = self.nodes.write().unwrap();
        match nodes.get(path) {
            Some(Node::Dir) if Self::has_children(&nodes, path) => Err(DomainError::IoError(
                format!("{}: directory not empty", path.display()),
            )),
            Some(Node::Dir) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::File { .. }) => Err(DomainError::IoError(format!(
                "{} is a file",
                path.display()
            ))),
            None => Err(DomainError::NotFound(path.display().to_string())),
        }
    }

    async fn is_dir(&self, path: &Path) -> Result<bool, DomainError> {
        Ok(matches!(
            self.nodes.read().unwrap().get(path),
            Some(Node::Dir)
        ))
    }

    async fn is_dir_empty(&self, path: &Path) -> Result<bool, DomainError> {
        let nodes = self.nodes.read().unwrap();
        match nodes.get(path) {
            Some(Node::Dir) => Ok(!Self::has_children(&nodes, path)),
            Some(Node::File { .. }) => Err(DomainError::IoError(format!(
                "{} is a file",
                path.display()
            ))),
            None => Err(DomainError::NotFound(path.display().to_string())),
        }
    }
}

impl TreeWalker for MemoryFileSystem {
    fn walk(&self, root: &Path) -> Box<dyn Iterator<Item = WalkEntry> + Send> {
        self.walks.fetch_add(1, Ordering::Relaxed);
        let nodes = self.nodes.read().unwrap();
        let unreadable = self.unreadable.read().unwrap();

        let mut entries = Vec::new();
        let mut skipped: Vec<PathBuf> = Vec::new();
        for (path, node) in nodes.iter() {
            if !path.starts_with(root) || path == root {
                continue;
            }
            if skipped.iter().any(|s| path.starts_with(s)) {
                continue;
            }
            match node {
                Node::Dir if unreadable.contains(path) => {
                    skipped.push(path.clone());
                    entries.push(WalkEntry::SubtreeError {
                        path: path.clone(),
                        reason: "permission denied".to_string(),
                    });
                }
                Node::Dir => {}
                Node::File { size, modified } => entries.push(WalkEntry::File {
                    path: path.clone(),
                    size_bytes: *size,
                    modified: *modified,
                }),
            }
        }
        Box::new(entries.into_iter())
    }
}

// ============================================================================
// Audit sink
// ============================================================================

#[derive(Default)]
pub struct RecordingAuditSink {
    attempts: RwLock<Vec<AuditRecord>>,
    progress: RwLock<Vec<ProgressRecord>>,
    summaries: RwLock<Vec<RunSummary>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> Vec<AuditRecord> {
        self.attempts.read().unwrap().clone()
    }

    pub fn attempts_for(&self, path: &str) -> Vec<AuditRecord> {
        self.attempts()
            .into_iter()
            .filter(|r| r.path == Path::new(path))
            .collect()
    }

    pub fn count(&self, outcome: DeletionOutcome) -> usize {
        self.attempts
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.outcome == outcome)
            .count()
    }

    pub fn progress(&self) -> Vec<ProgressRecord> {
        self.progress.read().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<RunSummary> {
        self.summaries.read().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn record_attempt(&self, record: &AuditRecord) {
        self.attempts.write().unwrap().push(record.clone());
    }

    async fn record_progress(&self, progress: &ProgressRecord) {
        self.progress.write().unwrap().push(*progress);
    }

    async fn record_summary(&self, summary: &RunSummary) {
        self.summaries.write().unwrap().push(summary.clone());
    }
}

// ============================================================================
// Lock store and process probe
// ============================================================================

#[derive(Default)]
pub struct MemoryLockStore {
    records: RwLock<HashMap<PathBuf, LockRecord>>,
    corrupt: RwLock<HashSet<PathBuf>>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: LockRecord) {
        self.records
            .write()
            .unwrap()
            .insert(record.target_root.clone(), record);
    }

    pub fn insert_corrupt(&self, root: &str) {
        self.corrupt.write().unwrap().insert(PathBuf::from(root));
    }

    pub fn get(&self, root: &str) -> Option<LockRecord> {
        self.records.read().unwrap().get(Path::new(root)).cloned()
    }

    pub fn is_locked(&self, root: &str) -> bool {
        self.get(root).is_some() || self.corrupt.read().unwrap().contains(Path::new(root))
    }
}

impl LockStore for MemoryLockStore {
    fn try_create(&self, record: &LockRecord) -> Result<LockCreation, DomainError> {
        if self.corrupt.read().unwrap().contains(&record.target_root) {
            return Ok(LockCreation::AlreadyExists);
        }
        let mut records = self.records.write().unwrap();
        if records.contains_key(&record.target_root) {
            return Ok(LockCreation::AlreadyExists);
        }
        records.insert(record.target_root.clone(), record.clone());
        Ok(LockCreation::Created)
    }

    fn read(&self, root: &Path) -> Result<LockRead, DomainError> {
        if self.corrupt.read().unwrap().contains(root) {
            return Ok(LockRead::Corrupt("not json".to_string()));
        }
        Ok(match self.records.read().unwrap().get(root) {
            Some(record) => LockRead::Present(record.clone()),
            None => LockRead::Missing,
        })
    }

    fn remove(&self, root: &Path) -> Result<(), DomainError> {
        self.corrupt.write().unwrap().remove(root);
        self.records.write().unwrap().remove(root);
        Ok(())
    }
}

pub const TEST_HOST: &str = "retention-test-host";

/// Reports the given pids on `TEST_HOST` as running; other pids on this
/// host as dead; anything on another host as unknown.
pub struct FakeProcessProbe {
    pid: u32,
    running: RwLock<HashSet<u32>>,
}

impl FakeProcessProbe {
    pub fn new(pid: u32) -> Self {
        let mut running = HashSet::new();
        running.insert(pid);
        Self {
            pid,
            running: RwLock::new(running),
        }
    }

    pub fn set_running(&self, pid: u32) {
        self.running.write().unwrap().insert(pid);
    }
}

impl ProcessProbe for FakeProcessProbe {
    fn current(&self) -> ProcessIdentity {
        ProcessIdentity {
            host: TEST_HOST.to_string(),
            pid: self.pid,
        }
    }

    fn liveness(&self, host: &str, pid: u32) -> Liveness {
        if host != TEST_HOST {
            return Liveness::Unknown;
        }
        if self.running.read().unwrap().contains(&pid) {
            Liveness::Running
        } else {
            Liveness::NotRunning
        }
    }
}

// ============================================================================
// Credentials and share connector
// ============================================================================

#[derive(Default)]
pub struct StaticCredentialStore {
    entries: RwLock<HashMap<String, ShareCredential>>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_share(self, name: &str, share_path: &str) -> Self {
        self.entries.write().unwrap().insert(
            name.to_string(),
            ShareCredential {
                share_path: share_path.to_string(),
                principal: "svc_retention".to_string(),
                secret: Secret::new("correct-horse"),
            },
        );
        self
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn resolve(&self, target_name: &str) -> Result<ShareCredential, DomainError> {
        self.entries
            .read()
            .unwrap()
            .get(target_name)
            .cloned()
            .ok_or_else(|| DomainError::CredentialNotFound(target_name.to_string()))
    }
}

/// Treats the share path as the local root and counts connects/disconnects.
#[derive(Default)]
pub struct FakeShareConnector {
    connects: Arc<AtomicU64>,
    disconnects: Arc<AtomicU64>,
    refuse: RwLock<bool>,
}

impl FakeShareConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        let connector = Self::default();
        *connector.refuse.write().unwrap() = true;
        connector
    }

    pub fn connects(&self) -> u64 {
        self.connects.load(Ordering::Relaxed)
    }

    pub fn disconnects(&self) -> u64 {
        self.disconnects.load(Ordering::Relaxed)
    }
}

struct FakeSession {
    root: PathBuf,
    disconnects: Arc<AtomicU64>,
    connected: bool,
}

impl ShareSession for FakeSession {
    fn root(&self) -> &Path {
        &self.root
    }

    fn disconnect(&mut self) -> Result<(), DomainError> {
        if self.connected {
            self.connected = false;
            self.disconnects.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}

#[async_trait]
impl ShareConnector for FakeShareConnector {
    async fn connect(
        &self,
        credential: &ShareCredential,
    ) -> Result<Box<dyn ShareSession>, DomainError> {
        if *self.refuse.read().unwrap() {
            return Err(DomainError::IoError("logon failure".to_string()));
        }
        self.connects.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(FakeSession {
            root: PathBuf::from(&credential.share_path),
            disconnects: self.disconnects.clone(),
            connected: true,
        }))
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub struct Harness {
    pub fs: Arc<MemoryFileSystem>,
    pub audit: Arc<RecordingAuditSink>,
    pub locks: Arc<MemoryLockStore>,
    pub probe: Arc<FakeProcessProbe>,
    pub credentials: Arc<StaticCredentialStore>,
    pub connector: Arc<FakeShareConnector>,
}

impl Harness {
    pub fn new(root: &str) -> Self {
        Self {
            fs: Arc::new(MemoryFileSystem::new(root)),
            audit: Arc::new(RecordingAuditSink::new()),
            locks: Arc::new(MemoryLockStore::new()),
            probe: Arc::new(FakeProcessProbe::new(4242)),
            credentials: Arc::new(StaticCredentialStore::new()),
            connector: Arc::new(FakeShareConnector::new()),
        }
    }

    pub fn with_credentials(mut self, credentials: StaticCredentialStore) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }

    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(
            self.credentials.clone(),
            self.connector.clone(),
            self.fs.clone(),
        )
    }

    pub fn use_case(&self) -> RunRetentionUseCase {
        RunRetentionUseCase::new(
            self.resolver(),
            self.locks.clone(),
            self.probe.clone(),
            self.fs.clone(),
            self.fs.clone(),
            self.audit.clone(),
        )
    }
}

/// Local-target settings for executing a run with fast retries.
pub fn execute_settings(root: &str, retention_days: u32) -> RunSettings {
    settings_for(TargetSpec::Local(PathBuf::from(root)), retention_days).with_dry_run(false)
}

pub fn settings_for(target: TargetSpec, retention_days: u32) -> RunSettings {
    let period = RetentionPeriod::days(retention_days);
    let policy = RetentionPolicy::from_period(period, Utc::now(), ExtensionFilter::default())
        .expect("valid period");
    RunSettings::new(target, period, policy).with_retry(RetryPolicy::new(3, Duration::from_millis(1)))
}
