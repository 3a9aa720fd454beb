use archive_retention_application::ports::{LockCreation, LockRead, LockStore};
use archive_retention_domain::{DomainError, LockRecord};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

const LOCK_FILE_PREFIX: &str = "archive-retention-";

/// Shared by every store in the process so concurrent creations never
/// stage into the same file.
static STAGING_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One JSON lock file per target root, named after a hash of the root so
/// different targets never share a lock.
///
/// Creation writes the record to a private temp file and hard-links it into
/// place, so the lock file never exists without its full contents.
#[derive(Debug, Clone)]
pub struct FileLockStore {
    directory: PathBuf,
}

impl FileLockStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Store under the configured directory, or the system temp dir.
    pub fn in_directory_or_temp(directory: Option<&Path>) -> Self {
        match directory {
            Some(dir) => Self::new(dir),
            None => Self::new(std::env::temp_dir()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn lock_path(&self, root: &Path) -> PathBuf {
        let digest = Sha256::digest(root.to_string_lossy().as_bytes());
        let hex: String = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        self.directory.join(format!("{LOCK_FILE_PREFIX}{hex}.lock"))
    }

    fn staging_path(&self, lock_path: &Path) -> PathBuf {
        let mut name = lock_path.as_os_str().to_owned();
        let n = STAGING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}-{n}.tmp", std::process::id()));
        PathBuf::from(name)
    }
}

impl LockStore for FileLockStore {
    fn try_create(&self, record: &LockRecord) -> Result<LockCreation, DomainError> {
        let lock_path = self.lock_path(&record.target_root);
        let staging = self.staging_path(&lock_path);

        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| DomainError::LockStore(format!("serialize lock record: {e}")))?;
        fs::create_dir_all(&self.directory).map_err(|e| lock_io(&self.directory, &e))?;
        fs::write(&staging, body).map_err(|e| lock_io(&staging, &e))?;

        let linked = fs::hard_link(&staging, &lock_path);
        let _ = fs::remove_file(&staging);

        match linked {
            Ok(()) => {
                debug!(path = %lock_path.display(), "Lock file created");
                Ok(LockCreation::Created)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(LockCreation::AlreadyExists),
            Err(e) => Err(lock_io(&lock_path, &e)),
        }
    }

    fn read(&self, root: &Path) -> Result<LockRead, DomainError> {
        let lock_path = self.lock_path(root);
        let raw = match fs::read(&lock_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LockRead::Missing),
            Err(e) => return Err(lock_io(&lock_path, &e)),
        };

        match serde_json::from_slice::<LockRecord>(&raw) {
            Ok(record) => Ok(LockRead::Present(record)),
            Err(e) => Ok(LockRead::Corrupt(e.to_string())),
        }
    }

    fn remove(&self, root: &Path) -> Result<(), DomainError> {
        let lock_path = self.lock_path(root);
        match fs::remove_file(&lock_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(lock_io(&lock_path, &e)),
        }
    }
}

fn lock_io(path: &Path, err: &std::io::Error) -> DomainError {
    DomainError::LockStore(format!("{}: {err}", path.display()))
}
