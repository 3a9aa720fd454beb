use crate::ports::{Liveness, LockCreation, LockRead, LockStore, ProcessProbe};
use archive_retention_domain::config::LockSettings;
use archive_retention_domain::{DomainError, LockRecord};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Creating the record can race with another starter; after this many
/// reclaim/retry rounds the run is rejected.
const MAX_ACQUIRE_ROUNDS: usize = 3;

/// Single-instance lock for one target root: `UNLOCKED -> LOCKED -> UNLOCKED`.
pub struct ExecutionLock {
    store: Arc<dyn LockStore>,
    probe: Arc<dyn ProcessProbe>,
    settings: LockSettings,
}

impl ExecutionLock {
    pub fn new(
        store: Arc<dyn LockStore>,
        probe: Arc<dyn ProcessProbe>,
        settings: LockSettings,
    ) -> Self {
        Self {
            store,
            probe,
            settings,
        }
    }

    /// Acquire the lock or fail with `ConcurrentRunRejected`. Stale records
    /// are reclaimed with a warning.
    pub fn acquire(&self, root: &Path) -> Result<LockGuard, DomainError> {
        let me = self.probe.current();
        let record = LockRecord::new(me.host, me.pid, Utc::now(), root);

        for _ in 0..MAX_ACQUIRE_ROUNDS {
            if self.store.try_create(&record)? == LockCreation::Created {
                info!(
                    root = %root.display(),
                    host = %record.owner_host,
                    pid = record.owner_pid,
                    "Execution lock acquired"
                );
                return Ok(LockGuard {
                    store: self.store.clone(),
                    record: record.clone(),
                    released: false,
                });
            }

            match self.store.read(root)? {
                // released between our create and read; try again
                LockRead::Missing => continue,
                LockRead::Corrupt(reason) => {
                    warn!(root = %root.display(), reason = %reason, "Removing unreadable lock file");
                    self.store.remove(root)?;
                }
                LockRead::Present(existing) => {
                    if self.settings.force_clear {
                        warn!(
                            owner_host = %existing.owner_host,
                            owner_pid = existing.owner_pid,
                            acquired_at = %existing.acquired_at,
                            "Force-clearing existing lock"
                        );
                        self.store.remove(root)?;
                    } else if let Some(reason) = self.stale_reason(&existing) {
                        warn!(
                            owner_host = %existing.owner_host,
                            owner_pid = existing.owner_pid,
                            acquired_at = %existing.acquired_at,
                            reason,
                            "Reclaiming stale lock"
                        );
                        self.store.remove(root)?;
                    } else {
                        return Err(rejected(existing));
                    }
                }
            }
        }

        match self.store.read(root)? {
            LockRead::Present(existing) => Err(rejected(existing)),
            _ => Err(DomainError::LockStore(format!(
                "could not acquire lock for {} after {MAX_ACQUIRE_ROUNDS} attempts",
                root.display()
            ))),
        }
    }

    fn stale_reason(&self, record: &LockRecord) -> Option<&'static str> {
        if record.is_expired(Utc::now(), self.settings.max_run_duration) {
            return Some("older than maximum run duration");
        }
        match self.probe.liveness(&record.owner_host, record.owner_pid) {
            Liveness::NotRunning => Some("owning process is not running"),
            Liveness::Running | Liveness::Unknown => None,
        }
    }
}

fn rejected(existing: LockRecord) -> DomainError {
    DomainError::ConcurrentRunRejected {
        owner_host: existing.owner_host,
        owner_pid: existing.owner_pid,
        acquired_at: existing.acquired_at,
    }
}

/// Held for the duration of a run. The record is removed on `release` or,
/// failing that, on drop, so every exit path unlocks.
pub struct LockGuard {
    store: Arc<dyn LockStore>,
    record: LockRecord,
    released: bool,
}

impl LockGuard {
    pub fn record(&self) -> &LockRecord {
        &self.record
    }

    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // never remove a record someone else reclaimed from us
        match self.store.read(&self.record.target_root) {
            Ok(LockRead::Present(current)) if current != self.record => {
                warn!(
                    owner_host = %current.owner_host,
                    owner_pid = current.owner_pid,
                    "Lock was taken over by another run; leaving it in place"
                );
                return;
            }
            Ok(LockRead::Missing) => return,
            _ => {}
        }

        match self.store.remove(&self.record.target_root) {
            Ok(()) => info!(root = %self.record.target_root.display(), "Execution lock released"),
            Err(e) => error!(error = %e, "Failed to release execution lock"),
        }
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release_inner();
    }
}
