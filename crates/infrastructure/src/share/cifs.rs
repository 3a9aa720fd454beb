use archive_retention_application::ports::{ShareConnector, ShareSession};
use archive_retention_domain::{DomainError, ShareCredential};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Mounts the share with `mount -t cifs` into a private mount point for the
/// duration of the run. The secret goes through the `PASSWD` environment
/// variable of the mount helper, never the command line.
#[derive(Debug)]
pub struct CifsShareConnector {
    mount_root: PathBuf,
    sequence: AtomicU32,
}

impl CifsShareConnector {
    pub fn new(mount_root: impl Into<PathBuf>) -> Self {
        Self {
            mount_root: mount_root.into(),
            sequence: AtomicU32::new(0),
        }
    }

    fn next_mount_point(&self) -> PathBuf {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.mount_root
            .join(format!("archive-retention-{}-{n}", std::process::id()))
    }
}

/// Split `DOMAIN\user` into its parts; a bare name has no domain.
fn split_principal(principal: &str) -> (Option<&str>, &str) {
    match principal.split_once('\\') {
        Some((domain, user)) if !domain.is_empty() => (Some(domain), user),
        Some((_, user)) => (None, user),
        None => (None, principal),
    }
}

fn mount_options(principal: &str) -> String {
    match split_principal(principal) {
        (Some(domain), user) => format!("username={user},domain={domain}"),
        (None, user) => format!("username={user}"),
    }
}

struct CifsSession {
    mount_point: PathBuf,
    mounted: bool,
}

impl ShareSession for CifsSession {
    fn root(&self) -> &Path {
        &self.mount_point
    }

    fn disconnect(&mut self) -> Result<(), DomainError> {
        if !self.mounted {
            return Ok(());
        }

        // runs from Drop, so this stays synchronous
        let status = std::process::Command::new("umount")
            .arg(&self.mount_point)
            .status()
            .map_err(|e| DomainError::IoError(format!("umount: {e}")))?;
        if !status.success() {
            return Err(DomainError::IoError(format!(
                "umount {} exited with {status}",
                self.mount_point.display()
            )));
        }
        self.mounted = false;

        if let Err(e) = std::fs::remove_dir(&self.mount_point) {
            warn!(path = %self.mount_point.display(), error = %e, "Could not remove mount point");
        }
        Ok(())
    }
}

#[async_trait]
impl ShareConnector for CifsShareConnector {
    async fn connect(
        &self,
        credential: &ShareCredential,
    ) -> Result<Box<dyn ShareSession>, DomainError> {
        let mount_point = self.next_mount_point();
        tokio::fs::create_dir_all(&mount_point)
            .await
            .map_err(|e| DomainError::from_io(&mount_point, &e))?;

        debug!(
            share = %credential.share_path,
            mount_point = %mount_point.display(),
            principal = %credential.principal,
            "Mounting CIFS share"
        );

        let output = Command::new("mount")
            .arg("-t")
            .arg("cifs")
            .arg(&credential.share_path)
            .arg(&mount_point)
            .arg("-o")
            .arg(mount_options(&credential.principal))
            .env("PASSWD", credential.secret.expose())
            .output()
            .await;

        let failure = match output {
            Ok(out) if out.status.success() => None,
            Ok(out) => Some(format!(
                "mount exited with {}: {}",
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )),
            Err(e) => Some(format!("mount: {e}")),
        };

        if let Some(reason) = failure {
            let _ = tokio::fs::remove_dir(&mount_point).await;
            return Err(DomainError::IoError(reason));
        }

        info!(
            share = %credential.share_path,
            mount_point = %mount_point.display(),
            "CIFS share mounted"
        );
        Ok(Box::new(CifsSession {
            mount_point,
            mounted: true,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_with_domain() {
        assert_eq!(
            mount_options("CORP\\svc_retention"),
            "username=svc_retention,domain=CORP"
        );
    }

    #[test]
    fn test_bare_principal() {
        assert_eq!(mount_options("svc_retention"), "username=svc_retention");
        assert_eq!(mount_options("\\svc"), "username=svc");
    }

    #[test]
    fn test_mount_points_are_unique() {
        let connector = CifsShareConnector::new("/run/archive-retention");
        let a = connector.next_mount_point();
        let b = connector.next_mount_point();
        assert_ne!(a, b);
        assert!(a.starts_with("/run/archive-retention"));
    }
}
