use archive_retention_application::ports::{Liveness, ProcessIdentity, ProcessProbe};

/// Identifies this process by host name and pid, and checks whether a pid on
/// this host is still alive. Processes on other hosts are never probed.
#[derive(Debug, Clone)]
pub struct LocalProcessProbe {
    host: String,
    pid: u32,
}

impl LocalProcessProbe {
    pub fn new() -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string());

        Self {
            host,
            pid: std::process::id(),
        }
    }
}

impl Default for LocalProcessProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for LocalProcessProbe {
    fn current(&self) -> ProcessIdentity {
        ProcessIdentity {
            host: self.host.clone(),
            pid: self.pid,
        }
    }

    fn liveness(&self, host: &str, pid: u32) -> Liveness {
        if !host.eq_ignore_ascii_case(&self.host) {
            return Liveness::Unknown;
        }
        if pid == self.pid {
            return Liveness::Running;
        }
        pid_liveness(pid)
    }
}

#[cfg(unix)]
fn pid_liveness(pid: u32) -> Liveness {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return Liveness::Unknown;
    };
    if pid <= 0 {
        return Liveness::NotRunning;
    }

    // signal 0 performs the permission and existence checks only
    let rc = unsafe { libc::kill(pid, 0) };
    if rc == 0 {
        return Liveness::Running;
    }
    match std::io::Error::last_os_error().raw_os_error() {
        Some(libc::ESRCH) => Liveness::NotRunning,
        // exists but belongs to another user
        Some(libc::EPERM) => Liveness::Running,
        _ => Liveness::Unknown,
    }
}

#[cfg(not(unix))]
fn pid_liveness(_pid: u32) -> Liveness {
    Liveness::Unknown
}
