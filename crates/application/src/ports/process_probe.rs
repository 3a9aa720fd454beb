#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub host: String,
    pub pid: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Running,
    NotRunning,
    /// Cannot be verified from here (e.g. another host)
    Unknown,
}

pub trait ProcessProbe: Send + Sync {
    fn current(&self) -> ProcessIdentity;

    fn liveness(&self, host: &str, pid: u32) -> Liveness;
}
