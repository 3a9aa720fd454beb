use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Share path is already reachable (pre-mounted or UNC)
    #[default]
    Direct,
    /// Mount with `mount -t cifs` for the duration of the run
    Cifs,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialsConfig {
    /// TOML credential store file
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub connector: ConnectorKind,

    /// Parent directory for transient CIFS mount points
    #[serde(default)]
    pub mount_root: Option<PathBuf>,
}
