use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// JSON-lines audit file (append-only)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Mirror audit records into the tracing log
    #[serde(default = "default_true")]
    pub tracing: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: None,
            tracing: true,
        }
    }
}

fn default_true() -> bool {
    true
}
