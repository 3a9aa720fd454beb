use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Exactly one of `path` or `credential` must be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Local directory to clean up
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Name of a credential-store entry describing a network share
    #[serde(default)]
    pub credential: Option<String>,
}
