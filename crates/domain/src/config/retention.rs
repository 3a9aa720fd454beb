use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Retention period: `"365"`, `"365d"`, `"1y6m"`, ...
    #[serde(default)]
    pub period: Option<String>,

    #[serde(default)]
    pub include_extensions: Vec<String>,

    #[serde(default)]
    pub exclude_extensions: Vec<String>,
}
