use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What a run is pointed at: a local directory or a named network share
/// whose connection material lives in the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpec {
    Local(PathBuf),
    Share { credential: String },
}

impl TargetSpec {
    pub fn is_network_share(&self) -> bool {
        matches!(self, TargetSpec::Share { .. })
    }
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSpec::Local(path) => write!(f, "{}", path.display()),
            TargetSpec::Share { credential } => write!(f, "share:{credential}"),
        }
    }
}

/// A secret that never prints.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Connection material returned by the credential store.
#[derive(Debug, Clone)]
pub struct ShareCredential {
    pub share_path: String,
    pub principal: String,
    pub secret: Secret,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let cred = ShareCredential {
            share_path: "//nas/archive".to_string(),
            principal: "svc_retention".to_string(),
            secret: Secret::new("hunter2"),
        };
        let rendered = format!("{cred:?} {}", cred.secret);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("svc_retention"));
        assert_eq!(cred.secret.expose(), "hunter2");
    }
}
