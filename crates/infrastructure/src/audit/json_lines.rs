use archive_retention_application::ports::AuditSink;
use archive_retention_domain::{AuditRecord, DomainError, ProgressRecord, RunSummary};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum AuditLine<'a> {
    Attempt(&'a AuditRecord),
    Progress(&'a ProgressRecord),
    Summary(&'a RunSummary),
}

/// Appends one JSON object per line to the audit file. Write failures are
/// logged and swallowed so the run carries on.
pub struct JsonLinesAuditSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesAuditSink {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::from_io(parent, &e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DomainError::from_io(&path, &e))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    async fn append(&self, line: AuditLine<'_>) {
        let mut bytes = match serde_json::to_vec(&line) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize audit record");
                return;
            }
        };
        bytes.push(b'\n');

        let mut file = self.file.lock().await;
        let written = match file.write_all(&bytes).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "Failed to write audit record");
        }
    }
}

#[async_trait]
impl AuditSink for JsonLinesAuditSink {
    async fn record_attempt(&self, record: &AuditRecord) {
        self.append(AuditLine::Attempt(record)).await;
    }

    async fn record_progress(&self, progress: &ProgressRecord) {
        self.append(AuditLine::Progress(progress)).await;
    }

    async fn record_summary(&self, summary: &RunSummary) {
        self.append(AuditLine::Summary(summary)).await;
    }
}
