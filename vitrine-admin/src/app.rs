use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use vitrine_blob::{
    validate, BlobBackend, BlobClient, FileUpload, MemoryBlobBackend, S3BlobBackend,
};
use vitrine_core::{VitrineConfigSnapshot, VitrineError};

use crate::Command;

/// Which blob backend the CLI talks to (`blob.backend`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    S3,
    Memory,
}

impl BackendKind {
    fn from_config(config: &VitrineConfigSnapshot) -> Result<Self> {
        match config.get("blob.backend").unwrap_or("s3") {
            "s3" => Ok(BackendKind::S3),
            "memory" => Ok(BackendKind::Memory),
            other => Err(VitrineError::bad_request(format!(
                "blob.backend must be 's3' or 'memory', got '{other}'"
            ))
            .into_anyhow()),
        }
    }
}

pub struct AdminApp {
    client: BlobClient,
}

impl AdminApp {
    pub fn new(backend: Arc<dyn BlobBackend>) -> Self {
        Self {
            client: BlobClient::new(backend),
        }
    }

    pub async fn from_config(config: &VitrineConfigSnapshot) -> Result<Self> {
        let backend: Arc<dyn BlobBackend> = match BackendKind::from_config(config)? {
            BackendKind::S3 => Arc::new(S3BlobBackend::from_env().await?),
            BackendKind::Memory => match config.get("blob.public_url") {
                Some(url) => Arc::new(MemoryBlobBackend::new(url)),
                None => Arc::new(MemoryBlobBackend::default()),
            },
        };
        Ok(Self::new(backend))
    }

    pub fn client(&self) -> &BlobClient {
        &self.client
    }

    /// Run one command and render its JSON output.
    pub async fn run(&self, command: Command) -> Result<String> {
        let output = match command {
            Command::Check { bucket, file } => {
                let upload = read_upload(&file).await?;
                match validate(&upload, bucket) {
                    Ok(()) => json!({ "valid": true }),
                    Err(err) => json!({ "valid": false, "error": err.to_string() }),
                }
            }
            Command::Upload { bucket, file, path } => {
                let upload = read_upload(&file).await?;
                if let Err(err) = validate(&upload, bucket) {
                    return Err(VitrineError::unprocessable(err.to_string()).into_anyhow());
                }
                serde_json::to_value(self.client.upload(bucket, &upload, path.as_deref()).await)?
            }
            Command::List { bucket, folder } => {
                serde_json::to_value(self.client.list(bucket, folder.as_deref()).await)?
            }
            Command::Delete { bucket, path } => {
                serde_json::to_value(self.client.delete(bucket, &path).await)?
            }
            Command::Url { bucket, path } => json!({ "url": self.client.public_url(bucket, &path) }),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

/// Read a local file, guessing its content type from the extension.
async fn read_upload(file: &Path) -> Result<FileUpload> {
    let body = tokio::fs::read(file).await.map_err(|e| {
        VitrineError::bad_request(format!("cannot read {}: {}", file.display(), e)).into_anyhow()
    })?;

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let content_type = mime_guess::from_path(file)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    tracing::debug!(name = %name, content_type = %content_type, size = body.len(), "file read");
    Ok(FileUpload::new(name, content_type, body))
}
