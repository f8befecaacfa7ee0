//! Two-mode asset input.
//!
//! An operator supplies a catalog record's asset either by typing a URL or
//! by uploading a file. [`AssetInputResolver`] folds both paths into one
//! resolved reference. While an upload is outstanding the source is
//! [`AssetSource::PendingUpload`] and further file selections are ignored.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vitrine_blob::{validate, BlobClient, BlobOutcome, Bucket, FileUpload, UploadResult, ValidationError};
use vitrine_core::{Notification, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Url,
    Upload,
}

/// Where the resolved reference currently comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Typed by the operator; empty once cleared.
    Url(String),
    /// An upload is in flight. `previous` is what the reference falls back to
    /// if it fails.
    PendingUpload { previous: Box<AssetSource> },
    /// Produced by this resolver's own upload.
    Uploaded { url: String, path: String },
}

impl Default for AssetSource {
    fn default() -> Self {
        AssetSource::Url(String::new())
    }
}

impl AssetSource {
    pub fn resolved(&self) -> &str {
        match self {
            AssetSource::Url(url) => url,
            AssetSource::PendingUpload { previous } => previous.resolved(),
            AssetSource::Uploaded { url, .. } => url,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AssetSource::PendingUpload { .. })
    }
}

/// Result of a file selection.
#[derive(Debug)]
pub enum Selection {
    /// Validation passed; the caller sends the ticket and feeds the result
    /// back through [`AssetInputResolver::finish`].
    Started(UploadTicket),
    /// Refused locally, nothing was sent.
    Rejected(ValidationError),
    /// Busy, or not in upload mode.
    Ignored,
}

/// A validated file waiting to be sent.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    bucket: Bucket,
    file: FileUpload,
}

impl UploadTicket {
    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn file(&self) -> &FileUpload {
        &self.file
    }

    pub async fn send(&self, client: &BlobClient) -> UploadResult {
        client.upload(self.bucket, &self.file, None).await
    }
}

#[derive(Clone)]
pub struct AssetInputResolver {
    bucket: Bucket,
    mode: InputMode,
    source: AssetSource,
    last_error: Option<String>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl AssetInputResolver {
    pub fn new(bucket: Bucket) -> Self {
        Self {
            bucket,
            mode: InputMode::Url,
            source: AssetSource::default(),
            last_error: None,
            notifier: None,
        }
    }

    /// Start from a reference already stored on a record.
    pub fn with_initial(bucket: Bucket, url: impl Into<String>) -> Self {
        Self {
            source: AssetSource::Url(url.into()),
            ..Self::new(bucket)
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    pub fn resolved(&self) -> &str {
        self.source.resolved()
    }

    pub fn is_busy(&self) -> bool {
        self.source.is_pending()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    /// Overwrite the reference with typed text. Only honoured in URL mode
    /// and while no upload is pending.
    pub fn type_url(&mut self, text: impl Into<String>) -> bool {
        if self.mode != InputMode::Url || self.is_busy() {
            return false;
        }
        self.source = AssetSource::Url(text.into());
        self.last_error = None;
        true
    }

    pub fn select_file(&mut self, file: FileUpload) -> Selection {
        if self.mode != InputMode::Upload || self.is_busy() {
            tracing::debug!(bucket = %self.bucket, name = %file.name, "file selection ignored");
            return Selection::Ignored;
        }

        if let Err(err) = validate(&file, self.bucket) {
            tracing::warn!(bucket = %self.bucket, name = %file.name, error = %err, "file rejected");
            self.fail(err.to_string());
            return Selection::Rejected(err);
        }

        let previous = std::mem::take(&mut self.source);
        self.source = AssetSource::PendingUpload {
            previous: Box::new(previous),
        };
        self.last_error = None;

        Selection::Started(UploadTicket {
            bucket: self.bucket,
            file,
        })
    }

    /// Apply the outcome of a started upload. A no-op unless one is pending.
    pub fn finish(&mut self, result: UploadResult) {
        if !self.is_busy() {
            tracing::warn!(bucket = %self.bucket, "upload result arrived with no upload pending");
            return;
        }
        let AssetSource::PendingUpload { previous } = std::mem::take(&mut self.source) else {
            return;
        };

        match result {
            UploadResult::Success { url, path } => {
                self.source = AssetSource::Uploaded { url, path };
                self.mode = InputMode::Url;
                self.last_error = None;
                if let Some(notifier) = &self.notifier {
                    notifier.notify(Notification::success("Succès", "Fichier téléchargé avec succès"));
                }
            }
            UploadResult::Failure { error } => {
                self.source = *previous;
                self.fail(error);
            }
        }
    }

    /// Select, send and finish in one call.
    pub async fn upload(&mut self, file: FileUpload, client: &BlobClient) -> Option<UploadResult> {
        let Selection::Started(ticket) = self.select_file(file) else {
            return None;
        };
        let result = ticket.send(client).await;
        self.finish(result.clone());
        Some(result)
    }

    /// Reset the reference to empty. Mode is left as is.
    pub fn clear(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.source = AssetSource::default();
        self.last_error = None;
        true
    }

    /// Delete the blob this resolver uploaded, then clear. `None` when the
    /// current reference was not produced by this resolver.
    pub async fn discard_uploaded(&mut self, client: &BlobClient) -> Option<BlobOutcome<()>> {
        let AssetSource::Uploaded { path, .. } = &self.source else {
            return None;
        };
        let outcome = client.delete(self.bucket, path).await;
        match outcome.error() {
            None => {
                self.clear();
            }
            Some(error) => self.fail(error.to_string()),
        }
        Some(outcome)
    }

    fn fail(&mut self, message: String) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(Notification::failure("Erreur", message.clone()));
        }
        self.last_error = Some(message);
    }
}

impl std::fmt::Debug for AssetInputResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetInputResolver")
            .field("bucket", &self.bucket)
            .field("mode", &self.mode)
            .field("source", &self.source)
            .field("last_error", &self.last_error)
            .finish()
    }
}
