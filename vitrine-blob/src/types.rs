use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file picked by the operator: original name, declared type and bytes.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub body: Bytes,
}

impl FileUpload {
    pub fn new<N, T, B>(name: N, content_type: T, body: B) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        B: Into<Bytes>,
    {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Options forwarded to the backend on upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: Option<String>,
    pub cache_control: String,
    /// `false` means an existing object under the same key is rejected
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            content_type: None,
            cache_control: "3600".to_string(),
            upsert: false,
        }
    }
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_cache_control<S: Into<String>>(mut self, cache_control: S) -> Self {
        self.cache_control = cache_control.into();
        self
    }

    pub fn allow_overwrite(mut self) -> Self {
        self.upsert = true;
        self
    }
}

/// What the backend reports after storing an object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub path: String,
    pub size_bytes: u64,
    pub etag: Option<String>,
}

/// One entry of a bucket listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub name: String,
    pub size_bytes: u64,
    pub content_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Outcome of an upload. Exactly one variant, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UploadResult {
    Success { url: String, path: String },
    Failure { error: String },
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Success { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadResult::Success { url, .. } => Some(url),
            UploadResult::Failure { .. } => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            UploadResult::Success { path, .. } => Some(path),
            UploadResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadResult::Success { .. } => None,
            UploadResult::Failure { error } => Some(error),
        }
    }
}

/// Outcome of a delete or list call; failures carry the backend message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BlobOutcome<T> {
    Success { data: T },
    Failure { error: String },
}

impl<T> BlobOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, BlobOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            BlobOutcome::Success { data } => Some(data),
            BlobOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            BlobOutcome::Success { .. } => None,
            BlobOutcome::Failure { error } => Some(error),
        }
    }
}
