use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::{
    BlobBackend, BlobOutcome, BlobResult, Bucket, FileUpload, KeyStrategy, ObjectEntry,
    TimestampKeyStrategy, UploadOptions, UploadResult,
};

/// Listing cap applied by [`BlobClient::list`].
pub const LIST_LIMIT: usize = 100;

/// Bucket client used by the admin workflows.
///
/// Every operation returns an outcome value. Backend errors, and panics
/// raised inside a backend future, come back as the failure variant.
#[derive(Clone)]
pub struct BlobClient {
    backend: Arc<dyn BlobBackend>,
    keys: Arc<dyn KeyStrategy>,
}

impl BlobClient {
    pub fn new(backend: Arc<dyn BlobBackend>) -> Self {
        Self {
            backend,
            keys: Arc::new(TimestampKeyStrategy),
        }
    }

    pub fn with_key_strategy(mut self, keys: Arc<dyn KeyStrategy>) -> Self {
        self.keys = keys;
        self
    }

    pub fn backend(&self) -> &Arc<dyn BlobBackend> {
        &self.backend
    }

    /// Store `file` under `path`, or under a generated key when `path` is
    /// `None`. Existing objects are never overwritten.
    pub async fn upload(&self, bucket: Bucket, file: &FileUpload, path: Option<&str>) -> UploadResult {
        let key = match path {
            Some(path) => path.to_string(),
            None => self.keys.object_key(&file.name),
        };
        let options = UploadOptions::new().with_content_type(file.content_type.clone());

        tracing::debug!(bucket = %bucket, key = %key, size = file.size(), "uploading object");

        let stored = guarded(
            "upload",
            self.backend.upload(bucket, &key, file.body.clone(), &options),
        )
        .await;

        match stored {
            Ok(stored) => {
                let url = self.backend.public_url(bucket, &stored.path);
                tracing::info!(bucket = %bucket, path = %stored.path, "upload stored");
                UploadResult::Success {
                    url,
                    path: stored.path,
                }
            }
            Err(error) => {
                tracing::error!(bucket = %bucket, key = %key, error = %error, "upload failed");
                UploadResult::Failure { error }
            }
        }
    }

    /// Remove one object by exact key. A missing key is reported as the
    /// backend reports it.
    pub async fn delete(&self, bucket: Bucket, path: &str) -> BlobOutcome<()> {
        let keys = vec![path.to_string()];
        match guarded("delete", self.backend.remove(bucket, &keys)).await {
            Ok(_) => {
                tracing::info!(bucket = %bucket, path, "object deleted");
                BlobOutcome::Success { data: () }
            }
            Err(error) => {
                tracing::error!(bucket = %bucket, path, error = %error, "delete failed");
                BlobOutcome::Failure { error }
            }
        }
    }

    /// Up to [`LIST_LIMIT`] entries under an optional folder prefix.
    pub async fn list(&self, bucket: Bucket, folder: Option<&str>) -> BlobOutcome<Vec<ObjectEntry>> {
        match guarded("list", self.backend.list(bucket, folder, LIST_LIMIT, 0)).await {
            Ok(data) => BlobOutcome::Success { data },
            Err(error) => {
                tracing::error!(bucket = %bucket, folder, error = %error, "list failed");
                BlobOutcome::Failure { error }
            }
        }
    }

    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        self.backend.public_url(bucket, path)
    }
}

/// Await a backend call, turning both its error and any panic into a message.
async fn guarded<T, F>(operation: &'static str, call: F) -> Result<T, String>
where
    F: Future<Output = BlobResult<T>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(operation, panic = %message, "storage backend panicked");
            Err(format!("Unexpected storage failure: {message}"))
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}
