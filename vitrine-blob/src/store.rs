use async_trait::async_trait;
use bytes::Bytes;

use crate::{BlobResult, Bucket, ObjectEntry, StoredObject, UploadOptions};

/// Bucket-scoped object storage primitives, implemented by every backend.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Store `body` under `key`. Unless `options.upsert` is set, an existing
    /// object with the same key must be rejected.
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> BlobResult<StoredObject>;

    /// Remove objects by exact key. Returns the keys the backend removed.
    async fn remove(&self, bucket: Bucket, keys: &[String]) -> BlobResult<Vec<String>>;

    /// List objects under an optional prefix, ordering left to the backend.
    async fn list(
        &self,
        bucket: Bucket,
        prefix: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> BlobResult<Vec<ObjectEntry>>;

    /// Public URL for a key. Derived locally, no network round trip.
    fn public_url(&self, bucket: Bucket, key: &str) -> String;
}
