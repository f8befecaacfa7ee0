use std::collections::BTreeMap;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{BlobBackend, BlobError, BlobResult, Bucket, ObjectEntry, StoredObject, UploadOptions};

#[derive(Debug, Clone)]
struct StoredBlob {
    body: Bytes,
    content_type: Option<String>,
    created_at: DateTime<Utc>,
}

/// In-memory backend for tests and local development.
///
/// Public URLs follow the hosted layout
/// `{base}/storage/v1/object/public/{bucket}/{key}`.
pub struct MemoryBlobBackend {
    base_url: String,
    objects: RwLock<BTreeMap<(Bucket, String), StoredBlob>>,
}

impl MemoryBlobBackend {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(BTreeMap::new()),
        }
    }

    /// Bytes stored under a key, if any.
    pub async fn read(&self, bucket: Bucket, key: &str) -> Option<Bytes> {
        let objects = self.objects.read().await;
        objects
            .get(&(bucket, key.to_string()))
            .map(|blob| blob.body.clone())
    }

    pub async fn object_count(&self, bucket: Bucket) -> usize {
        let objects = self.objects.read().await;
        objects.keys().filter(|(b, _)| *b == bucket).count()
    }
}

impl Default for MemoryBlobBackend {
    fn default() -> Self {
        Self::new("http://localhost:54321")
    }
}

#[async_trait]
impl BlobBackend for MemoryBlobBackend {
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> BlobResult<StoredObject> {
        if key.is_empty() {
            return Err(BlobError::invalid("object key must not be empty"));
        }

        let mut objects = self.objects.write().await;
        let slot = (bucket, key.to_string());
        if !options.upsert && objects.contains_key(&slot) {
            return Err(BlobError::already_exists(key));
        }

        let size_bytes = body.len() as u64;
        objects.insert(
            slot,
            StoredBlob {
                body,
                content_type: options.content_type.clone(),
                created_at: Utc::now(),
            },
        );

        Ok(StoredObject {
            path: key.to_string(),
            size_bytes,
            etag: None,
        })
    }

    async fn remove(&self, bucket: Bucket, keys: &[String]) -> BlobResult<Vec<String>> {
        let mut objects = self.objects.write().await;
        if let Some(missing) = keys
            .iter()
            .find(|k| !objects.contains_key(&(bucket, (*k).clone())))
        {
            return Err(BlobError::not_found(missing.clone()));
        }

        for key in keys {
            objects.remove(&(bucket, key.clone()));
        }
        Ok(keys.to_vec())
    }

    async fn list(
        &self,
        bucket: Bucket,
        prefix: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> BlobResult<Vec<ObjectEntry>> {
        let objects = self.objects.read().await;
        let prefix = prefix.unwrap_or("");

        Ok(objects
            .iter()
            .filter(|((b, key), _)| *b == bucket && key.starts_with(prefix))
            .skip(offset)
            .take(limit)
            .map(|((_, key), blob)| ObjectEntry {
                name: key.clone(),
                size_bytes: blob.body.len() as u64,
                content_type: blob.content_type.clone(),
                created_at: Some(blob.created_at),
            })
            .collect())
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket.as_str(),
            key
        )
    }
}
