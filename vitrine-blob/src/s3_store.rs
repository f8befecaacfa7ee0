use std::env;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream as AwsByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;
use bytes::Bytes;

use crate::{BlobBackend, BlobError, BlobResult, Bucket, ObjectEntry, StoredObject, UploadOptions};

/// S3-compatible storage settings
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: String,
    /// Base under which objects are publicly readable, e.g. a CDN origin
    pub public_url: String,
    /// Prepended to every bucket name (`prod-` → `prod-images`)
    pub bucket_prefix: String,
}

impl S3Config {
    pub fn from_env() -> BlobResult<Self> {
        fn get_env(key: &str) -> BlobResult<String> {
            env::var(key).map_err(|_| BlobError::invalid(format!("{} environment variable required", key)))
        }

        Ok(Self {
            region: get_env("VITRINE_S3_REGION")?,
            access_key_id: get_env("VITRINE_S3_ACCESS_KEY_ID")?,
            secret_access_key: get_env("VITRINE_S3_SECRET_ACCESS_KEY")?,
            endpoint_url: get_env("VITRINE_S3_ENDPOINT_URL")?,
            public_url: get_env("VITRINE_S3_PUBLIC_URL")?,
            bucket_prefix: env::var("VITRINE_S3_BUCKET_PREFIX").unwrap_or_default(),
        })
    }

    pub fn bucket_name(&self, bucket: Bucket) -> String {
        format!("{}{}", self.bucket_prefix, bucket.as_str())
    }
}

/// Blob backend over any S3-compatible service (AWS, MinIO, RustFS, ...)
#[derive(Clone)]
pub struct S3BlobBackend {
    client: Client,
    config: S3Config,
}

impl S3BlobBackend {
    pub async fn new(config: S3Config) -> Self {
        let client = Self::create_client(&config).await;
        Self { client, config }
    }

    pub async fn from_env() -> BlobResult<Self> {
        Ok(Self::new(S3Config::from_env()?).await)
    }

    async fn create_client(config: &S3Config) -> Client {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "vitrine",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url.clone())
            .load()
            .await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build(),
        )
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> BlobError {
        BlobError::backend(err)
    }

    /// A conditional put answered with PreconditionFailed means the key is taken.
    fn map_put_error<E, R>(key: &str, err: SdkError<E, R>) -> BlobError
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        if err.code() == Some("PreconditionFailed") {
            return BlobError::already_exists(key);
        }
        Self::map_aws_error(err)
    }
}

#[async_trait]
impl BlobBackend for S3BlobBackend {
    async fn upload(
        &self,
        bucket: Bucket,
        key: &str,
        body: Bytes,
        options: &UploadOptions,
    ) -> BlobResult<StoredObject> {
        let size_bytes = body.len() as u64;
        let mut request = self
            .client
            .put_object()
            .bucket(self.config.bucket_name(bucket))
            .key(key)
            .cache_control(format!("max-age={}", options.cache_control))
            .body(AwsByteStream::from(body.to_vec()));

        if let Some(ct) = &options.content_type {
            request = request.content_type(ct);
        }
        if !options.upsert {
            request = request.if_none_match("*");
        }

        let result = request
            .send()
            .await
            .map_err(|e| Self::map_put_error(key, e))?;

        tracing::debug!(bucket = %bucket, key, size_bytes, "s3 object stored");
        Ok(StoredObject {
            path: key.to_string(),
            size_bytes,
            etag: result.e_tag,
        })
    }

    async fn remove(&self, bucket: Bucket, keys: &[String]) -> BlobResult<Vec<String>> {
        let objects = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build().map_err(BlobError::backend))
            .collect::<BlobResult<Vec<_>>>()?;
        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(BlobError::backend)?;

        let result = self
            .client
            .delete_objects()
            .bucket(self.config.bucket_name(bucket))
            .delete(delete)
            .send()
            .await
            .map_err(Self::map_aws_error)?;

        if let Some(failed) = result.errors().first() {
            return Err(BlobError::rejected(format!(
                "{}: {}",
                failed.key().unwrap_or_default(),
                failed.message().unwrap_or("delete failed")
            )));
        }

        Ok(result
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(str::to_string))
            .collect())
    }

    async fn list(
        &self,
        bucket: Bucket,
        prefix: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> BlobResult<Vec<ObjectEntry>> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(self.config.bucket_name(bucket))
            .max_keys((limit + offset).min(1000) as i32);

        if let Some(prefix) = prefix {
            request = request.prefix(prefix);
        }

        let result = request
            .send()
            .await
            .map_err(Self::map_aws_error)?;

        // S3 has no offset; skip client-side.
        Ok(result
            .contents()
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|object| {
                let name = object.key()?.to_string();
                Some(ObjectEntry {
                    name,
                    size_bytes: object.size().unwrap_or(0).max(0) as u64,
                    content_type: None,
                    created_at: object
                        .last_modified()
                        .and_then(|dt| chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
                })
            })
            .collect())
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.public_url.trim_end_matches('/'),
            self.config.bucket_name(bucket),
            key
        )
    }
}
