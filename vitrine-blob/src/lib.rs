//! # vitrine-blob: asset ingestion for the Vitrine admin backend
//!
//! Files picked by an operator travel through a short pipeline before they
//! become a URL on a catalog record:
//!
//! ```text
//! ┌─────────────────┐
//! │    validate     │  ← per-bucket size/type policy, local and pure
//! ├─────────────────┤
//! │   KeyStrategy   │  ← `{millis}-{token}-{sanitized name}`
//! ├─────────────────┤
//! │   BlobClient    │  ← outcome values, never raises
//! ├─────────────────┤
//! │   BlobBackend   │  ← memory or any S3-compatible service
//! └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use vitrine_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let client = BlobClient::new(Arc::new(MemoryBlobBackend::default()));
//! let file = FileUpload::new("Affiche été.png", "image/png", vec![0u8; 1024]);
//!
//! validate(&file, Bucket::Images).expect("within policy");
//! let result = client.upload(Bucket::Images, &file, None).await;
//! assert!(result.url().unwrap().ends_with("Affiche-ete.png"));
//! # }
//! ```

mod client;
mod error;
mod keys;
mod memory_store;
mod policy;
mod s3_store;
pub mod store;
mod types;

pub use client::{BlobClient, LIST_LIMIT};
pub use error::{BlobError, BlobResult, ValidationError};
pub use keys::{compose_key, sanitize_filename, KeyStrategy, TimestampKeyStrategy};
pub use memory_store::MemoryBlobBackend;
pub use policy::{validate, Bucket, BucketPolicy};
pub use s3_store::{S3BlobBackend, S3Config};
pub use store::BlobBackend;
pub use types::{BlobOutcome, FileUpload, ObjectEntry, StoredObject, UploadOptions, UploadResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        validate, BlobBackend, BlobClient, BlobError, BlobOutcome, BlobResult, Bucket,
        FileUpload, MemoryBlobBackend, UploadResult, ValidationError,
    };
}
