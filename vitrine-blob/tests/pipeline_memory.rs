use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use vitrine_blob::{
    validate, BlobBackend, BlobClient, BlobError, BlobResult, Bucket, FileUpload, MemoryBlobBackend,
    ObjectEntry, StoredObject, UploadOptions, ValidationError,
};

const MIB: usize = 1024 * 1024;

/// Test factory functions
fn create_memory_client() -> (Arc<MemoryBlobBackend>, BlobClient) {
    let backend = Arc::new(MemoryBlobBackend::new("https://assets.example.org"));
    let client = BlobClient::new(backend.clone());
    (backend, client)
}

fn png(name: &str, size: usize) -> FileUpload {
    FileUpload::new(name, "image/png", vec![0u8; size])
}

/// Backend whose every call panics
struct PanickingBackend;

#[async_trait]
impl BlobBackend for PanickingBackend {
    async fn upload(&self, _: Bucket, _: &str, _: Bytes, _: &UploadOptions) -> BlobResult<StoredObject> {
        panic!("connection pool poisoned")
    }

    async fn remove(&self, _: Bucket, _: &[String]) -> BlobResult<Vec<String>> {
        panic!("connection pool poisoned")
    }

    async fn list(&self, _: Bucket, _: Option<&str>, _: usize, _: usize) -> BlobResult<Vec<ObjectEntry>> {
        panic!("connection pool poisoned")
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!("https://nowhere/{bucket}/{key}")
    }
}

/// Backend that always reports a transport error
struct OfflineBackend;

#[async_trait]
impl BlobBackend for OfflineBackend {
    async fn upload(&self, _: Bucket, _: &str, _: Bytes, _: &UploadOptions) -> BlobResult<StoredObject> {
        Err(BlobError::rejected("quota exceeded"))
    }

    async fn remove(&self, _: Bucket, _: &[String]) -> BlobResult<Vec<String>> {
        Err(BlobError::rejected("quota exceeded"))
    }

    async fn list(&self, _: Bucket, _: Option<&str>, _: usize, _: usize) -> BlobResult<Vec<ObjectEntry>> {
        Err(BlobError::rejected("quota exceeded"))
    }

    fn public_url(&self, bucket: Bucket, key: &str) -> String {
        format!("https://nowhere/{bucket}/{key}")
    }
}

/// A. A 3 MiB png in the images bucket validates and uploads
#[tokio::test]
async fn test_valid_image_uploads_under_sanitized_name() {
    let (backend, client) = create_memory_client();
    let file = png("Fête de l'école.png", 3 * MIB);

    assert!(validate(&file, Bucket::Images).is_ok());
    let result = client.upload(Bucket::Images, &file, None).await;

    let url = result.url().expect("upload succeeds");
    assert!(url.ends_with("Fete-de-l-ecole.png"), "{url}");
    assert_eq!(backend.object_count(Bucket::Images).await, 1);
}

/// B. A 12 MiB pdf is refused for documents without touching the backend
#[tokio::test]
async fn test_oversized_document_never_reaches_backend() {
    let (backend, _client) = create_memory_client();
    let file = FileUpload::new("rapport.pdf", "application/pdf", vec![0u8; 12 * MIB]);

    let err = validate(&file, Bucket::Documents).unwrap_err();

    assert!(matches!(err, ValidationError::TooLarge { limit_mb: 10, .. }));
    assert!(err.to_string().contains("10MB"));
    assert_eq!(backend.object_count(Bucket::Documents).await, 0);
}

/// A video is not an image
#[test]
fn test_video_rejected_for_images_bucket() {
    let file = FileUpload::new("clip.mp4", "video/mp4", vec![0u8; 1024]);
    let err = validate(&file, Bucket::Images).unwrap_err();
    assert!(matches!(err, ValidationError::TypeNotAllowed { .. }));
}

#[tokio::test]
async fn test_public_url_matches_upload_url() {
    let (_backend, client) = create_memory_client();
    let result = client.upload(Bucket::Media, &png("cover.png", 64), None).await;

    let path = result.path().unwrap();
    assert_eq!(client.public_url(Bucket::Media, path), result.url().unwrap());
}

#[tokio::test]
async fn test_double_delete_reports_second_failure() {
    let (backend, client) = create_memory_client();
    let uploaded = client
        .upload(Bucket::Images, &png("logo.png", 64), Some("logo.png"))
        .await;
    assert!(uploaded.is_success());

    let first = client.delete(Bucket::Images, "logo.png").await;
    let second = client.delete(Bucket::Images, "logo.png").await;

    assert!(first.is_success());
    assert!(second.error().unwrap().contains("logo.png"));
    assert_eq!(backend.object_count(Bucket::Images).await, 0);
}

#[tokio::test]
async fn test_list_is_scoped_to_folder() {
    let (_backend, client) = create_memory_client();
    for path in ["events/a.png", "events/b.png", "partners/c.png"] {
        client.upload(Bucket::Images, &png("x.png", 8), Some(path)).await;
    }

    let listed = client.list(Bucket::Images, Some("events/")).await;

    let names: Vec<_> = listed
        .data()
        .unwrap()
        .iter()
        .map(|entry| entry.name.clone())
        .collect();
    assert_eq!(names, vec!["events/a.png", "events/b.png"]);
}

#[tokio::test]
async fn test_list_is_capped() {
    let (_backend, client) = create_memory_client();
    for i in 0..105 {
        client
            .upload(Bucket::Images, &png("x.png", 1), Some(&format!("bulk/{i:03}.png")))
            .await;
    }

    let listed = client.list(Bucket::Images, None).await;
    assert_eq!(listed.data().unwrap().len(), vitrine_blob::LIST_LIMIT);
}

#[tokio::test]
async fn test_backend_errors_become_failure_values() {
    let client = BlobClient::new(Arc::new(OfflineBackend));

    let upload = client.upload(Bucket::Images, &png("a.png", 8), None).await;
    let delete = client.delete(Bucket::Images, "a.png").await;
    let list = client.list(Bucket::Images, None).await;

    assert!(upload.error().unwrap().contains("quota exceeded"));
    assert!(delete.error().unwrap().contains("quota exceeded"));
    assert!(list.error().unwrap().contains("quota exceeded"));
}

#[tokio::test]
async fn test_backend_panics_become_failure_values() {
    let client = BlobClient::new(Arc::new(PanickingBackend));

    let upload = client.upload(Bucket::Images, &png("a.png", 8), None).await;
    let delete = client.delete(Bucket::Images, "a.png").await;
    let list = client.list(Bucket::Images, None).await;

    assert!(upload.error().unwrap().contains("connection pool poisoned"));
    assert!(delete.error().unwrap().contains("connection pool poisoned"));
    assert!(!list.is_success());
}
