use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use vitrine_admin::{AdminApp, Command};
use vitrine_blob::{Bucket, MemoryBlobBackend};
use vitrine_core::VitrineConfig;

/// Test factory functions
fn create_memory_app() -> AdminApp {
    AdminApp::new(Arc::new(MemoryBlobBackend::new("https://assets.example.org")))
}

fn write_temp(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vitrine-admin-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

async fn run(app: &AdminApp, command: Command) -> Value {
    serde_json::from_str(&app.run(command).await.unwrap()).unwrap()
}

#[tokio::test]
async fn test_upload_list_delete_cycle() {
    let app = create_memory_app();
    let file = write_temp("Plan d'accès.png", &[0u8; 512]);

    let uploaded = run(
        &app,
        Command::Upload {
            bucket: Bucket::Images,
            file,
            path: None,
        },
    )
    .await;
    assert_eq!(uploaded["status"], "success");
    let path = uploaded["path"].as_str().unwrap().to_string();
    assert!(path.ends_with("Plan-d-acces.png"), "{path}");

    let listed = run(
        &app,
        Command::List {
            bucket: Bucket::Images,
            folder: None,
        },
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let url = run(
        &app,
        Command::Url {
            bucket: Bucket::Images,
            path: path.clone(),
        },
    )
    .await;
    assert_eq!(url["url"], uploaded["url"]);

    let deleted = run(
        &app,
        Command::Delete {
            bucket: Bucket::Images,
            path: path.clone(),
        },
    )
    .await;
    assert_eq!(deleted["status"], "success");

    let again = run(
        &app,
        Command::Delete {
            bucket: Bucket::Images,
            path,
        },
    )
    .await;
    assert_eq!(again["status"], "failure");
}

#[tokio::test]
async fn test_check_reports_policy_violation() {
    let app = create_memory_app();
    let file = write_temp("notes.txt", b"hello");

    let checked = run(
        &app,
        Command::Check {
            bucket: Bucket::Images,
            file,
        },
    )
    .await;

    assert_eq!(checked["valid"], false);
    assert!(checked["error"].as_str().unwrap().contains("text/plain"));
}

#[tokio::test]
async fn test_upload_refuses_invalid_file() {
    let app = create_memory_app();
    let file = write_temp("clip.mp4", &[0u8; 64]);

    let result = app
        .run(Command::Upload {
            bucket: Bucket::Documents,
            file,
            path: None,
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_memory_backend_from_config() {
    let mut config = VitrineConfig::new();
    config.load_pairs(
        "VITRINE__",
        vec![
            ("VITRINE__BLOB__BACKEND".to_string(), "memory".to_string()),
            ("VITRINE__BLOB__PUBLIC_URL".to_string(), "https://cdn.example.org".to_string()),
        ],
    );

    let app = AdminApp::from_config(&config.snapshot()).await.unwrap();

    assert_eq!(
        app.client().public_url(Bucket::Media, "a.mp4"),
        "https://cdn.example.org/storage/v1/object/public/media/a.mp4"
    );
}

#[tokio::test]
async fn test_unknown_backend_is_rejected() {
    let mut config = VitrineConfig::new();
    config.set("blob.backend", "ftp");

    assert!(AdminApp::from_config(&config.snapshot()).await.is_err());
}
