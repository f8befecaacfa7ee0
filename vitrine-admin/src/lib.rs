mod app;
mod commands;

pub use app::{AdminApp, BackendKind};
pub use commands::{Command, USAGE};

/// Read configuration from the environment and wire the blob backend.
pub async fn build() -> anyhow::Result<AdminApp> {
    let mut config = vitrine_core::VitrineConfig::new();
    config.load_env("VITRINE__");
    AdminApp::from_config(&config.snapshot()).await
}
