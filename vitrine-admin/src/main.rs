use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let command = vitrine_admin::Command::parse(std::env::args().skip(1))?;
    let app = vitrine_admin::build().await?;

    let output = app.run(command).await?;
    println!("{output}");

    Ok(())
}
