use anyhow::{Context, Result};
use wordcloud_service::mockgen::{Generator, MockgenConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "mockgen".to_string());
    let settings = MockgenConfig::load_from(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    let summary = Generator::new(settings)?.run().await;
    if summary.users_created == 0 && summary.failures > 0 {
        anyhow::bail!("no users could be created; is the forum backend running?");
    }
    Ok(())
}
