use tracing_subscriber::EnvFilter;
use xemphim_core::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "xemphim=info".into()),
        )
        .init();

    let config = AppConfig::load()?;
    xemphim_server::run(&config.server).await?;
    Ok(())
}
