use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fab_event_feed_lib::config::AppConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading config")?;
    let path = fab_event_feed_lib::run(&config).context("building event calendar")?;
    tracing::info!(path = %path.display(), "done");
    Ok(())
}
