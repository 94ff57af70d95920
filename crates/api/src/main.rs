//! Tank Monitor - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load configuration")?;
    init_logging(&settings.logging).context("failed to initialise logging")?;

    info!("=== Tank Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Alert policy: auto_resolve_on_normal={}",
        settings.alerts.auto_resolve_on_normal
    );

    run_server(settings).await?;

    Ok(())
}
