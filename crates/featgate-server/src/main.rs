//! Main entry point for the Featgate server.
//!
//! Loads configuration, initializes logging, connects the configured store
//! and keeps the feature lock service available until a shutdown signal.

use featgate_server::{
    model::{AppState, Configuration},
    startup,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;

    let logging_config = configuration.logging_config();
    let _logging_guard =
        startup::init_logging(&logging_config).map_err(|e| anyhow::anyhow!(e))?;

    let app_state = AppState::build(configuration).await?;
    info!(
        storage_mode = %app_state.persistence.storage_mode(),
        "Feature lock service registered"
    );

    startup::shutdown_signal().await;

    info!("Feature lock service deregistered");
    Ok(())
}
