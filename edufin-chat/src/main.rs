//! EduFin Chat - Main entry point.

use anyhow::Result;
use edufin_chat::start_server;
use edufin_common::config::Config;
use edufin_common::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load_with_env()?;
    config.validate()?;

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );

    tracing::info!("EduFin Chat v{}", env!("CARGO_PKG_VERSION"));

    // Start the HTTP server
    start_server(&config).await
}
