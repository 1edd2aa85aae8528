use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info};

use restogenie::config::Config;
use restogenie::http_server::start_http_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("🚀 Starting RestoGenie food image service...");
    info!("🌐 Starting HTTP server on port {}", config.port);

    if let Err(e) = start_http_server(config).await {
        error!("❌ HTTP server failed: {}", e);
        return Err(e);
    }

    Ok(())
}
