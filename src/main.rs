//! chatterd - multi-room chat server.
//!
//! A line-based TCP transport and a REST gateway drive one shared chat
//! engine.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chatterd::chat::ChatService;
use chatterd::config::Config;
use chatterd::network::Gateway;
use chatterd::sink::FileSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        listen = %config.server.addr(),
        api_port = config.api.port,
        log_file = %config.log_file.display(),
        "Starting chatterd"
    );

    // Engine: seeded once, shared with both collaborators.
    let sink = Arc::new(FileSink::open(&config.log_file).await?);
    let service = Arc::new(ChatService::new(sink));
    service.run().await;

    // REST gateway runs beside the line transport.
    {
        let service = Arc::clone(&service);
        let port = config.api.port;
        tokio::spawn(async move {
            chatterd::http::run_http_server(port, service).await;
        });
    }

    let gateway = Gateway::bind(&config.server.addr(), Arc::clone(&service)).await?;
    gateway.run().await
}
