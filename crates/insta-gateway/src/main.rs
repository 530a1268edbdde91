//! insta-gateway: Instagram Gateway Main Binary
//!
//! Main entry point for the Instagram gateway application.
//!
//! Usage:
//!   insta-gateway           - Start the HTTP API server
//!   insta-gateway --help    - Show help
//!   insta-gateway --version - Show version

use std::sync::Arc;

use insta_client::{BridgeClientFactory, ClientManager, FileSessionStore, InstagramHandler};
use insta_core::Config;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Server mode (HTTP API)
    Server,
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("insta-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting {}...", config.app.name);
    tracing::info!("Bridge URL: {}", config.instagram.bridge_url);
    tracing::info!("Sessions directory: {}", config.instagram.sessions_dir);

    // Wire the Instagram client shim
    let factory = Arc::new(BridgeClientFactory::new(
        &config.instagram.bridge_url,
        config.instagram.timeout_secs,
    ));
    let sessions = FileSessionStore::new(config.instagram.sessions_dir.clone());
    let manager = Arc::new(ClientManager::new(factory, sessions));
    let handler = Arc::new(InstagramHandler::new(manager));

    // Start HTTP API server
    let port = config.api.port;
    let server_config = config.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = insta_api::start_server(port, server_config, handler).await {
            tracing::error!("HTTP API error: {}", e);
        }
    });
    tracing::info!("HTTP API server started on port {}", port);
    tracing::info!("Press Ctrl+C to exit");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    server_handle.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    let args: Vec<String> = std::env::args().collect();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Server
}

/// Print help message
fn print_help() {
    println!("insta-gateway - Instagram Gateway");
    println!();
    println!("Usage:");
    println!("  insta-gateway           Start the HTTP API server");
    println!("  insta-gateway --help    Show this help message");
    println!("  insta-gateway --version Show version");
    println!();
    println!("Environment Variables:");
    println!("  APP_NAME                 Service name (default: insta-gateway)");
    println!("  APP_DEBUG                Enable debug behavior (default: false)");
    println!("  API_PORT                 HTTP API port (default: 8001)");
    println!("  INSTAGRAM_BRIDGE_URL     Instagram bridge base URL (default: http://localhost:8000)");
    println!("  INSTAGRAM_SESSIONS_DIR   Session file directory (default: sessions)");
    println!("  INSTAGRAM_TIMEOUT_SECS   Bridge request timeout (default: 30)");
}
