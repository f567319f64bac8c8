use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{SiteConfig, dist_dir_from_env_value, site_addr_from_env_values};
use medtour_core::CoreConfig;
use medtour_core::config::{api_base_url_from_env_value, request_timeout_from_env_value};

/// Main entry point for the Medtour site server
///
/// Serves the built front end and the site JSON endpoints from one HTTP listener.
///
/// # Environment Variables
/// - `MEDTOUR_API_URL`: catalogue backend base URL (default: "http://localhost:8000")
/// - `MEDTOUR_REQUEST_TIMEOUT_SECS`: per-request backend timeout in whole seconds (default: 10)
/// - `MEDTOUR_SITE_ADDR`: bind address; overrides `PORT` when set
/// - `PORT`: port to bind on 0.0.0.0 (default: 8080)
/// - `MEDTOUR_DIST_DIR`: front-end build directory (default: "dist/medical-tourism/browser")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medtour_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::new(
        api_base_url_from_env_value(std::env::var("MEDTOUR_API_URL").ok()),
        request_timeout_from_env_value(std::env::var("MEDTOUR_REQUEST_TIMEOUT_SECS").ok())?,
    )?;

    let site = SiteConfig::new(
        site_addr_from_env_values(
            std::env::var("MEDTOUR_SITE_ADDR").ok(),
            std::env::var("PORT").ok(),
        )?,
        dist_dir_from_env_value(std::env::var("MEDTOUR_DIST_DIR").ok()),
    )?;

    api_rest::serve(cfg, site, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("-- Shutdown requested");
}
