//! # API REST
//!
//! HTTP front for the Medtour site.
//!
//! Handles:
//! - static hosting of the built single-page application with deep-link fallback
//! - site JSON endpoints that run the core list and search components per request
//! - the OpenAPI document for those endpoints
//!
//! Uses `medtour-core` for all catalogue logic; nothing here talks to the backend directly.

#![warn(rust_2018_idioms)]

pub mod config;
mod site;
mod spa;

pub use config::{dist_dir_from_env_value, site_addr_from_env_values, SiteConfig};
pub use site::ApiDoc;
pub use spa::STATIC_CACHE_CONTROL;

use axum::routing::get;
use axum::Router;
use medtour_core::{CoreConfig, HttpCatalogClient};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for the site handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    client: Arc<HttpCatalogClient>,
    site: Arc<SiteConfig>,
}

impl AppState {
    /// Build the state from configuration resolved at startup.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(cfg: CoreConfig, site: SiteConfig) -> anyhow::Result<Self> {
        let client = HttpCatalogClient::new(&cfg)?;
        Ok(Self {
            cfg: Arc::new(cfg),
            client: Arc::new(client),
            site: Arc::new(site),
        })
    }
}

/// The full site router: JSON endpoints first, everything else served from the build directory.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(site::health))
        .route("/api/site/doctors", get(site::doctors))
        .route("/api/site/treatments", get(site::treatments))
        .route("/api/site/search", get(site::search))
        .route("/api/site/filters/doctors", get(site::doctor_filters))
        .route("/api/site/filters/treatments", get(site::treatment_filters))
        .route("/api-docs/openapi.json", get(site::openapi))
        .layer(CorsLayer::permissive());

    api.fallback(spa::serve_spa).with_state(state)
}

/// Bind and serve until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(
    cfg: CoreConfig,
    site: SiteConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = site.addr();
    tracing::info!(
        "-- Serving {} on {} (catalogue API {})",
        site.dist_dir().display(),
        addr,
        cfg.api_base_url()
    );

    let app = router(AppState::new(cfg, site)?);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("-- Site server stopped");
    Ok(())
}
