//! API server — builds the router and runs the HTTP listener.

use crate::rest::{self, AppState};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use storepulse_core::config::AppConfig;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the application router. Exposed so tests can drive it
    /// without binding a socket.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/api/v1/metrics/dashboard", get(rest::dashboard_metrics))
            .route("/api/v1/metrics/funnel", get(rest::funnel_report))
            .route("/api/v1/recommendations", get(rest::recommendations))
            .route(
                "/api/v1/recommendations/categories",
                get(rest::recommendation_categories),
            )
            .route(
                "/api/v1/recommendations/impact",
                get(rest::recommendation_impact),
            )
            .route("/api/v1/store/overview", get(rest::store_overview))
            .route("/api/v1/store/sync", post(rest::store_sync))
            .route("/api/v1/alerts", get(rest::store_alerts))
            .route("/api/v1/health", get(rest::health_check))
            .fallback(rest::not_found)
            // Middleware
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the HTTP server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = Self::router(self.state.clone());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);
        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the Prometheus metrics exporter on its own port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        let handle = builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install_recorder()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");

        // Keep the handle alive
        std::mem::forget(handle);
        Ok(())
    }
}
