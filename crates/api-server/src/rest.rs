//! REST API handlers for the dashboard, funnel, recommendation, and store
//! endpoints. Every response carries a top-level `success` flag.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storepulse_analytics::alerts::{self, Alert};
use storepulse_analytics::{DashboardAggregator, DashboardMetrics, FunnelModel, FunnelReport, StoreOverview};
use storepulse_core::{AppConfig, Period, PulseError, PulseResult};
use storepulse_recommendations::{
    category_index, CategoryIndex, ImpactProjection, RankedRecommendation, RecommendationEngine,
};
use storepulse_storefront::{StorefrontClient, SyncSummary};
use tracing::{error, warn};

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<DashboardAggregator>,
    pub funnel: Arc<FunnelModel>,
    pub recommendations: Arc<RecommendationEngine>,
    pub storefront: Arc<StorefrontClient>,
    pub node_id: String,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> PulseResult<Self> {
        Ok(Self {
            dashboard: Arc::new(DashboardAggregator::new(config.analytics.clone())),
            funnel: Arc::new(FunnelModel::new(config.analytics.clone())),
            recommendations: Arc::new(RecommendationEngine::new()),
            storefront: Arc::new(StorefrontClient::new(&config.storefront)?),
            node_id: config.node_id.clone(),
        })
    }
}

/// Standard success envelope.
#[derive(Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl<T: Serialize> Envelope<T> {
    /// Envelope with a generation timestamp.
    fn stamped(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            generated_at: Some(Utc::now()),
        }
    }

    /// Envelope without a timestamp, for static payloads.
    fn plain(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
            generated_at: None,
        }
    }

    fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// Error wrapper mapping the core taxonomy onto HTTP status codes.
pub struct ApiError(PulseError);

impl From<PulseError> for ApiError {
    fn from(err: PulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PulseError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PulseError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            PulseError::UpstreamUnavailable(msg) => {
                warn!(error = %msg, "storefront API failure surfaced to caller");
                (StatusCode::BAD_GATEWAY, format!("Storefront API unavailable: {msg}"))
            }
            other => {
                error!(error = %other, "internal error");
                metrics::counter!("api.errors").increment(1);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

fn default_store_id() -> String {
    "demo".to_string()
}

#[derive(Deserialize)]
pub struct MetricsQuery {
    #[serde(default = "default_store_id")]
    pub store_id: String,
    pub period: Option<String>,
}

#[derive(Deserialize)]
pub struct StoreQuery {
    #[serde(default = "default_store_id")]
    pub store_id: String,
}

#[derive(Deserialize)]
pub struct RecommendationsQuery {
    #[serde(default = "default_store_id")]
    pub store_id: String,
    /// Parsed manually so a non-numeric value is a 400, not a silent default.
    pub limit: Option<String>,
}

/// GET /api/v1/metrics/dashboard — full dashboard payload.
pub async fn dashboard_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<Envelope<DashboardMetrics>>, ApiError> {
    metrics::counter!("api.dashboard_requests").increment(1);

    // Unrecognized period codes fall back to 30d; this is the one
    // sanctioned silent default in the API.
    let period = Period::parse(query.period.as_deref().unwrap_or("30d"));
    let mut rng = rand::thread_rng();
    let data = state.dashboard.metrics(&mut rng, &query.store_id, period)?;
    Ok(Json(Envelope::stamped(data)))
}

/// GET /api/v1/metrics/funnel — five-stage funnel report.
pub async fn funnel_report(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<Envelope<FunnelReport>>, ApiError> {
    metrics::counter!("api.funnel_requests").increment(1);

    let period = Period::parse(query.period.as_deref().unwrap_or("30d"));
    let mut rng = rand::thread_rng();
    let data = state.funnel.report(&mut rng, &query.store_id, period)?;
    Ok(Json(Envelope::stamped(data)))
}

/// GET /api/v1/recommendations — ranked recommendations.
pub async fn recommendations(
    State(state): State<AppState>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<Envelope<Vec<RankedRecommendation>>>, ApiError> {
    metrics::counter!("api.recommendation_requests").increment(1);

    let limit = match query.limit.as_deref() {
        None => 5,
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            warn!(limit = raw, "rejected non-numeric recommendation limit");
            metrics::counter!("api.validation_errors").increment(1);
            PulseError::InvalidArgument(format!("limit must be a non-negative integer, got '{raw}'"))
        })?,
    };

    let data = state.recommendations.rank(&query.store_id, limit, Utc::now());
    let count = data.len();
    Ok(Json(Envelope::stamped(data).with_count(count)))
}

/// GET /api/v1/recommendations/categories — filter metadata.
pub async fn recommendation_categories() -> Json<Envelope<CategoryIndex>> {
    Json(Envelope::plain(category_index()))
}

/// GET /api/v1/recommendations/impact — aggregate revenue projection.
pub async fn recommendation_impact(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Json<Envelope<ImpactProjection>> {
    let data = state.recommendations.potential_impact(&query.store_id, Utc::now());
    Json(Envelope::stamped(data))
}

/// GET /api/v1/store/overview — store profile with health score.
pub async fn store_overview(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Json<Envelope<StoreOverview>> {
    let data = state.dashboard.store_overview(&query.store_id, Utc::now());
    Json(Envelope::plain(data))
}

/// POST /api/v1/store/sync — pull fresh figures from the storefront
/// platform. Upstream failures surface as 502, never as silent defaults.
pub async fn store_sync(
    State(state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Result<Json<Envelope<SyncSummary>>, ApiError> {
    let data = state.storefront.sync_summary(&query.store_id).await?;
    Ok(Json(Envelope::stamped(data)))
}

/// GET /api/v1/alerts — active alerts for a store.
pub async fn store_alerts(
    State(_state): State<AppState>,
    Query(query): Query<StoreQuery>,
) -> Json<Envelope<Vec<Alert>>> {
    let data = alerts::active_alerts(&query.store_id, Utc::now());
    let count = data.len();
    Json(Envelope::plain(data).with_count(count))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// GET /api/v1/health — health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            success: false,
            error: "Not found".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1. Error taxonomy -> status mapping -----------------------------------

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                PulseError::InvalidArgument("bad limit".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                PulseError::NotFound("no such store".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                PulseError::UpstreamUnavailable("connection refused".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                PulseError::Internal(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces_to_caller() {
        let err = PulseError::UpstreamUnavailable("connection refused".to_string());
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn test_internal_error_body_stays_generic() {
        let err = PulseError::Internal(anyhow::anyhow!("db exploded"));
        let response = ApiError::from(err).into_response();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Internal server error");
    }
}
