mod analysis;
mod history;
mod videos;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub youtube: Arc<sentinel_youtube::YoutubeClient>,
    pub analyzer: Arc<sentinel_analysis::AnalysisClient>,
    pub config: Arc<sentinel_core::AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "quota_exceeded" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(10).clamp(1, 100)
}

pub(super) fn map_db_error(request_id: String, error: &sentinel_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

pub(super) fn map_youtube_error(
    request_id: String,
    error: &sentinel_youtube::YoutubeError,
) -> ApiError {
    use sentinel_youtube::YoutubeError;
    match error {
        YoutubeError::NotFound { video_id } => ApiError::new(
            request_id,
            "not_found",
            format!("video not found: {video_id}"),
        ),
        YoutubeError::QuotaExceeded { message } => {
            ApiError::new(request_id, "quota_exceeded", message.clone())
        }
        other => {
            tracing::error!(error = %other, "YouTube API call failed");
            ApiError::new(request_id, "upstream_error", other.to_string())
        }
    }
}

pub(super) fn map_analysis_error(
    request_id: String,
    error: &sentinel_analysis::AnalysisError,
) -> ApiError {
    use sentinel_analysis::AnalysisError;
    match error {
        AnalysisError::QuotaExceeded { message } => {
            ApiError::new(request_id, "quota_exceeded", message.clone())
        }
        AnalysisError::Blocked { .. }
        | AnalysisError::EmptyResponse
        | AnalysisError::MalformedResponse { .. }
        | AnalysisError::UnexpectedStatus { .. }
        | AnalysisError::Transport(_) => {
            tracing::error!(error = %error, "analysis call failed");
            ApiError::new(request_id, "upstream_error", error.to_string())
        }
        AnalysisError::Configuration => {
            tracing::error!("analysis client misconfigured");
            ApiError::new(request_id, "internal_error", "analysis not configured")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/videos/extract-id", post(videos::extract_id))
        .route(
            "/api/v1/videos/{video_id}/metadata",
            get(videos::get_metadata),
        )
        .route(
            "/api/v1/videos/{video_id}/comments",
            get(videos::get_comments),
        )
        .route(
            "/api/v1/analysis/bulk-comments",
            post(analysis::analyze_bulk_comments),
        )
        .route("/api/v1/analysis/text", post(analysis::analyze_text))
        .route("/api/v1/analysis/ideas", post(analysis::extract_ideas))
        .route("/api/v1/history", get(history::list_history))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match sentinel_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
