use std::time::Duration;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use sentinel_analysis::{AggregatedAnalysis, BulkOptions, CancelToken};
use sentinel_core::{Comment, VideoMetadata};

use crate::middleware::RequestId;

use super::{map_analysis_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct BulkCommentsBody {
    #[serde(default)]
    comments: Vec<Comment>,
    #[serde(default)]
    video: Option<VideoMetadata>,
    #[serde(default = "default_save")]
    save: bool,
}

fn default_save() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub(super) struct BulkCommentsData {
    analysis: AggregatedAnalysis,
    comments_analyzed: usize,
    analysis_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TextBody {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
pub(super) struct IdeasData {
    ideas: Vec<String>,
}

pub(super) async fn analyze_bulk_comments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<BulkCommentsBody>,
) -> Result<Json<ApiResponse<BulkCommentsData>>, ApiError> {
    if body.comments.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "comments are required",
        ));
    }

    let options = BulkOptions {
        chunk_size: state.config.chunk_size,
        inter_chunk_delay: Duration::from_secs(state.config.inter_chunk_delay_secs),
        max_comments: state.config.max_comments,
    };

    let progress = |done: usize, total: usize, label: &str| {
        tracing::info!(done, total, label, "bulk analysis progress");
    };

    let analysis = sentinel_analysis::analyze_bulk(
        &state.analyzer,
        &body.comments,
        &options,
        &CancelToken::new(),
        Some(&progress),
    )
    .await;

    // Persistence mirrors the analysis result; a storage failure is logged
    // and does not fail the request.
    let mut analysis_id = None;
    if body.save {
        if let Some(video) = &body.video {
            analysis_id = store_analysis(&state, video, &analysis, &body.comments).await;
        }
    }

    Ok(Json(ApiResponse {
        data: BulkCommentsData {
            comments_analyzed: body.comments.len(),
            analysis,
            analysis_id,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Persist an aggregate and its comments, returning the analysis row id.
/// Failures are logged, never propagated.
async fn store_analysis(
    state: &AppState,
    video: &VideoMetadata,
    analysis: &AggregatedAnalysis,
    comments: &[Comment],
) -> Option<i64> {
    let analysis_data = match serde_json::to_value(analysis) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize analysis for storage");
            return None;
        }
    };

    let total = i64::try_from(comments.len()).unwrap_or(i64::MAX);
    let analysis_id = match sentinel_db::insert_analysis(
        &state.pool,
        &video.id,
        Some(&video.title),
        Some(&video.channel),
        Utc::now(),
        total,
        analysis.overall_sentiment.average_score,
        &analysis_data,
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(video_id = %video.id, error = %e, "failed to store analysis");
            return None;
        }
    };

    if let Err(e) =
        sentinel_db::insert_comments(&state.pool, analysis_id, &video.id, comments).await
    {
        tracing::warn!(video_id = %video.id, error = %e, "failed to store comments");
    }

    Some(analysis_id)
}

pub(super) async fn analyze_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TextBody>,
) -> Result<Json<ApiResponse<sentinel_analysis::TextAnalysis>>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "text is required"));
    }

    let result = state
        .analyzer
        .analyze_text(&body.text)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn extract_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<TextBody>,
) -> Result<Json<ApiResponse<IdeasData>>, ApiError> {
    if body.text.trim().is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "text is required"));
    }

    let ideas = state
        .analyzer
        .extract_ideas(&body.text)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: IdeasData { ideas },
        meta: ResponseMeta::new(req_id.0),
    }))
}
