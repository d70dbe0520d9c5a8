use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_youtube_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ExtractIdBody {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ExtractIdData {
    video_id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommentsQuery {
    max_comments: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct CommentsData {
    comments: Vec<sentinel_core::Comment>,
    count: usize,
}

pub(super) async fn extract_id(
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ExtractIdBody>,
) -> Result<Json<ApiResponse<ExtractIdData>>, ApiError> {
    if body.url.trim().is_empty() {
        return Err(ApiError::new(req_id.0, "bad_request", "url is required"));
    }

    let Some(video_id) = sentinel_youtube::extract_video_id(&body.url) else {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "not a recognizable YouTube video URL",
        ));
    };

    Ok(Json(ApiResponse {
        data: ExtractIdData { video_id },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_metadata(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<sentinel_core::VideoMetadata>>, ApiError> {
    let metadata = state
        .youtube
        .get_video_metadata(&video_id)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: metadata,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_comments(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<ApiResponse<CommentsData>>, ApiError> {
    let max_comments = query
        .max_comments
        .unwrap_or(state.config.max_comments)
        .clamp(1, state.config.max_comments);

    let comments = state
        .youtube
        .get_comments(&video_id, max_comments)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    let count = comments.len();
    Ok(Json(ApiResponse {
        data: CommentsData { comments, count },
        meta: ResponseMeta::new(req_id.0),
    }))
}
