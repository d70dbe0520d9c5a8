use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryItem {
    id: i64,
    video_id: String,
    video_title: Option<String>,
    channel_name: Option<String>,
    analysis_date: DateTime<Utc>,
    total_comments_analyzed: i64,
    average_sentiment: f64,
    source_type: String,
    analysis_data: Value,
}

pub(super) async fn list_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<HistoryItem>>>, ApiError> {
    let rows = sentinel_db::list_analysis_history(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| HistoryItem {
            id: row.id,
            video_id: row.video_id,
            video_title: row.video_title,
            channel_name: row.channel_name,
            analysis_date: row.analysis_date,
            total_comments_analyzed: row.total_comments_analyzed,
            average_sentiment: row.average_sentiment,
            source_type: row.source_type,
            analysis_data: row.analysis_data,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
