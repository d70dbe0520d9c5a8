//! Database operations for the `video_analysis` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `video_analysis` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub video_id: String,
    pub video_title: Option<String>,
    pub channel_name: Option<String>,
    pub analysis_date: DateTime<Utc>,
    pub total_comments_analyzed: i64,
    pub average_sentiment: f64,
    /// The full serialized aggregate, stored as JSON text.
    pub analysis_data: Value,
    pub source_type: String,
}

/// Insert a new analysis and return its generated id.
///
/// `average_sentiment` should be in [-1.0, 1.0]; `analysis_data` is the
/// serialized aggregate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
#[allow(clippy::too_many_arguments)]
pub async fn insert_analysis(
    pool: &SqlitePool,
    video_id: &str,
    video_title: Option<&str>,
    channel_name: Option<&str>,
    analysis_date: DateTime<Utc>,
    total_comments_analyzed: i64,
    average_sentiment: f64,
    analysis_data: &Value,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO video_analysis \
             (video_id, video_title, channel_name, analysis_date, \
              total_comments_analyzed, average_sentiment, analysis_data, source_type) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'comments') \
         RETURNING id",
    )
    .bind(video_id)
    .bind(video_title)
    .bind(channel_name)
    .bind(analysis_date)
    .bind(total_comments_analyzed)
    .bind(average_sentiment)
    .bind(analysis_data)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List recent analyses, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_analysis_history(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<AnalysisRow>, DbError> {
    let rows = sqlx::query_as::<_, AnalysisRow>(
        "SELECT id, video_id, video_title, channel_name, analysis_date, \
                total_comments_analyzed, average_sentiment, analysis_data, source_type \
         FROM video_analysis \
         ORDER BY analysis_date DESC, id DESC \
         LIMIT ?1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one analysis by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_analysis(pool: &SqlitePool, id: i64) -> Result<Option<AnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(
        "SELECT id, video_id, video_title, channel_name, analysis_date, \
                total_comments_analyzed, average_sentiment, analysis_data, source_type \
         FROM video_analysis \
         WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
