//! Database operations for the `comments` table.

use chrono::{DateTime, Utc};
use sentinel_core::Comment;
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `comments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub analysis_id: i64,
    pub video_id: String,
    pub comment_id: Option<String>,
    pub author: Option<String>,
    pub text: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub like_count: i64,
    pub reply_count: i64,
    pub sentiment_score: f64,
}

/// Insert the comments behind one analysis, skipping duplicates.
///
/// `comment_id` carries a UNIQUE constraint; `INSERT OR IGNORE` keeps a
/// comment already stored by an earlier analysis from failing the batch.
/// Returns the number of rows actually inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn insert_comments(
    pool: &SqlitePool,
    analysis_id: i64,
    video_id: &str,
    comments: &[Comment],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for comment in comments {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO comments \
                 (analysis_id, video_id, comment_id, author, text, \
                  published_at, like_count, reply_count) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(analysis_id)
        .bind(video_id)
        .bind(comment.id.as_deref())
        .bind(&comment.author)
        .bind(&comment.text)
        .bind(comment.published_at)
        .bind(comment.like_count)
        .bind(comment.reply_count)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    tracing::debug!(analysis_id, inserted, total = comments.len(), "stored comments");
    Ok(inserted)
}

/// List the stored comments for one analysis, in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_comments_for_analysis(
    pool: &SqlitePool,
    analysis_id: i64,
) -> Result<Vec<CommentRow>, DbError> {
    let rows = sqlx::query_as::<_, CommentRow>(
        "SELECT id, analysis_id, video_id, comment_id, author, text, \
                published_at, like_count, reply_count, sentiment_score \
         FROM comments \
         WHERE analysis_id = ?1 \
         ORDER BY id ASC",
    )
    .bind(analysis_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
