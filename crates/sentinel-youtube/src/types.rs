//! Wire types for the YouTube Data API v3 responses we consume.
//!
//! Statistics arrive as decimal strings (`"viewCount": "12345"`); they are
//! parsed to integers during mapping, defaulting to 0 on absence or junk.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoSnippet {
    pub title: String,
    pub channel_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

/// Parse a Data API decimal-string counter, defaulting to 0.
pub(crate) fn parse_count(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.parse::<i64>().ok()).unwrap_or(0)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadsResponse {
    #[serde(default)]
    pub items: Vec<CommentThread>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThread {
    pub snippet: CommentThreadSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadSnippet {
    pub top_level_comment: TopLevelComment,
    #[serde(default)]
    pub total_reply_count: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopLevelComment {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentSnippet {
    #[serde(default)]
    pub text_display: String,
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: i64,
}
