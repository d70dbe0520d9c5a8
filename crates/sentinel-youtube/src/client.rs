//! HTTP client for the YouTube Data API v3.

use std::time::Duration;

use reqwest::Client;
use sentinel_core::{Comment, VideoMetadata};

use crate::error::YoutubeError;
use crate::types::{parse_count, CommentThreadsResponse, VideoListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Data API page-size ceiling for `commentThreads.list`.
const COMMENTS_PAGE_LIMIT: usize = 100;

/// Maximum number of comment pages to fetch before returning an error.
/// Prevents infinite loops on cycling page tokens.
const MAX_PAGES: usize = 50;

/// Client for the YouTube Data API v3.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YoutubeClient {
    /// Creates a client pointed at the production Data API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Configuration`] if `api_key` is empty and
    /// [`YoutubeError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`YoutubeClient::new`].
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        if api_key.trim().is_empty() {
            return Err(YoutubeError::Configuration);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch snippet and statistics for one video.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::NotFound`] — the API returned no items for the ID.
    /// - [`YoutubeError::QuotaExceeded`] — HTTP 403/429.
    /// - [`YoutubeError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`YoutubeError::Deserialize`] — response shape mismatch.
    /// - [`YoutubeError::Http`] — network or timeout failure.
    pub async fn get_video_metadata(&self, video_id: &str) -> Result<VideoMetadata, YoutubeError> {
        let body = self
            .request_json(
                "videos",
                &[("part", "snippet,statistics"), ("id", video_id)],
            )
            .await?;

        let decoded: VideoListResponse =
            serde_json::from_str(&body).map_err(|source| YoutubeError::Deserialize {
                context: format!("videos.list(id={video_id})"),
                source,
            })?;

        let Some(item) = decoded.items.into_iter().next() else {
            return Err(YoutubeError::NotFound {
                video_id: video_id.to_owned(),
            });
        };

        let thumbnail = item
            .snippet
            .thumbnails
            .high
            .or(item.snippet.thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        Ok(VideoMetadata {
            id: item.id,
            title: item.snippet.title,
            channel: item.snippet.channel_title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            thumbnail,
            view_count: parse_count(item.statistics.view_count.as_deref()),
            like_count: parse_count(item.statistics.like_count.as_deref()),
            comment_count: parse_count(item.statistics.comment_count.as_deref()),
        })
    }

    /// Fetch up to `max_comments` top-level comments for a video, in the
    /// API's relevance order, following page tokens as needed.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`YoutubeClient::get_video_metadata`], plus
    /// [`YoutubeError::PaginationLimit`] if the page count exceeds
    /// [`MAX_PAGES`].
    pub async fn get_comments(
        &self,
        video_id: &str,
        max_comments: usize,
    ) -> Result<Vec<Comment>, YoutubeError> {
        let mut comments: Vec<Comment> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0usize;

        while comments.len() < max_comments {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(YoutubeError::PaginationLimit {
                    video_id: video_id.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let remaining = max_comments - comments.len();
            let page_size = remaining.min(COMMENTS_PAGE_LIMIT).to_string();

            let mut params: Vec<(&str, &str)> = vec![
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", page_size.as_str()),
                ("order", "relevance"),
                ("textFormat", "plainText"),
            ];
            let token = page_token.take();
            if let Some(ref token) = token {
                params.push(("pageToken", token.as_str()));
            }

            let body = self.request_json("commentThreads", &params).await?;
            let decoded: CommentThreadsResponse =
                serde_json::from_str(&body).map_err(|source| YoutubeError::Deserialize {
                    context: format!("commentThreads.list(videoId={video_id})"),
                    source,
                })?;

            for thread in decoded.items {
                let top = thread.snippet.top_level_comment;
                comments.push(Comment {
                    id: Some(top.id),
                    text: top.snippet.text_display,
                    author: top.snippet.author_display_name,
                    published_at: top.snippet.published_at,
                    like_count: top.snippet.like_count,
                    reply_count: thread.snippet.total_reply_count,
                });
            }

            match decoded.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::info!(
            video_id,
            count = comments.len(),
            pages = page_count,
            "fetched comments"
        );
        Ok(comments)
    }

    /// Send a GET to `{base}/{endpoint}` with the API key appended, map
    /// error statuses, and return the body text.
    async fn request_json(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<String, YoutubeError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let message = error_message(&response.text().await.unwrap_or_default());
            return Err(YoutubeError::QuotaExceeded { message });
        }

        if !status.is_success() {
            let message = error_message(&response.text().await.unwrap_or_default());
            return Err(YoutubeError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}

/// Pull the human-readable message out of a Data API error envelope,
/// falling back to the raw body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct Envelope {
        #[serde(default)]
        error: Option<Inner>,
    }
    #[derive(serde::Deserialize)]
    struct Inner {
        #[serde(default)]
        message: String,
    }

    serde_json::from_str::<Envelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|inner| inner.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}
