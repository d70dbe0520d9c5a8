use thiserror::Error;

#[derive(Debug, Error)]
pub enum YoutubeError {
    /// The YouTube API key is missing or empty. Raised at client
    /// construction.
    #[error("YouTube API key not configured")]
    Configuration,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested video does not exist (or is private/deleted).
    #[error("video not found: {video_id}")]
    NotFound { video_id: String },

    /// HTTP 403/429 — Data API daily quota or rate limit exhausted.
    #[error("YouTube API quota exceeded: {message}")]
    QuotaExceeded { message: String },

    #[error("YouTube API returned status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("failed to decode {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Guard against cycling page tokens on comment pagination.
    #[error("comment pagination exceeded {max_pages} pages for video {video_id}")]
    PaginationLimit { video_id: String, max_pages: usize },
}
