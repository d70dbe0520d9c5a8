use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The analysis API key is missing or empty. Raised at client
    /// construction, never per-request.
    #[error("analysis API key not configured")]
    Configuration,

    /// HTTP 429 from the provider — quota exhausted, retryable later.
    #[error("analysis quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// The provider withheld generation for a safety/content-policy reason.
    #[error("analysis blocked by provider: {reason}")]
    Blocked { reason: String },

    /// The provider answered 2xx but produced no usable text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The provider's text payload is not the JSON we asked for. The raw
    /// text is retained for diagnostics.
    #[error("provider returned invalid JSON: {source}")]
    MalformedResponse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx status other than 429, with the provider's error-envelope
    /// message when one was parseable.
    #[error("provider returned status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Network or timeout failure below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
