//! Shared types and configuration for Sentinel.
//!
//! Holds the `Comment` and `VideoMetadata` types passed between the YouTube
//! client, the analysis pipeline, and the persistence layer, plus env-based
//! application configuration.

mod app_config;
mod config;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};

/// A single YouTube comment as fetched from the Data API or supplied by an
/// API caller.
///
/// `text` may be empty; the analysis chunker excludes empty comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Provider comment ID. Absent when the caller supplies raw comment text
    /// without IDs.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub reply_count: i64,
}

/// Video metadata from the YouTube `videos.list` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub channel: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub comment_count: i64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
