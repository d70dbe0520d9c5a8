//! YouTube Data API v3 client for Sentinel.
//!
//! Fetches video metadata and relevance-ordered comment threads, with typed
//! error mapping (quota, not-found, deserialize) and a page-count guard on
//! comment pagination.

mod client;
mod error;
mod types;
mod video_id;

pub use client::YoutubeClient;
pub use error::YoutubeError;
pub use video_id::extract_video_id;
