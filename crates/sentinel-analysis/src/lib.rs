//! Bulk comment analysis pipeline for Sentinel.
//!
//! Splits a comment set into chunks, sends each chunk to a generative-AI
//! text endpoint under a per-client rate gate, merges the per-chunk JSON
//! results into one running summary, and tolerates per-chunk failures
//! without losing already-computed progress.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod types;

mod chunker;
mod prompt;
mod rate_gate;

pub use aggregate::Aggregator;
pub use client::AnalysisClient;
pub use error::AnalysisError;
pub use pipeline::{analyze_bulk, BulkOptions, CancelToken, ProgressFn};
pub use types::{
    AggregatedAnalysis, ChunkAnalysis, EmotionCounts, EngagementCounts, Entity, SentimentCounts,
    TextAnalysis, Theme,
};
