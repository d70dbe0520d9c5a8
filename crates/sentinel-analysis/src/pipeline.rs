//! Bulk-analysis pipeline orchestration.
//!
//! Drives chunk → rate-gated call → parse → merge, strictly sequentially
//! and in input order. Per-chunk failures are logged and skipped; the
//! finalized aggregate is always returned, even if every chunk failed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sentinel_core::Comment;

use crate::aggregate::Aggregator;
use crate::chunker::{self, Chunk};
use crate::client::AnalysisClient;
use crate::prompt;
use crate::types::AggregatedAnalysis;

/// Tuning knobs for one bulk-analysis run.
#[derive(Debug, Clone)]
pub struct BulkOptions {
    /// Comments per analysis call.
    pub chunk_size: usize,
    /// Pause between consecutive chunks, independent of the client's
    /// per-call rate gate. No pause after the final chunk.
    pub inter_chunk_delay: Duration,
    /// Hard cap on how many input comments are considered at all.
    pub max_comments: usize,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            inter_chunk_delay: Duration::from_secs(30),
            max_comments: 500,
        }
    }
}

/// Cooperative cancellation flag, checked at the top of each chunk
/// iteration. Cancelling mid-run returns the aggregate built so far;
/// already-merged chunks are never lost.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Advisory progress signal: `(eligible comments dispatched so far, total
/// eligible comments, chunk label)`. Never affects control flow.
pub type ProgressFn = dyn Fn(usize, usize, &str) + Send + Sync;

/// Run the full bulk-analysis pipeline over `comments`.
///
/// Chunks are processed one at a time in input order. Each chunk goes
/// through the client's rate gate, the analysis call, and strict decode;
/// on success it is merged into the running aggregate, on any error it is
/// logged and skipped. Skipped chunks contribute nothing to the aggregate,
/// including its weighted-average divisor.
///
/// An empty comment list short-circuits to an empty result without any
/// network call. Construction-time configuration problems are the only
/// fatal errors in this design, and those surface from
/// [`AnalysisClient::new`] — this function always returns a finalized
/// aggregate.
pub async fn analyze_bulk(
    client: &AnalysisClient,
    comments: &[Comment],
    options: &BulkOptions,
    cancel: &CancelToken,
    progress: Option<&ProgressFn>,
) -> AggregatedAnalysis {
    let mut aggregator = Aggregator::new();

    if comments.is_empty() {
        tracing::info!("no comments to analyze — returning empty aggregate");
        return aggregator.finalize();
    }

    let capped = &comments[..comments.len().min(options.max_comments)];
    let chunks: Vec<Chunk<'_>> = chunker::chunks(capped, options.chunk_size).collect();
    let total_chunks = chunks.len();
    let total_eligible: usize = chunks.iter().map(Chunk::eligible).sum();
    let mut dispatched = 0usize;

    for (position, chunk) in chunks.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(
                chunks_done = position,
                total_chunks,
                "bulk analysis cancelled — returning partial aggregate"
            );
            break;
        }

        if position > 0 && !options.inter_chunk_delay.is_zero() {
            tokio::time::sleep(options.inter_chunk_delay).await;
        }

        let label = format!("chunk {}/{}", chunk.index, total_chunks);
        let prompt_text = prompt::bulk_prompt(chunk);

        match client.analyze_chunk(&prompt_text).await {
            Ok(result) => {
                tracing::debug!(
                    chunk = chunk.index,
                    eligible = chunk.eligible(),
                    "chunk analyzed and merged"
                );
                aggregator.merge(&result, chunk.eligible());
            }
            Err(e) => {
                tracing::warn!(
                    chunk = chunk.index,
                    total_chunks,
                    error = %e,
                    "chunk analysis failed — skipping"
                );
                aggregator.record_skipped();
            }
        }

        dispatched += chunk.eligible();
        if let Some(report) = progress {
            report(dispatched, total_eligible, &label);
        }
    }

    aggregator.finalize()
}
