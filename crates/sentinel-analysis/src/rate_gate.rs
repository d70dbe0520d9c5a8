//! Minimum-interval gate for outbound analysis calls.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum wall-clock interval between granted turns.
///
/// Owned by one [`crate::AnalysisClient`] instance — never process-global —
/// so independent pipelines (and tests) do not interfere with each other.
/// Callers are serialized by the pipeline driver; there is exactly one
/// active caller at a time.
pub(crate) struct RateGate {
    min_interval: Duration,
    last_turn: Option<Instant>,
}

impl RateGate {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_turn: None,
        }
    }

    /// Sleep until `min_interval` has elapsed since the previous granted
    /// turn, then record the new turn time. The first turn is granted
    /// immediately.
    pub(crate) async fn await_turn(&mut self) {
        if let Some(last) = self.last_turn {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "rate gate: waiting before next analysis call"
                );
                tokio::time::sleep(wait).await;
            }
        }
        self.last_turn = Some(Instant::now());
    }
}
