//! Merges per-chunk analysis results into one running summary.

use std::collections::HashMap;

use crate::types::{AggregatedAnalysis, ChunkAnalysis, Entity, SentimentCounts, Theme};

/// Entities are truncated to this many entries at finalization. Themes are
/// never truncated.
const TOP_ENTITIES_LIMIT: usize = 20;

/// Running accumulator over chunk results.
///
/// Exclusively owned by the pipeline driver for the duration of a run:
/// `merge` once per successfully parsed chunk, `finalize` exactly once at
/// the end.
///
/// Entities and themes are keyed by their lower-cased, trimmed display
/// name. Two same-named entities of different types (a person and a product
/// both called "Max") merge into one entry that keeps the first-seen type —
/// an accepted limitation of name-keyed merging in this domain.
#[derive(Default)]
pub struct Aggregator {
    positive: u64,
    neutral: u64,
    negative: u64,
    /// Σ(chunk average_score × eligible comments in that chunk).
    score_total: f64,
    /// Σ(eligible comments across merged chunks) — the divisor applied at
    /// finalization. Skipped chunks contribute nothing here.
    score_weight: usize,
    entity_index: HashMap<String, usize>,
    entities: Vec<Entity>,
    theme_index: HashMap<String, usize>,
    themes: Vec<Theme>,
    emotions: crate::types::EmotionCounts,
    engagement: crate::types::EngagementCounts,
    chunks_merged: usize,
    chunks_skipped: usize,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk's parsed result into the running state.
    ///
    /// `eligible` is the number of non-empty comments actually sent in the
    /// chunk; it weights the chunk's `average_score` and joins the divisor.
    /// A parsed chunk that omitted `overall_sentiment` decoded to zeros and
    /// merges as neutral-zero — its eligible count still joins the divisor.
    pub fn merge(&mut self, chunk: &ChunkAnalysis, eligible: usize) {
        let sentiment = &chunk.overall_sentiment;
        self.positive += sentiment.positive;
        self.neutral += sentiment.neutral;
        self.negative += sentiment.negative;
        #[allow(clippy::cast_precision_loss)]
        {
            self.score_total += sentiment.average_score * eligible as f64;
        }
        self.score_weight += eligible;

        for entity in &chunk.top_entities {
            let key = entity.name.trim().to_lowercase();
            match self.entity_index.get(&key) {
                Some(&idx) => {
                    self.entities[idx].count += entity.count;
                }
                None => {
                    self.entity_index.insert(key, self.entities.len());
                    self.entities.push(Entity {
                        name: entity.name.trim().to_string(),
                        count: entity.count,
                        kind: entity.kind.clone(),
                    });
                }
            }
        }

        for theme in &chunk.key_themes {
            let key = theme.theme.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            match self.theme_index.get(&key) {
                Some(&idx) => {
                    let existing = &mut self.themes[idx];
                    existing.frequency += theme.frequency;
                    for sample in &theme.sample_comments {
                        if !existing.sample_comments.contains(sample) {
                            existing.sample_comments.push(sample.clone());
                        }
                    }
                }
                None => {
                    self.theme_index.insert(key, self.themes.len());
                    self.themes.push(theme.clone());
                }
            }
        }

        let emotions = &chunk.emotion_analysis;
        self.emotions.joy += emotions.joy;
        self.emotions.anger += emotions.anger;
        self.emotions.sadness += emotions.sadness;
        self.emotions.fear += emotions.fear;
        self.emotions.surprise += emotions.surprise;
        self.emotions.trust += emotions.trust;
        self.emotions.anticipation += emotions.anticipation;

        let engagement = &chunk.engagement_insights;
        self.engagement.constructive_feedback += engagement.constructive_feedback;
        self.engagement.criticism += engagement.criticism;
        self.engagement.suggestions += engagement.suggestions;
        self.engagement.questions += engagement.questions;
        self.engagement.praise += engagement.praise;

        self.chunks_merged += 1;
    }

    /// Record a chunk whose analysis failed. Skipped chunks never touch the
    /// counts or the average-score divisor.
    pub fn record_skipped(&mut self) {
        self.chunks_skipped += 1;
    }

    /// Produce the final, sorted summary. Consumes the accumulator so it
    /// can only happen once.
    #[must_use]
    pub fn finalize(mut self) -> AggregatedAnalysis {
        #[allow(clippy::cast_precision_loss)]
        let average_score = if self.score_weight == 0 {
            0.0
        } else {
            self.score_total / self.score_weight as f64
        };

        // Stable sorts: ties keep first-seen (insertion) order.
        self.entities.sort_by(|a, b| b.count.cmp(&a.count));
        self.entities.truncate(TOP_ENTITIES_LIMIT);
        self.themes.sort_by(|a, b| b.frequency.cmp(&a.frequency));

        AggregatedAnalysis {
            overall_sentiment: SentimentCounts {
                positive: self.positive,
                neutral: self.neutral,
                negative: self.negative,
                average_score,
            },
            top_entities: self.entities,
            key_themes: self.themes,
            emotion_analysis: self.emotions,
            engagement_insights: self.engagement,
            total_comments_analyzed: self.score_weight,
            chunks_merged: self.chunks_merged,
            chunks_skipped: self.chunks_skipped,
        }
    }
}
