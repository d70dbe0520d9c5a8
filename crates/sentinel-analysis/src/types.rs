//! Decode types for provider analysis responses and the merged aggregate.
//!
//! Every section of a chunk response defaults to zero/empty when absent —
//! the provider is a language model and drops keys freely. Decoding is
//! otherwise strict: a section with the wrong shape fails the whole chunk
//! rather than being coerced.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentiment tallies for one chunk, or the merged totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentCounts {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
    /// In [-1.0, 1.0]. For the aggregate this is the count-weighted mean of
    /// chunk-level averages, not a mean of means.
    pub average_score: f64,
}

/// A named entity with its mention count.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    pub name: String,
    pub count: u64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Entity elements arrive either as bare label strings or as objects with a
/// `name` field; anything else decodes to an empty name and is dropped by
/// the containing list.
impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawEntity {
            Name(String),
            Detailed {
                #[serde(default)]
                name: Option<String>,
                #[serde(default)]
                count: Option<u64>,
                #[serde(default, rename = "type")]
                kind: Option<String>,
            },
            Other(serde_json::Value),
        }

        let entity = match RawEntity::deserialize(deserializer)? {
            RawEntity::Name(name) => Entity {
                name,
                count: 1,
                kind: None,
            },
            RawEntity::Detailed { name, count, kind } => Entity {
                name: name.unwrap_or_default(),
                count: count.unwrap_or(1),
                kind,
            },
            RawEntity::Other(_) => Entity {
                name: String::new(),
                count: 1,
                kind: None,
            },
        };
        Ok(entity)
    }
}

/// Decode an entity list, dropping elements whose name is empty after
/// trimming.
fn deserialize_entities<'de, D>(deserializer: D) -> Result<Vec<Entity>, D::Error>
where
    D: Deserializer<'de>,
{
    let entities = Vec::<Entity>::deserialize(deserializer)?;
    Ok(entities
        .into_iter()
        .filter(|e| !e.name.trim().is_empty())
        .collect())
}

/// Decode a list of entity names (bare strings or `{name}` objects) into
/// plain strings, dropping empties.
fn deserialize_entity_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entities = Vec::<Entity>::deserialize(deserializer)?;
    Ok(entities
        .into_iter()
        .map(|e| e.name)
        .filter(|n| !n.trim().is_empty())
        .collect())
}

/// A recurring discussion theme with representative comment samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub theme: String,
    pub frequency: u64,
    pub sentiment: String,
    #[serde(deserialize_with = "coerce_strings")]
    pub sample_comments: Vec<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            theme: String::new(),
            frequency: 1,
            sentiment: String::new(),
            sample_comments: Vec::new(),
        }
    }
}

/// Sample comments occasionally arrive as non-string JSON values; coerce
/// each element to its string form rather than failing the chunk.
fn coerce_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// Per-emotion tallies. Only these keys are known; unknown keys in a chunk
/// response are ignored by the decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionCounts {
    pub joy: u64,
    pub anger: u64,
    pub sadness: u64,
    pub fear: u64,
    pub surprise: u64,
    pub trust: u64,
    pub anticipation: u64,
}

/// Engagement-category tallies, same known-keys-only policy as
/// [`EmotionCounts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementCounts {
    pub constructive_feedback: u64,
    pub criticism: u64,
    pub suggestions: u64,
    pub questions: u64,
    pub praise: u64,
}

/// The provider's parsed JSON for one chunk of comments.
///
/// Any section may be absent and decodes to its zero/empty default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChunkAnalysis {
    pub overall_sentiment: SentimentCounts,
    #[serde(deserialize_with = "deserialize_entities")]
    pub top_entities: Vec<Entity>,
    pub key_themes: Vec<Theme>,
    pub emotion_analysis: EmotionCounts,
    pub engagement_insights: EngagementCounts,
}

/// Top-level sections [`ChunkAnalysis`] knows how to decode. Anything else
/// in a chunk response is logged and ignored.
pub(crate) const KNOWN_SECTIONS: [&str; 5] = [
    "overall_sentiment",
    "top_entities",
    "key_themes",
    "emotion_analysis",
    "engagement_insights",
];

/// The finalized merge of all chunk analyses.
///
/// Produced exactly once by [`crate::Aggregator::finalize`]; immutable from
/// the caller's point of view.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedAnalysis {
    pub overall_sentiment: SentimentCounts,
    /// Rank-ordered by count descending, at most 20 entries.
    pub top_entities: Vec<Entity>,
    /// Rank-ordered by frequency descending, untruncated.
    pub key_themes: Vec<Theme>,
    pub emotion_analysis: EmotionCounts,
    pub engagement_insights: EngagementCounts,
    /// Eligible comments in successfully merged chunks — the weighted-average
    /// divisor.
    pub total_comments_analyzed: usize,
    pub chunks_merged: usize,
    pub chunks_skipped: usize,
}

/// Single-text analysis result (sentiment, entities, themes, key phrases).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnalysis {
    pub sentiment_score: f64,
    pub sentiment_label: String,
    #[serde(deserialize_with = "deserialize_entity_names")]
    pub entities: Vec<String>,
    pub themes: Vec<String>,
    pub key_phrases: Vec<String>,
}
