//! HTTP client for the generative-text analysis endpoint.
//!
//! Wraps `reqwest` with provider-specific error handling: 429 quota
//! mapping, error-envelope message extraction, safety-block detection, and
//! strict JSON payload decoding. This client is the sole network-calling
//! surface of the analysis crate; everything downstream is pure in-process
//! computation.

use std::time::Duration;

use tokio::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::prompt;
use crate::rate_gate::RateGate;
use crate::types::{ChunkAnalysis, TextAnalysis, KNOWN_SECTIONS};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const TEMPERATURE: f64 = 0.3;
const MAX_OUTPUT_TOKENS: u32 = 8192;
const TOP_P: f64 = 0.95;
const TOP_K: u32 = 40;

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// Client for the `generateContent`-style text-analysis endpoint.
///
/// Owns its [`RateGate`]: every outbound call waits out the configured
/// minimum interval first. Use [`AnalysisClient::new`] for production or
/// [`AnalysisClient::with_base_url`] to point at a mock server in tests.
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    rate_gate: Mutex<RateGate>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topP")]
    top_p: f64,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl AnalysisClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Configuration`] if `api_key` is empty and
    /// [`AnalysisError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        min_secs_between_calls: f64,
    ) -> Result<Self, AnalysisError> {
        Self::with_base_url(
            api_key,
            model,
            timeout_secs,
            min_secs_between_calls,
            DEFAULT_BASE_URL,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`AnalysisClient::new`].
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        min_secs_between_calls: f64,
        base_url: &str,
    ) -> Result<Self, AnalysisError> {
        if api_key.trim().is_empty() {
            return Err(AnalysisError::Configuration);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let min_interval = Duration::from_secs_f64(min_secs_between_calls.max(0.0));

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            rate_gate: Mutex::new(RateGate::new(min_interval)),
        })
    }

    /// Analyze one chunk's worth of prompt text, returning the decoded
    /// per-chunk result.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::QuotaExceeded`] — HTTP 429.
    /// - [`AnalysisError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`AnalysisError::Blocked`] — the provider withheld generation.
    /// - [`AnalysisError::EmptyResponse`] — 2xx with no usable text.
    /// - [`AnalysisError::MalformedResponse`] — the payload is not valid
    ///   JSON of the expected shape; the raw text is retained.
    /// - [`AnalysisError::Transport`] — network or timeout failure.
    pub async fn analyze_chunk(&self, prompt_text: &str) -> Result<ChunkAnalysis, AnalysisError> {
        let payload = self.generate(prompt_text, "application/json").await?;
        decode_chunk(&payload)
    }

    /// Analyze a single piece of text for sentiment, entities, themes, and
    /// key phrases.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`AnalysisClient::analyze_chunk`].
    pub async fn analyze_text(&self, text: &str) -> Result<TextAnalysis, AnalysisError> {
        let full_prompt = prompt::compose(prompt::ANALYSIS_PROMPT, text);
        let payload = self.generate(&full_prompt, "application/json").await?;
        serde_json::from_str(&payload).map_err(|source| AnalysisError::MalformedResponse {
            raw: payload,
            source,
        })
    }

    /// Extract actionable ideas from text as a list of suggestions.
    ///
    /// The model returns a numbered plain-text list; lines that do not start
    /// with `N.` are dropped.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`AnalysisClient::analyze_chunk`], minus
    /// `MalformedResponse` (there is no JSON payload to decode).
    pub async fn extract_ideas(&self, text: &str) -> Result<Vec<String>, AnalysisError> {
        let full_prompt = prompt::compose(prompt::IDEA_EXTRACTION_PROMPT, text);
        let payload = self.generate(&full_prompt, "text/plain").await?;
        Ok(parse_numbered_list(&payload))
    }

    /// Send one generation request and return the first candidate's text
    /// with markdown code fences stripped.
    async fn generate(
        &self,
        full_prompt: &str,
        response_mime_type: &'static str,
    ) -> Result<String, AnalysisError> {
        self.rate_gate.lock().await.await_turn().await;

        let url = format!(
            "{}/v1/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                top_p: TOP_P,
                top_k: TOP_K,
                response_mime_type,
            },
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let message = error_message(&response.text().await.unwrap_or_default());
            return Err(AnalysisError::QuotaExceeded { message });
        }

        if !status.is_success() {
            let message = error_message(&response.text().await.unwrap_or_default());
            return Err(AnalysisError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let decoded: GenerateResponse =
            serde_json::from_str(&body).map_err(|source| AnalysisError::MalformedResponse {
                raw: body,
                source,
            })?;

        if let Some(reason) = decoded
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(AnalysisError::Blocked { reason });
        }

        let Some(candidate) = decoded.candidates.into_iter().next() else {
            return Err(AnalysisError::EmptyResponse);
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            // A candidate with no text and a non-STOP finish reason is a
            // content block, not an empty generation.
            if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
                return Err(AnalysisError::Blocked { reason });
            }
            return Err(AnalysisError::EmptyResponse);
        }

        Ok(strip_code_fence(&text).to_string())
    }
}

/// Decode a chunk payload strictly, logging (never failing on) unknown
/// top-level sections.
fn decode_chunk(payload: &str) -> Result<ChunkAnalysis, AnalysisError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|source| AnalysisError::MalformedResponse {
            raw: payload.to_string(),
            source,
        })?;

    if let Some(object) = value.as_object() {
        for key in object.keys() {
            if !KNOWN_SECTIONS.contains(&key.as_str()) {
                tracing::warn!(section = %key, "ignoring unknown section in analysis response");
            }
        }
    }

    serde_json::from_value(value).map_err(|source| AnalysisError::MalformedResponse {
        raw: payload.to_string(),
        source,
    })
}

/// Extract the human-readable message from a provider error envelope,
/// falling back to the raw body text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|error| error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}

/// Strip a leading ```` ```json ````/```` ``` ```` fence and a trailing
/// ```` ``` ```` fence. Models add these despite being told not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map_or(trimmed, str::trim_start);
    trimmed
        .strip_suffix("```")
        .map_or(trimmed, str::trim_end)
}

/// Parse a `1. like this` numbered list into its items, dropping anything
/// that is not a numbered line.
fn parse_numbered_list(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let (number, rest) = line.split_once('.')?;
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let idea = rest.trim();
            if idea.is_empty() {
                None
            } else {
                Some(idea.to_string())
            }
        })
        .collect()
}
