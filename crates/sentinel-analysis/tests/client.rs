//! Integration tests for `AnalysisClient` using wiremock HTTP mocks.

use sentinel_analysis::{AnalysisClient, AnalysisError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1/models/gemini-1.5-flash:generateContent";

fn test_client(base_url: &str) -> AnalysisClient {
    AnalysisClient::with_base_url("test-key", "gemini-1.5-flash", 30, 0.0, base_url)
        .expect("client construction should not fail")
}

/// A 2xx provider response whose first candidate carries `text`.
fn candidate_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            {
                "content": { "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }
        ]
    })
}

#[tokio::test]
async fn analyze_chunk_decodes_full_payload() {
    let server = MockServer::start().await;

    let payload = serde_json::json!({
        "overall_sentiment": {"positive": 6, "neutral": 2, "negative": 2, "average_score": 0.4},
        "top_entities": [{"name": "Starship", "count": 4, "type": "PRODUCT"}],
        "key_themes": [{"theme": "launch footage", "frequency": 3, "sentiment": "positive", "sample_comments": ["incredible shot"]}],
        "emotion_analysis": {"joy": 5, "anger": 1, "sadness": 0, "fear": 0, "surprise": 3, "trust": 2, "anticipation": 4},
        "engagement_insights": {"constructive_feedback": 1, "criticism": 1, "suggestions": 2, "questions": 3, "praise": 5}
    });

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(query_param("key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body(&payload.to_string())),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .analyze_chunk("Comment 1: wow")
        .await
        .expect("should decode chunk analysis");

    assert_eq!(result.overall_sentiment.positive, 6);
    assert!((result.overall_sentiment.average_score - 0.4).abs() < 1e-9);
    assert_eq!(result.top_entities.len(), 1);
    assert_eq!(result.top_entities[0].name, "Starship");
    assert_eq!(result.key_themes[0].sample_comments, vec!["incredible shot"]);
    assert_eq!(result.emotion_analysis.joy, 5);
    assert_eq!(result.engagement_insights.praise, 5);
}

#[tokio::test]
async fn analyze_chunk_requests_json_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "responseMimeType": "application/json" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .analyze_chunk("Comment 1: hi")
        .await
        .expect("empty object payload decodes to defaults");
}

#[tokio::test]
async fn analyze_chunk_strips_markdown_fence() {
    let server = MockServer::start().await;

    let fenced = "```json\n{\"overall_sentiment\": {\"positive\": 2}}\n```";
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(fenced)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .analyze_chunk("Comment 1: nice")
        .await
        .expect("fenced payload should still parse");
    assert_eq!(result.overall_sentiment.positive, 2);
}

#[tokio::test]
async fn http_429_maps_to_quota_exceeded() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    match err {
        AnalysisError::QuotaExceeded { message } => {
            assert_eq!(message, "Resource has been exhausted");
        }
        other => panic!("expected QuotaExceeded, got: {other:?}"),
    }
}

#[tokio::test]
async fn non_429_error_status_is_distinct_from_quota() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    match err {
        AnalysisError::UnexpectedStatus { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "internal");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn error_envelope_message_is_extracted() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    match err {
        AnalysisError::UnexpectedStatus { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn prompt_block_reason_maps_to_blocked() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "promptFeedback": { "blockReason": "SAFETY" }
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    match err {
        AnalysisError::Blocked { reason } => assert_eq!(reason, "SAFETY"),
        other => panic!("expected Blocked, got: {other:?}"),
    }
}

#[tokio::test]
async fn textless_candidate_with_safety_finish_maps_to_blocked() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "candidates": [{ "finishReason": "SAFETY" }]
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    match err {
        AnalysisError::Blocked { reason } => assert_eq!(reason, "SAFETY"),
        other => panic!("expected Blocked, got: {other:?}"),
    }
}

#[tokio::test]
async fn whitespace_payload_maps_to_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("   \n  ")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    assert!(
        matches!(err, AnalysisError::EmptyResponse),
        "expected EmptyResponse, got: {err:?}"
    );
}

#[tokio::test]
async fn missing_candidates_maps_to_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    assert!(
        matches!(err, AnalysisError::EmptyResponse),
        "expected EmptyResponse, got: {err:?}"
    );
}

#[tokio::test]
async fn non_json_payload_is_malformed_and_retains_raw_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
            "I'm sorry, I can't produce JSON for that.",
        )))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze_chunk("Comment 1: hi").await.unwrap_err();
    match err {
        AnalysisError::MalformedResponse { raw, .. } => {
            assert!(raw.contains("can't produce JSON"));
        }
        other => panic!("expected MalformedResponse, got: {other:?}"),
    }
}

#[tokio::test]
async fn entity_elements_are_normalized_to_names() {
    let server = MockServer::start().await;

    let payload = serde_json::json!({
        "top_entities": ["Tesla", {"name": "Cybertruck", "count": 2, "type": "PRODUCT"}, {"name": ""}]
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body(&payload.to_string())),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.analyze_chunk("Comment 1: hi").await.unwrap();
    let names: Vec<&str> = result.top_entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Tesla", "Cybertruck"]);
    assert_eq!(result.top_entities[0].count, 1);
}

#[tokio::test]
async fn analyze_text_decodes_single_text_analysis() {
    let server = MockServer::start().await;

    let payload = serde_json::json!({
        "sentiment_score": -0.6,
        "sentiment_label": "negative",
        "entities": ["YouTube"],
        "themes": ["monetization"],
        "key_phrases": ["ad load"]
    });
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(candidate_body(&payload.to_string())),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .analyze_text("too many ads lately")
        .await
        .expect("should decode text analysis");
    assert!((result.sentiment_score + 0.6).abs() < 1e-9);
    assert_eq!(result.sentiment_label, "negative");
    assert_eq!(result.themes, vec!["monetization"]);
}

#[tokio::test]
async fn extract_ideas_parses_numbered_list() {
    let server = MockServer::start().await;

    let list = "1. Add chapter markers\n2. Improve microphone quality\nnot a numbered line\n3. Upload more consistently";
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_partial_json(serde_json::json!({
            "generationConfig": { "responseMimeType": "text/plain" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(list)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let ideas = client
        .extract_ideas("comment digest text")
        .await
        .expect("should parse numbered list");
    assert_eq!(
        ideas,
        vec![
            "Add chapter markers",
            "Improve microphone quality",
            "Upload more consistently"
        ]
    );
}
