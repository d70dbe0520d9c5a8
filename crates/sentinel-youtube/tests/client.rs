//! Integration tests for `YoutubeClient` using wiremock HTTP mocks.

use sentinel_youtube::{YoutubeClient, YoutubeError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
}

fn comment_item(id: &str, text: &str, author: &str, likes: i64, replies: i64) -> serde_json::Value {
    serde_json::json!({
        "snippet": {
            "topLevelComment": {
                "id": id,
                "snippet": {
                    "textDisplay": text,
                    "authorDisplayName": author,
                    "publishedAt": "2026-05-01T12:00:00Z",
                    "likeCount": likes
                }
            },
            "totalReplyCount": replies
        }
    })
}

#[tokio::test]
async fn get_video_metadata_parses_snippet_and_statistics() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "items": [
            {
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "title": "Launch Day",
                    "channelTitle": "Space Channel",
                    "description": "Full coverage",
                    "publishedAt": "2026-04-01T09:30:00Z",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/default.jpg"},
                        "high": {"url": "https://i.ytimg.com/high.jpg"}
                    }
                },
                "statistics": {
                    "viewCount": "120345",
                    "likeCount": "8200",
                    "commentCount": "950"
                }
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("part", "snippet,statistics"))
        .and(query_param("id", "dQw4w9WgXcQ"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let metadata = client
        .get_video_metadata("dQw4w9WgXcQ")
        .await
        .expect("should parse metadata");

    assert_eq!(metadata.id, "dQw4w9WgXcQ");
    assert_eq!(metadata.title, "Launch Day");
    assert_eq!(metadata.channel, "Space Channel");
    assert_eq!(metadata.thumbnail, "https://i.ytimg.com/high.jpg");
    assert_eq!(metadata.view_count, 120_345);
    assert_eq!(metadata.like_count, 8_200);
    assert_eq!(metadata.comment_count, 950);
}

#[tokio::test]
async fn get_video_metadata_maps_empty_items_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_video_metadata("missing12345").await.unwrap_err();
    assert!(
        matches!(err, YoutubeError::NotFound { ref video_id } if video_id == "missing12345"),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn quota_exhaustion_maps_to_quota_exceeded() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota."}
    });
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_video_metadata("dQw4w9WgXcQ").await.unwrap_err();
    match err {
        YoutubeError::QuotaExceeded { message } => {
            assert!(message.contains("exceeded your quota"));
        }
        other => panic!("expected QuotaExceeded, got: {other:?}"),
    }
}

#[tokio::test]
async fn get_comments_follows_page_tokens() {
    let server = MockServer::start().await;

    let page_one = serde_json::json!({
        "items": [
            comment_item("c1", "first!", "alice", 10, 2),
            comment_item("c2", "great video", "bob", 5, 0)
        ],
        "nextPageToken": "TOKEN_2"
    });
    let page_two = serde_json::json!({
        "items": [
            comment_item("c3", "loved the ending", "carol", 1, 0)
        ]
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "dQw4w9WgXcQ"))
        .and(query_param("order", "relevance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_one))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("pageToken", "TOKEN_2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page_two))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client
        .get_comments("dQw4w9WgXcQ", 500)
        .await
        .expect("should follow pagination");

    assert_eq!(comments.len(), 3);
    assert_eq!(comments[0].id.as_deref(), Some("c1"));
    assert_eq!(comments[0].text, "first!");
    assert_eq!(comments[0].author, "alice");
    assert_eq!(comments[0].like_count, 10);
    assert_eq!(comments[0].reply_count, 2);
    assert_eq!(comments[2].author, "carol");
}

#[tokio::test]
async fn get_comments_stops_at_max_comments() {
    let server = MockServer::start().await;

    let page = serde_json::json!({
        "items": [
            comment_item("c1", "one", "a", 0, 0),
            comment_item("c2", "two", "b", 0, 0)
        ],
        "nextPageToken": "MORE"
    });

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("maxResults", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client
        .get_comments("dQw4w9WgXcQ", 2)
        .await
        .expect("should stop at cap");
    assert_eq!(comments.len(), 2);
}

#[tokio::test]
async fn get_comments_errors_on_cycling_page_tokens() {
    let server = MockServer::start().await;

    // Every page advertises another page; the guard must trip.
    let cycling = serde_json::json!({
        "items": [comment_item("c1", "again", "a", 0, 0)],
        "nextPageToken": "LOOP"
    });
    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&cycling))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.get_comments("dQw4w9WgXcQ", 500).await.unwrap_err();
    assert!(
        matches!(err, YoutubeError::PaginationLimit { .. }),
        "expected PaginationLimit, got: {err:?}"
    );
}
