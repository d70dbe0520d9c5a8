//! Video-ID extraction from YouTube URLs.

use std::sync::LazyLock;

use regex::Regex;

/// URL shapes that carry an 11-character video ID.
static VIDEO_ID_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})")
            .expect("hardcoded pattern is valid"),
        Regex::new(r"youtube\.com/embed/([A-Za-z0-9_-]{11})")
            .expect("hardcoded pattern is valid"),
        Regex::new(r"youtube\.com/v/([A-Za-z0-9_-]{11})").expect("hardcoded pattern is valid"),
    ]
});

/// Extract the 11-character video ID from a YouTube URL.
///
/// Recognizes `watch?v=`, `youtu.be/`, `embed/`, and `/v/` URL shapes.
/// Returns `None` for anything else.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|id| id.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_legacy_v_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn rejects_non_video_urls() {
        assert_eq!(extract_video_id("https://www.youtube.com/feed/trending"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(extract_video_id("not a url"), None);
    }

    #[test]
    fn rejects_too_short_ids() {
        assert_eq!(extract_video_id("https://youtu.be/short"), None);
    }
}
