//! Canonical video-id extraction from arbitrary link text.
//!
//! Matches the known YouTube URL shapes (`youtu.be/`, `/v/`, `/u/<char>/`,
//! `/embed/`, `watch?v=`, `&v=`) against a pattern table and accepts the
//! capture only when it is exactly eleven id characters. Pure and
//! deterministic; resolving the same input twice yields the same result.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{PipelineError, Result};

/// Canonical YouTube video ids are always eleven characters.
pub const VIDEO_ID_LEN: usize = 11;

struct LinkPattern {
    id: &'static str,
    pattern: Regex,
}

static PATTERNS: Lazy<Vec<LinkPattern>> = Lazy::new(build_patterns);

fn build_patterns() -> Vec<LinkPattern> {
    vec![
        LinkPattern {
            id: "short",
            pattern: Regex::new(r"youtu\.be/(?P<video_id>[^#&?/\s]+)").unwrap(),
        },
        LinkPattern {
            id: "watch",
            // Covers both watch?v=<id> and trailing &v=<id> parameters
            pattern: Regex::new(r"[?&]v=(?P<video_id>[^#&?\s]+)").unwrap(),
        },
        LinkPattern {
            id: "embed",
            pattern: Regex::new(r"youtube\.com/embed/(?P<video_id>[^#&?/\s]+)").unwrap(),
        },
        LinkPattern {
            id: "v_path",
            pattern: Regex::new(r"youtube\.com/v/(?P<video_id>[^#&?/\s]+)").unwrap(),
        },
        LinkPattern {
            id: "user_path",
            pattern: Regex::new(r"youtube\.com/u/\w/(?P<video_id>[^#&?/\s]+)").unwrap(),
        },
    ]
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract the canonical 11-character video id from arbitrary link text.
///
/// Fails with [`PipelineError::InvalidUrl`] when no supported shape matches
/// or the captured segment is not a well-formed id.
pub fn resolve_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    for pattern in PATTERNS.iter() {
        if let Some(captures) = pattern.pattern.captures(input) {
            if let Some(m) = captures.name("video_id") {
                let candidate = m.as_str();
                if is_video_id(candidate) {
                    tracing::debug!(pattern = pattern.id, video_id = candidate, "resolved link");
                    return Ok(candidate.to_string());
                }
            }
        }
    }

    Err(PipelineError::InvalidUrl(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_shapes() {
        // Short URL
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );

        // Standard watch URL
        assert_eq!(
            resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );

        // Watch URL without www
        assert_eq!(
            resolve_video_id("https://youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );

        // Embed URL
        assert_eq!(
            resolve_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );

        // /v/ path
        assert_eq!(
            resolve_video_id("https://www.youtube.com/v/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );

        // /u/<char>/ path
        assert_eq!(
            resolve_video_id("https://www.youtube.com/u/a/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );

        // &v= parameter buried in a longer query string
        assert_eq!(
            resolve_video_id("https://www.youtube.com/playlist?list=PLx&v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_trailing_params_ignored() {
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ?t=42").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&feature=share").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_idempotent() {
        let first = resolve_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let second = resolve_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            resolve_video_id("not a url"),
            Err(PipelineError::InvalidUrl(_))
        ));
        assert!(matches!(
            resolve_video_id(""),
            Err(PipelineError::InvalidUrl(_))
        ));
        // Captured segment with the wrong length is rejected
        assert!(matches!(
            resolve_video_id("https://youtu.be/short"),
            Err(PipelineError::InvalidUrl(_))
        ));
        assert!(matches!(
            resolve_video_id("https://www.youtube.com/watch?v=waytoolongid42"),
            Err(PipelineError::InvalidUrl(_))
        ));
        // Right length, illegal characters
        assert!(matches!(
            resolve_video_id("https://youtu.be/dQw4w9WgXc!"),
            Err(PipelineError::InvalidUrl(_))
        ));
    }
}
