//! Error types shared by the digest pipeline and its collaborators.
//!
//! Collaborators (`SourceFetcher`, `ContentAnalyzer`, `SpeechBackend`) report
//! failures as [`DigestError`]. Whether an error is absorbed or ends the run
//! is decided by the caller:
//!
//! | Raised by | Handling |
//! |-----------|----------|
//! | source fetch | logged, source skipped |
//! | article analysis | replaced with a fallback outcome |
//! | article audio | recorded in the result's error list, article dropped |
//! | batch alignment / digest audio | stage-fatal, run fails |

use thiserror::Error;

/// Errors raised while building a daily digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// A source could not be fetched.
    #[error("failed to fetch source {source_id}: {reason}")]
    SourceFetch { source_id: String, reason: String },

    /// Content analysis failed for one article.
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// Speech synthesis failed.
    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    /// The processor returned a list that does not line up with its input.
    #[error("processing returned {actual} outcomes for {expected} articles")]
    Misaligned { expected: usize, actual: usize },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misaligned_message() {
        let e = DigestError::Misaligned { expected: 6, actual: 5 };
        assert_eq!(e.to_string(), "processing returned 5 outcomes for 6 articles");
    }

    #[test]
    fn test_source_fetch_message() {
        let e = DigestError::SourceFetch {
            source_id: "bbc".to_string(),
            reason: "connection reset".to_string(),
        };
        assert!(e.to_string().contains("bbc"));
        assert!(e.to_string().contains("connection reset"));
    }

    #[test]
    fn test_from_url_parse_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let e: DigestError = parse_err.into();
        assert!(matches!(e, DigestError::InvalidUrl(_)));
    }
}
