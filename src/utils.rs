//! Utility functions for text handling, formatting, and file system checks.
//!
//! This module provides helpers used throughout the application:
//! - Sentence splitting shared by the analyzer and the audio chunker
//! - String truncation and slugification for logging and anchors
//! - Human-readable duration and size formatting for reports
//! - File system validation for output directories

use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::fs;
use tracing::{info, instrument};

/// A run of text ending in one or more sentence terminators, or the
/// unterminated remainder at the end of the text.
static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+(?:[.!?]+|$)|[.!?]+").unwrap());

/// Split text into trimmed sentences, keeping each terminator with its sentence.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(split_sentences("Hi. How are you?! Fine"), vec!["Hi.", "How are you?!", "Fine"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped characters appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…(+{} chars)", head, total - max)
    }
}

/// Convert a title to a URL-friendly slug.
///
/// Lowercases the text, removes special characters, and replaces spaces with
/// hyphens.
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Format a millisecond duration as `"1m 5s"`, or `"42s"` under a minute.
pub fn format_duration(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, remaining_seconds)
    } else {
        format!("{}s", remaining_seconds)
    }
}

/// Format a byte count with a binary unit, rounded to two decimals.
pub fn format_file_size(bytes: u64) -> String {
    const SIZES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut i = 0;
    while value >= 1024.0 && i < SIZES.len() - 1 {
        value /= 1024.0;
        i += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZES[i])
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and removes a
/// probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    fs::File::create(&probe_path).await?;
    let _ = fs::remove_file(&probe_path).await;
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keeps_terminators() {
        assert_eq!(
            split_sentences("Hi. How are you?! Fine"),
            vec!["Hi.", "How are you?!", "Fine"]
        );
    }

    #[test]
    fn test_split_sentences_no_terminator() {
        assert_eq!(split_sentences("just one clause"), vec!["just one clause"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_split_sentences_ellipsis() {
        assert_eq!(split_sentences("Wait... What!"), vec!["Wait...", "What!"]);
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 chars)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        let result = truncate_for_log("článek", 3);
        assert_eq!(result, "člá…(+3 chars)");
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello World"), "hello-world");
        assert_eq!(slugify_title("Test-Article!"), "test-article");
        assert_eq!(slugify_title("BBC News - AI revolution"), "bbc-news---ai-revolution");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(42_500), "42s");
        assert_eq!(format_duration(65_000), "1m 5s");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/json");
        let nested = nested.to_str().unwrap();
        assert!(ensure_writable_dir(nested).await.is_ok());
        assert!(std::path::Path::new(nested).is_dir());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_reports_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let under_file = file.path().join("child");
        let result = ensure_writable_dir(under_file.to_str().unwrap()).await;
        assert!(matches!(result, Err(crate::error::DigestError::Io(_))));
    }
}
