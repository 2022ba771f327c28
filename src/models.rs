//! Data models for the daily digest pipeline.
//!
//! This module defines the structures that flow between pipeline stages:
//! - [`SourceDescriptor`]: A configured origin to scrape
//! - [`RawArticle`]: An unprocessed candidate returned by the scraper
//! - [`ProcessingOutcome`]: Summary, category, tags and sentiment for one article
//! - [`AudioArtifact`]: A synthesized audio reference with its estimated duration
//! - [`ProcessedArticle`]: The merge of the three above
//! - [`DailyDigest`]: The aggregate output of one pipeline run
//! - [`PipelineProgress`] and [`PipelineResult`]: Run status and outcome
//!
//! Field names serialize in camelCase to keep the JSON shape consumed by the
//! web frontend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configured article source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Stable identifier, e.g. `"bbc"`.
    pub id: String,
    /// Display name used in article metadata.
    pub name: String,
    /// Base URL of the source.
    pub url: String,
    /// CSS selector for article blocks. Kept for a future real fetcher.
    pub selector: String,
    /// Category the source usually publishes in.
    pub category: String,
}

impl SourceDescriptor {
    pub fn new(id: &str, name: &str, url: &str, selector: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            selector: selector.to_string(),
            category: category.to_string(),
        }
    }
}

/// A scraped article candidate, before analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub title: String,
    /// Plain-text article body.
    pub content: String,
    /// URL the article was scraped from.
    pub url: String,
    pub published_at: DateTime<Utc>,
    /// Display name of the source.
    pub source: String,
}

/// The `{title, content}` pair handed to the content processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    pub title: String,
    pub content: String,
}

impl From<&RawArticle> for ArticleText {
    fn from(article: &RawArticle) -> Self {
        Self {
            title: article.title.clone(),
            content: article.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

/// Result of analyzing one article.
///
/// A batch of outcomes is paired with its articles by index, so a batch must
/// always have the same length and order as its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOutcome {
    pub summary: String,
    /// Open-ended label such as `"Technology"` or `"General"`.
    pub category: String,
    pub tags: Vec<String>,
    pub key_points: Vec<String>,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Ogg => "ogg",
        }
    }
}

/// A synthesized audio rendition of some text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioArtifact {
    /// Opaque resource handle for the audio.
    pub audio_url: String,
    /// Estimated length in seconds.
    pub duration: u64,
    pub voice: String,
    /// The text that was synthesized.
    pub text: String,
    pub format: AudioFormat,
}

/// An article after analysis and audio synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedArticle {
    pub id: String,
    pub title: String,
    pub content: String,
    pub summary: String,
    pub category: String,
    pub tags: Vec<String>,
    pub key_points: Vec<String>,
    pub sentiment: Sentiment,
    pub audio_url: String,
    pub audio_duration: u64,
    pub published_at: DateTime<Utc>,
    pub source: String,
    pub original_url: String,
    pub processed_at: DateTime<Utc>,
}

impl ProcessedArticle {
    /// Merge a scraped article with its analysis and audio.
    pub fn assemble(
        id: String,
        article: &RawArticle,
        outcome: &ProcessingOutcome,
        audio: &AudioArtifact,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: article.title.clone(),
            content: article.content.clone(),
            summary: outcome.summary.clone(),
            category: outcome.category.clone(),
            tags: outcome.tags.clone(),
            key_points: outcome.key_points.clone(),
            sentiment: outcome.sentiment,
            audio_url: audio.audio_url.clone(),
            audio_duration: audio.duration,
            published_at: article.published_at,
            source: article.source.clone(),
            original_url: article.url.clone(),
            processed_at,
        }
    }
}

/// The aggregate output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDigest {
    pub id: String,
    pub date: NaiveDate,
    pub articles_count: usize,
    /// One-line textual summary of the digest.
    pub summary: String,
    /// Narration covering every article in order.
    pub audio: AudioArtifact,
    pub articles: Vec<ProcessedArticle>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Scraping,
    AiProcessing,
    AudioGeneration,
    DigestGeneration,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStep::Scraping => "scraping",
            PipelineStep::AiProcessing => "ai_processing",
            PipelineStep::AudioGeneration => "audio_generation",
            PipelineStep::DigestGeneration => "digest_generation",
        };
        f.write_str(s)
    }
}

/// A transient status snapshot emitted while the pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineProgress {
    pub step: PipelineStep,
    /// Overall completion, 0 to 100.
    pub progress: f64,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Terminal outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub success: bool,
    pub digest: Option<DailyDigest>,
    /// Articles accumulated before the run ended.
    pub articles: Vec<ProcessedArticle>,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> RawArticle {
        RawArticle {
            title: "Test Article".to_string(),
            content: "Full content".to_string(),
            url: "https://example.com/a".to_string(),
            published_at: Utc::now(),
            source: "Example".to_string(),
        }
    }

    #[test]
    fn test_sentiment_serialization() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let back: Sentiment = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(back, Sentiment::Neutral);
    }

    #[test]
    fn test_pipeline_step_serialization() {
        let json = serde_json::to_string(&PipelineStep::AiProcessing).unwrap();
        assert_eq!(json, "\"ai_processing\"");
        assert_eq!(PipelineStep::DigestGeneration.to_string(), "digest_generation");
    }

    #[test]
    fn test_audio_format_extension() {
        assert_eq!(AudioFormat::default(), AudioFormat::Mp3);
        assert_eq!(AudioFormat::Ogg.extension(), "ogg");
        let back: AudioFormat = serde_json::from_str("\"wav\"").unwrap();
        assert_eq!(back, AudioFormat::Wav);
    }

    #[test]
    fn test_article_text_from_raw() {
        let raw = sample_article();
        let text = ArticleText::from(&raw);
        assert_eq!(text.title, "Test Article");
        assert_eq!(text.content, "Full content");
    }

    #[test]
    fn test_processed_article_assemble() {
        let raw = sample_article();
        let outcome = ProcessingOutcome {
            summary: "Summary here".to_string(),
            category: "Tech".to_string(),
            tags: vec!["ai".to_string()],
            key_points: vec!["Key point 1".to_string()],
            sentiment: Sentiment::Negative,
        };
        let audio = AudioArtifact {
            audio_url: "https://mock-audio.local/x.mp3".to_string(),
            duration: 4,
            voice: "Rachel".to_string(),
            text: "Test Article. Summary here".to_string(),
            format: AudioFormat::Mp3,
        };
        let processed_at = Utc::now();
        let article = ProcessedArticle::assemble(
            "article_1_0".to_string(),
            &raw,
            &outcome,
            &audio,
            processed_at,
        );

        assert_eq!(article.id, "article_1_0");
        assert_eq!(article.original_url, raw.url);
        assert_eq!(article.summary, "Summary here");
        assert_eq!(article.sentiment, Sentiment::Negative);
        assert_eq!(article.audio_duration, 4);
        assert_eq!(article.processed_at, processed_at);
    }

    #[test]
    fn test_processed_article_uses_camel_case() {
        let raw = sample_article();
        let outcome = ProcessingOutcome {
            summary: String::new(),
            category: "General".to_string(),
            tags: vec![],
            key_points: vec![],
            sentiment: Sentiment::Neutral,
        };
        let audio = AudioArtifact {
            audio_url: String::new(),
            duration: 0,
            voice: "Rachel".to_string(),
            text: String::new(),
            format: AudioFormat::Mp3,
        };
        let article = ProcessedArticle::assemble("id".to_string(), &raw, &outcome, &audio, Utc::now());
        let json = serde_json::to_string(&article).unwrap();
        assert!(json.contains("\"keyPoints\""));
        assert!(json.contains("\"audioDuration\""));
        assert!(json.contains("\"originalUrl\""));
    }
}
