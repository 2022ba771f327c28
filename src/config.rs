//! Pipeline configuration.
//!
//! Configuration is read once at start-up (from an optional YAML file plus CLI
//! overrides) and handed to each collaborator's constructor. Nothing in the
//! pipeline reads the environment on its own.
//!
//! # Example
//!
//! ```yaml
//! days_back: 2
//! max_chunk_len: 800
//! audio_format: ogg
//! simulated_latency_ms: 250
//! sources:
//!   - id: bbc
//!     name: BBC News
//!     url: https://www.bbc.com/news
//!     selector: .gs-c-promo-heading
//!     category: News
//! ```

use crate::error::{DigestError, Result};
use crate::models::{AudioFormat, SourceDescriptor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// Default recency window, in days.
pub const DEFAULT_DAYS_BACK: i64 = 1;

/// Default maximum characters per synthesized chunk.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 1000;

/// Largest accepted recency window, in days (about a century).
pub const MAX_DAYS_BACK: i64 = 36_500;

/// Everything a pipeline run needs to know up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sources: Vec<SourceDescriptor>,
    /// Articles older than this many days are dropped.
    pub days_back: i64,
    pub max_chunk_len: usize,
    pub audio_format: AudioFormat,
    /// Delay applied by each mock collaborator call.
    pub simulated_latency_ms: u64,
    pub analyzer_api_key: Option<String>,
    pub speech_api_key: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            days_back: DEFAULT_DAYS_BACK,
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
            audio_format: AudioFormat::default(),
            simulated_latency_ms: 0,
            analyzer_api_key: None,
            speech_api_key: None,
        }
    }
}

impl PipelineConfig {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.days_back < 0 {
            return Err(DigestError::Config(format!(
                "days_back must not be negative (got {})",
                self.days_back
            )));
        }
        if self.days_back > MAX_DAYS_BACK {
            return Err(DigestError::Config(format!(
                "days_back must be at most {} (got {})",
                MAX_DAYS_BACK, self.days_back
            )));
        }
        if self.max_chunk_len == 0 {
            return Err(DigestError::Config("max_chunk_len must be positive".to_string()));
        }
        Ok(())
    }
}

/// The built-in source list used when no configuration names any.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(
            "techcrunch",
            "TechCrunch",
            "https://techcrunch.com",
            ".post-block__content",
            "Tech",
        ),
        SourceDescriptor::new(
            "hackernews",
            "Hacker News",
            "https://news.ycombinator.com",
            ".titleline > a",
            "Tech",
        ),
        SourceDescriptor::new(
            "bbc",
            "BBC News",
            "https://www.bbc.com/news",
            ".gs-c-promo-heading",
            "News",
        ),
    ]
}

/// Load a YAML configuration file. Missing keys take their defaults.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let raw = std::fs::read_to_string(path.as_ref())?;
    let config: PipelineConfig = serde_yaml::from_str(&raw)?;
    config.validate()?;
    info!(sources = config.sources.len(), days_back = config.days_back, "Loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.days_back, 1);
        assert_eq!(config.max_chunk_len, 1000);
        assert_eq!(config.audio_format, AudioFormat::Mp3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_sources_order() {
        let ids: Vec<String> = default_sources().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["techcrunch", "hackernews", "bbc"]);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: PipelineConfig = serde_yaml::from_str("days_back: 3\naudio_format: wav\n").unwrap();
        assert_eq!(config.days_back, 3);
        assert_eq!(config.audio_format, AudioFormat::Wav);
        assert_eq!(config.max_chunk_len, 1000);
        assert_eq!(config.sources.len(), 3);
    }

    #[test]
    fn test_validate_rejects_zero_chunk_len() {
        let config = PipelineConfig {
            max_chunk_len: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_negative_days() {
        let config = PipelineConfig {
            days_back: -1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bounds_days_back() {
        let at_limit = PipelineConfig {
            days_back: MAX_DAYS_BACK,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let huge = PipelineConfig {
            days_back: 1_000_000_000,
            ..Default::default()
        };
        assert!(matches!(huge.validate(), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_load_config_rejects_huge_days_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "days_back: 1000000000").unwrap();
        assert!(matches!(load_config(file.path()), Err(DigestError::Config(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "sources:\n  - id: reuters\n    name: Reuters\n    url: https://www.reuters.com\n    selector: article\n    category: Business\nsimulated_latency_ms: 5\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "Reuters");
        assert_eq!(config.simulated_latency(), Duration::from_millis(5));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/definitely/not/here.yaml");
        assert!(matches!(result, Err(DigestError::Io(_))));
    }
}
