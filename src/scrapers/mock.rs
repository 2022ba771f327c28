//! Simulated source fetcher.
//!
//! Stands in for real HTML scraping. Each source yields two recent articles
//! whose URLs are resolved against the source's base URL, after a fixed delay.

use super::SourceFetcher;
use crate::error::{DigestError, Result};
use crate::models::{RawArticle, SourceDescriptor};
use chrono::{Duration, Utc};
use std::collections::HashSet;
use std::time::Duration as StdDuration;
use tokio::time::sleep;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct MockSourceFetcher {
    latency: StdDuration,
    failing_sources: HashSet<String>,
}

impl MockSourceFetcher {
    pub fn new(latency: StdDuration) -> Self {
        Self {
            latency,
            failing_sources: HashSet::new(),
        }
    }

    /// Make every fetch of the given source id fail.
    pub fn failing_source(mut self, source_id: &str) -> Self {
        self.failing_sources.insert(source_id.to_string());
        self
    }
}

impl SourceFetcher for MockSourceFetcher {
    #[instrument(level = "debug", skip_all, fields(source = %source.id))]
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<RawArticle>> {
        sleep(self.latency).await;

        if self.failing_sources.contains(&source.id) {
            return Err(DigestError::SourceFetch {
                source_id: source.id.clone(),
                reason: "simulated fetch failure".to_string(),
            });
        }

        let base = Url::parse(&source.url)?;
        let now = Utc::now();
        let articles = vec![
            RawArticle {
                title: format!("{} - AI revolution", source.name),
                content: format!(
                    "This is a test article about the AI revolution from {}. It covers the latest trends in artificial intelligence and their impact on society.",
                    source.name
                ),
                url: base.join("test-article-1")?.to_string(),
                published_at: now,
                source: source.name.clone(),
            },
            RawArticle {
                title: format!("{} - Technology", source.name),
                content: format!(
                    "Another test article about technology from {}. It describes the newest innovations and their practical use.",
                    source.name
                ),
                url: base.join("test-article-2")?.to_string(),
                published_at: now - Duration::hours(1),
                source: source.name.clone(),
            },
        ];

        debug!(count = articles.len(), "Simulated articles");
        Ok(articles)
    }
}
