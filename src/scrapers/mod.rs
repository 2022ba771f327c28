//! Source scraping: fetch candidates from every configured source, then
//! filter them down to recent, unique articles.
//!
//! Fetching goes through the [`SourceFetcher`] trait so the mock in [`mock`]
//! can be replaced with a real fetcher without touching the pipeline.
//!
//! # Post-processing
//!
//! After all sources are merged (in input order), two filters run once over
//! the whole list:
//!
//! 1. [`filter_by_recency`]: drops articles published before `now - days_back`
//! 2. [`remove_duplicate_titles`]: keeps the first article for each
//!    trimmed, lowercased title
//!
//! A title shared by two sources therefore belongs to whichever source comes
//! first in the configuration.

pub mod mock;

use crate::error::Result;
use crate::models::{RawArticle, SourceDescriptor};
use chrono::{DateTime, TimeDelta, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{debug, error, info, instrument};

pub use mock::MockSourceFetcher;

/// Fetches raw article candidates from one source.
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Vec<RawArticle>>;
}

/// Runs a [`SourceFetcher`] across a source list and applies the filters.
#[derive(Debug)]
pub struct Scraper<F> {
    fetcher: F,
    days_back: i64,
}

impl<F> Scraper<F>
where
    F: SourceFetcher,
{
    pub fn new(fetcher: F, days_back: i64) -> Self {
        Self { fetcher, days_back }
    }

    /// Scrape every source in order and return the filtered, merged list.
    ///
    /// A source that fails is logged and contributes no articles.
    #[instrument(level = "info", skip_all, fields(sources = sources.len()))]
    pub async fn scrape(&self, sources: &[SourceDescriptor]) -> Vec<RawArticle> {
        let fetcher = &self.fetcher;
        let all_articles: Vec<RawArticle> = stream::iter(sources)
            .then(|source| async move {
                debug!(source = %source.name, "Scraping source");
                match fetcher.fetch(source).await {
                    Ok(articles) => {
                        debug!(source = %source.name, count = articles.len(), "Fetched source");
                        articles
                    }
                    Err(e) => {
                        error!(source = %source.name, error = %e, "Source fetch failed; skipping");
                        Vec::new()
                    }
                }
            })
            .flat_map(stream::iter)
            .collect()
            .await;

        let fetched = all_articles.len();
        let recent = filter_by_recency(all_articles, self.days_back, Utc::now());
        let unique = remove_duplicate_titles(recent);

        info!(fetched, kept = unique.len(), "Scraping complete");
        unique
    }
}

/// Drop articles published strictly before `now - days_back` days.
///
/// A window reaching past the earliest representable time keeps everything.
pub fn filter_by_recency(articles: Vec<RawArticle>, days_back: i64, now: DateTime<Utc>) -> Vec<RawArticle> {
    let Some(cutoff) = TimeDelta::try_days(days_back).and_then(|window| now.checked_sub_signed(window)) else {
        debug!(days_back, "Recency window exceeds the calendar; keeping all articles");
        return articles;
    };
    articles
        .into_iter()
        .filter(|article| article.published_at >= cutoff)
        .collect()
}

/// Keep the first article for each trimmed, lowercased title.
pub fn remove_duplicate_titles(articles: Vec<RawArticle>) -> Vec<RawArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(title_key(&article.title)))
        .collect()
}

fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}
