//! Content analysis: summary, category, tags, key points and sentiment.
//!
//! # Architecture
//!
//! - [`ContentAnalyzer`]: Core trait for analyzing one article
//! - [`MockContentAnalyzer`]: Deterministic keyword-based stand-in for an AI model
//! - [`ContentProcessor`]: Wraps any analyzer and guarantees one outcome per
//!   input, substituting a fallback when analysis fails
//!
//! Batch output is paired with its input by index, so [`ContentProcessor::process_articles`]
//! always returns exactly as many outcomes as it was given, in the same order.

use crate::error::{DigestError, Result};
use crate::models::{ArticleText, ProcessingOutcome, Sentiment};
use crate::utils::{split_sentences, truncate_for_log};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Category used when nothing more specific applies.
pub const DEFAULT_CATEGORY: &str = "General";

const MAX_KEY_POINTS: usize = 3;
const MAX_TAGS: usize = 5;

/// Analyzes a single article.
#[allow(async_fn_in_trait)]
pub trait ContentAnalyzer {
    async fn analyze(&self, title: &str, content: &str) -> Result<ProcessingOutcome>;
}

/// Keyword rows: (word, tag, category). Earlier rows win the category.
const KEYWORDS: &[(&str, &str, &str)] = &[
    ("ai", "AI", "Technology"),
    ("artificial", "AI", "Technology"),
    ("technology", "Technology", "Technology"),
    ("technologies", "Technology", "Technology"),
    ("innovation", "Innovation", "Technology"),
    ("innovations", "Innovation", "Technology"),
    ("software", "Software", "Technology"),
    ("startup", "Startups", "Business"),
    ("market", "Markets", "Business"),
    ("markets", "Markets", "Business"),
    ("economy", "Economy", "Business"),
    ("company", "Companies", "Business"),
    ("election", "Elections", "Politics"),
    ("government", "Government", "Politics"),
    ("policy", "Policy", "Politics"),
    ("health", "Health", "Health"),
    ("vaccine", "Health", "Health"),
    ("climate", "Climate", "Science"),
    ("research", "Research", "Science"),
];

const POSITIVE: &[&str] = &["growth", "success", "innovat", "improv", "win", "breakthrough", "gain", "benefit", "latest", "newest"];
const NEGATIVE: &[&str] = &["crisis", "declin", "loss", "fail", "war", "death", "risk", "crash", "threat"];

/// A deterministic analyzer that imitates an AI model.
///
/// Same input, same output. Empty content is rejected so callers can
/// exercise their fallback path.
#[derive(Debug, Clone)]
pub struct MockContentAnalyzer {
    latency: Duration,
    api_key: Option<String>,
}

impl MockContentAnalyzer {
    pub fn new(latency: Duration, api_key: Option<String>) -> Self {
        Self { latency, api_key }
    }
}

impl ContentAnalyzer for MockContentAnalyzer {
    #[instrument(level = "debug", skip_all, fields(%title))]
    async fn analyze(&self, title: &str, content: &str) -> Result<ProcessingOutcome> {
        debug!(authenticated = self.api_key.is_some(), "Simulating model call");
        sleep(self.latency).await;

        if content.trim().is_empty() {
            return Err(DigestError::Analysis(format!("article \"{}\" has no content", title)));
        }

        let sentences = split_sentences(content);
        let words = words(&format!("{} {}", title, content));

        let lead = sentences.first().map(String::as_str).unwrap_or_default();
        let summary = format!("Summary: {} - {}", title, lead);

        let mut category = None;
        let mut tags: Vec<String> = Vec::new();
        for (word, tag, row_category) in KEYWORDS {
            if words.iter().any(|w| w == word) {
                category.get_or_insert(*row_category);
                if !tags.iter().any(|t| t == tag) && tags.len() < MAX_TAGS {
                    tags.push(tag.to_string());
                }
            }
        }

        Ok(ProcessingOutcome {
            summary,
            category: category.unwrap_or(DEFAULT_CATEGORY).to_string(),
            tags,
            key_points: sentences.into_iter().take(MAX_KEY_POINTS).collect(),
            sentiment: sentiment_of(&words),
        })
    }
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn sentiment_of(words: &[String]) -> Sentiment {
    let count = |stems: &[&str]| {
        words
            .iter()
            .filter(|w| stems.iter().any(|stem| w.starts_with(stem)))
            .count()
    };
    let positive = count(POSITIVE);
    let negative = count(NEGATIVE);

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// The outcome substituted for an article whose analysis failed.
pub fn fallback_outcome(title: &str, error: &DigestError) -> ProcessingOutcome {
    let reason = error.to_string().replace('\n', " ");
    ProcessingOutcome {
        summary: format!("Summary: {} - processing failed: {}", title, reason),
        category: DEFAULT_CATEGORY.to_string(),
        tags: Vec::new(),
        key_points: Vec::new(),
        sentiment: Sentiment::Neutral,
    }
}

/// Runs a [`ContentAnalyzer`] over articles without ever failing.
#[derive(Debug)]
pub struct ContentProcessor<A> {
    analyzer: A,
}

impl<A> ContentProcessor<A>
where
    A: ContentAnalyzer,
{
    pub fn new(analyzer: A) -> Self {
        Self { analyzer }
    }

    /// Analyze one article, substituting [`fallback_outcome`] on error.
    #[instrument(level = "info", skip_all, fields(%title))]
    pub async fn process_article(&self, title: &str, content: &str) -> ProcessingOutcome {
        let t0 = Instant::now();
        match self.analyzer.analyze(title, content).await {
            Ok(outcome) => {
                debug!(
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    category = %outcome.category,
                    summary = %truncate_for_log(&outcome.summary, 120),
                    "Article analyzed"
                );
                outcome
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed; using fallback outcome");
                fallback_outcome(title, &e)
            }
        }
    }

    /// Analyze every article in order. The result has the same length and
    /// order as `articles`.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub async fn process_articles(&self, articles: &[ArticleText]) -> Vec<ProcessingOutcome> {
        let mut outcomes = Vec::with_capacity(articles.len());
        for article in articles {
            outcomes.push(self.process_article(&article.title, &article.content).await);
        }
        info!(count = outcomes.len(), "Processed article batch");
        outcomes
    }
}
