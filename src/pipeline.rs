//! The daily digest pipeline.
//!
//! A run moves through four stages in strict sequence:
//!
//! 1. **Scraping** (10% → 20%): fetch all configured sources once
//! 2. **AI processing** (30% → 50%): analyze every scraped article as a batch
//! 3. **Audio generation** (60% → 80%): synthesize audio per article and merge
//!    it with the article and its analysis
//! 4. **Digest generation** (85% → 100%): narrate the whole digest and
//!    assemble the [`DailyDigest`]
//!
//! An article whose audio fails is dropped and its error recorded; the run
//! still succeeds. A stage-fatal error (a misaligned analysis batch or a
//! failed digest narration) ends the run with `success = false`, keeping the
//! articles accumulated so far.

use crate::config::PipelineConfig;
use crate::error::{DigestError, Result};
use crate::models::{
    ArticleText, DailyDigest, PipelineResult, PipelineStep, ProcessedArticle, ProcessingOutcome,
    RawArticle,
};
use crate::processor::{ContentAnalyzer, ContentProcessor};
use crate::progress::{snapshot, ProgressSink};
use crate::scrapers::{Scraper, SourceFetcher};
use crate::synthesizer::{AudioSynthesizer, SpeechBackend};
use chrono::Utc;
use itertools::Itertools;
use rand::{rng, Rng};
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Sequences scraping, analysis, synthesis and digest assembly.
#[derive(Debug)]
pub struct DigestPipeline<F, A, S> {
    scraper: Scraper<F>,
    processor: ContentProcessor<A>,
    synthesizer: AudioSynthesizer<S>,
    config: PipelineConfig,
}

impl<F, A, S> DigestPipeline<F, A, S>
where
    F: SourceFetcher,
    A: ContentAnalyzer,
    S: SpeechBackend,
{
    pub fn new(fetcher: F, analyzer: A, speech: S, config: PipelineConfig) -> Self {
        Self {
            scraper: Scraper::new(fetcher, config.days_back),
            processor: ContentProcessor::new(analyzer),
            synthesizer: AudioSynthesizer::new(speech, config.audio_format, config.max_chunk_len),
            config,
        }
    }

    pub fn synthesizer(&self) -> &AudioSynthesizer<S> {
        &self.synthesizer
    }

    /// Run the pipeline once over the configured sources.
    ///
    /// Never returns an error: failures are reported through the result's
    /// `success` flag and `errors` list.
    #[instrument(level = "info", skip_all, fields(sources = self.config.sources.len()))]
    pub async fn run(&self, sink: &impl ProgressSink) -> PipelineResult {
        let t0 = Instant::now();
        let mut articles = Vec::new();
        let mut errors = Vec::new();

        let outcome = self.execute(sink, &mut articles, &mut errors).await;
        let duration_ms = t0.elapsed().as_millis() as u64;

        match outcome {
            Ok(digest) => {
                info!(
                    articles = digest.articles_count,
                    errors = errors.len(),
                    duration_ms,
                    "Pipeline completed"
                );
                PipelineResult {
                    success: true,
                    digest: Some(digest),
                    articles,
                    errors,
                    duration_ms,
                }
            }
            Err(e) => {
                error!(error = %e, accumulated = articles.len(), duration_ms, "Pipeline failed");
                errors.push(format!("Pipeline error: {}", e));
                PipelineResult {
                    success: false,
                    digest: None,
                    articles,
                    errors,
                    duration_ms,
                }
            }
        }
    }

    async fn execute(
        &self,
        sink: &impl ProgressSink,
        accumulated: &mut Vec<ProcessedArticle>,
        errors: &mut Vec<String>,
    ) -> Result<DailyDigest> {
        // ---- Scraping ----
        sink.report(&snapshot(PipelineStep::Scraping, 10.0, 1, "Loading articles from sources..."));
        let scraped = self.scraper.scrape(&self.config.sources).await;
        sink.report(&snapshot(
            PipelineStep::Scraping,
            20.0,
            scraped.len(),
            format!("Loaded {} articles", scraped.len()),
        ));

        // ---- AI processing ----
        sink.report(&snapshot(PipelineStep::AiProcessing, 30.0, 0, "Processing articles with AI..."));
        let texts: Vec<ArticleText> = scraped.iter().map(ArticleText::from).collect();
        let outcomes = self.processor.process_articles(&texts).await;
        sink.report(&snapshot(
            PipelineStep::AiProcessing,
            50.0,
            outcomes.len(),
            format!("Processed {} articles", outcomes.len()),
        ));

        // ---- Audio generation ----
        sink.report(&snapshot(PipelineStep::AudioGeneration, 60.0, 0, "Generating audio for articles..."));
        self.generate_article_audio(&scraped, &outcomes, sink, accumulated, errors)
            .await?;

        // ---- Digest generation ----
        sink.report(&snapshot(PipelineStep::DigestGeneration, 85.0, 0, "Generating daily digest..."));
        let digest = self.assemble_digest(accumulated).await?;
        sink.report(&snapshot(PipelineStep::DigestGeneration, 100.0, 1, "Digest is ready!"));

        Ok(digest)
    }

    /// Pair each article with its outcome by index, synthesize its audio, and
    /// append the merged article. Audio failures drop the article.
    #[instrument(level = "info", skip_all, fields(count = scraped.len()))]
    async fn generate_article_audio(
        &self,
        scraped: &[RawArticle],
        outcomes: &[ProcessingOutcome],
        sink: &impl ProgressSink,
        accumulated: &mut Vec<ProcessedArticle>,
        errors: &mut Vec<String>,
    ) -> Result<()> {
        if outcomes.len() != scraped.len() {
            return Err(DigestError::Misaligned {
                expected: scraped.len(),
                actual: outcomes.len(),
            });
        }

        let total = scraped.len();
        let run_millis = Utc::now().timestamp_millis();
        for (i, (article, outcome)) in scraped.iter().zip(outcomes).enumerate() {
            let audio = self
                .synthesizer
                .synthesize_article(&article.title, &outcome.summary, &outcome.category)
                .await;

            match audio {
                Ok(audio) => {
                    let id = format!("article_{}_{}", run_millis, i);
                    accumulated.push(ProcessedArticle::assemble(id, article, outcome, &audio, Utc::now()));

                    let done = i + 1;
                    sink.report(&snapshot(
                        PipelineStep::AudioGeneration,
                        60.0 + done as f64 / total as f64 * 20.0,
                        done,
                        format!("Generated audio for {}/{} articles", done, total),
                    ));
                }
                Err(e) => {
                    warn!(index = i, title = %article.title, error = %e, "Audio failed; dropping article");
                    errors.push(format!("Error processing article \"{}\": {}", article.title, e));
                }
            }
        }
        Ok(())
    }

    async fn assemble_digest(&self, articles: &[ProcessedArticle]) -> Result<DailyDigest> {
        let narration: Vec<(String, String)> = articles
            .iter()
            .map(|a| (a.title.clone(), a.summary.clone()))
            .collect();
        let audio = self.synthesizer.synthesize_digest(&narration).await?;

        let categories = articles.iter().map(|a| a.category.as_str()).unique().join(", ");
        let summary = format!(
            "Today's digest contains {} articles from categories: {}.",
            articles.len(),
            categories
        );

        let created_at = Utc::now();
        let suffix: u32 = rng().random();
        Ok(DailyDigest {
            id: format!("digest_{}_{:08x}", created_at.timestamp_millis(), suffix),
            date: created_at.date_naive(),
            articles_count: articles.len(),
            summary,
            audio,
            articles: articles.to_vec(),
            created_at,
        })
    }
}
