//! Daily Digest command-line entry point.
//!
//! Runs the digest pipeline once with the simulated collaborators, logs
//! progress as it goes, and optionally writes JSON and Markdown renditions of
//! the finished digest.
//!
//! ## Usage
//!
//! ```sh
//! daily_digest -j ./json -m ./markdown
//! ```

use clap::Parser;
use daily_digest::config::{load_config, PipelineConfig};
use daily_digest::models::PipelineProgress;
use daily_digest::outputs::{json, markdown};
use daily_digest::processor::MockContentAnalyzer;
use daily_digest::scrapers::MockSourceFetcher;
use daily_digest::synthesizer::MockSpeechBackend;
use daily_digest::utils::{ensure_writable_dir, format_duration, format_file_size};
use daily_digest::DigestPipeline;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::Cli;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    info!("daily_digest starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.json_output_dir, ?args.markdown_output_dir, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(days_back) = args.days_back {
        config.days_back = days_back;
    }
    if let Some(latency_ms) = args.latency_ms {
        config.simulated_latency_ms = latency_ms;
    }
    if args.analyzer_api_key.is_some() {
        config.analyzer_api_key = args.analyzer_api_key.clone();
    }
    if args.speech_api_key.is_some() {
        config.speech_api_key = args.speech_api_key.clone();
    }
    config.validate()?;
    info!(sources = config.sources.len(), days_back = config.days_back, "Configuration ready");

    // Fail early on unwritable output directories
    for dir in [&args.json_output_dir, &args.markdown_output_dir].into_iter().flatten() {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "Output directory is not writable");
            return Err(e.into());
        }
    }

    // ---- Run ----
    let latency = config.simulated_latency();
    let analyzer = MockContentAnalyzer::new(latency, config.analyzer_api_key.clone());
    let speech = MockSpeechBackend::new(latency, config.speech_api_key.clone());
    let pipeline = DigestPipeline::new(MockSourceFetcher::new(latency), analyzer, speech, config);

    let report = |p: &PipelineProgress| {
        let percent = format!("{:.0}%", p.progress);
        info!(step = %p.step, progress = %percent, current = p.current, "{}", p.message);
    };
    let result = pipeline.run(&report).await;

    for message in &result.errors {
        warn!(%message, "Pipeline reported an error");
    }

    let Some(digest) = result.digest else {
        error!(
            articles = result.articles.len(),
            errors = result.errors.len(),
            elapsed = %format_duration(result.duration_ms),
            "Pipeline failed"
        );
        return Err(result.errors.join("; ").into());
    };

    info!(
        id = %digest.id,
        articles = digest.articles_count,
        audio_secs = digest.audio.duration,
        "{}",
        digest.summary
    );

    if args.chunked_narration {
        match pipeline.synthesizer().synthesize_long(&digest.audio.text, "General").await {
            Ok(chunks) => {
                for (i, chunk) in chunks.iter().enumerate() {
                    info!(index = i, url = %chunk.audio_url, secs = chunk.duration, "Narration chunk");
                }
            }
            Err(e) => warn!(error = %e, "Chunked narration failed"),
        }
    }

    if args.key_point_audio {
        let items: Vec<(String, String)> = digest
            .articles
            .iter()
            .map(|a| (a.key_points.join(" "), a.category.clone()))
            .collect();
        let clips = pipeline.synthesizer().synthesize_many(&items).await;
        for (article, clip) in digest.articles.iter().zip(&clips) {
            info!(id = %article.id, url = %clip.audio_url, secs = clip.duration, "Key point clip");
        }
    }

    // ---- Outputs ----
    if let Some(dir) = &args.json_output_dir {
        match json::write_digest(&digest, dir).await {
            Ok(path) => {
                let size = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);
                info!(path = %path.display(), size = %format_file_size(size), "Wrote digest JSON");
            }
            Err(e) => error!(error = %e, "Failed to write digest JSON"),
        }
    }

    if let Some(dir) = &args.markdown_output_dir {
        match markdown::write_digest(&digest, dir).await {
            Ok(path) => info!(path = %path.display(), "Wrote digest Markdown"),
            Err(e) => error!(error = %e, "Failed to write digest Markdown"),
        }
    }

    info!(
        elapsed = %format_duration(result.duration_ms),
        duration_ms = result.duration_ms,
        articles = digest.articles_count,
        errors = result.errors.len(),
        "Execution complete"
    );

    Ok(())
}
