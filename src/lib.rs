//! # Daily Digest
//!
//! A news digest pipeline that scrapes article sources, analyzes each article
//! (summary, category, tags, key points, sentiment), synthesizes a spoken
//! audio rendition per article, and assembles everything into one
//! [`DailyDigest`](models::DailyDigest) with a combined narration.
//!
//! ## Architecture
//!
//! 1. **Scraping** ([`scrapers`]): fetch each source, drop stale and duplicate articles
//! 2. **Processing** ([`processor`]): analyze every article, with a fallback per failure
//! 3. **Synthesis** ([`synthesizer`]): voice selection, duration estimate, chunking
//! 4. **Orchestration** ([`pipeline`]): run the stages in order, report
//!    progress, collect errors
//!
//! Each external service sits behind a trait ([`scrapers::SourceFetcher`],
//! [`processor::ContentAnalyzer`], [`synthesizer::SpeechBackend`]). The
//! bundled implementations are simulations with a configurable delay.

pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod processor;
pub mod progress;
pub mod scrapers;
pub mod synthesizer;
pub mod utils;

pub use config::PipelineConfig;
pub use error::{DigestError, Result};
pub use pipeline::DigestPipeline;
pub use progress::{ChannelSink, ProgressSink};
