//! Text-to-speech synthesis.
//!
//! [`AudioSynthesizer`] picks a voice for a category, asks a [`SpeechBackend`]
//! for an audio reference, and estimates the duration from the text length at
//! [`CHARS_PER_SECOND`]. Text longer than the configured maximum can be split
//! at sentence boundaries with [`split_long_text`] and rendered chunk by chunk.
//!
//! # Voices
//!
//! | Category | Voice |
//! |----------|-------|
//! | Tech | Rachel |
//! | Business | Adam |
//! | News | Sarah |
//! | General | Rachel |
//! | anything else | Rachel |

use crate::error::{DigestError, Result};
use crate::models::{AudioArtifact, AudioFormat};
use crate::utils::{slugify_title, split_sentences};
use once_cell::sync::Lazy;
use rand::{rng, Rng};
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Assumed speaking rate.
pub const CHARS_PER_SECOND: u64 = 15;

pub const DEFAULT_VOICE: &str = "Rachel";

const VOICES: &[(&str, &str)] = &[
    ("Tech", "Rachel"),
    ("Business", "Adam"),
    ("News", "Sarah"),
    ("General", "Rachel"),
];

/// Turns text into an opaque audio reference.
#[allow(async_fn_in_trait)]
pub trait SpeechBackend {
    async fn render(&self, text: &str, voice: &str, format: AudioFormat) -> Result<String>;
}

/// Simulated TTS service returning mock audio URLs.
#[derive(Debug, Clone)]
pub struct MockSpeechBackend {
    latency: Duration,
    api_key: Option<String>,
}

impl MockSpeechBackend {
    pub fn new(latency: Duration, api_key: Option<String>) -> Self {
        Self { latency, api_key }
    }
}

impl SpeechBackend for MockSpeechBackend {
    #[instrument(level = "debug", skip_all, fields(%voice, chars = text.chars().count()))]
    async fn render(&self, text: &str, voice: &str, format: AudioFormat) -> Result<String> {
        debug!(authenticated = self.api_key.is_some(), "Simulating TTS call");
        sleep(self.latency).await;

        let id: u64 = rng().random();
        Ok(format!(
            "https://mock-audio.local/{}/audio-{:016x}.{}",
            slugify_title(voice),
            id,
            format.extension()
        ))
    }
}

/// Voice for a category, falling back to [`DEFAULT_VOICE`].
pub fn voice_for(category: &str) -> &'static str {
    VOICES
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, voice)| *voice)
        .unwrap_or(DEFAULT_VOICE)
}

/// Estimated spoken length: `ceil(chars / 15)` seconds.
pub fn estimate_duration(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(CHARS_PER_SECOND)
}

static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s.,!?]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])\s*(\p{Lu})").unwrap());

/// Normalize text for speech: drop symbols, collapse whitespace, and make
/// sure sentence punctuation is followed by a space.
pub fn optimize_text_for_tts(text: &str) -> String {
    let text = SPECIAL_CHARS.replace_all(text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = SENTENCE_GAP.replace_all(&text, "$1 $2");
    text.trim().to_string()
}

/// Split text into chunks of whole sentences, each at most `max_len` chars.
///
/// Text that already fits is returned as one chunk. Sentences are joined with
/// single spaces. A single sentence longer than `max_len` becomes its own
/// chunk rather than being cut.
pub fn split_long_text(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if current_len > 0 && current_len + 1 + len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&sentence);
        current_len += len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Produces [`AudioArtifact`]s through a [`SpeechBackend`].
#[derive(Debug)]
pub struct AudioSynthesizer<B> {
    backend: B,
    format: AudioFormat,
    max_chunk_len: usize,
}

impl<B> AudioSynthesizer<B>
where
    B: SpeechBackend,
{
    pub fn new(backend: B, format: AudioFormat, max_chunk_len: usize) -> Self {
        Self {
            backend,
            format,
            max_chunk_len,
        }
    }

    /// Synthesize `text` with the voice mapped from `category`.
    #[instrument(level = "info", skip_all, fields(%category, chars = text.chars().count()))]
    pub async fn synthesize(&self, text: &str, category: &str) -> Result<AudioArtifact> {
        let voice = voice_for(category);
        let t0 = Instant::now();
        let audio_url = self.backend.render(text, voice, self.format).await?;
        let duration = estimate_duration(text);
        debug!(elapsed_ms = t0.elapsed().as_millis() as u64, %audio_url, duration, "Synthesized audio");

        Ok(AudioArtifact {
            audio_url,
            duration,
            voice: voice.to_string(),
            text: text.to_string(),
            format: self.format,
        })
    }

    /// Audio for one article: `"<title>. <summary>"`.
    pub async fn synthesize_article(&self, title: &str, summary: &str, category: &str) -> Result<AudioArtifact> {
        let text = format!("{}. {}", title, summary);
        self.synthesize(&text, category).await
    }

    /// A single narration over every `(title, summary)` pair, in order.
    pub async fn synthesize_digest(&self, articles: &[(String, String)]) -> Result<AudioArtifact> {
        let text = digest_narration(articles);
        self.synthesize(&text, "General").await
    }

    /// Synthesize each `(text, category)` item, substituting an empty
    /// artifact for any item that fails.
    #[instrument(level = "info", skip_all, fields(count = items.len()))]
    pub async fn synthesize_many(&self, items: &[(String, String)]) -> Vec<AudioArtifact> {
        let mut results = Vec::with_capacity(items.len());
        for (text, category) in items {
            match self.synthesize(text, category).await {
                Ok(artifact) => results.push(artifact),
                Err(e) => {
                    warn!(error = %e, "Audio generation failed; using empty artifact");
                    results.push(AudioArtifact {
                        audio_url: String::new(),
                        duration: 0,
                        voice: "default".to_string(),
                        text: text.clone(),
                        format: self.format,
                    });
                }
            }
        }
        results
    }

    /// Normalize and split long text, then synthesize each chunk in order.
    ///
    /// Any chunk failing fails the whole call, since the result must cover
    /// the full text.
    #[instrument(level = "info", skip_all, fields(%category))]
    pub async fn synthesize_long(&self, text: &str, category: &str) -> Result<Vec<AudioArtifact>> {
        let optimized = optimize_text_for_tts(text);
        let chunks = split_long_text(&optimized, self.max_chunk_len);
        info!(chunks = chunks.len(), max_chunk_len = self.max_chunk_len, "Synthesizing long text");

        let mut artifacts = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            match self.synthesize(chunk, category).await {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    error!(index, error = %e, "Chunk synthesis failed");
                    return Err(DigestError::Synthesis(format!("chunk {}: {}", index, e)));
                }
            }
        }
        Ok(artifacts)
    }
}

/// Narration text for a digest: a count followed by numbered entries.
pub fn digest_narration(articles: &[(String, String)]) -> String {
    let entries = articles
        .iter()
        .enumerate()
        .map(|(i, (title, summary))| format!("{}. {}. {}", i + 1, title, summary))
        .collect::<Vec<_>>()
        .join(" ");
    format!("Today's digest contains {} articles. {}", articles.len(), entries)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer() -> AudioSynthesizer<MockSpeechBackend> {
        AudioSynthesizer::new(MockSpeechBackend::new(Duration::ZERO, None), AudioFormat::Mp3, 1000)
    }

    struct BrokenBackend;

    impl SpeechBackend for BrokenBackend {
        async fn render(&self, text: &str, _voice: &str, _format: AudioFormat) -> Result<String> {
            if text.contains("bad") {
                Err(DigestError::Synthesis("voice server down".to_string()))
            } else {
                Ok("ref".to_string())
            }
        }
    }

    #[test]
    fn test_voice_mapping() {
        assert_eq!(voice_for("Tech"), "Rachel");
        assert_eq!(voice_for("Business"), "Adam");
        assert_eq!(voice_for("News"), "Sarah");
        assert_eq!(voice_for("Sports"), DEFAULT_VOICE);
    }

    #[test]
    fn test_estimate_duration() {
        assert_eq!(estimate_duration(""), 0);
        assert_eq!(estimate_duration("a"), 1);
        assert_eq!(estimate_duration(&"a".repeat(15)), 1);
        assert_eq!(estimate_duration(&"a".repeat(16)), 2);
        assert_eq!(estimate_duration(&"č".repeat(30)), 2);
    }

    #[tokio::test]
    async fn test_synthesize_artifact() {
        let text = "Hello there, this is a test.";
        let artifact = synthesizer().synthesize(text, "Business").await.unwrap();

        assert_eq!(artifact.voice, "Adam");
        assert_eq!(artifact.duration, 2);
        assert_eq!(artifact.text, text);
        assert_eq!(artifact.format, AudioFormat::Mp3);
        assert!(artifact.audio_url.starts_with("https://mock-audio.local/adam/"));
        assert!(artifact.audio_url.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_synthesize_article_text() {
        let artifact = synthesizer().synthesize_article("Title", "Summary", "News").await.unwrap();
        assert_eq!(artifact.text, "Title. Summary");
        assert_eq!(artifact.voice, "Sarah");
    }

    #[test]
    fn test_digest_narration() {
        let articles = vec![
            ("First".to_string(), "One.".to_string()),
            ("Second".to_string(), "Two.".to_string()),
        ];
        assert_eq!(
            digest_narration(&articles),
            "Today's digest contains 2 articles. 1. First. One. 2. Second. Two."
        );
        assert_eq!(digest_narration(&[]), "Today's digest contains 0 articles.");
    }

    #[test]
    fn test_split_long_text_short_input() {
        assert_eq!(split_long_text("Short.", 1000), vec!["Short."]);
    }

    #[test]
    fn test_split_long_text_respects_max_and_sentences() {
        let sentences: Vec<String> = (0..40).map(|i| format!("Sentence number {} is here.", i)).collect();
        let text = sentences.join(" ");
        let chunks = split_long_text(&text, 100);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too long: {}", chunk);
            assert!(chunk.ends_with('.'));
        }
        let rejoined: Vec<String> = chunks.iter().flat_map(|c| split_sentences(c)).collect();
        assert_eq!(rejoined, sentences);
    }

    #[test]
    fn test_split_long_text_mixed_terminators() {
        let text = "Is it done? Yes! It is done. Really finished now.";
        let chunks = split_long_text(text, 20);
        assert_eq!(chunks, vec!["Is it done? Yes!", "It is done.", "Really finished now."]);
    }

    #[test]
    fn test_split_long_text_oversized_sentence_kept_whole() {
        let long = format!("{}.", "word ".repeat(30).trim_end());
        let text = format!("Short one. {} Tail.", long);
        let chunks = split_long_text(&text, 40);
        assert_eq!(chunks, vec!["Short one.".to_string(), long, "Tail.".to_string()]);
    }

    #[test]
    fn test_optimize_text_for_tts() {
        assert_eq!(optimize_text_for_tts("  Hello   #world!How are you?  "), "Hello world! How are you?");
        assert_eq!(optimize_text_for_tts("Price: $5 (approx)."), "Price 5 approx.");
    }

    #[tokio::test]
    async fn test_synthesize_long_chunks_in_order() {
        let synth = AudioSynthesizer::new(MockSpeechBackend::new(Duration::ZERO, None), AudioFormat::Ogg, 50);
        let text = "First sentence is here. Second sentence is here. Third sentence is here.";
        let artifacts = synth.synthesize_long(text, "Tech").await.unwrap();

        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].text, "First sentence is here. Second sentence is here.");
        assert_eq!(artifacts[1].text, "Third sentence is here.");
        assert!(artifacts.iter().all(|a| a.format == AudioFormat::Ogg));
    }

    #[tokio::test]
    async fn test_synthesize_long_propagates_chunk_failure() {
        let synth = AudioSynthesizer::new(BrokenBackend, AudioFormat::Mp3, 20);
        let result = synth.synthesize_long("A good one here. A bad one here.", "Tech").await;
        assert!(matches!(result, Err(DigestError::Synthesis(_))));
    }

    #[tokio::test]
    async fn test_synthesize_many_uses_fallback() {
        let synth = AudioSynthesizer::new(BrokenBackend, AudioFormat::Mp3, 1000);
        let items = vec![
            ("good text".to_string(), "Tech".to_string()),
            ("bad text".to_string(), "News".to_string()),
        ];
        let results = synth.synthesize_many(&items).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].audio_url, "ref");
        assert_eq!(results[1].audio_url, "");
        assert_eq!(results[1].duration, 0);
        assert_eq!(results[1].voice, "default");
    }
}
