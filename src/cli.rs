//! Command-line interface definitions for Daily Digest.
//!
//! All options can be provided via command-line flags; API keys can also come
//! from environment variables. Values given here override the config file.

use clap::Parser;

/// Command-line arguments for the Daily Digest application.
///
/// # Examples
///
/// ```sh
/// # Run with the built-in sources and print the result
/// daily_digest
///
/// # Use a config file and write JSON and Markdown renditions
/// daily_digest -c digest.yaml -j ./json -m ./markdown
///
/// # Look back two days and simulate slow collaborators
/// daily_digest --days-back 2 --latency-ms 500
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output directory for the digest JSON file
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Output directory for the digest Markdown file
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Drop articles older than this many days
    #[arg(long)]
    pub days_back: Option<i64>,

    /// Simulated latency of each collaborator call, in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Also render the digest narration in sentence-bounded chunks
    #[arg(long)]
    pub chunked_narration: bool,

    /// Also render a short clip of each article's key points
    #[arg(long)]
    pub key_point_audio: bool,

    /// API key for the content analysis service
    #[arg(long, env = "ANALYZER_API_KEY")]
    pub analyzer_api_key: Option<String>,

    /// API key for the speech synthesis service
    #[arg(long, env = "SPEECH_API_KEY")]
    pub speech_api_key: Option<String>,
}
