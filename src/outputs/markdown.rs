//! Markdown rendering of a digest.
//!
//! Articles are grouped by category (in order of first appearance), each
//! group listing its articles with summary, key points, tags and audio.

use crate::error::Result;
use crate::models::DailyDigest;
use crate::utils::{format_duration, slugify_title};
use itertools::Itertools;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Render a [`DailyDigest`] and write it to `{markdown_output_dir}/{date}_digest.md`.
///
/// The directory is created if missing; the path is returned.
#[instrument(level = "info", skip_all, fields(markdown_output_dir = %markdown_output_dir.as_ref().display()))]
pub async fn write_digest(digest: &DailyDigest, markdown_output_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let md = digest_to_markdown(digest);

    let dir = markdown_output_dir.as_ref();
    fs::create_dir_all(dir).await?;

    let path = dir.join(format!("{}_digest.md", digest.date));
    fs::write(&path, md).await?;
    info!(path = %path.display(), "Wrote digest Markdown");

    Ok(path)
}

/// Convert a [`DailyDigest`] to a Markdown document.
pub fn digest_to_markdown(digest: &DailyDigest) -> String {
    let mut md = String::new();

    writeln!(md, "# Daily Digest – {}\n", digest.date).unwrap();
    writeln!(md, "{}\n", digest.summary).unwrap();
    writeln!(
        md,
        "🎧 [Listen to the digest]({}) ({})\n",
        digest.audio.audio_url,
        format_duration(digest.audio.duration * 1000)
    )
    .unwrap();

    if digest.articles.is_empty() {
        writeln!(md, "_No articles today._").unwrap();
        return md;
    }

    writeln!(md, "## Contents\n").unwrap();
    for article in &digest.articles {
        writeln!(md, "- [{}](#{})", article.title, slugify_title(&article.title)).unwrap();
    }
    writeln!(md).unwrap();

    let categories = digest.articles.iter().map(|a| a.category.as_str()).unique();
    for category in categories {
        writeln!(md, "## {}\n", category).unwrap();
        for article in digest.articles.iter().filter(|a| a.category == category) {
            writeln!(md, "### {}\n", article.title).unwrap();
            writeln!(
                md,
                "_{} · {} · {}_\n",
                article.source,
                article.published_at.format("%Y-%m-%d %H:%M UTC"),
                article.sentiment
            )
            .unwrap();
            writeln!(md, "{}\n", article.summary).unwrap();

            if !article.key_points.is_empty() {
                writeln!(md, "**Key points:**\n").unwrap();
                for point in &article.key_points {
                    writeln!(md, "- {}", point).unwrap();
                }
                writeln!(md).unwrap();
            }
            if !article.tags.is_empty() {
                writeln!(md, "**Tags:** {}\n", article.tags.join(", ")).unwrap();
            }
            writeln!(
                md,
                "[Original]({}) · [Audio]({}) ({})\n",
                article.original_url,
                article.audio_url,
                format_duration(article.audio_duration * 1000)
            )
            .unwrap();
        }
    }

    md
}
