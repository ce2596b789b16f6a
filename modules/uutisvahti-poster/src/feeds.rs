//! Feed list loading and RSS/Atom fetching.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use uutisvahti_common::text::clean_text;
use uutisvahti_common::{FeedEntry, UutisvahtiError};

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap());

/// Read the feed URL list: one URL per line, `#` comments, blanks ignored.
pub fn read_feeds(path: &Path) -> Vec<String> {
    let Ok(data) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    data.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

pub struct FetchedFeed {
    pub source: String,
    pub entries: Vec<FeedEntry>,
}

pub struct FeedFetcher {
    client: reqwest::Client,
    max_items: usize,
}

impl FeedFetcher {
    pub fn new(timeout: Duration, max_items: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build feed HTTP client");
        Self { client, max_items }
    }

    /// Fetch and parse one feed into entries, feed order, capped at
    /// `max_items`.
    pub async fn fetch(&self, feed_url: &str) -> Result<FetchedFeed> {
        let resp = self
            .client
            .get(feed_url)
            .header("User-Agent", "uutisvahti/0.1 (RCF news bot)")
            .send()
            .await
            .context("Feed fetch failed")?;

        let bytes = resp.bytes().await.context("Failed to read feed body")?;
        let feed = feed_rs::parser::parse(&bytes[..])
            .map_err(|e| UutisvahtiError::Feed(format!("Failed to parse RSS/Atom feed: {e}")))?;

        let source = feed
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| feed_url.to_string());

        let mut entries: Vec<FeedEntry> = feed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_else(|| feed_url.to_string());
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Uusi artikkeli".to_string());
                let summary_html = entry.summary.map(|t| t.content).unwrap_or_default();
                let image = entry_image(&entry.media, &summary_html);
                let published = entry.published.or(entry.updated);

                FeedEntry::new(title, link)
                    .with_id(entry.id)
                    .with_source(source.clone())
                    .with_summary(clean_text(&summary_html))
                    .with_published(published)
                    .with_image(image)
            })
            .collect();
        entries.truncate(self.max_items);

        info!(
            feed_url,
            source = source.as_str(),
            items = entries.len(),
            "Feed parsed"
        );
        Ok(FetchedFeed { source, entries })
    }
}

/// Entry image: media metadata first, then the first `<img src>` in the
/// summary HTML.
fn entry_image(media: &[feed_rs::model::MediaObject], summary_html: &str) -> Option<String> {
    media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.clone())
        .next()
        .or_else(|| {
            media
                .iter()
                .flat_map(|m| m.content.iter())
                .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
        })
        .or_else(|| {
            IMG_SRC_RE
                .captures(summary_html)
                .map(|caps| caps[1].to_string())
        })
}
