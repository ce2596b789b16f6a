//! Discord webhook publishing.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use uutisvahti_common::text::{domain_favicon, truncate};
use uutisvahti_common::UutisvahtiError;

/// Fully assembled post, ready for the wire.
#[derive(Debug, Clone)]
pub struct NewsPost {
    pub title: String,
    pub link: String,
    pub source: String,
    pub description: String,
    pub image: Option<String>,
}

#[async_trait]
pub trait NewsPublisher: Send + Sync {
    async fn publish(&self, post: &NewsPost) -> Result<()>;
}

/// Title classification: keyword table → channel hashtag + embed color.
const CLASSIFY_RULES: &[(&[&str], &str, u32)] = &[
    (
        &["update", "release", "patch", "notes", "päivitys"],
        "#päivitys",
        0x00A3FF,
    ),
    (
        &["race", "racing", "zrl", "cup", "series", "kisa"],
        "#kisa",
        0xFF6B00,
    ),
    (
        &["route", "climb", "portal", "course", "reitti"],
        "#reitti",
        0x66BB6A,
    ),
    (
        &["bike", "wheel", "frame", "hardware", "equipment"],
        "#kalusto",
        0x9C27B0,
    ),
];

const DEFAULT_TAG: (&str, u32) = ("#uutinen", 0x5865F2);

/// Pick the hashtag and color for a title. First matching table row wins.
pub fn classify(title: &str) -> (&'static str, u32) {
    let lowered = title.to_lowercase();
    for (keywords, tag, color) in CLASSIFY_RULES {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return (tag, *color);
        }
    }
    DEFAULT_TAG
}

pub struct DiscordPublisher {
    client: reqwest::Client,
    webhook_url: String,
    prefer_large_image: bool,
    summary_maxlen: usize,
}

impl DiscordPublisher {
    pub fn new(
        webhook_url: &str,
        prefer_large_image: bool,
        summary_maxlen: usize,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build Discord HTTP client");
        Self {
            client,
            webhook_url: webhook_url.to_string(),
            prefer_large_image,
            summary_maxlen,
        }
    }
}

#[async_trait]
impl NewsPublisher for DiscordPublisher {
    async fn publish(&self, post: &NewsPost) -> Result<()> {
        let (tag, color) = classify(&post.title);

        let mut author = serde_json::json!({ "name": post.source });
        if let Some(fav) = domain_favicon(&post.link) {
            author["icon_url"] = serde_json::Value::String(fav);
        }

        let mut embed = serde_json::json!({
            "type": "rich",
            "title": post.title,
            "url": post.link,
            "description": truncate(&post.description, self.summary_maxlen),
            "color": color,
            "author": author,
            "footer": { "text": format!("{tag} · RCF-uutiset") },
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let Some(image_url) = &post.image {
            let slot = if self.prefer_large_image {
                "image"
            } else {
                "thumbnail"
            };
            embed[slot] = serde_json::json!({ "url": image_url });
        }

        let payload = serde_json::json!({
            "embeds": [embed],
            "components": [{
                "type": 1,
                "components": [{
                    "type": 2,
                    "style": 5,
                    "label": "Avaa artikkeli",
                    "url": post.link,
                }],
            }],
        });

        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(UutisvahtiError::Publish(format!("Discord POST failed: {status} {body}")).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_table() {
        assert_eq!(classify("Zwift update 1.60 release notes").0, "#päivitys");
        assert_eq!(classify("ZRL round 3 results").0, "#kisa");
        assert_eq!(classify("New climb portal announced").0, "#reitti");
        assert_eq!(classify("Best wheel upgrades").0, "#kalusto");
        assert_eq!(classify("Something else entirely").0, "#uutinen");
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("RACE DAY").0, "#kisa");
    }
}
