//! Open Graph / Twitter card scraping.
//!
//! Feeds routinely ship truncated summaries and no image, while the article
//! page carries both in its meta tags. This pulls them out best-effort;
//! any failure just means the embed goes out without them.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use uutisvahti_common::text::clean_text;

static OG_IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+property=["']og:image["'][^>]*content=["']([^"']+)["']"#).unwrap()
});
static TW_IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name=["']twitter:image["'][^>]*content=["']([^"']+)["']"#).unwrap()
});
static OG_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+property=["']og:description["'][^>]*content=["']([^"']+)["']"#)
        .unwrap()
});
static TW_DESC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+name=["']twitter:description["'][^>]*content=["']([^"']+)["']"#)
        .unwrap()
});

pub struct OgScraper {
    client: reqwest::Client,
}

impl OgScraper {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build OG HTTP client");
        Self { client }
    }

    /// Returns `(image, description)`, either side `None` when absent.
    pub async fn fetch(&self, url: &str) -> (Option<String>, Option<String>) {
        let Ok(resp) = self
            .client
            .get(url)
            .header("User-Agent", "Mozilla/5.0 (RCF News Bot)")
            .send()
            .await
        else {
            return (None, None);
        };
        if !resp.status().is_success() {
            return (None, None);
        }
        let Ok(html) = resp.text().await else {
            return (None, None);
        };
        (extract_image(&html), extract_description(&html))
    }
}

fn extract_image(html: &str) -> Option<String> {
    [&*OG_IMG_RE, &*TW_IMG_RE]
        .iter()
        .find_map(|re| re.captures(html).map(|caps| caps[1].trim().to_string()))
}

fn extract_description(html: &str) -> Option<String> {
    [&*OG_DESC_RE, &*TW_DESC_RE]
        .iter()
        .find_map(|re| re.captures(html).map(|caps| clean_text(&caps[1])))
}
