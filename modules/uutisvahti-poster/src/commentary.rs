//! Commentary generation: the news-reader voice.
//!
//! The generator is a black box behind a trait so the pipeline can be
//! tested without any API: it either returns a short comment or nothing,
//! and nothing is always a valid answer.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

use uutisvahti_common::{text, FeedEntry};

#[async_trait]
pub trait CommentaryGenerator: Send + Sync {
    /// `Ok(None)` means "post without commentary", never a failed run.
    async fn comment(&self, entry: &FeedEntry) -> Result<Option<String>>;
}

/// Disabled commentary, used when no API key is configured.
pub struct NoCommentary;

#[async_trait]
impl CommentaryGenerator for NoCommentary {
    async fn comment(&self, _entry: &FeedEntry) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Persona prompt. Arvi reads the news dryly and in Finnish.
const PERSONA: &str = "Olet Arvi LindBot, suomalainen lakoninen uutistenlukija ja \
pyöräily-yhteisön seuralainen. Kirjoita selkeää ja luonnollista suomen yleiskieltä. \
Älä käännä englanninkielisiä sanontoja sanatarkasti; käytä suomalaista vastinetta \
tai neutraalia muotoa. Kommenttisi ovat 1–2 lausetta, kuivakkaita ja toisinaan \
hienovaraisen ironisia, mutta eivät ilkeitä. Korkeintaan yksi emoji loppuun, jos se \
sopii luontevasti. Ei hashtageja, ei mainoslauseita.";

/// OpenAI-compatible chat-completions client.
pub struct ChatCommentary {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    maxlen: usize,
}

impl ChatCommentary {
    pub fn new(
        api_base: &str,
        api_key: &str,
        model: &str,
        maxlen: usize,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build commentary HTTP client");
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            maxlen,
        }
    }
}

#[async_trait]
impl CommentaryGenerator for ChatCommentary {
    async fn comment(&self, entry: &FeedEntry) -> Result<Option<String>> {
        let user_msg = format!(
            "Otsikko: {}\nTiivistelmä: {}\n\nKirjoita lyhyt kommentti tästä uutisesta.",
            entry.title, entry.summary
        );
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": PERSONA },
                { "role": "user", "content": user_msg },
            ],
            "temperature": 0.35,
            "max_tokens": 300,
        });

        let resp = match self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "Commentary request failed");
                return Ok(None);
            }
        };

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "Commentary API error");
            return Ok(None);
        }

        let data: serde_json::Value = match resp.json().await {
            Ok(data) => data,
            Err(e) => {
                warn!(error = %e, "Commentary response was not JSON");
                return Ok(None);
            }
        };

        let raw = data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("");
        let cleaned = text::clean_text(raw);
        if cleaned.is_empty() {
            return Ok(None);
        }
        Ok(Some(text::truncate(&cleaned, self.maxlen)))
    }
}
