use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single article pulled from a feed, the unit the whole pipeline
/// operates on. Not persisted; only its derived identity key is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: Option<String>,
    pub title: String,
    pub link: String,
    pub summary: String,
    /// Title of the feed this entry came from.
    pub source: String,
    pub published: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

impl FeedEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            link: link.into(),
            summary: String::new(),
            source: String::new(),
            published: None,
            image: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.is_empty() {
            self.id = Some(id);
        }
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_published(mut self, published: Option<DateTime<Utc>>) -> Self {
        self.published = published;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Stable dedup key: SHA-256 hex of the first non-empty of
    /// id / link / title.
    ///
    /// An entry with none of the three hashes the empty string, so all such
    /// entries collide with each other. They carry nothing postable, so the
    /// collision is harmless.
    pub fn identity_key(&self) -> String {
        use sha2::{Digest, Sha256};

        let base = self
            .id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.link.as_str()).filter(|s| !s.is_empty()))
            .or_else(|| Some(self.title.as_str()).filter(|s| !s.is_empty()))
            .unwrap_or("");

        let mut hasher = Sha256::new();
        hasher.update(base.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_key_is_stable_across_fetches() {
        let a = FeedEntry::new("Tour stage report", "https://example.com/a");
        let b = FeedEntry::new("Tour stage report (edited)", "https://example.com/a");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_prefers_id_over_link() {
        let a = FeedEntry::new("Title", "https://example.com/a").with_id("guid-1");
        let b = FeedEntry::new("Title", "https://example.com/b").with_id("guid-1");
        let c = FeedEntry::new("Title", "https://example.com/b").with_id("guid-2");
        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(b.identity_key(), c.identity_key());
    }

    #[test]
    fn test_identity_key_falls_back_to_title() {
        let a = FeedEntry::new("Only a title", "");
        let b = FeedEntry::new("Only a title", "");
        assert_eq!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn test_identity_key_empty_entry_is_degenerate_but_stable() {
        let a = FeedEntry::new("", "");
        let b = FeedEntry::new("", "");
        assert_eq!(a.identity_key(), b.identity_key());
        assert_eq!(a.identity_key().len(), 64);
    }
}
