use std::env;

use tracing::info;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Discord
    pub webhook_url: String,
    pub prefer_large_image: bool,

    // Commentary (OpenAI-compatible endpoint). No key means no commentary.
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub summary_model: String,
    pub comment_maxlen: usize,

    // Data files
    pub state_file: String,
    pub feeds_file: String,
    pub blocklist_file: String,
    pub terms_file: String,

    // Pipeline tuning
    pub topic_window_secs: f64,
    pub max_items_per_feed: usize,
    pub post_delay_secs: u64,
    pub summary_maxlen: usize,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing:
    /// without a webhook there is nothing this process can do.
    pub fn from_env() -> Self {
        Self {
            webhook_url: required_env("DISCORD_WEBHOOK_URL"),
            prefer_large_image: env_flag("PREFER_LARGE_IMAGE", true),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            summary_model: env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            comment_maxlen: env_number("COMMENT_MAXLEN", 240),
            state_file: env::var("STATE_FILE").unwrap_or_else(|_| "seen.json".to_string()),
            feeds_file: env::var("FEEDS_FILE").unwrap_or_else(|_| "feeds.txt".to_string()),
            blocklist_file: env::var("BLOCKLIST_FILE")
                .unwrap_or_else(|_| "blocklist.txt".to_string()),
            terms_file: env::var("TERMS_FILE").unwrap_or_else(|_| "terms.csv".to_string()),
            topic_window_secs: env_number("TOPIC_WINDOW_SECS", 43_200.0),
            max_items_per_feed: env_number("MAX_ITEMS_PER_FEED", 10),
            post_delay_secs: env_number("POST_DELAY_SEC", 1),
            summary_maxlen: env_number("SUMMARY_MAXLEN", 200),
            request_timeout_secs: env_number("REQUEST_TIMEOUT", 12),
        }
    }

    /// Log the effective configuration without leaking secrets.
    pub fn log_redacted(&self) {
        info!(
            feeds_file = self.feeds_file.as_str(),
            state_file = self.state_file.as_str(),
            blocklist_file = self.blocklist_file.as_str(),
            terms_file = self.terms_file.as_str(),
            topic_window_secs = self.topic_window_secs,
            max_items_per_feed = self.max_items_per_feed,
            commentary_enabled = self.openai_api_key.is_some(),
            model = self.summary_model.as_str(),
            "Configuration loaded"
        );
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => raw == "1",
        Err(_) => default,
    }
}
