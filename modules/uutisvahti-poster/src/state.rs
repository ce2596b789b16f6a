//! Persisted dedup bookkeeping.
//!
//! One JSON file holds everything a run needs to remember: the set of
//! identity keys ever published and a sliding window of topic fingerprints.
//! Identity keys are never evicted; topic entries expire after the window.
//! The file is read once at process start and written once at the end;
//! concurrent runs are not a thing here.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default topic suppression window: 12 hours.
pub const DEFAULT_TOPIC_WINDOW_SECS: f64 = 43_200.0;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeenState {
    /// Identity keys of every article ever published. Never evicted.
    #[serde(default)]
    pub ids: BTreeSet<String>,

    /// Topic fingerprint → unix timestamp of the publish that claimed it.
    #[serde(default)]
    pub topics: HashMap<String, f64>,

    /// Timestamp of the last successful run. Informational only.
    #[serde(default)]
    pub last_fetch_ts: Option<f64>,
}

impl SeenState {
    /// Load state from disk. A bare JSON array is accepted as the legacy
    /// ids-only shape and upgraded in memory; only the current shape is
    /// ever written back. An unreadable or corrupt file means a cold start,
    /// never a failed run.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            info!(path = %path.display(), "No state file, starting cold");
            return Self::default();
        };
        if let Ok(state) = serde_json::from_str::<SeenState>(&data) {
            return state;
        }
        if let Ok(ids) = serde_json::from_str::<BTreeSet<String>>(&data) {
            info!(count = ids.len(), "Upgraded legacy ids-only state file");
            return Self {
                ids,
                ..Self::default()
            };
        }
        warn!(path = %path.display(), "State file corrupt, starting cold");
        Self::default()
    }

    /// Best-effort save: failures are logged, never fatal. The worst case
    /// is a re-post on the next run.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(e) = std::fs::write(path, data) {
                    warn!(path = %path.display(), error = %e, "Failed to save state");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize state"),
        }
    }

    pub fn is_seen(&self, identity_key: &str) -> bool {
        self.ids.contains(identity_key)
    }

    pub fn mark_seen(&mut self, identity_key: &str) {
        self.ids.insert(identity_key.to_string());
    }

    /// Whether this topic was already published inside the window.
    /// An empty key never counts as a duplicate; there is nothing to
    /// reason about.
    pub fn is_duplicate_topic(&self, topic_key: &str, now: f64, window_secs: f64) -> bool {
        if topic_key.is_empty() {
            return false;
        }
        match self.topics.get(topic_key) {
            Some(&first_seen) => now - first_seen < window_secs,
            None => false,
        }
    }

    /// Claim a topic at `now`. Called only after a successful publish.
    pub fn record_topic(&mut self, topic_key: &str, now: f64) {
        if !topic_key.is_empty() {
            self.topics.insert(topic_key.to_string(), now);
        }
    }

    /// Drop topic entries older than the window, relative to the run's
    /// start time. Runs once per batch, not per entry.
    pub fn cleanup_topics(&mut self, now: f64, window_secs: f64) {
        let before = self.topics.len();
        self.topics.retain(|_, ts| now - *ts < window_secs);
        let dropped = before - self.topics.len();
        if dropped > 0 {
            info!(dropped, "Expired stale topic entries");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_ids_and_topics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");

        let mut state = SeenState::default();
        state.mark_seen("aaaa");
        state.mark_seen("bbbb");
        state.record_topic("giro preview", 1_700_000_000.0);
        state.last_fetch_ts = Some(1_700_000_100.5);
        state.save(&path);

        let loaded = SeenState::load(&path);
        assert_eq!(loaded.ids, state.ids);
        assert_eq!(loaded.topics.len(), 1);
        let ts = loaded.topics["giro preview"];
        assert!((ts - 1_700_000_000.0).abs() < 1e-6);
        assert_eq!(loaded.last_fetch_ts, Some(1_700_000_100.5));
    }

    #[test]
    fn test_legacy_array_is_upgraded_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        std::fs::write(&path, r#"["one", "two"]"#).unwrap();

        let state = SeenState::load(&path);
        assert!(state.is_seen("one"));
        assert!(state.is_seen("two"));
        assert!(state.topics.is_empty());
        assert_eq!(state.last_fetch_ts, None);
    }

    #[test]
    fn test_corrupt_file_means_cold_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        std::fs::write(&path, "{not json at all").unwrap();

        let state = SeenState::load(&path);
        assert!(state.ids.is_empty());
        assert!(state.topics.is_empty());
    }

    #[test]
    fn test_missing_file_means_cold_start() {
        let state = SeenState::load(Path::new("/nonexistent/seen.json"));
        assert!(state.ids.is_empty());
    }

    #[test]
    fn test_topic_window_boundaries() {
        let mut state = SeenState::default();
        let window = DEFAULT_TOPIC_WINDOW_SECS;
        let t = 1_700_000_000.0;
        state.record_topic("k", t);

        assert!(state.is_duplicate_topic("k", t + window - 1.0, window));
        assert!(!state.is_duplicate_topic("k", t + window + 1.0, window));
    }

    #[test]
    fn test_empty_topic_key_never_duplicates() {
        let mut state = SeenState::default();
        state.record_topic("", 100.0);
        assert!(state.topics.is_empty());
        assert!(!state.is_duplicate_topic("", 100.0, DEFAULT_TOPIC_WINDOW_SECS));
    }

    #[test]
    fn test_cleanup_drops_only_stale_topics() {
        let mut state = SeenState::default();
        let window = 100.0;
        state.record_topic("old", 0.0);
        state.record_topic("fresh", 950.0);
        state.cleanup_topics(1000.0, window);

        assert!(!state.topics.contains_key("old"));
        assert!(state.topics.contains_key("fresh"));
    }

    #[test]
    fn test_ids_survive_cleanup() {
        let mut state = SeenState::default();
        state.mark_seen("kept-forever");
        state.cleanup_topics(1e12, 1.0);
        assert!(state.is_seen("kept-forever"));
    }
}
