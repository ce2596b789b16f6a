//! The per-run posting pipeline: dedup → filter → commentary → publish.

use std::time::Duration;

use tracing::{info, warn};

use uutisvahti_common::FeedEntry;

use crate::blocklist::Blocklist;
use crate::commentary::CommentaryGenerator;
use crate::discord::{NewsPost, NewsPublisher};
use crate::state::SeenState;
use crate::stats::RunStats;
use crate::terms::TermNormalizer;
use crate::topic;

pub struct PostPipeline {
    pub window_secs: f64,
    pub post_delay: Duration,
    pub blocklist: Blocklist,
    pub normalizer: TermNormalizer,
}

impl PostPipeline {
    /// Process one batch of candidate entries against the seen state.
    ///
    /// Per entry: identity dedup, topic dedup, block-list gate, commentary,
    /// publish. A successful publish records the identity key and claims the
    /// topic; a failed one records nothing, so the next scheduled run
    /// retries the entry. Nothing in here aborts the batch.
    pub async fn run(
        &self,
        state: &mut SeenState,
        entries: &[FeedEntry],
        generator: &dyn CommentaryGenerator,
        publisher: &dyn NewsPublisher,
        now: f64,
        stats: &mut RunStats,
    ) {
        for entry in entries {
            stats.entries_considered += 1;

            let identity_key = entry.identity_key();
            if state.is_seen(&identity_key) {
                stats.skipped_seen += 1;
                continue;
            }

            let topic_key = topic::topic_key(&entry.title);
            if state.is_duplicate_topic(&topic_key, now, self.window_secs) {
                info!(title = entry.title.as_str(), "Skipping near-duplicate story");
                stats.skipped_topic += 1;
                continue;
            }

            if self
                .blocklist
                .should_skip(&entry.source, &entry.title, &entry.summary)
            {
                stats.skipped_blocked += 1;
                continue;
            }

            let commentary = match generator.comment(entry).await {
                Ok(Some(text)) => Some(self.normalizer.apply(&text)),
                Ok(None) => None,
                Err(e) => {
                    warn!(error = %e, "Commentary generation failed");
                    None
                }
            };

            let post = NewsPost {
                title: entry.title.clone(),
                link: entry.link.clone(),
                source: entry.source.clone(),
                description: commentary.unwrap_or_else(|| entry.summary.clone()),
                image: entry.image.clone(),
            };

            match publisher.publish(&post).await {
                Ok(()) => {
                    state.mark_seen(&identity_key);
                    state.record_topic(&topic_key, now);
                    stats.published += 1;
                    info!(
                        title = entry.title.as_str(),
                        source = entry.source.as_str(),
                        "Published"
                    );
                    tokio::time::sleep(self.post_delay).await;
                }
                Err(e) => {
                    warn!(
                        title = entry.title.as_str(),
                        error = %e,
                        "Publish failed, will retry next run"
                    );
                    stats.publish_failed += 1;
                }
            }
        }
    }
}
