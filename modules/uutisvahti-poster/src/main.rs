use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use uutisvahti_common::{Config, UutisvahtiError};
use uutisvahti_poster::blocklist::Blocklist;
use uutisvahti_poster::commentary::{ChatCommentary, CommentaryGenerator, NoCommentary};
use uutisvahti_poster::discord::DiscordPublisher;
use uutisvahti_poster::feeds::{read_feeds, FeedFetcher};
use uutisvahti_poster::og::OgScraper;
use uutisvahti_poster::pipeline::PostPipeline;
use uutisvahti_poster::state::SeenState;
use uutisvahti_poster::stats::RunStats;
use uutisvahti_poster::terms::TermNormalizer;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("uutisvahti_poster=info".parse()?)
                .add_directive("uutisvahti_common=info".parse()?),
        )
        .init();

    info!("Uutisvahti poster starting...");

    let config = Config::from_env();
    config.log_redacted();
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let feeds = read_feeds(Path::new(&config.feeds_file));
    if feeds.is_empty() {
        return Err(UutisvahtiError::Config(format!(
            "Feed list {} is empty or missing",
            config.feeds_file
        ))
        .into());
    }

    let blocklist = Blocklist::load(Path::new(&config.blocklist_file));
    let normalizer = TermNormalizer::load(Path::new(&config.terms_file));

    let state_path = PathBuf::from(&config.state_file);
    let mut state = SeenState::load(&state_path);

    let now = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
    state.cleanup_topics(now, config.topic_window_secs);

    let fetcher = FeedFetcher::new(timeout, config.max_items_per_feed);
    let og = OgScraper::new(timeout);

    // Gather candidates across all feeds; a failing feed never stops the
    // run. Entries already in the seen set are dropped here so we don't
    // scrape OG tags for articles that will not be posted.
    let mut stats = RunStats::default();
    let mut candidates = Vec::new();
    for feed_url in &feeds {
        match fetcher.fetch(feed_url).await {
            Ok(fetched) => {
                stats.feeds_fetched += 1;
                for mut entry in fetched.entries {
                    if state.is_seen(&entry.identity_key()) {
                        stats.skipped_seen += 1;
                        continue;
                    }
                    let (og_image, og_desc) = og.fetch(&entry.link).await;
                    if entry.image.is_none() {
                        entry.image = og_image;
                    }
                    if entry.summary.chars().count() < 40 {
                        if let Some(desc) = og_desc {
                            entry.summary = desc;
                        }
                    }
                    candidates.push(entry);
                }
            }
            Err(e) => {
                stats.feeds_failed += 1;
                warn!(feed = feed_url.as_str(), error = %e, "Failed to fetch feed");
            }
        }
    }

    // Oldest first, so the channel reads chronologically.
    candidates.reverse();
    info!(candidates = candidates.len(), "New entries after identity pre-filter");

    let generator: Box<dyn CommentaryGenerator> = match &config.openai_api_key {
        Some(key) => Box::new(ChatCommentary::new(
            &config.openai_api_base,
            key,
            &config.summary_model,
            config.comment_maxlen,
            timeout,
        )),
        None => {
            info!("Commentary disabled (OPENAI_API_KEY not set)");
            Box::new(NoCommentary)
        }
    };
    let publisher = DiscordPublisher::new(
        &config.webhook_url,
        config.prefer_large_image,
        config.summary_maxlen,
        timeout,
    );

    let pipeline = PostPipeline {
        window_secs: config.topic_window_secs,
        post_delay: Duration::from_secs(config.post_delay_secs),
        blocklist,
        normalizer,
    };

    pipeline
        .run(
            &mut state,
            &candidates,
            generator.as_ref(),
            &publisher,
            now,
            &mut stats,
        )
        .await;

    state.last_fetch_ts = Some(now);
    state.save(&state_path);

    println!("{stats}");
    Ok(())
}
