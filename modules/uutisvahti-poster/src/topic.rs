//! Topic fingerprinting for cross-source near-duplicate suppression.
//!
//! Two sites covering the same story phrase their headlines differently.
//! Reducing a title to a sorted bag of discriminating tokens collapses the
//! variants onto one key, which the topic window in [`crate::state`] then
//! suppresses.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9äöåéüß]+").unwrap());

/// Generic reporting vocabulary that says nothing about which story a
/// headline covers. Lowercase, matched after normalization.
const STOPWORDS: &[&str] = &[
    "news", "uutiset", "latest", "breaking", "update", "updates", "päivitys",
    "video", "videos", "podcast", "episode", "jakso",
    "cycling", "pyöräily", "cyclist", "bike",
    "wins", "winner", "winners", "voitti", "voittaja",
    "watch", "live", "review", "recap", "report", "highlights",
    "today", "tänään", "week", "viikko",
];

/// Short tokens that carry real meaning despite the length cutoff.
const ALLOW_SHORT: &[&str] = &["uci", "tdf", "gc", "zrl", "rcf", "mtb"];

/// Tokens shorter than this are dropped unless numeric or allow-listed.
const MIN_TOKEN_LEN: usize = 4;

/// At most this many tokens end up in a key.
const MAX_TOKENS: usize = 10;

/// Derive the coarse story fingerprint for a title.
///
/// Tokens are deduplicated and sorted, so any permutation of the same word
/// set produces the same key. If filtering leaves nothing, the normalized
/// unfiltered string is the key: better a weak key than none.
pub fn topic_key(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = URL_RE.replace_all(&lowered, " ");
    let normalized = NON_WORD_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_string();

    let mut tokens: Vec<&str> = normalized
        .split_whitespace()
        .filter(|tok| keep_token(tok))
        .collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens.truncate(MAX_TOKENS);

    if tokens.is_empty() {
        return normalized;
    }
    tokens.join(" ")
}

fn keep_token(tok: &str) -> bool {
    if STOPWORDS.contains(&tok) {
        return false;
    }
    tok.chars().all(|c| c.is_ascii_digit())
        || ALLOW_SHORT.contains(&tok)
        || tok.chars().count() >= MIN_TOKEN_LEN
}
