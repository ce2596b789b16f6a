//! Terminology normalization for generated commentary.
//!
//! The commentary model keeps producing anglicisms and sloppy loanwords the
//! community has agreed replacements for. Rules live in a data file so the
//! vocabulary can change without touching code, and the normalizer is an
//! explicit object constructed once and passed to the pipeline.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use tracing::warn;

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").unwrap());
static SPACE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.!?:;])").unwrap());

/// One compiled rewrite rule.
pub struct TermRule {
    pattern: Regex,
    replacement: String,
}

impl TermRule {
    /// Compile one rule. Patterns match case-insensitively. Strict rules
    /// get word-boundary anchors added unless the author already supplied
    /// them.
    pub fn compile(pattern: &str, replacement: &str, strict: bool) -> Result<Self, regex::Error> {
        let pat = if strict && !pattern.starts_with(r"\b") {
            format!(r"\b(?:{pattern})\b")
        } else {
            pattern.to_string()
        };
        let compiled = RegexBuilder::new(&pat).case_insensitive(true).build()?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }
}

/// Ordered rule set applied as sequential whole-string passes.
pub struct TermNormalizer {
    rules: Vec<TermRule>,
}

impl TermNormalizer {
    /// A normalizer with no rules; `apply` is the identity function.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<TermRule>) -> Self {
        Self { rules }
    }

    /// Load rules from a `pattern;replacement;strict` line file.
    /// A missing file yields the identity normalizer.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            return Self::empty();
        };
        Self::parse(&data)
    }

    /// Parse rule lines: `#` comments and blanks are ignored, malformed
    /// records are skipped with a warning. One bad rule never takes the
    /// whole vocabulary down.
    pub fn parse(data: &str) -> Self {
        let mut rules = Vec::new();
        for (idx, raw) in data.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.splitn(3, ';');
            let (Some(pattern), Some(replacement)) = (fields.next(), fields.next()) else {
                warn!(line = idx + 1, "Skipping malformed term rule");
                continue;
            };
            let pattern = pattern.trim();
            if pattern.is_empty() {
                warn!(line = idx + 1, "Skipping term rule with empty pattern");
                continue;
            }
            let strict = fields.next().map(str::trim) == Some("1");
            match TermRule::compile(pattern, replacement.trim(), strict) {
                Ok(rule) => rules.push(rule),
                Err(e) => {
                    warn!(line = idx + 1, error = %e, "Skipping invalid term pattern");
                }
            }
        }
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite `text` through every rule in file order, preserving the
    /// casing of each matched span, then tidy whitespace around
    /// punctuation. Idempotent for a rule set whose replacements do not
    /// re-trigger patterns.
    pub fn apply(&self, text: &str) -> String {
        if self.rules.is_empty() {
            return text.to_string();
        }
        let mut out = text.to_string();
        for rule in &self.rules {
            out = rule
                .pattern
                .replace_all(&out, |caps: &regex::Captures| {
                    match_case(&caps[0], &rule.replacement)
                })
                .into_owned();
        }
        let out = MULTI_SPACE_RE.replace_all(&out, " ");
        SPACE_PUNCT_RE.replace_all(&out, "$1").into_owned()
    }
}

/// Derive replacement casing from the matched span: an all-caps match gives
/// an all-caps replacement, a capitalized match capitalizes the first
/// letter, anything else uses the replacement as written.
fn match_case(matched: &str, replacement: &str) -> String {
    let mut alpha = matched.chars().filter(|c| c.is_alphabetic()).peekable();
    if alpha.peek().is_some() && alpha.all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if matched.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
    }
    replacement.to_string()
}
