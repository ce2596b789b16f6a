//! Block-list content gate.
//!
//! Plain lines are global substring terms; `source=Name|term` lines apply
//! only to feeds whose title contains the name. Everything matches
//! lowercased against title + summary.

use std::path::Path;

use tracing::info;

#[derive(Debug, Default)]
pub struct Blocklist {
    global_terms: Vec<String>,
    source_terms: Vec<(String, String)>,
}

impl Blocklist {
    /// Load the block list. A missing file means nothing is blocked.
    pub fn load(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        let list = Self::parse(&data);
        info!(
            global = list.global_terms.len(),
            source_scoped = list.source_terms.len(),
            "Loaded block list"
        );
        list
    }

    pub fn parse(data: &str) -> Self {
        let mut list = Self::default();
        for raw in data.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.to_lowercase().starts_with("source=") && line.contains('|') {
                let (left, term) = line.split_once('|').unwrap_or((line, ""));
                if let Some((_, src)) = left.split_once('=') {
                    list.source_terms
                        .push((src.trim().to_lowercase(), term.trim().to_lowercase()));
                }
                continue;
            }
            list.global_terms.push(line.to_lowercase());
        }
        list
    }

    /// True when the article should be skipped.
    pub fn should_skip(&self, source: &str, title: &str, summary: &str) -> bool {
        let text = format!("{title} {summary}").to_lowercase();
        if self
            .global_terms
            .iter()
            .any(|t| !t.is_empty() && text.contains(t.as_str()))
        {
            return true;
        }
        let src = source.to_lowercase();
        self.source_terms
            .iter()
            .any(|(s, t)| src.contains(s.as_str()) && text.contains(t.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_term_blocks_any_source() {
        let list = Blocklist::parse("smartwatch\nälykello\n");
        assert!(list.should_skip("Any Feed", "New smartwatch review", ""));
        assert!(list.should_skip("Any Feed", "Paras älykello 2025", ""));
        assert!(!list.should_skip("Any Feed", "Giro stage preview", ""));
    }

    #[test]
    fn test_source_scoped_term() {
        let list = Blocklist::parse("source=DC Rainmaker|watch\n");
        assert!(list.should_skip("DC Rainmaker", "Best watch of the year", ""));
        assert!(!list.should_skip("Zwift Insider", "Best watch of the year", ""));
    }

    #[test]
    fn test_summary_is_checked_too() {
        let list = Blocklist::parse("treadmill\n");
        assert!(list.should_skip("Feed", "Indoor training", "A new treadmill dropped"));
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        let list = Blocklist::parse("# kommentti\n\nsmartwatch\n");
        assert!(list.should_skip("Feed", "smartwatch news", ""));
        assert!(!list.should_skip("Feed", "# kommentti", ""));
    }

    #[test]
    fn test_missing_file_blocks_nothing() {
        let list = Blocklist::load(Path::new("/nonexistent/blocklist.txt"));
        assert!(!list.should_skip("Feed", "anything", "at all"));
    }
}
