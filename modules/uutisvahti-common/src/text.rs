//! Text cleanup shared by the feed and commentary paths.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#x?[0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

/// Strip HTML tags, decode the entities that actually show up in feed
/// summaries, and collapse whitespace.
pub fn clean_text(s: &str) -> String {
    let stripped = TAG_RE.replace_all(s, "");
    let decoded = decode_entities(&stripped);
    WS_RE.replace_all(decoded.trim(), " ").to_string()
}

fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &regex::Captures| {
            let body = &caps[1];
            if let Some(num) = body.strip_prefix('#') {
                let parsed = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
                    Some(hex_digits) => u32::from_str_radix(hex_digits, 16),
                    None => num.parse::<u32>(),
                };
                if let Some(c) = parsed.ok().and_then(char::from_u32) {
                    return c.to_string();
                }
                return caps[0].to_string();
            }
            match body {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" => "'".to_string(),
                "nbsp" => " ".to_string(),
                "auml" => "ä".to_string(),
                "ouml" => "ö".to_string(),
                "aring" => "å".to_string(),
                "eacute" => "é".to_string(),
                "uuml" => "ü".to_string(),
                "szlig" => "ß".to_string(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Truncate to at most `maxlen` characters, preferring a sentence boundary,
/// then a word boundary, so text never cuts mid-word. Appends `…` when
/// anything was dropped.
pub fn truncate(s: &str, maxlen: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= maxlen {
        return s.to_string();
    }

    let head: String = chars[..maxlen.saturating_sub(1)].iter().collect();

    if let Some(pos) = head.rfind(". ") {
        return format!("{}…", &head[..=pos]);
    }
    if let Some(pos) = head.rfind(' ') {
        return format!("{}…", head[..pos].trim_end());
    }
    format!("{}…", head.trim_end())
}

/// Google s2 favicon URL for the article's host.
pub fn domain_favicon(link: &str) -> Option<String> {
    let parsed = url::Url::parse(link).ok()?;
    let host = parsed.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?sz=64&domain={host}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_strips_tags_and_entities() {
        let raw = "<p>Uusi  py&ouml;r&auml; &amp; varusteet</p>\n<br/>";
        assert_eq!(clean_text(raw), "Uusi pyörä & varusteet");
    }

    #[test]
    fn test_clean_text_numeric_entities() {
        assert_eq!(clean_text("T&#228;m&#xE4; on testi"), "Tämä on testi");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_truncate_prefers_word_boundary() {
        let text = "Tämä on pitkä suomenkielinen lause jonka ei pitäisi katketa kesken sanan.";
        let result = truncate(text, 40);
        assert!(result.ends_with('…'));
        assert!(!result.contains(" kes"));
    }

    #[test]
    fn test_truncate_keeps_sentence_if_possible() {
        let text = "Ensimmäinen lause. Toinen lause jatkuu vielä pidempään ja pidempään.";
        let result = truncate(text, 50);
        assert!(result.starts_with("Ensimmäinen lause."));
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_truncate_handles_short_strings() {
        assert_eq!(truncate("Lyhyt", 20), "Lyhyt");
    }

    #[test]
    fn test_truncate_result_never_exceeds_maxlen() {
        let text = "sana ".repeat(100);
        let result = truncate(&text, 60);
        assert!(result.chars().count() <= 60);
    }

    #[test]
    fn test_domain_favicon() {
        assert_eq!(
            domain_favicon("https://zwiftinsider.com/some/article").as_deref(),
            Some("https://www.google.com/s2/favicons?sz=64&domain=zwiftinsider.com")
        );
        assert_eq!(domain_favicon("not a url"), None);
    }
}
