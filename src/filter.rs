//! Entry-level relevance filtering ahead of the pipeline.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use tracing::warn;

use crate::article::Article;
use crate::config::FilterConfig;
use crate::util::clean_summary;

/// Log target for filtering events
pub const TARGET_FILTER: &str = "entry_filter";

/// Compiled keyword matcher for one run.
///
/// The positive list compiles into a single case-insensitive word-boundary
/// alternation; no keywords configured means everything matches. The
/// negative list blocks on plain case-insensitive substring hits, and is
/// checked first.
pub struct KeywordFilter {
    pattern: Option<Regex>,
    negative_terms: Vec<String>,
}

impl KeywordFilter {
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            pattern: compile_keyword_pattern(&config.keywords),
            negative_terms: config
                .negative_keywords
                .iter()
                .map(|term| term.to_lowercase())
                .collect(),
        }
    }

    /// Whether an article passes both the block list and the keyword gate.
    pub fn matches(&self, article: &Article) -> bool {
        let text = searchable_text(article);
        if self
            .negative_terms
            .iter()
            .any(|term| text.contains(term.as_str()))
        {
            return false;
        }
        match &self.pattern {
            Some(pattern) => pattern.is_match(&text),
            None => true,
        }
    }
}

// Feed summaries arrive as HTML fragments; matching runs against their
// extracted plaintext so markup and link URLs never satisfy a keyword.
fn searchable_text(article: &Article) -> String {
    let mut text = article.title.to_lowercase();
    if let Some(summary) = &article.summary {
        text.push(' ');
        text.push_str(&clean_summary(summary).to_lowercase());
    }
    text
}

fn compile_keyword_pattern(keywords: &[String]) -> Option<Regex> {
    if keywords.is_empty() {
        return None;
    }
    let escaped: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
    let pattern = format!(r"(?i)\b({})\b", escaped.join("|"));
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(
                target: TARGET_FILTER,
                "Keyword pattern failed to compile ({}); matching everything", err
            );
            None
        }
    }
}

/// Whether an article falls inside the look-back window. Undated articles
/// count as published now, so they always pass.
pub fn within_lookback(article: &Article, lookback_days: i64, now: DateTime<Utc>) -> bool {
    article.effective_published_at(now) >= now - Duration::days(lookback_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use chrono::TimeZone;

    fn article(title: &str, summary: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            link: Some("https://example.com/a".to_string()),
            published_at: None,
            source: "Example Feed".to_string(),
            category: "Security".to_string(),
            summary: summary.map(str::to_string),
        }
    }

    fn filter(keywords: &[&str], negative: &[&str]) -> KeywordFilter {
        KeywordFilter::from_config(&FilterConfig {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            negative_keywords: negative.iter().map(|k| k.to_string()).collect(),
        })
    }

    #[test]
    fn test_no_keywords_matches_everything() {
        let filter = filter(&[], &[]);
        assert!(filter.matches(&article("Anything at all", None)));
    }

    #[test]
    fn test_keyword_is_word_bounded() {
        let filter = filter(&["ransomware"], &[]);
        assert!(filter.matches(&article("Ransomware hits Acme Corp", None)));
        assert!(filter.matches(&article("Dull headline", Some("a ransomware campaign"))));
        // "ransomwared" is not a word-boundary match
        assert!(!filter.matches(&article("They got ransomwared", None)));
        assert!(!filter.matches(&article("Quarterly results", None)));
    }

    #[test]
    fn test_matching_runs_on_extracted_summary_text() {
        let filter = filter(&["ransomware"], &[]);
        // The keyword only appears inside markup, not in the readable text
        let markup_only = article(
            "Dull headline",
            Some(r#"<a href="https://ransomware.example.com/report">full report</a>"#),
        );
        assert!(!filter.matches(&markup_only));

        let in_text = article("Dull headline", Some("<p>a ransomware campaign</p>"));
        assert!(filter.matches(&in_text));
    }

    #[test]
    fn test_negative_keywords_block_first() {
        let filter = filter(&["security"], &["webinar", "whitepaper"]);
        assert!(!filter.matches(&article("Webinar: How Modern SOC Teams Use AI", Some("security webinar"))));
        assert!(!filter.matches(&article("Security Whitepaper Released", None)));
        assert!(filter.matches(&article("Security flaw patched", None)));
    }

    #[test]
    fn test_lookback_window() {
        let now = Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).single().expect("valid timestamp");
        let mut fresh = article("fresh", None);
        fresh.published_at = Some(now - Duration::days(5));
        let mut stale = article("stale", None);
        stale.published_at = Some(now - Duration::days(45));
        let undated = article("undated", None);

        assert!(within_lookback(&fresh, 30, now));
        assert!(!within_lookback(&stale, 30, now));
        assert!(within_lookback(&undated, 30, now));
    }
}
