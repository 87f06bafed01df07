//! Shared helpers: URL hygiene, summary cleanup, and date parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

lazy_static! {
    static ref NOISE_BLOCK: Regex =
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
            .expect("noise block pattern compiles");
    static ref HTML_TAG: Regex = Regex::new(r"(?s)<[^>]+>").expect("tag pattern compiles");
    static ref READ_MORE_TAIL: Regex =
        Regex::new(r"(?i)(Read|Continue) reading.*$").expect("tail pattern compiles");
}

/// Return a validated, percent-encoded URL string, or `None` when the link
/// is empty, relative, or not http(s).
pub fn sanitize_url(link: &str) -> Option<String> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = Url::parse(trimmed).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    parsed.host_str()?;
    Some(parsed.to_string())
}

/// Host of a link, normalized for quota accounting: lowercased, port
/// dropped, leading `www.` stripped.
pub fn normalize_domain(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Plaintext extracted from an HTML summary fragment: script/style blocks
/// and tags removed, common entities decoded, "Read more" tails dropped,
/// whitespace collapsed.
pub fn clean_summary(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = NOISE_BLOCK.replace_all(html, " ");
    let text = HTML_TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = READ_MORE_TAIL.replace(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&ndash;", "\u{2013}")
        .replace("&mdash;", "\u{2014}")
        .replace("&rsquo;", "\u{2019}")
        .replace("&lsquo;", "\u{2018}")
        .replace("&rdquo;", "\u{201d}")
        .replace("&ldquo;", "\u{201c}")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Parse a date string in the formats feeds commonly use.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }

    // Try RFC2822
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }

    // Try offset-carrying variants
    for format in &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(date) = DateTime::parse_from_str(raw, format) {
            return Some(date.with_timezone(&Utc));
        }
    }

    // Naive timestamps are taken as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
