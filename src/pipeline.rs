//! End-to-end digest ranking pipeline.
//!
//! One run takes a snapshot of fetched entries to completion, synchronously:
//! intake filtering (freshness, keywords, cross-run dedup), single-link
//! grouping, recency-weighted scoring, and domain-diversified selection.
//! The caller renders the result and, once the digest is actually
//! published, records it into the registry and persists it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::article::Article;
use crate::clustering::group_articles_at;
use crate::config::DigestConfig;
use crate::filter::{within_lookback, KeywordFilter};
use crate::ranking::{boosted_score_at, diversify, RankedEntry, ScoredCluster};
use crate::registry::ArticleRegistry;
use crate::similarity::{SimilarityBackend, TitleSimilarity};

/// Log target for pipeline events
pub const TARGET_PIPELINE: &str = "digest_pipeline";

/// Run one batch of entries through the full pipeline and return the
/// ranked, domain-diversified highlights, best first.
pub fn build_highlights(
    entries: &[Article],
    config: &DigestConfig,
    registry: &ArticleRegistry,
) -> Vec<RankedEntry> {
    build_highlights_at(entries, config, registry, Utc::now())
}

/// As [`build_highlights`], against an explicit run time. Identical input,
/// config, and run time produce identical output.
pub fn build_highlights_at(
    entries: &[Article],
    config: &DigestConfig,
    registry: &ArticleRegistry,
    now: DateTime<Utc>,
) -> Vec<RankedEntry> {
    let filter = KeywordFilter::from_config(&config.filters);

    let mut admitted: Vec<Article> = Vec::new();
    for article in entries {
        if !within_lookback(article, config.lookback_days, now) {
            continue;
        }
        if !filter.matches(article) {
            continue;
        }
        if config.cross_run_dedup.enabled {
            let verdict = registry.check_at(article, config.cross_run_dedup.keep_registry_days, now);
            if verdict.is_duplicate {
                debug!(
                    target: TARGET_PIPELINE,
                    "Skipping '{}': {}", article.title, verdict.reason
                );
                continue;
            }
        }
        admitted.push(article.clone());
    }

    info!(
        target: TARGET_PIPELINE,
        "Admitted {} of {} entries", admitted.len(), entries.len()
    );

    let scorer = TitleSimilarity::from_config(&config.semantic_deduplication);
    let threshold = match scorer.backend() {
        SimilarityBackend::Embedding => config.semantic_deduplication.similarity_threshold,
        SimilarityBackend::EditRatio => config.fuzz_threshold,
    };

    let clusters = group_articles_at(&admitted, threshold, &scorer, now);
    debug!(
        target: TARGET_PIPELINE,
        "{} entries grouped into {} cluster(s)", admitted.len(), clusters.len()
    );

    let scored: Vec<ScoredCluster> = clusters
        .into_iter()
        .map(|cluster| {
            let score = boosted_score_at(
                cluster.size(),
                cluster.representative().published_at,
                &config.recency_boost,
                now,
            );
            ScoredCluster { cluster, score }
        })
        .collect();

    diversify(scored, config.max_results, config.tiered(), config)
}

/// Group entries by category, preserving input order within each, for the
/// per-category sections of the rendered digest.
pub fn entries_by_category(entries: &[Article]) -> BTreeMap<String, Vec<Article>> {
    let mut by_category: BTreeMap<String, Vec<Article>> = BTreeMap::new();
    for article in entries {
        by_category
            .entry(article.category.clone())
            .or_default()
            .push(article.clone());
    }
    by_category
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).single().expect("valid timestamp")
    }

    fn article(title: &str, link: &str, hours_old: i64) -> Article {
        Article {
            title: title.to_string(),
            link: Some(link.to_string()),
            published_at: Some(fixed_now() - Duration::hours(hours_old)),
            source: "Example Feed".to_string(),
            category: "Security".to_string(),
            summary: None,
        }
    }

    #[test]
    fn test_case_variant_titles_collapse_into_one_highlight() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", "https://alpha.example.com/1", 10),
            article("Ransomware hits Acme Corp", "https://beta.example.com/1", 5),
            article("Unrelated cloud outage report", "https://gamma.example.com/2", 8),
        ];
        let config = DigestConfig::default();
        let registry = ArticleRegistry::new();

        let highlights = build_highlights_at(&entries, &config, &registry, fixed_now());
        assert_eq!(highlights.len(), 2);
        // The two-mention story outranks the singleton
        assert_eq!(highlights[0].mentions, 2);
        assert_eq!(highlights[0].article.title, "Ransomware hits Acme Corp");
        assert_eq!(highlights[1].mentions, 1);
    }

    #[test]
    fn test_flat_domain_quota() {
        let titles = [
            "Ransomware crew hits hospital network",
            "Cloud provider reports multi-region outage",
            "New phishing kit bypasses MFA prompts",
            "Kernel patch lands for privilege escalation flaw",
            "Botnet resurfaces with upgraded loader",
            "Data broker leaks millions of records",
            "Browser vendor ships emergency fix",
            "Researchers break legacy VPN encryption",
            "Supply chain attack found in build tooling",
            "Insider threat report shows sharp rise",
        ];
        let entries: Vec<Article> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| article(title, &format!("https://badsite.com/{}", i), 12))
            .collect();
        let config = DigestConfig::default();
        let registry = ArticleRegistry::new();

        let highlights = build_highlights_at(&entries, &config, &registry, fixed_now());
        let from_badsite = highlights
            .iter()
            .filter(|entry| entry.article.link.as_deref().unwrap_or("").contains("badsite.com"))
            .count();
        assert!(from_badsite <= 2, "expected at most 2, got {}", from_badsite);
        assert_eq!(highlights.len(), from_badsite);
    }

    #[test]
    fn test_max_results_honored() {
        let titles = [
            "Ransomware crew hits hospital network",
            "Cloud provider reports multi-region outage",
            "New phishing kit bypasses MFA prompts",
            "Kernel patch lands for privilege escalation flaw",
            "Data broker leaks millions of records",
        ];
        let entries: Vec<Article> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| article(title, &format!("https://site{}.example.com/a", i), 12))
            .collect();
        let config = DigestConfig {
            max_results: 3,
            ..DigestConfig::default()
        };
        let registry = ArticleRegistry::new();

        let highlights = build_highlights_at(&entries, &config, &registry, fixed_now());
        assert_eq!(highlights.len(), 3);
    }

    #[test]
    fn test_registry_suppresses_previously_published() {
        let story = article("Breach at Example Inc", "https://example.com/breach", 4);
        let mut registry = ArticleRegistry::new();
        registry.record_at(
            std::slice::from_ref(&story),
            60,
            fixed_now() - Duration::days(10),
        );

        let config = DigestConfig::default();
        let highlights =
            build_highlights_at(std::slice::from_ref(&story), &config, &registry, fixed_now());
        assert!(highlights.is_empty());

        // The same story sails through once the record has aged out
        let mut expired = ArticleRegistry::new();
        expired.record_at(
            std::slice::from_ref(&story),
            60,
            fixed_now() - Duration::days(70),
        );
        let highlights =
            build_highlights_at(std::slice::from_ref(&story), &config, &expired, fixed_now());
        assert_eq!(highlights.len(), 1);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", "https://alpha.example.com/1", 3),
            article("Acme Corp hit by ransomware attack", "https://beta.example.com/1", 7),
            article("Cloud provider outage continues", "https://gamma.example.com/2", 30),
            article("New phishing kit spotted in the wild", "https://delta.example.com/3", 80),
        ];
        let config = DigestConfig::default();
        let registry = ArticleRegistry::new();

        let first = build_highlights_at(&entries, &config, &registry, fixed_now());
        let second = build_highlights_at(&entries, &config, &registry, fixed_now());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.article.title, b.article.title);
            assert_eq!(a.mentions, b.mentions);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_empty_input() {
        let config = DigestConfig::default();
        let registry = ArticleRegistry::new();
        assert!(build_highlights_at(&[], &config, &registry, fixed_now()).is_empty());
    }

    #[test]
    fn test_entries_by_category() {
        let mut cloud = article("Cloud story", "https://a.example.com/1", 5);
        cloud.category = "Cloud".to_string();
        let security = article("Security story", "https://b.example.com/2", 5);

        let by_category = entries_by_category(&[cloud, security]);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category["Cloud"].len(), 1);
        assert_eq!(by_category["Security"].len(), 1);
    }
}
