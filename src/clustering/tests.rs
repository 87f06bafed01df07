#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::article::Article;
    use crate::clustering::{group_articles_at, theme_clusters};
    use crate::config::ThemeClusterConfig;
    use crate::ranking::RankedEntry;
    use crate::similarity::TitleSimilarity;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 15, 12, 0, 0).single().expect("valid timestamp")
    }

    fn article(title: &str, hours_old: Option<i64>) -> Article {
        Article {
            title: title.to_string(),
            link: Some("https://example.com/a".to_string()),
            published_at: hours_old.map(|hours| fixed_now() - Duration::hours(hours)),
            source: "Example Feed".to_string(),
            category: "Security".to_string(),
            summary: None,
        }
    }

    #[test]
    fn test_case_variants_group_together() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", Some(10)),
            article("Ransomware hits Acme Corp", Some(5)),
        ];
        let scorer = TitleSimilarity::edit_ratio_only();
        let clusters = group_articles_at(&entries, 0.8, &scorer, fixed_now());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 2);
    }

    #[test]
    fn test_partition_invariant() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", Some(1)),
            article("Cloud outage at Example Hosting", Some(2)),
            article("Ransomware hits Acme Corp again", Some(3)),
            article("Phishing wave targets banks", Some(4)),
            article("Cloud outage at Example Hosting continues", Some(5)),
        ];
        let scorer = TitleSimilarity::edit_ratio_only();
        let clusters = group_articles_at(&entries, 0.8, &scorer, fixed_now());

        let total: usize = clusters.iter().map(|cluster| cluster.size()).sum();
        assert_eq!(total, entries.len());

        // Every input title appears exactly once across all clusters
        let mut seen: Vec<&str> = clusters
            .iter()
            .flat_map(|cluster| cluster.members().iter().map(|member| member.title.as_str()))
            .collect();
        seen.sort();
        let mut expected: Vec<&str> = entries.iter().map(|entry| entry.title.as_str()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_seed_anchored_chaining() {
        // B and C both clear the threshold against seed A, but not against
        // each other; the seed-anchored rule still puts all three together.
        let seed = "data breach at acme corp exposes customer records";
        let close_b = "mega breach at acme corp exposes customer records";
        let close_c = "data breach at acme corp exposes customer secrets";
        let scorer = TitleSimilarity::edit_ratio_only();
        assert!(crate::similarity::edit_ratio(seed, close_b) >= 0.9);
        assert!(crate::similarity::edit_ratio(seed, close_c) >= 0.9);
        assert!(crate::similarity::edit_ratio(close_b, close_c) < 0.9);

        let entries = vec![
            article(seed, Some(1)),
            article(close_b, Some(2)),
            article(close_c, Some(3)),
        ];
        let clusters = group_articles_at(&entries, 0.9, &scorer, fixed_now());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].size(), 3);
    }

    #[test]
    fn test_representative_is_most_recent() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", Some(20)),
            article("Ransomware hits Acme Corp", Some(2)),
            article("Ransomware hits Acme Corp.", Some(15)),
        ];
        let scorer = TitleSimilarity::edit_ratio_only();
        let clusters = group_articles_at(&entries, 0.8, &scorer, fixed_now());
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].representative().title, "Ransomware hits Acme Corp");
    }

    #[test]
    fn test_undated_member_becomes_representative() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", Some(20)),
            article("Ransomware hits Acme Corp", None),
        ];
        let scorer = TitleSimilarity::edit_ratio_only();
        let clusters = group_articles_at(&entries, 0.8, &scorer, fixed_now());
        assert_eq!(clusters[0].representative().title, "Ransomware hits Acme Corp");
        assert_eq!(clusters[0].representative_published_at(), fixed_now());
    }

    #[test]
    fn test_representative_tie_resolves_to_first() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", Some(5)),
            article("Ransomware hits Acme Corp", Some(5)),
        ];
        let scorer = TitleSimilarity::edit_ratio_only();
        let clusters = group_articles_at(&entries, 0.8, &scorer, fixed_now());
        assert_eq!(clusters[0].representative().title, "Ransomware Hits Acme Corp");
    }

    #[test]
    fn test_empty_input() {
        let scorer = TitleSimilarity::edit_ratio_only();
        assert!(group_articles_at(&[], 0.8, &scorer, fixed_now()).is_empty());
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let entries = vec![
            article("Ransomware Hits Acme Corp", Some(1)),
            article("Acme Corp ransomware incident", Some(2)),
            article("Cloud outage at Example Hosting", Some(3)),
            article("Phishing wave targets banks", Some(4)),
        ];
        let scorer = TitleSimilarity::edit_ratio_only();
        let first = group_articles_at(&entries, 0.8, &scorer, fixed_now());
        let second = group_articles_at(&entries, 0.8, &scorer, fixed_now());
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.representative().title, b.representative().title);
            assert_eq!(a.size(), b.size());
        }
    }

    fn ranked(title: &str, mentions: usize) -> RankedEntry {
        RankedEntry {
            article: article(title, Some(4)),
            mentions,
            score: mentions as f64,
        }
    }

    #[test]
    fn test_theme_clusters_named_from_keywords() {
        let entries = vec![
            ranked("Ransomware gang targets hospitals", 3),
            ranked("Ransomware payments reach record highs", 2),
            ranked("Quantum computing milestone announced", 1),
        ];
        let config = ThemeClusterConfig::default();
        let themes = theme_clusters(&entries, &config);
        assert!(!themes.is_empty());
        // Largest theme first, and its name carries the dominant keyword
        assert!(themes[0].article_count() >= themes.last().expect("non-empty").article_count());
        assert!(
            themes.iter().any(|theme| theme.name.contains("Ransomware")),
            "theme names: {:?}",
            themes.iter().map(|theme| theme.name.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_theme_count_capped() {
        let entries: Vec<RankedEntry> = vec![
            ranked("Alpha subsystem compromised yesterday", 1),
            ranked("Beta platform milestone announced", 1),
            ranked("Gamma network breach investigated", 1),
            ranked("Delta framework release published", 1),
        ];
        let config = ThemeClusterConfig {
            max_themes: 2,
            similarity_threshold: 0.9,
        };
        let themes = theme_clusters(&entries, &config);
        assert_eq!(themes.len(), 2);
    }

    #[test]
    fn test_theme_clusters_empty_input() {
        assert!(theme_clusters(&[], &ThemeClusterConfig::default()).is_empty());
    }
}
