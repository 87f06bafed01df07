//! Domain-diversified selection of top stories.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use super::tiers::classify_domain;
use super::{RankedEntry, TARGET_RANKING};
use crate::clustering::ArticleCluster;
use crate::config::DigestConfig;
use crate::util::{normalize_domain, sanitize_url};

/// A cluster with its recency-weighted score attached.
#[derive(Debug, Clone)]
pub struct ScoredCluster {
    pub cluster: ArticleCluster,
    pub score: f64,
}

/// Walk scored clusters best-first and admit at most `max_results` stories,
/// capping each source domain at its tier quota (`tiered`) or at the flat
/// `max_per_domain` otherwise.
///
/// Ordering is `(score, size, representative time)` descending; with the
/// recency boost disabled the score equals the cluster size, so this is
/// plain largest-then-freshest. Clusters whose representative link cannot
/// be sanitized are excluded outright: a story without a canonical URL can
/// be neither attributed to a domain nor displayed. A single over-quota
/// domain can legitimately leave the result shorter than `max_results`.
pub fn diversify(
    mut clusters: Vec<ScoredCluster>,
    max_results: usize,
    tiered: bool,
    config: &DigestConfig,
) -> Vec<RankedEntry> {
    clusters.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.cluster.size().cmp(&a.cluster.size()))
            .then_with(|| {
                b.cluster
                    .representative_published_at()
                    .cmp(&a.cluster.representative_published_at())
            })
    });

    let mut selected: Vec<RankedEntry> = Vec::new();
    let mut per_domain: HashMap<String, usize> = HashMap::new();

    for scored in clusters {
        if selected.len() >= max_results {
            break;
        }

        let representative = scored.cluster.representative();
        let link = match representative.link.as_deref().and_then(sanitize_url) {
            Some(link) => link,
            None => {
                debug!(
                    target: TARGET_RANKING,
                    "Excluding '{}': no canonical link", representative.title
                );
                continue;
            }
        };
        let domain = match normalize_domain(&link) {
            Some(domain) => domain,
            None => continue,
        };

        let quota = if tiered {
            classify_domain(&domain, &config.source_tiers).max_articles
        } else {
            config.max_per_domain
        };

        let used = per_domain.entry(domain.clone()).or_insert(0);
        if *used >= quota {
            debug!(
                target: TARGET_RANKING,
                "Domain {} at quota ({}), skipping '{}'", domain, quota, representative.title
            );
            continue;
        }
        *used += 1;

        selected.push(RankedEntry {
            article: representative.clone(),
            mentions: scored.cluster.size(),
            score: scored.score,
        });
    }

    selected
}
