//! Single-link grouping of near-duplicate articles.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::types::ArticleCluster;
use super::TARGET_CLUSTERING;
use crate::article::Article;
use crate::similarity::TitleSimilarity;

/// Partition `entries` into clusters of near-duplicate titles.
///
/// Single-link with the cluster seed as the sole comparison anchor: each
/// not-yet-assigned entry (in input order) opens a cluster, and every later
/// unassigned entry whose title scores at least `threshold` against the
/// *seed's* title joins it. Two members can therefore share a cluster
/// without scoring above the threshold against each other, as long as both
/// matched the seed; published groupings depend on this, so it must not be
/// tightened to pairwise-complete clustering.
///
/// Every input article lands in exactly one cluster. An empty input yields
/// an empty list.
pub fn group_articles(
    entries: &[Article],
    threshold: f64,
    scorer: &TitleSimilarity,
) -> Vec<ArticleCluster> {
    group_articles_at(entries, threshold, scorer, Utc::now())
}

/// As [`group_articles`], with an explicit run time used as the effective
/// publication time of undated entries.
pub fn group_articles_at(
    entries: &[Article],
    threshold: f64,
    scorer: &TitleSimilarity,
    now: DateTime<Utc>,
) -> Vec<ArticleCluster> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut assigned = vec![false; entries.len()];
    let mut clusters = Vec::new();

    for seed_idx in 0..entries.len() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;

        let seed_title = &entries[seed_idx].title;
        let mut member_indices = vec![seed_idx];

        for other_idx in (seed_idx + 1)..entries.len() {
            if assigned[other_idx] {
                continue;
            }
            if scorer.score(seed_title, &entries[other_idx].title) >= threshold {
                assigned[other_idx] = true;
                member_indices.push(other_idx);
            }
        }

        // Representative: latest effective publication time, first found
        // winning ties. Undated members count as published at `now`.
        let mut representative = 0;
        let mut representative_at = entries[member_indices[0]].effective_published_at(now);
        for (position, &entry_idx) in member_indices.iter().enumerate().skip(1) {
            let published = entries[entry_idx].effective_published_at(now);
            if published > representative_at {
                representative = position;
                representative_at = published;
            }
        }

        if member_indices.len() > 1 {
            debug!(
                target: TARGET_CLUSTERING,
                "Grouped {} articles behind '{}'",
                member_indices.len(),
                seed_title
            );
        }

        let members = member_indices
            .iter()
            .map(|&entry_idx| entries[entry_idx].clone())
            .collect();
        clusters.push(ArticleCluster::new(members, representative, representative_at));
    }

    clusters
}
