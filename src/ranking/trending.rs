//! Detection of the category drawing the most attention in a run.

use std::collections::BTreeMap;

use tracing::info;

use super::{RankedEntry, TARGET_RANKING};
use crate::article::Article;

/// How many highlight articles are carried along for the opinion post.
const MAX_TOP_ARTICLES: usize = 3;

/// Summary of the trending category for the analyst-opinion collaborator.
#[derive(Debug, Clone)]
pub struct TrendingCategory {
    pub category: String,
    pub article_count: usize,
    pub highlight_mentions: usize,
    pub top_articles: Vec<Article>,
}

/// Pick the category with the strongest showing this run. Highlight
/// mentions weigh double relative to raw article counts; ties resolve to
/// the alphabetically first category.
pub fn detect_trending_category(
    reports: &BTreeMap<String, Vec<Article>>,
    highlights: &[RankedEntry],
) -> Option<TrendingCategory> {
    if reports.is_empty() {
        return None;
    }

    let mut mentions_by_category: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in highlights {
        *mentions_by_category
            .entry(entry.article.category.as_str())
            .or_insert(0) += entry.mentions;
    }

    let mut best: Option<(usize, &str)> = None;
    for (category, articles) in reports {
        let highlight_mentions = mentions_by_category
            .get(category.as_str())
            .copied()
            .unwrap_or(0);
        let score = highlight_mentions * 2 + articles.len();
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, category.as_str()));
        }
    }

    let (_, category) = best?;
    let articles = reports.get(category)?;
    let top_articles: Vec<Article> = highlights
        .iter()
        .filter(|entry| entry.article.category == category)
        .take(MAX_TOP_ARTICLES)
        .map(|entry| entry.article.clone())
        .collect();

    let trending = TrendingCategory {
        category: category.to_string(),
        article_count: articles.len(),
        highlight_mentions: mentions_by_category
            .get(category)
            .copied()
            .unwrap_or(0),
        top_articles,
    };

    info!(
        target: TARGET_RANKING,
        "Category '{}' trending: {} highlight mentions, {} articles",
        trending.category,
        trending.highlight_mentions,
        trending.article_count
    );

    Some(trending)
}
