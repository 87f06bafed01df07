//! The article value type shared across the pipeline.

use chrono::{DateTime, Utc};

/// A single fetched article, as handed over by the feed and scraper
/// collaborators. The pipeline never mutates these; derived data (cluster
/// membership, mention counts, scores) lives in the cluster and ranking
/// types instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
    pub category: String,
    pub summary: Option<String>,
}

impl Article {
    /// Publication time used for ordering and age calculations. Articles
    /// without a parseable date count as published at `now`, which biases
    /// them toward being chosen as a cluster representative.
    pub fn effective_published_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.published_at.unwrap_or(now)
    }
}
