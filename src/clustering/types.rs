use chrono::{DateTime, Utc};

use crate::article::Article;
use crate::ranking::RankedEntry;

/// A group of articles treated as reports of the same story.
///
/// Exactly one member is the representative: the one with the latest
/// effective publication time, first-found winning ties. The cluster's size
/// is the story's mention count.
#[derive(Debug, Clone)]
pub struct ArticleCluster {
    members: Vec<Article>,
    representative: usize,
    representative_at: DateTime<Utc>,
}

impl ArticleCluster {
    pub(crate) fn new(
        members: Vec<Article>,
        representative: usize,
        representative_at: DateTime<Utc>,
    ) -> Self {
        Self {
            members,
            representative,
            representative_at,
        }
    }

    /// The article displayed for this story.
    pub fn representative(&self) -> &Article {
        &self.members[self.representative]
    }

    /// Effective publication time of the representative. Representatives
    /// without a parseable date carry the run time here.
    pub fn representative_published_at(&self) -> DateTime<Utc> {
        self.representative_at
    }

    /// Mention count: how many source articles reported this story.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> &[Article] {
        &self.members
    }
}

/// A named theme grouping several ranked stories for the weekly brief.
#[derive(Debug, Clone)]
pub struct ThemeCluster {
    pub name: String,
    pub entries: Vec<RankedEntry>,
}

impl ThemeCluster {
    pub fn article_count(&self) -> usize {
        self.entries.len()
    }
}
