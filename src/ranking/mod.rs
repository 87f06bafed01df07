// Module declarations
pub mod diversify;
pub mod recency;
pub mod tiers;
pub mod trending;

pub use diversify::{diversify, ScoredCluster};
pub use recency::{boosted_score, boosted_score_at};
pub use tiers::{classify_domain, TierQuota};
pub use trending::{detect_trending_category, TrendingCategory};

use crate::article::Article;

/// Log target for ranking events
pub const TARGET_RANKING: &str = "digest_ranking";

/// A story selected for the digest: the representative article, how many
/// source articles reported it, and its recency-weighted score.
#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub article: Article,
    pub mentions: usize,
    pub score: f64,
}
