//! Recency boost applied to mention counts.

use chrono::{DateTime, Utc};

use crate::config::RecencyBoostConfig;

/// Weight a story's mention count by how fresh it is.
pub fn boosted_score(
    mentions: usize,
    published_at: Option<DateTime<Utc>>,
    config: &RecencyBoostConfig,
) -> f64 {
    boosted_score_at(mentions, published_at, config, Utc::now())
}

/// As [`boosted_score`], against an explicit reference time.
///
/// Age brackets are checked newest-first with strict `<` comparisons:
/// breaking, same-day, recent, then the default multiplier. A missing
/// publication time counts as age zero. With the boost disabled the raw
/// mention count comes back unchanged.
pub fn boosted_score_at(
    mentions: usize,
    published_at: Option<DateTime<Utc>>,
    config: &RecencyBoostConfig,
    now: DateTime<Utc>,
) -> f64 {
    let count = mentions as f64;
    if !config.enabled {
        return count;
    }

    let age_hours = published_at
        .map(|at| (now - at).num_seconds() as f64 / 3600.0)
        .unwrap_or(0.0);

    let multiplier = if age_hours < config.breaking_news_hours {
        config.breaking_multiplier
    } else if age_hours < config.same_day_hours {
        config.same_day_multiplier
    } else if age_hours < config.recent_hours {
        config.recent_multiplier
    } else {
        config.default_multiplier
    };

    count * multiplier
}
