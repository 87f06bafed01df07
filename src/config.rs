//! Runtime configuration for the digest pipeline.
//!
//! Every option is optional and falls back to the defaults below, so a
//! caller can deserialize a partial config file (or use
//! `DigestConfig::default()` outright). Loading the file itself is the
//! caller's concern; this module only defines the shape.

use serde::Deserialize;

/// Minimum title similarity before two entries are treated as one story.
pub const DEFAULT_FUZZ_THRESHOLD: f64 = 0.8;
/// Flat per-domain quota used when no source tiers are configured.
pub const DEFAULT_MAX_PER_DOMAIN: usize = 2;
/// Number of stories selected for the digest.
pub const DEFAULT_MAX_RESULTS: usize = 10;
/// Entries older than this many days are dropped at intake.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
/// How long a published story stays in the cross-run registry.
pub const DEFAULT_KEEP_REGISTRY_DAYS: i64 = 60;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestConfig {
    pub fuzz_threshold: f64,
    pub max_per_domain: usize,
    pub max_results: usize,
    pub lookback_days: i64,
    pub source_tiers: SourceTiers,
    pub recency_boost: RecencyBoostConfig,
    pub semantic_deduplication: SemanticDedupConfig,
    pub cross_run_dedup: CrossRunDedupConfig,
    pub filters: FilterConfig,
    pub theme_clusters: ThemeClusterConfig,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            fuzz_threshold: DEFAULT_FUZZ_THRESHOLD,
            max_per_domain: DEFAULT_MAX_PER_DOMAIN,
            max_results: DEFAULT_MAX_RESULTS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            source_tiers: SourceTiers::default(),
            recency_boost: RecencyBoostConfig::default(),
            semantic_deduplication: SemanticDedupConfig::default(),
            cross_run_dedup: CrossRunDedupConfig::default(),
            filters: FilterConfig::default(),
            theme_clusters: ThemeClusterConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Whether any source tier is configured. Tiered quotas take over from
    /// the flat `max_per_domain` as soon as one tier exists.
    pub fn tiered(&self) -> bool {
        !self.source_tiers.is_empty()
    }
}

/// Authority tiers for source domains, tier 1 being the most authoritative.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceTiers {
    pub tier_1: Option<TierConfig>,
    pub tier_2: Option<TierConfig>,
    pub tier_3: Option<TierConfig>,
    pub tier_4: Option<TierConfig>,
}

impl SourceTiers {
    pub fn is_empty(&self) -> bool {
        self.tier_1.is_none()
            && self.tier_2.is_none()
            && self.tier_3.is_none()
            && self.tier_4.is_none()
    }

    /// Configured tiers in ascending tier order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &TierConfig)> {
        [
            (1, self.tier_1.as_ref()),
            (2, self.tier_2.as_ref()),
            (3, self.tier_3.as_ref()),
            (4, self.tier_4.as_ref()),
        ]
        .into_iter()
        .filter_map(|(number, tier)| tier.map(|tier| (number, tier)))
    }
}

/// Domain list and per-digest quota for one tier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TierConfig {
    pub domains: Vec<String>,
    pub max_articles: usize,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            max_articles: DEFAULT_MAX_PER_DOMAIN,
        }
    }
}

/// Multipliers applied to a story's mention count by age bracket.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecencyBoostConfig {
    pub enabled: bool,
    pub breaking_news_hours: f64,
    pub same_day_hours: f64,
    pub recent_hours: f64,
    pub breaking_multiplier: f64,
    pub same_day_multiplier: f64,
    pub recent_multiplier: f64,
    pub default_multiplier: f64,
}

impl Default for RecencyBoostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            breaking_news_hours: 6.0,
            same_day_hours: 24.0,
            recent_hours: 72.0,
            breaking_multiplier: 3.0,
            same_day_multiplier: 2.0,
            recent_multiplier: 1.5,
            default_multiplier: 1.0,
        }
    }
}

/// Optional embedding-based title similarity. Disabled by default; when the
/// model cannot be loaded the pipeline degrades to the edit-distance ratio.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SemanticDedupConfig {
    pub enabled: bool,
    pub similarity_threshold: f64,
    pub model: String,
}

impl Default for SemanticDedupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            similarity_threshold: DEFAULT_FUZZ_THRESHOLD,
            model: "e5-large-v2".to_string(),
        }
    }
}

/// Cross-run suppression of already published stories.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrossRunDedupConfig {
    pub enabled: bool,
    pub keep_registry_days: i64,
}

impl Default for CrossRunDedupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keep_registry_days: DEFAULT_KEEP_REGISTRY_DAYS,
        }
    }
}

/// Keyword gate and block list applied before the pipeline proper.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
}

/// Theme grouping of the final highlights for the weekly brief.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeClusterConfig {
    pub max_themes: usize,
    pub similarity_threshold: f64,
}

impl Default for ThemeClusterConfig {
    fn default() -> Self {
        Self {
            max_themes: 5,
            similarity_threshold: 0.4,
        }
    }
}
