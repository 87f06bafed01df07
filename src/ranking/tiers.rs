//! Source authority tiers and per-domain quotas.

use crate::config::SourceTiers;

/// Tier assigned to domains no configured tier matches.
pub const DEFAULT_TIER: u8 = 3;
/// Per-digest quota that comes with the fallback tier.
pub const DEFAULT_TIER_MAX_ARTICLES: usize = 2;

/// Tier number and per-digest quota for a source domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierQuota {
    pub tier: u8,
    pub max_articles: usize,
}

/// Classify a normalized domain (lowercased, no port, no leading `www.`)
/// into its authority tier.
///
/// Tiers are checked in ascending tier order and the first match wins.
/// Within a tier a domain matches on exact equality or on a
/// `*.example.com` wildcard suffix; the wildcard covers subdomains only,
/// not `example.com` itself.
pub fn classify_domain(domain: &str, tiers: &SourceTiers) -> TierQuota {
    for (number, tier) in tiers.iter() {
        if tier
            .domains
            .iter()
            .any(|candidate| domain_matches(domain, candidate))
        {
            return TierQuota {
                tier: number,
                max_articles: tier.max_articles,
            };
        }
    }
    TierQuota {
        tier: DEFAULT_TIER,
        max_articles: DEFAULT_TIER_MAX_ARTICLES,
    }
}

fn domain_matches(domain: &str, candidate: &str) -> bool {
    let candidate = candidate.to_ascii_lowercase();
    if let Some(suffix) = candidate.strip_prefix('*') {
        // "*.example.com" keeps its leading dot, so only proper subdomains
        // can end with it.
        domain.ends_with(suffix) && domain.len() > suffix.len()
    } else {
        domain == candidate
    }
}
