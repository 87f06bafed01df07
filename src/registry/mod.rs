//! Cross-run registry of previously published stories.
//!
//! The only durable state in the pipeline: a JSON map from identity hash to
//! the record of a story's publication, read at the start of a run to
//! suppress re-publishing and rewritten once after the run by the caller.
//! A missing or corrupt backing file is never fatal; the run starts from an
//! empty registry.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::article::Article;
use crate::util::parse_date;

/// Log target for registry events
pub const TARGET_REGISTRY: &str = "article_registry";

/// One previously published story. `recorded_at` is the time the story
/// went out in a digest, not the article's own publication time; the
/// retention window counts from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub title: String,
    pub url: String,
    pub source: String,
    pub recorded_at: String,
    pub category: String,
}

/// Verdict of a duplicate check, with the explanation logged alongside it.
#[derive(Debug, Clone)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    pub reason: String,
}

/// Stable identity hash for an article: SHA-256 over the lowercased
/// `url#title` pair.
pub fn identity_hash(article: &Article) -> String {
    let keyed = format!(
        "{}#{}",
        article.link.as_deref().unwrap_or(""),
        article.title
    )
    .to_lowercase();
    let mut hasher = Sha256::new();
    hasher.update(keyed.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Durable map of published article identities.
#[derive(Debug, Default)]
pub struct ArticleRegistry {
    records: HashMap<String, RegistryRecord>,
}

impl ArticleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry from disk. A missing file yields an empty registry
    /// silently; an unreadable or corrupt one yields an empty registry with
    /// a warning.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target: TARGET_REGISTRY, "No registry at {}, starting empty", path.display());
                return Self::default();
            }
            Err(err) => {
                warn!(
                    target: TARGET_REGISTRY,
                    "Could not read registry at {} ({}), starting empty", path.display(), err
                );
                return Self::default();
            }
        };

        match serde_json::from_str::<HashMap<String, RegistryRecord>>(&raw) {
            Ok(records) => {
                info!(
                    target: TARGET_REGISTRY,
                    "Loaded {} registry record(s) from {}", records.len(), path.display()
                );
                Self { records }
            }
            Err(err) => {
                warn!(
                    target: TARGET_REGISTRY,
                    "Corrupt registry at {} ({}), starting empty", path.display(), err
                );
                Self::default()
            }
        }
    }

    /// Persist the registry.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.records)?;
        fs::write(path, raw)
            .with_context(|| format!("failed to write registry to {}", path.display()))?;
        debug!(
            target: TARGET_REGISTRY,
            "Saved {} registry record(s) to {}", self.records.len(), path.display()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether this article was already published within the retention
    /// window.
    pub fn check(&self, article: &Article, retention_days: i64) -> DuplicateCheck {
        self.check_at(article, retention_days, Utc::now())
    }

    /// As [`ArticleRegistry::check`], against an explicit reference time.
    ///
    /// A hit outside the retention window reports non-duplicate: the story
    /// is explicitly eligible for republication. A record whose timestamp
    /// cannot be parsed keeps suppressing.
    pub fn check_at(
        &self,
        article: &Article,
        retention_days: i64,
        now: DateTime<Utc>,
    ) -> DuplicateCheck {
        let hash = identity_hash(article);
        let Some(record) = self.records.get(&hash) else {
            return DuplicateCheck {
                is_duplicate: false,
                reason: "not previously published".to_string(),
            };
        };

        match parse_date(&record.recorded_at) {
            Some(recorded) if now - recorded < Duration::days(retention_days) => DuplicateCheck {
                is_duplicate: true,
                reason: format!(
                    "already published as '{}' within the {}-day window",
                    record.title, retention_days
                ),
            },
            Some(recorded) => DuplicateCheck {
                is_duplicate: false,
                reason: format!(
                    "previous publication on {} is outside {}-day window",
                    recorded.format("%Y-%m-%d"),
                    retention_days
                ),
            },
            None => DuplicateCheck {
                is_duplicate: true,
                reason: "recorded without a readable timestamp".to_string(),
            },
        }
    }

    /// Record a batch of published articles, then prune entries that have
    /// aged out of the retention window.
    pub fn record(&mut self, articles: &[Article], retention_days: i64) {
        self.record_at(articles, retention_days, Utc::now());
    }

    /// As [`ArticleRegistry::record`], against an explicit reference time.
    pub fn record_at(&mut self, articles: &[Article], retention_days: i64, now: DateTime<Utc>) {
        for article in articles {
            self.records.insert(
                identity_hash(article),
                RegistryRecord {
                    title: article.title.clone(),
                    url: article.link.clone().unwrap_or_default(),
                    source: article.source.clone(),
                    recorded_at: now.to_rfc3339(),
                    category: article.category.clone(),
                },
            );
        }
        self.prune_at(retention_days, now);
    }

    fn prune_at(&mut self, retention_days: i64, now: DateTime<Utc>) {
        let cutoff = now - Duration::days(retention_days);
        let before = self.records.len();
        self.records.retain(|_, record| {
            match parse_date(&record.recorded_at) {
                Some(recorded) => recorded >= cutoff,
                // Unparseable timestamps are retained
                None => true,
            }
        });
        let pruned = before - self.records.len();
        if pruned > 0 {
            debug!(target: TARGET_REGISTRY, "Pruned {} expired registry record(s)", pruned);
        }
    }
}
