//! Thematic grouping of the final highlights for the weekly brief.
//!
//! A much looser cousin of the dedup grouper: the same seed-anchored
//! single-link walk, but over already-ranked stories and with a low
//! threshold, so loosely related stories land under one named theme.

use tracing::debug;

use super::types::ThemeCluster;
use super::TARGET_CLUSTERING;
use crate::config::ThemeClusterConfig;
use crate::ranking::RankedEntry;
use crate::similarity::edit_ratio;

/// Group ranked highlights into named themes, largest first, capped at
/// `max_themes`. Theme names come from the two most frequent non-stopword
/// title keywords; a theme without usable keywords is numbered instead.
pub fn theme_clusters(entries: &[RankedEntry], config: &ThemeClusterConfig) -> Vec<ThemeCluster> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut assigned = vec![false; entries.len()];
    let mut themes: Vec<ThemeCluster> = Vec::new();

    for seed_idx in 0..entries.len() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;

        let seed_title = &entries[seed_idx].article.title;
        let mut member_indices = vec![seed_idx];

        for other_idx in (seed_idx + 1)..entries.len() {
            if assigned[other_idx] {
                continue;
            }
            let score = edit_ratio(seed_title, &entries[other_idx].article.title);
            if score >= config.similarity_threshold {
                assigned[other_idx] = true;
                member_indices.push(other_idx);
            }
        }

        let members: Vec<RankedEntry> = member_indices
            .iter()
            .map(|&entry_idx| entries[entry_idx].clone())
            .collect();
        let name = theme_name(&members).unwrap_or_else(|| format!("Topic {}", themes.len() + 1));
        themes.push(ThemeCluster {
            name,
            entries: members,
        });
    }

    // Largest themes first; the stable sort keeps discovery order for ties.
    themes.sort_by(|a, b| b.article_count().cmp(&a.article_count()));
    themes.truncate(config.max_themes);

    debug!(
        target: TARGET_CLUSTERING,
        "Built {} theme(s) from {} highlights",
        themes.len(),
        entries.len()
    );
    themes
}

/// Name a theme from the two most frequent non-stopword keywords across its
/// member titles.
fn theme_name(members: &[RankedEntry]) -> Option<String> {
    // Count keywords in first-seen order so ties resolve deterministically.
    let mut keywords: Vec<(String, usize)> = Vec::new();
    for entry in members {
        for word in entry.article.title.to_lowercase().split_whitespace() {
            let word = word.trim_matches(|c: char| !c.is_alphanumeric());
            if word.len() <= 3 || is_stop_word(word) {
                continue;
            }
            match keywords.iter_mut().find(|(seen, _)| seen.as_str() == word) {
                Some((_, count)) => *count += 1,
                None => keywords.push((word.to_string(), 1)),
            }
        }
    }

    if keywords.is_empty() {
        return None;
    }

    keywords.sort_by(|a, b| b.1.cmp(&a.1));
    let name = keywords
        .iter()
        .take(2)
        .map(|(word, _)| title_case(word))
        .collect::<Vec<_>>()
        .join(" & ");
    Some(name)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn is_stop_word(word: &str) -> bool {
    matches!(
        word,
        "the" | "a" | "an" | "and" | "or" | "is" | "in" | "on" | "at" | "to" | "for" | "of"
            | "with" | "by" | "from" | "this" | "that" | "after" | "over" | "into"
    )
}
