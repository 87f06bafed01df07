//! Title similarity scoring.
//!
//! The default backend is a normalized edit-distance ratio over case-folded
//! titles. An optional backend embeds both titles with an E5 sentence
//! encoder and compares them by cosine similarity; it is only used when
//! explicitly enabled, and any model load or inference failure degrades to
//! the edit-distance ratio. Scores are consumed as threshold comparators,
//! never displayed.

/// Log target for similarity scoring
pub const TARGET_SIMILARITY: &str = "title_similarity";

pub mod config;
pub mod embedding;

pub use config::EmbeddingConfig;

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use candle_transformers::models::bert::BertModel;
use strsim::normalized_levenshtein;
use tokenizers::Tokenizer;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

use crate::config::SemanticDedupConfig;

// Static variables for the embedding model and tokenizer
pub static MODEL: OnceLock<Arc<BertModel>> = OnceLock::new();
pub static TOKENIZER: OnceLock<Arc<Tokenizer>> = OnceLock::new();

/// Returns a reference to the model, if initialized
pub fn model() -> Result<Arc<BertModel>> {
    MODEL
        .get()
        .ok_or_else(|| anyhow::anyhow!("Model not initialized"))
        .map(Arc::clone)
}

/// Returns a reference to the tokenizer, if initialized
pub fn tokenizer() -> Result<Arc<Tokenizer>> {
    TOKENIZER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Tokenizer not initialized"))
        .map(Arc::clone)
}

/// Backend selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityBackend {
    EditRatio,
    Embedding,
}

/// Title similarity scorer for one pipeline run.
pub struct TitleSimilarity {
    backend: SimilarityBackend,
    embedding_config: EmbeddingConfig,
}

impl TitleSimilarity {
    /// Scorer using only the edit-distance ratio.
    pub fn edit_ratio_only() -> Self {
        Self {
            backend: SimilarityBackend::EditRatio,
            embedding_config: EmbeddingConfig::default(),
        }
    }

    /// Select the backend for a run. The semantic backend is attempted only
    /// when enabled; if its model or tokenizer cannot be loaded, the run
    /// proceeds on the edit-distance ratio.
    pub fn from_config(config: &SemanticDedupConfig) -> Self {
        if !config.enabled {
            return Self::edit_ratio_only();
        }
        let embedding_config = EmbeddingConfig::for_model(&config.model);
        match embedding::ensure_initialized(&embedding_config) {
            Ok(()) => Self {
                backend: SimilarityBackend::Embedding,
                embedding_config,
            },
            Err(err) => {
                warn!(
                    target: TARGET_SIMILARITY,
                    "Semantic backend unavailable ({}); using edit-distance ratio", err
                );
                Self::edit_ratio_only()
            }
        }
    }

    pub fn backend(&self) -> SimilarityBackend {
        self.backend
    }

    /// Score two titles in `[0, 1]`. Case-insensitive; identical titles
    /// score 1.0, an empty title against a non-empty one scores 0.0.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        match self.backend {
            SimilarityBackend::EditRatio => edit_ratio(a, b),
            SimilarityBackend::Embedding => {
                match embedding::cosine_score(a, b, &self.embedding_config) {
                    Ok(score) => score,
                    Err(err) => {
                        debug!(
                            target: TARGET_SIMILARITY,
                            "Embedding comparison failed ({}); falling back to edit ratio", err
                        );
                        edit_ratio(a, b)
                    }
                }
            }
        }
    }
}

/// Normalized edit-distance ratio over case-folded titles.
pub fn edit_ratio(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(&a, &b)
}

/// Unicode-normalize, case-fold, and collapse whitespace before comparison.
fn normalize_title(title: &str) -> String {
    title
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
