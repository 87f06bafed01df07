//! E5 sentence-embedding backend for title similarity.
//!
//! Model weights and tokenizer are loaded from disk into process statics on
//! first use; inference runs synchronously on the CPU. Every failure path
//! surfaces as an error so the caller can fall back to the edit ratio.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use candle_core::{DType, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{
    BertModel, Config as BertConfig, HiddenAct, PositionEmbeddingType,
};
use tokenizers::Tokenizer;
use tracing::info;

use super::{model, tokenizer, EmbeddingConfig, MODEL, TARGET_SIMILARITY, TOKENIZER};

// Set only after both the model and the tokenizer loaded successfully.
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Load the model and tokenizer into the process statics, once.
pub fn ensure_initialized(config: &EmbeddingConfig) -> Result<()> {
    if INITIALIZED.load(Ordering::Relaxed) {
        return Ok(());
    }
    init_model(config)?;
    init_tokenizer(config)?;
    INITIALIZED.store(true, Ordering::Relaxed);
    Ok(())
}

fn init_model(config: &EmbeddingConfig) -> Result<()> {
    if MODEL.get().is_some() {
        return Ok(());
    }
    info!(target: TARGET_SIMILARITY, "Loading embedding model from {}", config.model_path);

    let bert_config = BertConfig {
        hidden_size: config.dimensions,
        intermediate_size: 4096,
        max_position_embeddings: config.max_length,
        num_attention_heads: 16,
        num_hidden_layers: 24,
        vocab_size: 30522,
        layer_norm_eps: 1e-12,
        pad_token_id: 0,
        hidden_act: HiddenAct::Gelu,
        hidden_dropout_prob: 0.0,
        type_vocab_size: 2,
        initializer_range: 0.02,
        position_embedding_type: PositionEmbeddingType::Absolute,
        use_cache: false,
        classifier_dropout: None,
        model_type: None,
    };

    let tensors =
        candle_core::safetensors::load_buffer(&std::fs::read(&config.model_path)?, &config.device)
            .map_err(|e| anyhow::anyhow!("Failed to load model tensors: {}", e))?;
    let vb = VarBuilder::from_tensors(tensors, DType::F32, &config.device);
    let bert = BertModel::load(vb, &bert_config)
        .map_err(|e| anyhow::anyhow!("Failed to load BERT model: {}", e))?;

    if MODEL.set(Arc::new(bert)).is_err() {
        return Err(anyhow::anyhow!("Failed to set model in static"));
    }

    info!(target: TARGET_SIMILARITY, "Embedding model loaded");
    Ok(())
}

fn init_tokenizer(config: &EmbeddingConfig) -> Result<()> {
    if TOKENIZER.get().is_some() {
        return Ok(());
    }

    let loaded = Tokenizer::from_file(&config.tokenizer_path)
        .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

    if TOKENIZER.set(Arc::new(loaded)).is_err() {
        return Err(anyhow::anyhow!("Failed to set tokenizer in static"));
    }

    info!(target: TARGET_SIMILARITY, "Embedding tokenizer loaded");
    Ok(())
}

/// Cosine similarity between the embeddings of two titles, clamped to
/// `[0, 1]` so it can be compared against the same thresholds as the edit
/// ratio.
pub fn cosine_score(a: &str, b: &str, config: &EmbeddingConfig) -> Result<f64> {
    let vec_a = title_embedding(a, config)?;
    let vec_b = title_embedding(b, config)?;
    let similarity = cosine_similarity(&vec_a, &vec_b)?;
    Ok((similarity as f64).clamp(0.0, 1.0))
}

/// Embed one title: tokenize, run the encoder, mean-pool over valid tokens,
/// L2-normalize.
fn title_embedding(title: &str, config: &EmbeddingConfig) -> Result<Vec<f32>> {
    let bert = model()?;
    let tokenizer = tokenizer()?;

    // E5 models expect a task prefix on the input text
    let prefixed = format!("query: {}", title);
    let encoding = tokenizer
        .encode(prefixed.as_str(), true)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    // Truncate to max_length - 1 to avoid index boundary issues
    let max_len = config.max_length - 1;
    let input_ids: Vec<i64> = encoding
        .get_ids()
        .iter()
        .take(max_len)
        .map(|&x| x as i64)
        .collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .take(max_len)
        .map(|&x| x as i64)
        .collect();

    let input_ids = Tensor::new(input_ids, &config.device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(attention_mask, &config.device)?.unsqueeze(0)?;
    let token_type_ids = input_ids.zeros_like()?;

    let hidden_state = bert.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

    // Mean pooling over non-padding positions
    let attention_mask_float = attention_mask.to_dtype(DType::F32)?;
    let attention_mask_expanded = attention_mask_float
        .unsqueeze(2)?
        .expand(hidden_state.shape())?;
    let masked_hidden = hidden_state.mul(&attention_mask_expanded)?;
    let summed_hidden = masked_hidden.sum(1)?;
    let valid_token_counts = attention_mask_float
        .sum(1)?
        .unsqueeze(1)?
        .clamp(1.0, f32::MAX)?;
    let valid_token_counts_expanded = valid_token_counts.expand(summed_hidden.shape())?;
    let mean_pooled = summed_hidden.div(&valid_token_counts_expanded)?;

    // L2 normalization
    let norm = mean_pooled.sqr()?.sum(1)?.sqrt()?.unsqueeze(1)?;
    let norm_expanded = norm.expand(mean_pooled.shape())?;
    let normalized = mean_pooled.div(&norm_expanded)?;

    let vector = normalized.squeeze(0)?.to_vec1::<f32>()?;
    Ok(vector)
}

/// Cosine similarity between two vectors of equal dimension.
pub fn cosine_similarity(vec1: &[f32], vec2: &[f32]) -> Result<f32> {
    if vec1.len() != vec2.len() {
        return Err(anyhow::anyhow!(
            "Vector dimensions don't match: {} vs {}",
            vec1.len(),
            vec2.len()
        ));
    }

    let mag1: f32 = vec1.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag2: f32 = vec2.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag1 < 0.001 || mag2 < 0.001 {
        return Err(anyhow::anyhow!("Zero magnitude vector detected"));
    }

    let dot_product: f32 = vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum();
    Ok(dot_product / (mag1 * mag2))
}
