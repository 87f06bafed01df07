use candle_core::Device;

/// Configuration for the E5 sentence-embedding backend.
pub struct EmbeddingConfig {
    pub model_path: String,
    pub tokenizer_path: String,
    pub dimensions: usize,
    pub max_length: usize,
    pub device: Device,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_path: "models/e5-large-v2.safetensors".to_string(),
            tokenizer_path: "models/e5-large-v2-tokenizer.json".to_string(),
            dimensions: 1024,
            max_length: 512,
            device: Device::Cpu,
        }
    }
}

impl EmbeddingConfig {
    /// Paths derived from a configured model name: `models/<name>.safetensors`
    /// plus the matching `models/<name>-tokenizer.json`.
    pub fn for_model(model: &str) -> Self {
        Self {
            model_path: format!("models/{}.safetensors", model),
            tokenizer_path: format!("models/{}-tokenizer.json", model),
            ..Self::default()
        }
    }
}
