// MiniLM sentence-embedding model shared by every analysis request.
pub const TARGET_VECTOR: &str = "embeddings";
pub const EMBEDDING_DIMENSIONS: usize = 384;
pub const MAX_SEQUENCE_LENGTH: usize = 512;
pub const MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/model.safetensors";
pub const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

use anyhow::Result;
use candle_transformers::models::bert::BertModel;
use std::sync::{Arc, OnceLock};
use tokenizers::Tokenizer;

// Static variables for model and tokenizer
pub static MODEL: OnceLock<Arc<BertModel>> = OnceLock::new();
pub static TOKENIZER: OnceLock<Arc<Tokenizer>> = OnceLock::new();

pub mod config;
pub mod embedding;
pub mod similarity;

// Re-export main components
pub use config::*;
pub use embedding::*;
pub use similarity::*;

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

/// Download the model files if needed and load them into the statics.
/// The model is required infrastructure: callers treat failure as fatal.
pub async fn init_embeddings() -> Result<()> {
    let config = MiniLmConfig::default();
    config.ensure_models_exist().await?;
    init_minilm_model(&config)?;
    init_minilm_tokenizer(&config)?;
    Ok(())
}
