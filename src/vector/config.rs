use anyhow::Result;
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{
    BertModel, Config as BertConfig, HiddenAct, PositionEmbeddingType,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokenizers::Tokenizer;
use tokio::fs;
use tracing::{error, info};

use crate::vector::{
    EMBEDDING_DIMENSIONS, MAX_SEQUENCE_LENGTH, MODEL, MODEL_URL, TARGET_VECTOR, TOKENIZER,
    TOKENIZER_URL,
};

/// Configuration struct for the MiniLM embedding model
pub struct MiniLmConfig {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub dimensions: usize,
    pub max_length: usize,
    pub device: Device,
}

impl Default for MiniLmConfig {
    fn default() -> Self {
        let models_dir =
            PathBuf::from(std::env::var("MODELS_DIR").unwrap_or_else(|_| "models".to_string()));
        Self {
            model_path: models_dir.join("all-minilm-l6-v2.safetensors"),
            tokenizer_path: models_dir.join("minilm-tokenizer.json"),
            dimensions: EMBEDDING_DIMENSIONS,
            max_length: MAX_SEQUENCE_LENGTH,
            device: Device::Cpu,
        }
    }
}

impl MiniLmConfig {
    pub async fn ensure_models_exist(&self) -> Result<()> {
        // Create the models directory if it doesn't exist
        if let Some(models_dir) = self.model_path.parent() {
            if !models_dir.exists() {
                fs::create_dir_all(models_dir).await?;
            }
        }

        // Check and download model file if needed
        if !self.model_path.exists() {
            info!(target: TARGET_VECTOR, "Downloading MiniLM model from {}", MODEL_URL);
            let response = reqwest::get(MODEL_URL).await?;
            let bytes = response.bytes().await?;
            fs::write(&self.model_path, bytes).await?;
            info!(target: TARGET_VECTOR, "Downloaded MiniLM model to {}", self.model_path.display());
        }

        // Check and download tokenizer file if needed
        if !self.tokenizer_path.exists() {
            info!(target: TARGET_VECTOR, "Downloading MiniLM tokenizer from {}", TOKENIZER_URL);
            let response = reqwest::get(TOKENIZER_URL).await?;
            let bytes = response.bytes().await?;
            fs::write(&self.tokenizer_path, bytes).await?;
            info!(target: TARGET_VECTOR, "Downloaded MiniLM tokenizer to {}", self.tokenizer_path.display());
        }

        Ok(())
    }
}

/// Initialize the MiniLM model from config
pub fn init_minilm_model(config: &MiniLmConfig) -> Result<()> {
    info!(target: TARGET_VECTOR, "Starting to load MiniLM model from {}", config.model_path.display());
    let bert_config = BertConfig {
        hidden_size: config.dimensions,
        intermediate_size: 1536,
        max_position_embeddings: config.max_length,
        num_attention_heads: 12,
        num_hidden_layers: 6,
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

    // Load the safetensors file
    let tensors = match candle_core::safetensors::load_buffer(
        &std::fs::read(&config.model_path)?,
        &config.device,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(target: TARGET_VECTOR, "!!! Failed to load model tensors: {}", e);
            return Err(anyhow::anyhow!("Failed to load model tensors"));
        }
    };

    // Create VarBuilder from the loaded tensors
    let vb = VarBuilder::from_tensors(tensors, DType::F32, &config.device);

    // Load the model
    let model = match BertModel::load(vb, &bert_config) {
        Ok(m) => m,
        Err(e) => {
            error!(target: TARGET_VECTOR, "!!! Failed to load BERT model: {}", e);
            return Err(anyhow::anyhow!("Failed to load BERT model"));
        }
    };

    // Set the model in the static
    if MODEL.set(Arc::new(model)).is_err() {
        error!(target: TARGET_VECTOR, "!!! Failed to set model in static");
        return Err(anyhow::anyhow!("Failed to set model in static"));
    }

    info!(target: TARGET_VECTOR, "Successfully loaded MiniLM model");
    Ok(())
}

/// Initialize the MiniLM tokenizer from config
pub fn init_minilm_tokenizer(config: &MiniLmConfig) -> Result<()> {
    info!(target: TARGET_VECTOR, "Starting to load MiniLM tokenizer from {}", config.tokenizer_path.display());

    let tokenizer = match Tokenizer::from_file(&config.tokenizer_path) {
        Ok(t) => t,
        Err(e) => {
            error!(target: TARGET_VECTOR, "!!! Failed to load tokenizer: {}", e);
            return Err(anyhow::anyhow!("Failed to load tokenizer"));
        }
    };

    if TOKENIZER.set(Arc::new(tokenizer)).is_err() {
        error!(target: TARGET_VECTOR, "!!! Failed to set tokenizer in static");
        return Err(anyhow::anyhow!("Failed to set tokenizer in static"));
    }

    info!(target: TARGET_VECTOR, "Successfully loaded MiniLM tokenizer");
    Ok(())
}
