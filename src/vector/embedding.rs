use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use tokio::time::Instant;
use tracing::info;

use crate::vector::{EMBEDDING_DIMENSIONS, MAX_SEQUENCE_LENGTH, TARGET_VECTOR};

/// Generate a sentence embedding for the given text
pub async fn embed_text(text: &str) -> Result<Vec<f32>> {
    let device = Device::Cpu;
    let model = crate::vector::model()?;
    let tokenizer = crate::vector::tokenizer()?;

    let start_time = Instant::now();
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

    // Truncate to max_length - 1 to avoid index boundary issues
    let max_len = MAX_SEQUENCE_LENGTH - 1;
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
    let token_count = input_ids.len();

    let tokenize_end = Instant::now();
    let inference_start = Instant::now();

    let input_ids = Tensor::new(input_ids, &device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(attention_mask, &device)?.unsqueeze(0)?;
    let token_type_ids = input_ids.zeros_like()?;

    // Get the last hidden state
    let hidden_state = model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

    // Convert attention mask to float and expand for broadcasting
    let attention_mask_float = attention_mask.to_dtype(DType::F32)?;
    let attention_mask_expanded = attention_mask_float
        .unsqueeze(2)?
        .expand(hidden_state.shape())?;

    // Apply attention mask (zero out padding embeddings)
    let masked_hidden = hidden_state.mul(&attention_mask_expanded)?;

    // Sum the masked hidden states along the sequence length dimension
    let summed_hidden = masked_hidden.sum(1)?;

    // Sum the attention mask to count the number of valid tokens
    let valid_token_counts = attention_mask_float
        .sum(1)?
        .unsqueeze(1)?
        .clamp(1.0, f32::MAX)?;

    // Perform mean pooling (ensure correct shape for division)
    let valid_token_counts_expanded = valid_token_counts.expand(summed_hidden.shape())?;
    let mean_pooled = summed_hidden.div(&valid_token_counts_expanded)?;

    // Normalize the vector
    let norm = mean_pooled.sqr()?.sum(1)?.sqrt()?.unsqueeze(1)?;
    let norm_expanded = norm.expand(mean_pooled.shape())?;
    let normalized = mean_pooled.div(&norm_expanded)?;

    // Get final vector
    let vector = normalized.squeeze(0)?.to_vec1::<f32>()?;

    let end_time = Instant::now();

    if vector.len() != EMBEDDING_DIMENSIONS {
        return Err(anyhow::anyhow!(
            "Unexpected embedding dimensions: got {}, expected {}",
            vector.len(),
            EMBEDDING_DIMENSIONS
        ));
    }

    let magnitude: f32 = vector.iter().map(|x| x.powi(2)).sum::<f32>().sqrt();

    info!(target: TARGET_VECTOR,
        "Embedding generation successful: Input length: {} tokens; Tokenization time: {:?}; Inference time: {:?}; Total time: {:?}; Dimensions: {}; Vector magnitude: {:.6}; Original text length: {} chars",
        token_count,
        tokenize_end.duration_since(start_time),
        end_time.duration_since(inference_start),
        end_time.duration_since(start_time),
        vector.len(),
        magnitude,
        text.len()
    );

    Ok(vector)
}
