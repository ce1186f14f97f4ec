use anyhow::Result;

/// Vectors with a magnitude below this are treated as having no direction.
const MIN_MAGNITUDE: f32 = 0.001;

/// Calculate cosine similarity directly between two vectors
///
/// # Arguments
/// * `vec1` - First vector
/// * `vec2` - Second vector
///
/// # Returns
/// * `Result<f32>` - The cosine similarity or an error
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

    // A degenerate vector has no direction to compare against.
    if mag1 < MIN_MAGNITUDE || mag2 < MIN_MAGNITUDE {
        return Ok(0.0);
    }

    let dot_product: f32 = vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum();
    let similarity = dot_product / (mag1 * mag2);

    Ok(similarity)
}

/// Rescale a cosine similarity from [-1,1] to a 0-100 fit score,
/// rounded to two decimal places.
pub fn fit_score(cosine: f32) -> f64 {
    let cosine = f64::from(cosine).clamp(-1.0, 1.0);
    let scaled = (cosine + 1.0) / 2.0 * 100.0;
    (scaled * 100.0).round() / 100.0
}
