use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::info;

use crate::extract::extract_text;
use crate::normalize::normalize;
use crate::skills::match_skills;
use crate::vector::{cosine_similarity, embed_text, fit_score};
use crate::TARGET_ANALYSIS;

/// Display-only cap on the extracted resume text returned to the page.
pub const PREVIEW_MAX_CHARS: usize = 2000;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("document extraction failed: {0}")]
    Extraction(String),
    #[error("embedding failed: {0}")]
    Embedding(#[from] anyhow::Error),
}

/// Everything the page needs to render one analysis.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub fit_score: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub resume_preview: String,
}

/// Run the full pipeline for one request: validate, extract, normalize,
/// embed both texts, score, and match skills. Synchronous per request;
/// the only shared state is the read-only embedding model.
pub async fn analyze(
    resume: &[u8],
    media_type: &str,
    job_description: &str,
) -> Result<AnalysisReport, AnalysisError> {
    if resume.is_empty() {
        return Err(AnalysisError::MissingInput(
            "no resume was uploaded".to_string(),
        ));
    }
    if job_description.trim().is_empty() {
        return Err(AnalysisError::MissingInput(
            "the job description is empty".to_string(),
        ));
    }

    let resume_text = extract_text(resume, media_type)?;
    let resume_normalized = normalize(&resume_text);
    let job_normalized = normalize(job_description);

    let resume_vector = embed_text(&resume_normalized).await?;
    let job_vector = embed_text(&job_normalized).await?;
    let cosine = cosine_similarity(&resume_vector, &job_vector)?;
    let score = fit_score(cosine);

    let skills = match_skills(&resume_normalized);

    info!(target: TARGET_ANALYSIS,
        "Analysis complete: fit score {:.2} (cosine {:.4}); {} matched / {} missing skills; {} resume chars",
        score,
        cosine,
        skills.matched.len(),
        skills.missing.len(),
        resume_text.len()
    );

    Ok(AnalysisReport {
        fit_score: score,
        matched_skills: skills.matched,
        missing_skills: skills.missing,
        resume_preview: preview(&resume_text),
    })
}

/// First `PREVIEW_MAX_CHARS` characters of the extracted text, with a
/// trailing ellipsis marker only when truncated. Counts chars, not
/// bytes, so multi-byte text can't split a code point.
fn preview(text: &str) -> String {
    let mut chars = text.char_indices();
    match chars.nth(PREVIEW_MAX_CHARS) {
        Some((byte_offset, _)) => format!("{}...", &text[..byte_offset]),
        None => text.to_string(),
    }
}
