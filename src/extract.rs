use docx_rs::{read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::debug;

use crate::analysis::AnalysisError;
use crate::TARGET_ANALYSIS;

pub const MEDIA_TYPE_PDF: &str = "application/pdf";
pub const MEDIA_TYPE_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extract plain text from an uploaded document, dispatching on the
/// declared media type. Unsupported types fail before any parsing.
pub fn extract_text(bytes: &[u8], media_type: &str) -> Result<String, AnalysisError> {
    match media_type {
        MEDIA_TYPE_PDF => extract_pdf_text(bytes),
        MEDIA_TYPE_DOCX => extract_docx_text(bytes),
        other => Err(AnalysisError::UnsupportedFormat(other.to_string())),
    }
}

/// Full document text in page order.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AnalysisError::Extraction(format!("unable to read PDF document: {e}")))?;
    debug!(target: TARGET_ANALYSIS, "Extracted {} chars from PDF", text.len());
    Ok(text)
}

/// Paragraph texts in document order, joined with single newlines.
fn extract_docx_text(bytes: &[u8]) -> Result<String, AnalysisError> {
    let package = read_docx(bytes)
        .map_err(|e| AnalysisError::Extraction(format!("unable to read DOCX document: {e}")))?;

    let mut paragraphs = Vec::new();
    for child in &package.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            paragraphs.push(paragraph_text(paragraph));
        }
    }

    let text = paragraphs.join("\n");
    debug!(target: TARGET_ANALYSIS, "Extracted {} chars from {} DOCX paragraphs", text.len(), paragraphs.len());
    Ok(text)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};
    use std::io::Cursor;

    #[test]
    fn unsupported_media_type_is_rejected_before_parsing() {
        let err = extract_text(b"\x89PNG\r\n", "image/png").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat(t) if t == "image/png"));
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_failure() {
        let err = extract_text(b"not a pdf at all", MEDIA_TYPE_PDF).unwrap_err();
        assert!(matches!(err, AnalysisError::Extraction(_)));
    }

    #[test]
    fn corrupt_docx_is_an_extraction_failure() {
        let err = extract_text(b"not a zip archive", MEDIA_TYPE_DOCX).unwrap_err();
        assert!(matches!(err, AnalysisError::Extraction(_)));
    }

    #[test]
    fn docx_paragraphs_join_with_single_newlines() {
        let docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Python and AWS")));

        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("failed to build test docx");

        let text = extract_text(&buffer.into_inner(), MEDIA_TYPE_DOCX).unwrap();
        assert_eq!(text, "Jane Doe\nPython and AWS");
    }

    #[test]
    fn docx_runs_within_a_paragraph_concatenate() {
        let docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Senior "))
                .add_run(Run::new().add_text("Engineer")),
        );

        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("failed to build test docx");

        let text = extract_text(&buffer.into_inner(), MEDIA_TYPE_DOCX).unwrap();
        assert_eq!(text, "Senior Engineer");
    }
}
