use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::analysis::{analyze, AnalysisError};
use crate::TARGET_WEB_REQUEST;

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Build the Axum router
fn app() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/analyze", post(analyze_handler))
        // No upload size limit: scanned resumes routinely exceed the
        // 2 MB default, and a bare 413 bypasses the JSON error shape.
        .layer(DefaultBodyLimit::disable())
}

/// Bind and serve the analyzer until the process exits.
pub async fn serve() -> Result<()> {
    let app = app();

    // Determine the port to listen on
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{}", port);

    let listener = TcpListener::bind(&addr).await?;
    info!(target: TARGET_WEB_REQUEST, "Server running on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Serves the embedded single-page UI
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Liveness probe
async fn healthz() -> &'static str {
    "OK"
}

/// Analysis endpoint: accepts a multipart form with a `resume` file
/// field and a `job_description` text field, returns the report as JSON.
async fn analyze_handler(mut multipart: Multipart) -> Response {
    let mut resume_bytes: Vec<u8> = Vec::new();
    let mut media_type = String::new();
    let mut job_description = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(target: TARGET_WEB_REQUEST, "Malformed multipart request: {}", e);
                return error_response(StatusCode::BAD_REQUEST, &format!("malformed upload: {e}"));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                media_type = field.content_type().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => resume_bytes = bytes.to_vec(),
                    Err(e) => {
                        warn!(target: TARGET_WEB_REQUEST, "Failed to read resume field: {}", e);
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            &format!("failed to read resume upload: {e}"),
                        );
                    }
                }
            }
            "job_description" => match field.text().await {
                Ok(text) => job_description = text,
                Err(e) => {
                    warn!(target: TARGET_WEB_REQUEST, "Failed to read job description field: {}", e);
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        &format!("failed to read job description: {e}"),
                    );
                }
            },
            _ => {}
        }
    }

    info!(target: TARGET_WEB_REQUEST,
        "Handling analyze request: {} resume bytes ({}), {} job description chars",
        resume_bytes.len(),
        if media_type.is_empty() { "no media type" } else { &media_type },
        job_description.len()
    );

    match analyze(&resume_bytes, &media_type, &job_description).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            warn!(target: TARGET_WEB_REQUEST, "Analysis request rejected: {}", err);
            error_response(status_for(&err), &err.to_string())
        }
    }
}

/// Bad inputs are the user's to correct; everything else is ours.
fn status_for(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::MissingInput(_) | AnalysisError::UnsupportedFormat(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::Extraction(_) | AnalysisError::Embedding(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    #[test]
    fn error_variants_map_to_expected_statuses() {
        assert_eq!(
            status_for(&AnalysisError::MissingInput("no resume".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&AnalysisError::UnsupportedFormat("image/png".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&AnalysisError::Extraction("corrupt document".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&AnalysisError::Embedding(anyhow::anyhow!("model not initialized"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    fn multipart_body(boundary: &str, resume: &[u8], job_description: &str) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"resume\"; \
                 filename=\"resume.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(resume);
        body.extend_from_slice(
            format!(
                "\r\n--{boundary}\r\nContent-Disposition: form-data; \
                 name=\"job_description\"\r\n\r\n{job_description}\r\n--{boundary}--\r\n"
            )
            .as_bytes(),
        );
        body
    }

    #[tokio::test]
    async fn oversized_uploads_reach_the_pipeline() {
        // Scanned resumes routinely exceed axum's 2 MB default body
        // limit; the request must reach the handler rather than die
        // with a bare 413 the page can't parse.
        let boundary = "fitscore-test-boundary";
        let resume = vec![0u8; 3 * 1024 * 1024];
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(multipart_body(boundary, &resume, "job description")))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        // image/png is rejected by the pipeline itself, which proves
        // the oversized body made it through the extractor untouched.
        assert_ne!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
