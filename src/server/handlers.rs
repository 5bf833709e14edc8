//! HTTP request handlers for the summarize API.
//!
//! Implements transcript summarization and health check endpoints using axum.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::pipeline::{SummarizeRequest, SummaryService};
use crate::server::error::ApiError;
use crate::transcript::UploadedFile;
use crate::SummarizeError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Transcript-to-summary pipeline
    pub service: SummaryService,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

/// JSON request body
#[derive(Debug, Deserialize)]
pub struct SummarizeBody {
    #[serde(default)]
    pub content: Option<String>,
}

/// Successful summarize response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
}

/// POST /api/summarize - Summarize a pasted or uploaded transcript
async fn summarize(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<SummaryResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("summarize", %request_id);

    async move {
        let request = read_summarize_request(request, &state)
            .await
            .inspect_err(|e| tracing::info!("Rejected request body: {}", e))?;
        let summary = state.service.handle(request).await?;
        Ok::<_, ApiError>(Json(SummaryResponse {
            summary: summary.markdown,
        }))
    }
    .instrument(span)
    .await
}

/// Multipart bodies carry a `file` part and optionally a `content` part;
/// anything else is read as JSON.
async fn read_summarize_request(
    request: Request,
    state: &AppState,
) -> Result<SummarizeRequest, SummarizeError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, state).await.map_err(|rejection| {
            tracing::debug!("Multipart rejected: {}", rejection);
            SummarizeError::NoInputProvided
        })?;
        read_multipart(multipart, state.max_upload_bytes).await
    } else {
        let body = Bytes::from_request(request, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                SummarizeError::PayloadTooLarge {
                    limit: state.max_upload_bytes,
                }
            } else {
                SummarizeError::NoInputProvided
            }
        })?;
        Ok(parse_json_body(&body))
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    limit: usize,
) -> Result<SummarizeRequest, SummarizeError> {
    let mut request = SummarizeRequest::default();

    let body_error = |e: axum::extract::multipart::MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SummarizeError::PayloadTooLarge { limit }
        } else {
            tracing::debug!("Malformed multipart body: {}", e);
            SummarizeError::NoInputProvided
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(body_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("file") if request.file.is_none() => {
                let name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(body_error)?;

                // Browsers send an empty, unnamed part when no file was picked.
                if name.is_empty() && bytes.is_empty() {
                    continue;
                }
                request.file = Some(UploadedFile {
                    bytes: Vec::from(bytes),
                    name,
                    mime_type,
                });
            }
            Some("content") => {
                request.content = Some(field.text().await.map_err(body_error)?);
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring multipart field");
            }
        }
    }

    Ok(request)
}

/// Unparseable or empty bodies count as "no content".
fn parse_json_body(body: &[u8]) -> SummarizeRequest {
    if body.is_empty() {
        return SummarizeRequest::default();
    }

    match serde_json::from_slice::<SummarizeBody>(body) {
        Ok(body) => SummarizeRequest {
            file: None,
            content: body.content,
        },
        Err(e) => {
            tracing::debug!("Ignoring unparseable JSON body: {}", e);
            SummarizeRequest::default()
        }
    }
}

/// GET /health - Liveness check
async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/api/summarize", post(summarize))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_is_read() {
        let request = parse_json_body(br#"{"content":"Dana: hi"}"#);
        assert_eq!(request.content.as_deref(), Some("Dana: hi"));
        assert!(request.file.is_none());
    }

    #[test]
    fn empty_or_invalid_json_has_no_content() {
        assert!(parse_json_body(b"").content.is_none());
        assert!(parse_json_body(b"{not json").content.is_none());
        assert!(parse_json_body(br#"{"content": 42}"#).content.is_none());
        assert!(parse_json_body(br#"{"text":"wrong field"}"#).content.is_none());
    }
}
