//! Mapping of pipeline failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::{ErrorKind, ErrorResult, SummarizeError};

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Caller-facing failure of an HTTP request.
#[derive(Debug)]
pub struct ApiError(pub ErrorResult);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        status_for(self.0.kind)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NoInputProvided
        | ErrorKind::UnsupportedFileType
        | ErrorKind::ExtractionFailed
        | ErrorKind::EmptyInput => StatusCode::BAD_REQUEST,
        ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::MalformedResponse | ErrorKind::UpstreamUnavailable | ErrorKind::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.0.message,
        });
        (status, body).into_response()
    }
}

impl From<ErrorResult> for ApiError {
    fn from(result: ErrorResult) -> Self {
        ApiError(result)
    }
}

impl From<SummarizeError> for ApiError {
    fn from(e: SummarizeError) -> Self {
        ApiError(ErrorResult::from(&e))
    }
}
