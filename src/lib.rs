//! meeting-digest - Turn meeting transcripts into structured Markdown summaries
//!
//! A transcript arrives as pasted text or an uploaded `.txt`/`.pdf` document,
//! is normalized to plain text, wrapped in a fixed prompt and sent to an LLM.
//! The completion is returned verbatim as Markdown.

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod transcript;

use thiserror::Error;

use crate::llm::LlmError;

/// Stable classification of every way a summarize request can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoInputProvided,
    UnsupportedFileType,
    ExtractionFailed,
    EmptyInput,
    PayloadTooLarge,
    MalformedResponse,
    UpstreamUnavailable,
    InternalError,
}

impl ErrorKind {
    /// Whether the failure was caused by the caller's input.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorKind::NoInputProvided
                | ErrorKind::UnsupportedFileType
                | ErrorKind::ExtractionFailed
                | ErrorKind::EmptyInput
                | ErrorKind::PayloadTooLarge
        )
    }

    /// Message shown to callers. Server-side kinds share one generic message.
    pub fn public_message(self) -> &'static str {
        match self {
            ErrorKind::NoInputProvided => "No transcript text or file uploaded.",
            ErrorKind::UnsupportedFileType => "Unsupported file type. Only .txt and .pdf allowed.",
            ErrorKind::ExtractionFailed => "Failed to extract text from the uploaded file.",
            ErrorKind::EmptyInput => "Empty transcript content.",
            ErrorKind::PayloadTooLarge => "Uploaded file is too large.",
            ErrorKind::MalformedResponse
            | ErrorKind::UpstreamUnavailable
            | ErrorKind::InternalError => "Failed to generate summary.",
        }
    }
}

/// Main error type for the summarize pipeline
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("No transcript text or file uploaded")]
    NoInputProvided,

    #[error("Unsupported file type: name={name:?} mime={mime:?}")]
    UnsupportedFileType { name: String, mime: String },

    #[error("Failed to extract text from {name:?}: {reason}")]
    ExtractionFailed { name: String, reason: String },

    #[error("Empty transcript content")]
    EmptyInput,

    #[error("Upload exceeds the {limit} byte limit")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummarizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummarizeError::NoInputProvided => ErrorKind::NoInputProvided,
            SummarizeError::UnsupportedFileType { .. } => ErrorKind::UnsupportedFileType,
            SummarizeError::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            SummarizeError::EmptyInput => ErrorKind::EmptyInput,
            SummarizeError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            SummarizeError::Llm(e) => e.kind(),
            SummarizeError::Internal(_) => ErrorKind::InternalError,
        }
    }
}

pub type Result<T> = std::result::Result<T, SummarizeError>;

/// Error payload handed back to callers.
///
/// Client-input failures keep their own kind. Everything else is collapsed to
/// [`ErrorKind::InternalError`]; the original kind stays in `cause` for logs
/// and never reaches the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResult {
    pub kind: ErrorKind,
    pub message: String,
    pub cause: ErrorKind,
}

impl From<&SummarizeError> for ErrorResult {
    fn from(err: &SummarizeError) -> Self {
        let cause = err.kind();
        let kind = if cause.is_client_error() {
            cause
        } else {
            ErrorKind::InternalError
        };
        Self {
            kind,
            message: kind.public_message().to_string(),
            cause,
        }
    }
}

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "meeting-digest";
