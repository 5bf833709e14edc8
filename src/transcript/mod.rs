//! Transcript module for meeting-digest
//!
//! Normalizes pasted text and uploaded documents into plain transcript text.

mod extractor;
mod pdf;

pub use extractor::{classify, extract, FileKind};

/// One inbound transcript, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptInput {
    /// Text pasted into the chat box
    Text { content: String },
    /// An uploaded document
    File(UploadedFile),
}

/// Raw upload plus whatever the client declared about it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub name: String,
    pub mime_type: String,
}

impl TranscriptInput {
    pub fn text(content: impl Into<String>) -> Self {
        TranscriptInput::Text {
            content: content.into(),
        }
    }

    pub fn file(bytes: impl Into<Vec<u8>>, name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        TranscriptInput::File(UploadedFile {
            bytes: bytes.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        })
    }

    /// Short label for logs; never includes content.
    pub fn describe(&self) -> String {
        match self {
            TranscriptInput::Text { content } => format!("text ({} bytes)", content.len()),
            TranscriptInput::File(file) => format!(
                "file {:?} ({}, {} bytes)",
                file.name,
                if file.mime_type.is_empty() { "no mime" } else { file.mime_type.as_str() },
                file.bytes.len()
            ),
        }
    }
}

/// Plain transcript text; never blank once constructed by [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTranscript {
    pub text: String,
}
