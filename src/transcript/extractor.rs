//! Input classification and text extraction.

use crate::transcript::{pdf, ExtractedTranscript, TranscriptInput, UploadedFile};
use crate::{Result, SummarizeError};

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    PlainText,
    Unsupported,
}

impl FileKind {
    fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("application/pdf") {
            Some(FileKind::Pdf)
        } else if essence.eq_ignore_ascii_case("text/plain") {
            Some(FileKind::PlainText)
        } else {
            None
        }
    }

    fn from_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if name.ends_with(".pdf") {
            FileKind::Pdf
        } else if name.ends_with(".txt") {
            FileKind::PlainText
        } else {
            FileKind::Unsupported
        }
    }
}

/// Decide how to read an upload.
///
/// A recognized MIME type wins; otherwise the filename suffix decides.
pub fn classify(name: &str, mime_type: &str) -> FileKind {
    FileKind::from_mime(mime_type).unwrap_or_else(|| FileKind::from_name(name))
}

/// Turn an input into non-blank transcript text.
///
/// Pure: no I/O beyond decoding the given bytes. PDF decoding can be CPU-heavy,
/// so async callers should run this on a blocking thread.
pub fn extract(input: &TranscriptInput) -> Result<ExtractedTranscript> {
    let text = match input {
        TranscriptInput::Text { content } => content.clone(),
        TranscriptInput::File(file) => extract_file(file)?,
    };

    if text.trim().is_empty() {
        return Err(SummarizeError::EmptyInput);
    }

    Ok(ExtractedTranscript { text })
}

fn extract_file(file: &UploadedFile) -> Result<String> {
    match classify(&file.name, &file.mime_type) {
        FileKind::Pdf => pdf::extract_text(&file.bytes).map_err(|reason| {
            SummarizeError::ExtractionFailed {
                name: file.name.clone(),
                reason,
            }
        }),
        FileKind::PlainText => Ok(decode_utf8(&file.bytes)),
        FileKind::Unsupported => Err(SummarizeError::UnsupportedFileType {
            name: file.name.clone(),
            mime: file.mime_type.clone(),
        }),
    }
}

/// Invalid sequences become U+FFFD; a leading BOM is dropped.
fn decode_utf8(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
