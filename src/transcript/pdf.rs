//! PDF text extraction backed by `pdf-extract`.

use std::panic::{self, AssertUnwindSafe};

/// Best-effort plain text from PDF bytes.
///
/// `pdf-extract` panics on some malformed documents, so panics are caught and
/// reported as ordinary failures. A document with no text layer (a scan, a
/// blank page) is a failure too, not an empty transcript.
pub(crate) fn extract_text(bytes: &[u8]) -> Result<String, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) if text.trim().is_empty() => {
            Err("PDF contains no extractable text".to_string())
        }
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("{:?}", e)),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("PDF parser panicked: {}", reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_an_error() {
        assert!(extract_text(b"definitely not a pdf").is_err());
    }

    #[test]
    fn empty_bytes_are_an_error() {
        assert!(extract_text(&[]).is_err());
    }

    #[test]
    fn text_layer_is_extracted() {
        let text = extract_text(include_bytes!("../../tests/fixtures/standup.pdf")).unwrap();
        assert!(text.contains("Alice: ship by Friday"), "got {:?}", text);
    }

    #[test]
    fn page_without_text_is_an_error() {
        let err = extract_text(include_bytes!("../../tests/fixtures/blank_page.pdf")).unwrap_err();
        assert_eq!(err, "PDF contains no extractable text");
    }
}
