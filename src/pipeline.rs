//! Transcript-to-summary pipeline
//!
//! One request runs `Received -> Extracting -> PromptBuilt -> Summarizing ->
//! Completed`, stopping at the first failing stage. Nothing is shared between
//! requests except the provider.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::llm::{build_prompt, LlmProvider, SummaryResult};
use crate::transcript::{extract, ExtractedTranscript, TranscriptInput, UploadedFile};
use crate::{ErrorResult, Result, SummarizeError};

/// What a caller handed in, before deciding which input wins.
#[derive(Debug, Clone, Default)]
pub struct SummarizeRequest {
    pub file: Option<UploadedFile>,
    pub content: Option<String>,
}

impl SummarizeRequest {
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            file: None,
            content: Some(content.into()),
        }
    }

    pub fn from_file(file: UploadedFile) -> Self {
        Self {
            file: Some(file),
            content: None,
        }
    }

    /// Pick the input to process. A file always wins over `content`; an empty
    /// `content` string counts as absent.
    pub fn into_input(self) -> Result<TranscriptInput> {
        match (self.file, self.content) {
            (Some(file), _) => Ok(TranscriptInput::File(file)),
            (None, Some(content)) if !content.is_empty() => Ok(TranscriptInput::Text { content }),
            _ => Err(SummarizeError::NoInputProvided),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Extracting,
    PromptBuilt,
    Summarizing,
    Completed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::Extracting => "extracting",
            Stage::PromptBuilt => "prompt_built",
            Stage::Summarizing => "summarizing",
            Stage::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Orchestrates extraction, prompt construction and the upstream call.
#[derive(Clone)]
pub struct SummaryService {
    provider: Arc<dyn LlmProvider>,
}

impl SummaryService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Run one request and map any failure to the caller-facing contract.
    pub async fn handle(&self, request: SummarizeRequest) -> std::result::Result<SummaryResult, ErrorResult> {
        let started = Instant::now();
        let mut stage = Stage::Received;

        let outcome = self.run(request, &mut stage).await;
        match outcome {
            Ok(summary) => {
                tracing::info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    summary_bytes = summary.markdown.len(),
                    "Summary generated"
                );
                Ok(summary)
            }
            Err(e) => {
                let result = ErrorResult::from(&e);
                if result.cause.is_client_error() {
                    tracing::info!(kind = ?result.cause, %stage, "Rejected request: {}", e);
                } else {
                    tracing::error!(kind = ?result.cause, %stage, "Summary generation failed: {}", e);
                }
                Err(result)
            }
        }
    }

    async fn run(&self, request: SummarizeRequest, stage: &mut Stage) -> Result<SummaryResult> {
        let input = request.into_input()?;
        tracing::debug!(input = %input.describe(), "Received transcript");

        *stage = Stage::Extracting;
        let transcript = extract_off_thread(input).await?;

        *stage = Stage::PromptBuilt;
        let prompt = build_prompt(&transcript.text);
        tracing::debug!(prompt_bytes = prompt.len(), "Prompt built");

        *stage = Stage::Summarizing;
        let summary = self.provider.summarize(&prompt).await?;

        *stage = Stage::Completed;
        Ok(summary)
    }
}

/// Files may be PDFs, whose decoding is CPU-bound; keep it off the reactor.
async fn extract_off_thread(input: TranscriptInput) -> Result<ExtractedTranscript> {
    match input {
        TranscriptInput::Text { .. } => extract(&input),
        TranscriptInput::File(_) => tokio::task::spawn_blocking(move || extract(&input))
            .await
            .map_err(|e| SummarizeError::Internal(format!("extraction task failed: {}", e)))?,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use crate::ErrorKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records prompts and replies with a fixed outcome.
    struct StubProvider {
        reply: std::result::Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn ok(markdown: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(markdown.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn summarize(&self, prompt: &str) -> std::result::Result<SummaryResult, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(markdown) => Ok(SummaryResult {
                    markdown: markdown.clone(),
                }),
                Err(status) => Err(LlmError::Status {
                    status: *status,
                    body: "quota exhausted for project 1234".to_string(),
                }),
            }
        }
    }

    fn txt(content: &str) -> UploadedFile {
        UploadedFile {
            bytes: content.as_bytes().to_vec(),
            name: "meeting.txt".to_string(),
            mime_type: "text/plain".to_string(),
        }
    }

    #[tokio::test]
    async fn text_request_returns_summary_verbatim() {
        let provider = StubProvider::ok("## Summary\n- ship Friday\n");
        let service = SummaryService::new(provider.clone());

        let summary = service
            .handle(SummarizeRequest::from_text("Alice: let's ship by Friday."))
            .await
            .unwrap();

        assert_eq!(summary.markdown, "## Summary\n- ship Friday\n");
        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("Transcript:\nAlice: let's ship by Friday."));
    }

    #[tokio::test]
    async fn file_wins_over_content() {
        let provider = StubProvider::ok("ok");
        let service = SummaryService::new(provider.clone());

        let request = SummarizeRequest {
            file: Some(txt("From the file")),
            content: Some("From the body".to_string()),
        };
        service.handle(request).await.unwrap();

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("From the file"));
        assert!(!prompt.contains("From the body"));
    }

    #[tokio::test]
    async fn missing_input_is_rejected() {
        let provider = StubProvider::ok("unused");
        let service = SummaryService::new(provider.clone());

        for request in [SummarizeRequest::default(), SummarizeRequest::from_text("")] {
            let err = service.handle(request).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::NoInputProvided);
            assert_eq!(err.message, "No transcript text or file uploaded.");
        }
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn extraction_failures_skip_the_provider() {
        let provider = StubProvider::ok("unused");
        let service = SummaryService::new(provider.clone());

        let err = service
            .handle(SummarizeRequest::from_text(" \n\t "))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyInput);

        let err = service
            .handle(SummarizeRequest::from_file(UploadedFile {
                bytes: b"a,b".to_vec(),
                name: "sheet.csv".to_string(),
                mime_type: "text/csv".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedFileType);

        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_internal_error_without_detail() {
        let service = SummaryService::new(StubProvider::failing(503));

        let err = service
            .handle(SummarizeRequest::from_text("Bob: hello"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::InternalError);
        assert_eq!(err.cause, ErrorKind::UpstreamUnavailable);
        assert_eq!(err.message, "Failed to generate summary.");
        assert!(!err.message.contains("quota"));
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(Stage::PromptBuilt.to_string(), "prompt_built");
        assert_eq!(Stage::Received.to_string(), "received");
    }
}
