use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::config::{LlmSettings, Settings};
use crate::llm::gemini::GeminiClient;
use crate::ErrorKind;

/// Completion text returned to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub markdown: String,
}

/// Failures of a single summarization call.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Upstream request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Upstream request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Upstream rejected the API credential (HTTP {status})")]
    Auth { status: u16, body: String },

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            LlmError::Network(_)
            | LlmError::Timeout(_)
            | LlmError::Auth { .. }
            | LlmError::Status { .. } => ErrorKind::UpstreamUnavailable,
        }
    }

    /// Worth another attempt: transport trouble, rate limiting or a 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            LlmError::Auth { .. } | LlmError::MalformedResponse(_) => false,
        }
    }
}

/// Bounded retry with linear backoff for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Single attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn from_settings(llm: &LlmSettings) -> Self {
        Self {
            max_retries: llm.max_retries,
            backoff: llm.retry_backoff(),
        }
    }

    /// Delay before the attempt that follows failed attempt `attempt` (1-based).
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.checked_mul(attempt).unwrap_or(Duration::MAX)
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> std::result::Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = std::result::Result<T, LlmError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt <= self.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        ?delay,
                        "Transient upstream failure, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// The completion capability: prompt in, Markdown summary out.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn summarize(&self, prompt: &str) -> std::result::Result<SummaryResult, LlmError>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "gemini" => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: gemini",
            other
        ),
    }
}
