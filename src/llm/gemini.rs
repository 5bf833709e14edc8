use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Settings;
use crate::llm::client::{LlmError, LlmProvider, RetryPolicy, SummaryResult};

const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const API_KEY_HEADER: &str = "x-goog-api-key";
const MAX_LOGGED_BODY: usize = 512;

pub struct GeminiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    timeout: Duration,
    retry: RetryPolicy,
    allow_empty_summary: bool,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "Gemini API key is missing. Set llm.api_key in config or MEETING_DIGEST_GEMINI_API_KEY."
            );
        }

        let model = if settings.llm.model.trim().is_empty() {
            DEFAULT_GEMINI_MODEL.to_string()
        } else {
            settings.llm.model.trim().to_string()
        };

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_GEMINI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        let timeout = settings.llm.timeout();

        Ok(Self {
            http: Client::builder()
                .timeout(timeout)
                .build()
                .context("Failed to build Gemini HTTP client")?,
            api_key,
            model,
            endpoint,
            timeout,
            retry: RetryPolicy::from_settings(&settings.llm),
            allow_empty_summary: settings.llm.allow_empty_summary,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Network(e.without_url())
        }
    }

    async fn attempt(&self, body: &GeminiGenerateContentRequest<'_>, attempt: u32) -> Result<String, LlmError> {
        tracing::debug!(model = %self.model, attempt, "Sending Gemini generateContent request");

        let response = self
            .http
            .post(self.request_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let body = truncate(&text, MAX_LOGGED_BODY);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth {
                    status: status.as_u16(),
                    body,
                },
                _ => LlmError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        Ok(text)
    }

    fn extract_summary(&self, raw: &str) -> Result<SummaryResult, LlmError> {
        let payload: GeminiGenerateContentResponse = serde_json::from_str(raw)
            .map_err(|e| LlmError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        match first_text(payload) {
            Some(markdown) => Ok(SummaryResult { markdown }),
            None if self.allow_empty_summary => {
                tracing::warn!("Gemini response had no candidate text, returning empty summary");
                Ok(SummaryResult {
                    markdown: String::new(),
                })
            }
            None => Err(LlmError::MalformedResponse(
                "response has no candidates[0].content.parts[0].text".to_string(),
            )),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn summarize(&self, prompt: &str) -> Result<SummaryResult, LlmError> {
        let body = GeminiGenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let raw = self
            .retry
            .run(|attempt| self.attempt(&body, attempt))
            .await?;

        self.extract_summary(&raw)
    }
}

/// First candidate's first part, untouched.
fn first_text(payload: GeminiGenerateContentResponse) -> Option<String> {
    payload
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[derive(Debug, Serialize)]
struct GeminiGenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}
