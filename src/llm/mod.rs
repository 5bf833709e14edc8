//! LLM module for meeting-digest
//!
//! Builds the summary prompt and sends it to the completion capability (Gemini).

mod client;
mod gemini;
mod prompts;

pub use client::{build_provider, LlmError, LlmProvider, RetryPolicy, SummaryResult};
pub use gemini::GeminiClient;
pub use prompts::{build_prompt, PROMPT_VERSION, TRANSCRIPT_MARKER};
