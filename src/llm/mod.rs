//! LLM client layer: the `LanguageModel` trait and its Gemini implementation.

mod gemini;

pub use gemini::{GeminiModel, DEFAULT_GEMINI_MODEL};

use async_trait::async_trait;

/// Errors from calls to the hosted language model.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("model service unavailable: {0}")]
    Unavailable(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("unusable model response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        LlmError::Http(e.to_string())
    }
}

/// A hosted text-generation service, one-shot request/response.
///
/// Implementations do not retry and do not cache. A failed or empty
/// response propagates to the caller as-is.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier used in diagnostics (e.g. "gemini-1.5-flash").
    fn name(&self) -> &str;
}
