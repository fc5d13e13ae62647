//! Google Gemini `generateContent` client.

use async_trait::async_trait;
use serde_json::Value;

use super::{LanguageModel, LlmError};

/// Flash-tier default, matching what the prompt was tuned against.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug)]
pub struct GeminiModel {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiModel {
    /// Build a client for the given model variant.
    ///
    /// Fails immediately when the key is empty so a missing credential
    /// surfaces at setup, before any network call is attempted.
    pub fn new(api_key: &str, model: &str) -> Result<Self, LlmError> {
        if api_key.is_empty() {
            return Err(LlmError::Config(
                "GEMINI_API_KEY is not set; add it to config.toml or the environment".into(),
            ));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        })
    }

    fn parse_response(json: &Value) -> Result<String, LlmError> {
        json.pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                LlmError::Parse("missing candidates[0].content.parts[0].text".to_string())
            })
    }
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, self.model, self.api_key
        );

        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Unavailable(format!("gemini: {}", e)))?
            .error_for_status()?;

        let json: Value = resp.json().await?;
        Self::parse_response(&json)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
