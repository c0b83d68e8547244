//! Anthropic Claude LLM client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::llm::Llm;
use crate::config::LlmConfig;
use crate::error::{Error, Result};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude client.
pub struct Anthropic {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f64,
}

impl Anthropic {
    /// Create a new Anthropic client with an explicit API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
            Error::Config(crate::error::ConfigError::MissingField {
                field: "ANTHROPIC_API_KEY",
            })
        })?;
        Ok(Self::new(api_key, config))
    }
}

#[derive(Serialize)]
struct Request {
    model: String,
    max_tokens: usize,
    temperature: f64,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[async_trait]
impl Llm for Anthropic {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = Request {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        let response = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<Response>()
            .await?;

        Ok(response
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_joins_content_blocks() {
        let json = r#"{"content":[{"type":"text","text":"{\"prediction\":"},{"type":"text","text":"\"NEUTRAL\"}"}]}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        let text: String = response.content.into_iter().map(|c| c.text).collect();
        assert_eq!(text, r#"{"prediction":"NEUTRAL"}"#);
    }

    #[test]
    fn from_env_missing_key_is_a_config_error() {
        std::env::remove_var("ANTHROPIC_API_KEY");

        let result = Anthropic::from_env(&LlmConfig::default());
        assert!(result.is_err());
    }
}
