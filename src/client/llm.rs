//! LLM client abstraction for generative analysis.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Anthropic, OpenAi};
use crate::config::{LlmConfig, LlmProvider};
use crate::error::Result;

/// LLM completion client trait.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Send a completion request and return the response text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Build the configured provider, reading its API key from the environment.
pub fn build_llm(config: &LlmConfig) -> Result<Arc<dyn Llm>> {
    Ok(match config.provider {
        LlmProvider::Openai => Arc::new(OpenAi::from_env(config)?),
        LlmProvider::Anthropic => Arc::new(Anthropic::from_env(config)?),
    })
}

/// Mock LLM for testing.
#[cfg(test)]
pub mod tests {
    use super::*;

    pub struct MockLlm {
        response: String,
    }

    impl MockLlm {
        pub fn new(response: impl Into<String>) -> Self {
            Self {
                response: response.into(),
            }
        }
    }

    #[async_trait]
    impl Llm for MockLlm {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            Ok(self.response.clone())
        }
    }
}
