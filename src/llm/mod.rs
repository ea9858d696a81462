// LLM module
// Provider-agnostic chat completion used to synthesize triage answers

pub mod ollama;
pub mod openai;

pub use ollama::OllamaChat;
pub use openai::OpenAiChat;

use serde::Serialize;

use crate::config::Config;
use crate::{Result, TriageError};

/// One message in a chat conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[inline]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    #[inline]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion capability. The transport is opaque to the triage core:
/// one call in, one text reply out. Failures surface as
/// [`TriageError::Chat`]; the core never retries them.
pub trait ChatProvider: Send + Sync {
    fn chat(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Build the configured chat provider.
///
/// The OpenAI provider requires `OPENAI_API_KEY` in the environment; the
/// Ollama provider reuses the embedding endpoint host.
#[inline]
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ChatProvider>> {
    match config.llm.provider.as_str() {
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
                TriageError::Config(
                    "OPENAI_API_KEY must be set for the openai provider".to_string(),
                )
            })?;
            Ok(Box::new(OpenAiChat::new(api_key, &config.llm)))
        }
        "ollama" => {
            let base_url = config
                .ollama
                .base_url()
                .map_err(|e| TriageError::Config(e.to_string()))?;
            Ok(Box::new(OllamaChat::new(base_url, &config.llm)))
        }
        other => Err(TriageError::Config(format!(
            "Unsupported LLM provider: {}",
            other
        ))),
    }
}
