#[cfg(test)]
mod tests;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, ChatProvider};
use crate::config::LlmConfig;
use crate::{Result, TriageError};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI chat completions provider.
pub struct OpenAiChat {
    api_key: String,
    model: String,
    temperature: f32,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

impl OpenAiChat {
    #[inline]
    pub fn new(api_key: String, config: &LlmConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            agent,
        }
    }
}

impl ChatProvider for OpenAiChat {
    #[inline]
    fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!(
            "Calling OpenAI chat completions with {} messages",
            messages.len()
        );

        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| TriageError::Chat(format!("Failed to serialize chat request: {}", e)))?;

        let response_text = self
            .agent
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", &format!("Bearer {}", self.api_key.trim()))
            .header("Content-Type", "application/json")
            .send(&request_json)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| TriageError::Chat(format!("OpenAI request failed: {}", e)))?;

        let response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| TriageError::Chat(format!("Failed to parse OpenAI response: {}", e)))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| TriageError::Chat("OpenAI response contained no choices".to_string()))?;

        Ok(content.trim().to_string())
    }
}
