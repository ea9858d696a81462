
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::{ChatMessage, ChatProvider};
use crate::config::LlmConfig;
use crate::{Result, TriageError};

/// Ollama chat provider. Prefers the `/api/chat` endpoint and falls back to
/// `/api/generate` with a flattened prompt for models that only support
/// plain completion.
pub struct OllamaChat {
    base_url: Url,
    model: String,
    temperature: f32,
    agent: ureq::Agent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaChat {
    #[inline]
    pub fn new(base_url: Url, config: &LlmConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();

        Self {
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            agent,
        }
    }

    fn post_json(&self, path: &str, body: &str) -> Result<String> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| TriageError::Config(format!("Failed to build chat URL: {}", e)))?;

        self.agent
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .send(body)
            .and_then(|mut resp| resp.body_mut().read_to_string())
            .map_err(|e| TriageError::Chat(format!("Ollama request failed: {}", e)))
    }

    fn chat_endpoint(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| TriageError::Chat(format!("Failed to serialize chat request: {}", e)))?;

        let response_text = self.post_json("/api/chat", &request_json)?;
        let response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| TriageError::Chat(format!("Failed to parse chat response: {}", e)))?;

        Ok(response.message.content)
    }

    fn generate_endpoint(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: flatten_messages(messages),
            stream: false,
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            TriageError::Chat(format!("Failed to serialize generate request: {}", e))
        })?;

        let response_text = self.post_json("/api/generate", &request_json)?;
        let response: GenerateResponse = serde_json::from_str(&response_text)
            .map_err(|e| TriageError::Chat(format!("Failed to parse generate response: {}", e)))?;

        Ok(response.response)
    }
}

impl ChatProvider for OllamaChat {
    #[inline]
    fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        debug!("Calling Ollama chat with {} messages", messages.len());

        match self.chat_endpoint(messages) {
            Ok(content) => Ok(content.trim().to_string()),
            Err(chat_error) => {
                warn!(
                    "Ollama chat endpoint failed ({}), falling back to generate",
                    chat_error
                );
                let content = self.generate_endpoint(messages)?;
                Ok(content.trim().to_string())
            }
        }
    }
}

/// Render a conversation as a plain prompt for completion-only models.
fn flatten_messages(messages: &[ChatMessage]) -> String {
    let lines: Vec<String> = messages
        .iter()
        .map(|m| format!("{}: {}", m.role.to_uppercase(), m.content))
        .collect();
    lines.join("\n")
}
