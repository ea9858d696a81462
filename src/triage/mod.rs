// Triage orchestrator module
// Retrieval, prompt assembly, the chat call, and answer extraction as one unit


use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::extract::extract;
use crate::llm::{ChatMessage, ChatProvider};
use crate::prompt::build_prompt;
use crate::retriever::Retriever;
use crate::{Result, TriageError};

/// System message sent with every triage request.
pub const SYSTEM_INSTRUCTION: &str = "You output strictly JSON. No markdown, no prose.";

/// Default number of knowledge snippets retrieved per request.
pub const DEFAULT_TOP_K: usize = 4;

/// The structured triage shape callers validate the extracted object
/// against. Validation failure is not an error; the raw object is still
/// presentable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriageResult {
    pub summary: String,
    pub scam_type: String,
    pub actions: Vec<String>,
    pub sms_en: String,
    pub sms_ms: String,
    pub confidence: f64,
}

impl TriageResult {
    /// Validate an extracted object against the triage schema: required
    /// fields, types, and the confidence bounds.
    #[inline]
    pub fn from_value(value: &Value) -> Option<Self> {
        let result: Self = serde_json::from_value(value.clone()).ok()?;
        if !(0.0..=1.0).contains(&result.confidence) {
            return None;
        }
        Some(result)
    }
}

/// One triage reply: the recovered object plus the language tag supplied by
/// the caller's detector.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReply {
    pub triage: Value,
    pub language: String,
}

/// Composes retrieval, prompt building, the external chat call, and answer
/// extraction. Holds no locks across the chat boundary; one attempt per
/// request, retry policy belongs to the caller.
pub struct TriageEngine {
    retriever: Retriever,
}

impl TriageEngine {
    #[inline]
    pub fn new(retriever: Retriever) -> Self {
        Self { retriever }
    }

    /// Produce a triage answer for a complaint or call transcript.
    ///
    /// Retrieval is an enhancement, not a hard dependency: when the
    /// embedding provider or vector store is down the prompt is built with
    /// no knowledge snippets and the request still completes. A chat
    /// transport failure, by contrast, fails the request.
    #[inline]
    pub async fn answer(
        &self,
        user_text: &str,
        lang_hint: &str,
        chat: &dyn ChatProvider,
        k: usize,
    ) -> Result<TriageReply> {
        let snippets = match self.retriever.search(user_text, k).await {
            Ok(snippets) => snippets.into_iter().map(|s| s.text).collect(),
            Err(TriageError::BackendUnavailable(reason)) => {
                warn!(
                    "Retrieval unavailable ({}), answering without knowledge context",
                    reason
                );
                Vec::new()
            }
            Err(other) => return Err(other),
        };

        debug!("Building prompt with {} snippets", snippets.len());
        let prompt = build_prompt(user_text, &snippets, lang_hint);

        let messages = [
            ChatMessage::system(SYSTEM_INSTRUCTION),
            ChatMessage::user(prompt),
        ];
        let raw = chat.chat(&messages)?;

        Ok(TriageReply {
            triage: extract(&raw),
            language: lang_hint.to_string(),
        })
    }
}
