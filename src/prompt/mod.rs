// Prompt builder module
// Deterministic assembly of the triage instruction prompt


use serde_json::json;

/// Maximum characters kept from each knowledge snippet.
pub const MAX_SNIPPET_CHARS: usize = 700;

/// JSON Schema the model is instructed to satisfy, embedded verbatim in the
/// prompt. The answer extractor unwinds the cases where the model ignores it.
#[inline]
pub fn triage_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {"type": "string"},
            "scam_type": {"type": "string"},
            "actions": {"type": "array", "items": {"type": "string"}},
            "sms_en": {"type": "string"},
            "sms_ms": {"type": "string"},
            "confidence": {"type": "number", "minimum": 0, "maximum": 1}
        },
        "required": ["summary", "scam_type", "actions", "sms_en", "sms_ms", "confidence"]
    })
}

/// Build the triage prompt: role instruction, schema contract, retrieved
/// knowledge, then the untouched complaint text.
///
/// Pure function with no I/O. Each snippet is whitespace-normalized and
/// truncated independently, so one oversized snippet never squeezes out the
/// others.
#[inline]
pub fn build_prompt(user_text: &str, kb_snippets: &[String], lang_hint: &str) -> String {
    let kb_join = kb_snippets
        .iter()
        .map(|s| format!("- {}", normalize_snippet(s, MAX_SNIPPET_CHARS)))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a telecom fraud triage assistant for Malaysia. Use the knowledge snippets strictly.\n\
         Return ONLY JSON matching this JSON Schema (no commentary, no markdown):\n\
         {schema}\n\n\
         Fill fields with: (1) short summary, (2) likely scam type, (3) recommended actions with policy refs,\n\
         (4) bilingual SMS template fields: sms_en and sms_ms, (5) confidence 0-1.\n\
         The reporter's language appears to be \"{lang}\"; keep the summary in that language.\n\n\
         Knowledge:\n\
         {kb}\n\n\
         Customer complaint/transcript:\n\
         {user}\n",
        schema = triage_schema(),
        lang = lang_hint,
        kb = kb_join,
        user = user_text
    )
}

/// Collapse runs of whitespace to single spaces and cap length at
/// `max_chars` characters.
fn normalize_snippet(snippet: &str, max_chars: usize) -> String {
    let collapsed = snippet.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}
