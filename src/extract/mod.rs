// Answer extractor module
// Recovers a JSON object from free-form model output


use serde_json::Value;
use tracing::debug;

/// Confidence reported when nothing parseable could be recovered.
pub const FALLBACK_CONFIDENCE: f64 = 0.2;

const FALLBACK_SUMMARY_CHARS: usize = 400;

/// Recover a JSON object from a raw model reply.
///
/// The prompt demands bare JSON, but replies routinely arrive wrapped in
/// code fences, preceded by prose, or followed by commentary. Attempts are
/// made in order, stopping at the first success:
///
/// 1. strip code fences at the very start/end of the reply
/// 2. parse the shortest brace-balanced object starting at the first `{`
/// 3. parse the whole stripped text
///
/// When every attempt fails the fallback object is returned instead, so this
/// function never fails. Only syntactic recovery happens here; validating
/// fields against the triage schema is the caller's job.
#[inline]
pub fn extract(raw: &str) -> Value {
    let stripped = strip_code_fence(raw.trim());

    if let Some(candidate) = balanced_object(stripped) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(candidate) {
            return value;
        }
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(stripped) {
        return value;
    }

    debug!("Model reply contained no parseable JSON object, using fallback");
    fallback_answer(raw)
}

/// The degraded-but-valid object returned when the reply defies parsing.
/// Low confidence and an "unknown" scam type signal the degradation to
/// downstream consumers.
#[inline]
pub fn fallback_answer(raw: &str) -> Value {
    let summary: String = raw.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    serde_json::json!({
        "summary": summary,
        "scam_type": "unknown",
        "actions": [],
        "sms_en": "",
        "sms_ms": "",
        "confidence": FALLBACK_CONFIDENCE,
    })
}

/// Drop a fenced-block marker when it opens and/or closes the text, keeping
/// the body untouched. Handles an optional language tag after the opening
/// fence.
#[expect(clippy::string_slice, reason = "split points fall after an ASCII newline")]
fn strip_code_fence(text: &str) -> &str {
    let mut body = text;

    if let Some(after) = body.strip_prefix("```") {
        // The opening fence line may carry a language tag ("```json")
        body = after.find('\n').map_or("", |i| &after[i + 1..]);
    }

    let trimmed = body.trim_end();
    if let Some(before) = trimmed.strip_suffix("```") {
        body = before;
    }

    body.trim()
}

/// Locate the shortest brace-balanced object starting at the first `{`.
/// Depth counting is purely lexical; a candidate with braces inside string
/// literals will simply fail to parse and the later attempts take over.
#[expect(clippy::string_slice, reason = "offsets come from char_indices")]
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;

    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}
