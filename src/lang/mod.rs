// Language detection module
// Best-effort tagging of reporter language; never fails

#[cfg(test)]
mod tests;

use whatlang::Lang;

/// Detect the language of a complaint, returning a short locale code.
///
/// Best-effort only: the result tags triage output and never influences
/// retrieval. Unrecognizable or empty text defaults to `"en"`. Malay is
/// reported by the detector as its closest relative Indonesian, so both map
/// to `"ms"` for this deployment.
#[inline]
pub fn detect_language(text: &str) -> String {
    match whatlang::detect_lang(text.trim()) {
        Some(Lang::Ind) => "ms".to_string(),
        Some(Lang::Eng) | None => "en".to_string(),
        Some(other) => other.code().to_string(),
    }
}
