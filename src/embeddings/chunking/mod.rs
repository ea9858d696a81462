#[cfg(test)]
mod tests;

use crate::{Result, TriageError};

/// Split `text` into successive character windows of `window_size`, each
/// window sharing `overlap` characters with its predecessor.
///
/// The returned iterator is lazy and finite. The final chunk may be shorter
/// than `window_size`; empty input yields no chunks. Fails fast when
/// `overlap >= window_size`, which would make the scan unable to advance.
#[inline]
pub fn chunk(text: &str, window_size: usize, overlap: usize) -> Result<Chunks<'_>> {
    if window_size == 0 {
        return Err(TriageError::Config(
            "chunk window size must be greater than zero".to_string(),
        ));
    }
    if overlap >= window_size {
        return Err(TriageError::Config(format!(
            "chunk overlap ({}) must be smaller than the window size ({})",
            overlap, window_size
        )));
    }

    Ok(Chunks {
        rest: text,
        window_size,
        step: window_size - overlap,
    })
}

/// Lazy sequence of overlapping character windows over a source text.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    window_size: usize,
    step: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    #[expect(clippy::string_slice, reason = "offsets come from char_indices")]
    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }

        // Byte offset of the n-th character, or None past the end of the text.
        let char_offset = |text: &str, n: usize| text.char_indices().nth(n).map(|(i, _)| i);

        let window = match char_offset(self.rest, self.window_size) {
            Some(end) => &self.rest[..end],
            None => self.rest,
        };

        self.rest = match char_offset(self.rest, self.step) {
            Some(next) => &self.rest[next..],
            None => "",
        };

        Some(window)
    }
}
