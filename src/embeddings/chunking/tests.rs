use super::*;

#[test]
fn empty_input_yields_no_chunks() {
    let chunks: Vec<&str> = chunk("", 100, 20).expect("valid params").collect();
    assert!(chunks.is_empty());
}

#[test]
fn short_input_is_a_single_chunk() {
    let chunks: Vec<&str> = chunk("hello", 100, 20).expect("valid params").collect();
    assert_eq!(chunks, vec!["hello"]);
}

#[test]
fn windows_advance_by_window_minus_overlap() {
    let text = "abcdefghij";
    let chunks: Vec<&str> = chunk(text, 4, 2).expect("valid params").collect();

    assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij", "ij"]);

    // Every chunk fits the window, and consecutive chunks share the overlap.
    for window in &chunks {
        assert!(window.chars().count() <= 4);
    }
    for pair in chunks.windows(2) {
        let prev_tail: String = pair[0].chars().skip(2).collect();
        let next_head: String = pair[1].chars().take(prev_tail.chars().count()).collect();
        assert_eq!(prev_tail, next_head);
    }
}

#[test]
fn concatenation_with_overlap_removed_reconstructs_input() {
    let text = "The quick brown fox jumps over the lazy dog, twice on Sundays.";
    let window_size = 10;
    let overlap = 3;
    let chunks: Vec<&str> = chunk(text, window_size, overlap)
        .expect("valid params")
        .collect();

    // Rebuild by taking the non-overlapping prefix of each chunk; the final
    // chunk is appended whole since nothing follows it.
    let step = window_size - overlap;
    let mut rebuilt = String::new();
    for (i, window) in chunks.iter().enumerate() {
        if i + 1 == chunks.len() {
            rebuilt.push_str(window);
        } else {
            rebuilt.extend(window.chars().take(step));
        }
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn zero_overlap_produces_disjoint_windows() {
    let chunks: Vec<&str> = chunk("abcdefgh", 3, 0).expect("valid params").collect();
    assert_eq!(chunks, vec!["abc", "def", "gh"]);
}

#[test]
fn overlap_equal_to_window_is_a_configuration_error() {
    let result = chunk("some text", 10, 10);
    assert!(matches!(result, Err(TriageError::Config(_))));
}

#[test]
fn overlap_larger_than_window_is_a_configuration_error() {
    let result = chunk("some text", 10, 25);
    assert!(matches!(result, Err(TriageError::Config(_))));
}

#[test]
fn zero_window_is_a_configuration_error() {
    let result = chunk("some text", 0, 0);
    assert!(matches!(result, Err(TriageError::Config(_))));
}

#[test]
fn multibyte_text_splits_on_character_boundaries() {
    let text = "laporan penipuan: 你好世界 élève übung";
    let chunks: Vec<&str> = chunk(text, 7, 2).expect("valid params").collect();

    for window in &chunks {
        assert!(window.chars().count() <= 7);
    }

    // Slicing mid-codepoint would have panicked above; check coverage too.
    let mut rebuilt = String::new();
    for (i, window) in chunks.iter().enumerate() {
        if i + 1 == chunks.len() {
            rebuilt.push_str(window);
        } else {
            rebuilt.extend(window.chars().take(5));
        }
    }
    assert_eq!(rebuilt, text);
}

#[test]
fn iterator_is_lazy_and_finite() {
    let text = "x".repeat(100_000);
    let mut iter = chunk(&text, 1500, 250).expect("valid params");

    let first = iter.next().expect("should yield a first chunk");
    assert_eq!(first.chars().count(), 1500);

    let total = 1 + iter.count();
    // ceil((100_000 - 1500) / 1250) + 1 windows, each advancing 1250 chars
    assert_eq!(total, 80);
}
