//! In-memory substring highlighting over displayed text.
//!
//! Used by the find bar: every change to the needle or the displayed text
//! triggers a full rescan; spans from the previous scan are discarded, never
//! merged or diffed. Matching is case-insensitive and non-overlapping: after
//! a match, scanning resumes immediately past its end.

/// A byte range over the displayed text marking one occurrence of the needle.
///
/// Offsets index into the original (unmodified) text, so spans remain valid
/// for slicing even when case folding changes character lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Byte offset of the first matched character.
    pub start: usize,

    /// Byte offset one past the last matched character.
    pub end: usize,
}

/// Compute every case-insensitive occurrence of `needle` in `text`.
///
/// The needle is trimmed first; an empty or whitespace-only needle yields no
/// spans, which clears all highlighting. Matches never overlap: occurrences
/// of the needle inside itself are not double-counted.
pub fn find_matches(text: &str, needle: &str) -> Vec<HighlightSpan> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Vec::new();
    }
    let needle_lower = needle.to_lowercase();

    let mut spans = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        match match_len_at(&text[pos..], &needle_lower) {
            Some(len) => {
                spans.push(HighlightSpan {
                    start: pos,
                    end: pos + len,
                });
                pos += len;
            }
            None => {
                // Advance one character, not one byte.
                pos += text[pos..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
            }
        }
    }
    spans
}

/// If `haystack` starts with a case-insensitive occurrence of the
/// already-lowercased needle, return the byte length of the matched prefix.
///
/// Comparison folds one haystack character at a time because lowercasing a
/// single character can produce several (e.g. 'İ'), so offsets into the
/// original text cannot be derived from a lowercased copy.
fn match_len_at(haystack: &str, needle_lower: &str) -> Option<usize> {
    let mut remaining = needle_lower.chars().peekable();
    let mut consumed = 0;

    for ch in haystack.chars() {
        for folded in ch.to_lowercase() {
            match remaining.next() {
                Some(expected) if expected == folded => {}
                // Mismatch, or the needle ends mid-character.
                _ => return None,
            }
        }
        consumed += ch.len_utf8();
        if remaining.peek().is_none() {
            return Some(consumed);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str, needle: &str) -> Vec<(usize, usize)> {
        find_matches(text, needle)
            .into_iter()
            .map(|span| (span.start, span.end))
            .collect()
    }

    #[test]
    fn test_three_occurrences() {
        // "at" inside "cat", "sat", "mat".
        assert_eq!(
            spans("the cat sat on the mat", "at"),
            vec![(5, 7), (9, 11), (20, 22)]
        );
    }

    #[test]
    fn test_empty_needle_clears_highlighting() {
        assert!(find_matches("the cat sat on the mat", "").is_empty());
        assert!(find_matches("the cat sat on the mat", "   ").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let text = "Norway is in NORTHERN Europe. norway borders Sweden.";
        let matched = spans(text, "norway");
        assert_eq!(matched.len(), 2);
        for (start, end) in matched {
            assert!(text[start..end].eq_ignore_ascii_case("norway"));
        }
    }

    #[test]
    fn test_non_overlapping_matches() {
        // "aa" in "aaaa" matches twice, not three times.
        assert_eq!(spans("aaaa", "aa"), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_no_matches() {
        assert!(find_matches("the cat sat", "dog").is_empty());
        assert!(find_matches("", "dog").is_empty());
    }

    #[test]
    fn test_spans_slice_original_text() {
        let text = "Δelta and δelta";
        let matched = find_matches(text, "δelta");
        assert_eq!(matched.len(), 2);
        for span in matched {
            assert_eq!(text[span.start..span.end].to_lowercase(), "δelta");
        }
    }

    #[test]
    fn test_needle_longer_than_text() {
        assert!(find_matches("cat", "catalogue").is_empty());
    }

    #[test]
    fn test_match_at_text_boundaries() {
        assert_eq!(spans("atlas format", "at"), vec![(0, 2), (10, 12)]);
    }
}
