//! UTF-8 safe input truncation.

/// Cut `text` to at most `max_bytes` bytes without splitting a code point.
///
/// Returns the (possibly shortened) slice and whether anything was removed.
pub fn truncate_utf8(text: &str, max_bytes: usize) -> (&str, bool) {
    if text.len() <= max_bytes {
        return (text, false);
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}
