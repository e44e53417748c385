use zenith_core::sanitize_snippet;

/// Builds a sanitized snippet of at most `max_snippet_bytes` characters
/// centered on a match at `pos` of length `pattern_len` within `buffer`.
///
/// Per §4.7: `half = max_snippet_bytes / 2`, and the window is clamped to
/// `buffer`'s bounds — it never reaches past what's actually in hand, even
/// if that's narrower than the full file (see the streaming carry-window
/// caveat in §9, Open Question (a)).
pub fn build(buffer: &[u8], pos: usize, pattern_len: usize, max_snippet_bytes: usize) -> String {
    let half = max_snippet_bytes / 2;
    let start = pos.saturating_sub(half);
    let end = (pos + pattern_len + half).min(buffer.len());
    sanitize_snippet(&buffer[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_match_and_clamps_to_bounds() {
        let buf = b"0123456789";
        assert_eq!(build(buf, 5, 1, 4), "34567");
        // Clamped at the left edge.
        assert_eq!(build(buf, 0, 1, 100), "0123456789");
    }
}
