/// Renders a raw byte slice as a printable snippet, per §4.2.
///
/// `\n`, `\r`, and `\t` become their two-character escapes; printable ASCII
/// (0x20-0x7E) passes through unchanged; every other byte becomes the
/// literal two characters `..`.
pub fn sanitize_snippet(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(".."),
        }
    }
    out
}

/// Escapes a string for embedding in a JSON string literal, per §4.2.
///
/// This is deliberately not a general-purpose JSON escaper: it handles `\`,
/// `"`, `\n`, `\r`, `\t`, and control bytes below 0x20 (replaced with `..`),
/// and passes every other byte through unchanged. The result is valid JSON
/// only for ASCII-safe inputs, which is the only kind this crate ever
/// renders into match output.
pub fn json_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x00..=0x1f => out.push_str(".."),
            _ => out.push(b as char),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_escapes_control_chars() {
        assert_eq!(sanitize_snippet(b"a\nb\tc\rd"), "a\\nb\\tc\\rd");
    }

    #[test]
    fn sanitize_replaces_non_printable() {
        assert_eq!(sanitize_snippet(&[0x01, b'a', 0x7f]), "..a..");
    }

    #[test]
    fn sanitize_passes_printable_ascii() {
        assert_eq!(sanitize_snippet(b"hello world!"), "hello world!");
    }

    #[test]
    fn json_escape_handles_quotes_and_backslashes() {
        assert_eq!(json_escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn json_escape_replaces_control_bytes() {
        assert_eq!(json_escape("a\u{0}b"), "a..b");
    }
}
