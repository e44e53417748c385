use regex_automata::meta::Regex;

use crate::pathutil::to_forward_slashes;

/// A single token parsed out of one path segment of a glob pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Token {
    /// A single literal character, matched exactly.
    Literal(char),
    /// `?` — exactly one character that isn't `/`.
    AnyChar,
    /// A single `*` — zero or more characters, none of which is `/`.
    ZeroOrMoreInSegment,
    /// Two or more adjacent `*` — zero or more characters, including `/`.
    /// Collapsing multiple stars into this form is what the spec calls
    /// out explicitly: `***` behaves exactly like `**`.
    ZeroOrMoreAnywhere,
}

fn tokenize_segment(segment: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = segment.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '?' => tokens.push(Token::AnyChar),
            '*' => {
                let mut stars = 1;
                while chars.peek() == Some(&'*') {
                    chars.next();
                    stars += 1;
                }
                if stars >= 2 {
                    tokens.push(Token::ZeroOrMoreAnywhere);
                } else {
                    tokens.push(Token::ZeroOrMoreInSegment);
                }
            }
            c => tokens.push(Token::Literal(c)),
        }
    }
    tokens
}

fn push_escaped_char(re: &mut String, c: char) {
    if c.is_ascii_alphanumeric() || c == '_' {
        re.push(c);
    } else {
        re.push('\\');
        re.push(c);
    }
}

/// Appends the regex fragment for one non-recursive segment's tokens.
fn push_segment_regex(re: &mut String, tokens: &[Token]) {
    for tok in tokens {
        match *tok {
            Token::Literal(c) => push_escaped_char(re, c),
            Token::AnyChar => re.push_str("[^/]"),
            Token::ZeroOrMoreInSegment => re.push_str("[^/]*"),
            Token::ZeroOrMoreAnywhere => re.push_str(".*"),
        }
    }
}

/// Builds the full anchored regex for a pattern.
///
/// Path segments (split on `/`) are translated independently. A segment
/// that collapses to a single recursive `**` gets one of three forms
/// depending on its position, so that e.g. `**/*.rs` matches both
/// `main.rs` and `src/main.rs` — the leading `**/` is allowed to consume
/// nothing. A `**` embedded inside a mixed segment (`a**b`) has no such
/// special case: it's just inlined as `.*`, since it isn't a whole path
/// segment on its own.
fn pattern_to_regex(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();

    if segments.len() == 1 {
        let tokens = tokenize_segment(segments[0]);
        if tokens.as_slice() == [Token::ZeroOrMoreAnywhere] {
            return "(?-u)^.*$".to_string();
        }
    }

    let mut re = String::from("(?-u)^");
    let mut prev_was_recursive = false;
    for (i, seg) in segments.iter().enumerate() {
        let tokens = tokenize_segment(seg);
        let is_recursive = tokens.as_slice() == [Token::ZeroOrMoreAnywhere];
        if is_recursive {
            if i == 0 {
                re.push_str("(?:.*/)?");
            } else if i == segments.len() - 1 {
                re.push_str("(?:/.*)?");
            } else {
                re.push_str("(?:/|/.*/)");
            }
        } else {
            if i > 0 && !prev_was_recursive {
                re.push('/');
            }
            push_segment_regex(&mut re, &tokens);
        }
        prev_was_recursive = is_recursive;
    }
    re.push('$');
    re
}

/// A compiled glob pattern.
///
/// Patterns are compiled once and can be matched against many candidate
/// paths. Compilation never fails: patterns with no special meaning behave
/// as literal strings, per the matcher's "no ill-formed input" contract.
#[derive(Clone, Debug)]
pub struct Glob {
    original: String,
    matcher: Regex,
}

impl Glob {
    /// Compiles `pattern` into a matcher.
    pub fn new(pattern: &str) -> Glob {
        let normalized = to_forward_slashes(pattern);
        let re_src = pattern_to_regex(&normalized);
        let syntax = regex_automata::util::syntax::Config::new()
            .utf8(false)
            .dot_matches_new_line(true);
        let config = Regex::config().utf8_empty(false);
        let matcher = Regex::builder()
            .syntax(syntax)
            .configure(config)
            .build(&re_src)
            .unwrap_or_else(|_| {
                // Every token we emit produces valid regex syntax, so this
                // path is unreachable in practice; fall back to a pattern
                // that matches nothing rather than panic.
                Regex::new(r"(?-u)\A\z\A").unwrap()
            });
        Glob { original: normalized, matcher }
    }

    /// The original pattern text, normalized to forward slashes.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Reports whether `text` (a normalized, forward-slash path) matches
    /// this pattern in its entirety.
    pub fn is_match(&self, text: &str) -> bool {
        let text = to_forward_slashes(text);
        self.matcher.is_match(text.as_bytes())
    }
}

/// Matches a single glob `pattern` against `text` in one call.
///
/// Equivalent to `Glob::new(pattern).is_match(text)`, provided for callers
/// that don't need to reuse a compiled pattern across many candidates.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    Glob::new(pattern).is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pattern: &str, text: &str) -> bool {
        glob_match(pattern, text)
    }

    #[test]
    fn literal() {
        assert!(m("abc", "abc"));
        assert!(!m("abc", "abcd"));
    }

    #[test]
    fn question_mark_is_single_non_slash() {
        assert!(m("a?c", "abc"));
        assert!(!m("a?c", "a/c"));
        assert!(!m("a?c", "ac"));
    }

    #[test]
    fn star_is_single_segment() {
        assert!(m("*.rs", "main.rs"));
        assert!(!m("*.rs", "src/main.rs"));
        assert!(m("src/*.rs", "src/main.rs"));
    }

    #[test]
    fn leading_double_star_allows_empty_prefix() {
        assert!(m("**/*.rs", "main.rs"));
        assert!(m("**/*.rs", "src/deep/main.rs"));
    }

    #[test]
    fn trailing_double_star_matches_subtree() {
        assert!(m("src/**", "src/deep/nested/file"));
        assert!(m("src/**", "src"));
    }

    #[test]
    fn middle_double_star_matches_zero_or_more_dirs() {
        assert!(m("src/**/main.rs", "src/main.rs"));
        assert!(m("src/**/main.rs", "src/a/b/main.rs"));
        assert!(!m("src/**/main.rs", "other/main.rs"));
    }

    #[test]
    fn bare_double_star_matches_everything() {
        assert!(m("**", "anything/at/all"));
        assert!(m("**", ""));
    }

    #[test]
    fn collapses_three_or_more_adjacent_stars() {
        assert!(m("a***b", "axxxb"));
        assert!(m("a***b", "a/x/y/b"));
    }

    #[test]
    fn backslashes_are_normalized_on_both_sides() {
        assert!(m(r"src\*.rs", "src/main.rs"));
        assert!(m("src/*.rs", r"src\main.rs"));
    }

    #[test]
    fn must_consume_entire_text() {
        assert!(!m("abc", "xabcx"));
    }
}
