/*!
A family of literal byte-string search algorithms.

Every algorithm in this crate implements [`LiteralMatcher`] and returns the
same thing for the same input: every occurrence of `needle` in `haystack`,
including overlapping ones, in ascending offset order. They differ only in
how fast they get there. [`select`] picks the best fit for a given pattern
length and haystack size; callers that already know which algorithm they
want can construct one directly.
*/

mod boyer_moore;
mod horspool;
mod naive;

pub use crate::boyer_moore::BoyerMoore;
pub use crate::horspool::Horspool;
pub use crate::naive::Naive;

/// A literal byte-string search algorithm.
///
/// Implementations must agree with each other on every input: this is the
/// contract the whole family is built around, and it's what lets the engine
/// swap algorithms per file without changing observable behavior.
pub trait LiteralMatcher {
    /// Returns the starting offset of every occurrence of `needle` in
    /// `haystack`, including overlapping occurrences, in ascending order.
    ///
    /// Returns an empty vector when `needle` is empty or longer than
    /// `haystack`.
    fn find_all(&self, haystack: &[u8], needle: &[u8]) -> Vec<usize>;
}

/// Explicit algorithm selection, as requested by a `SearchRequest`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlgorithmMode {
    /// Choose per file based on pattern length and file size.
    Auto,
    Naive,
    Horspool,
    BoyerMoore,
}

/// A concrete, runtime-selected matcher.
#[derive(Clone, Copy, Debug)]
pub enum Algorithm {
    Naive(Naive),
    Horspool(Horspool),
    BoyerMoore(BoyerMoore),
}

impl LiteralMatcher for Algorithm {
    fn find_all(&self, haystack: &[u8], needle: &[u8]) -> Vec<usize> {
        match *self {
            Algorithm::Naive(m) => m.find_all(haystack, needle),
            Algorithm::Horspool(m) => m.find_all(haystack, needle),
            Algorithm::BoyerMoore(m) => m.find_all(haystack, needle),
        }
    }
}

/// Mirrors §4.3's selection table.
const AUTO_NAIVE_MAX_PATTERN_LEN: usize = 4;
const AUTO_BOYER_MOORE_MIN_PATTERN_LEN: usize = 8;
const AUTO_HORSPOOL_MIN_FILE_SIZE: u64 = 64 * 1024;

/// Selects the matcher for a file, given the request's [`AlgorithmMode`],
/// the pattern length, and the file's size in bytes.
///
/// When `mode` names a concrete algorithm, that algorithm is used
/// unconditionally, regardless of pattern length or file size.
pub fn select(mode: AlgorithmMode, pattern_len: usize, file_size: u64) -> Algorithm {
    match mode {
        AlgorithmMode::Naive => Algorithm::Naive(Naive),
        AlgorithmMode::Horspool => Algorithm::Horspool(Horspool),
        AlgorithmMode::BoyerMoore => Algorithm::BoyerMoore(BoyerMoore),
        AlgorithmMode::Auto => {
            if pattern_len < AUTO_NAIVE_MAX_PATTERN_LEN {
                Algorithm::Naive(Naive)
            } else if pattern_len >= AUTO_BOYER_MOORE_MIN_PATTERN_LEN {
                Algorithm::BoyerMoore(BoyerMoore)
            } else if file_size >= AUTO_HORSPOOL_MIN_FILE_SIZE {
                Algorithm::Horspool(Horspool)
            } else {
                Algorithm::Naive(Naive)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_matchers() -> Vec<Algorithm> {
        vec![
            Algorithm::Naive(Naive),
            Algorithm::Horspool(Horspool),
            Algorithm::BoyerMoore(BoyerMoore),
        ]
    }

    #[test]
    fn algorithms_agree_on_overlapping_matches() {
        let cases: &[(&[u8], &[u8])] = &[
            (b"aaaaaa", b"aaa"),
            (b"xxabcxxabc", b"abc"),
            (b"hello pat world pat", b"pat"),
            (b"", b"a"),
            (b"abc", b""),
            (b"ab", b"abc"),
            (b"abababab", b"aba"),
            (b"mississippi", b"issi"),
        ];
        for &(haystack, needle) in cases {
            let results: Vec<Vec<usize>> = all_matchers()
                .iter()
                .map(|m| m.find_all(haystack, needle))
                .collect();
            for pair in results.windows(2) {
                assert_eq!(
                    pair[0], pair[1],
                    "mismatch for haystack={haystack:?} needle={needle:?}"
                );
            }
        }
    }

    #[test]
    fn select_matches_table() {
        use AlgorithmMode::Auto;
        assert!(matches!(select(Auto, 1, 10), Algorithm::Naive(_)));
        assert!(matches!(select(Auto, 3, u64::MAX), Algorithm::Naive(_)));
        assert!(matches!(select(Auto, 8, 0), Algorithm::BoyerMoore(_)));
        assert!(matches!(select(Auto, 100, 0), Algorithm::BoyerMoore(_)));
        assert!(matches!(
            select(Auto, 5, 64 * 1024),
            Algorithm::Horspool(_)
        ));
        assert!(matches!(select(Auto, 5, 100), Algorithm::Naive(_)));
        assert!(matches!(
            select(AlgorithmMode::BoyerMoore, 1, 0),
            Algorithm::BoyerMoore(_)
        ));
    }
}
