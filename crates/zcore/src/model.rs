/// A file the enumerator found and that passed the filter chain.
///
/// Produced and owned by the enumerator; moved into the engine's file list
/// for the duration of a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileItem {
    /// The path as it should be displayed to the user.
    pub path: String,
    /// A forward-slash, lexically-normalized form of `path`, used for
    /// sorting, glob matching, and ignore-file scoping.
    pub normalized_path: String,
    /// File size in bytes, as observed during enumeration.
    pub size: u64,
}

/// One accepted occurrence of the pattern in a file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchRecord {
    pub path: String,
    /// Absolute byte offset within the file.
    pub offset: u64,
    /// Sanitized snippet text; empty when `no_snippet` was set.
    pub snippet: String,
    pub binary: bool,
}

/// A per-file summary for `Count` and `FilesWithMatches` output modes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileMatchSummary {
    pub path: String,
    pub count: u64,
    pub binary: bool,
}

/// The engine's internal bookkeeping for a single file's scan.
///
/// `completed` is false iff the scan was interrupted by a cancellation
/// request; a `FileResult` with `completed = false` is suppressed from the
/// stable drain.
#[derive(Clone, Debug, Default)]
pub struct FileResult {
    pub path: String,
    pub matches: Vec<MatchRecord>,
    pub count: u64,
    pub any_match: bool,
    pub binary: bool,
    pub completed: bool,
}

impl FileResult {
    pub fn new(path: String) -> FileResult {
        FileResult { path, completed: true, ..FileResult::default() }
    }
}

/// Summary statistics for a completed (or cancelled) run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    pub any_match: bool,
    pub cancelled: bool,
}
