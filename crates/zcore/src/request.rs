use std::collections::HashSet;
use std::path::PathBuf;

pub use zenith_matcher::AlgorithmMode;

/// Default mmap threshold: files at or above this size use a memory
/// mapping when `mmap_mode` is `Auto`.
pub const DEFAULT_MMAP_THRESHOLD_BYTES: u64 = 64 * 1024;

/// Default streaming chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Default total snippet budget, in bytes, split around the match.
pub const DEFAULT_MAX_SNIPPET_BYTES: usize = 120;

/// How a file's first 4 KiB is treated when deciding whether to scan it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum BinaryMode {
    /// Skip files whose first 4096 bytes contain a NUL byte.
    #[default]
    Skip,
    /// Scan every file's bytes verbatim, binary or not.
    Scan,
}

/// Controls whether and when the engine memory-maps a file instead of
/// reading it in chunks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum MmapMode {
    /// Map files at or above `mmap_threshold_bytes`; stream the rest.
    #[default]
    Auto,
    /// Always attempt a mapping; fall back to streaming (with a logged
    /// warning) if it fails.
    On,
    /// Never map; always stream.
    Off,
}

/// What the engine emits for each file that's scanned.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum OutputMode {
    /// Emit every match record.
    #[default]
    Matches,
    /// Emit one record per file: its total match count.
    Count,
    /// Emit a file's path once, the first time it has any match.
    FilesWithMatches,
}

/// Whether emission order is deterministic across thread counts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum StableOutput {
    /// Deterministic, path-sorted emission after all workers join.
    #[default]
    On,
    /// Emit as workers finish, serialized by a mutex; no cross-file order
    /// guarantee.
    Off,
}

/// An immutable description of one search, built once and shared (via
/// `Arc` or plain borrow) with every worker thread.
#[derive(Clone, Debug)]
pub struct SearchRequest {
    pub pattern: Vec<u8>,
    pub input_paths: Vec<PathBuf>,
    pub extensions: HashSet<String>,
    pub ignore_hidden: bool,
    pub no_ignore: bool,
    pub follow_symlinks: bool,
    pub max_bytes: Option<u64>,
    pub binary_mode: BinaryMode,
    pub mmap_mode: MmapMode,
    pub mmap_threshold_bytes: u64,
    pub chunk_size: usize,
    pub output_mode: OutputMode,
    pub stable_output: StableOutput,
    pub algorithm_mode: AlgorithmMode,
    pub exclude_globs: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub include_globs: Vec<String>,
    pub max_matches_per_file: Option<usize>,
    pub max_snippet_bytes: usize,
    pub no_snippet: bool,
    pub threads: usize,
    pub json_output: bool,
}

impl SearchRequest {
    /// Starts a builder for a search over `input_paths` for `pattern`.
    pub fn builder(pattern: impl Into<Vec<u8>>, input_paths: Vec<PathBuf>) -> SearchRequestBuilder {
        SearchRequestBuilder::new(pattern, input_paths)
    }
}

/// Builds a [`SearchRequest`] with sensible defaults for every field not
/// explicitly set.
#[derive(Clone, Debug)]
pub struct SearchRequestBuilder {
    req: SearchRequest,
}

impl SearchRequestBuilder {
    pub fn new(pattern: impl Into<Vec<u8>>, input_paths: Vec<PathBuf>) -> SearchRequestBuilder {
        SearchRequestBuilder {
            req: SearchRequest {
                pattern: pattern.into(),
                input_paths,
                extensions: HashSet::new(),
                ignore_hidden: true,
                no_ignore: false,
                follow_symlinks: false,
                max_bytes: None,
                binary_mode: BinaryMode::default(),
                mmap_mode: MmapMode::default(),
                mmap_threshold_bytes: DEFAULT_MMAP_THRESHOLD_BYTES,
                chunk_size: DEFAULT_CHUNK_SIZE,
                output_mode: OutputMode::default(),
                stable_output: StableOutput::default(),
                algorithm_mode: AlgorithmMode::Auto,
                exclude_globs: Vec::new(),
                exclude_dirs: Vec::new(),
                include_globs: Vec::new(),
                max_matches_per_file: None,
                max_snippet_bytes: DEFAULT_MAX_SNIPPET_BYTES,
                no_snippet: false,
                threads: 0,
                json_output: false,
            },
        }
    }

    pub fn extensions(mut self, extensions: HashSet<String>) -> Self {
        self.req.extensions = extensions;
        self
    }

    pub fn ignore_hidden(mut self, yes: bool) -> Self {
        self.req.ignore_hidden = yes;
        self
    }

    pub fn no_ignore(mut self, yes: bool) -> Self {
        self.req.no_ignore = yes;
        self
    }

    pub fn follow_symlinks(mut self, yes: bool) -> Self {
        self.req.follow_symlinks = yes;
        self
    }

    pub fn max_bytes(mut self, max: Option<u64>) -> Self {
        self.req.max_bytes = max;
        self
    }

    pub fn binary_mode(mut self, mode: BinaryMode) -> Self {
        self.req.binary_mode = mode;
        self
    }

    pub fn mmap_mode(mut self, mode: MmapMode) -> Self {
        self.req.mmap_mode = mode;
        self
    }

    pub fn mmap_threshold_bytes(mut self, threshold: u64) -> Self {
        self.req.mmap_threshold_bytes = threshold;
        self
    }

    pub fn chunk_size(mut self, size: usize) -> Self {
        self.req.chunk_size = size;
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.req.output_mode = mode;
        self
    }

    pub fn stable_output(mut self, stable: StableOutput) -> Self {
        self.req.stable_output = stable;
        self
    }

    pub fn algorithm_mode(mut self, mode: AlgorithmMode) -> Self {
        self.req.algorithm_mode = mode;
        self
    }

    pub fn exclude_globs(mut self, globs: Vec<String>) -> Self {
        self.req.exclude_globs = globs;
        self
    }

    pub fn exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.req.exclude_dirs = dirs;
        self
    }

    pub fn include_globs(mut self, globs: Vec<String>) -> Self {
        self.req.include_globs = globs;
        self
    }

    pub fn max_matches_per_file(mut self, max: Option<usize>) -> Self {
        self.req.max_matches_per_file = max;
        self
    }

    pub fn max_snippet_bytes(mut self, max: usize) -> Self {
        self.req.max_snippet_bytes = max;
        self
    }

    pub fn no_snippet(mut self, yes: bool) -> Self {
        self.req.no_snippet = yes;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.req.threads = threads;
        self
    }

    pub fn json_output(mut self, yes: bool) -> Self {
        self.req.json_output = yes;
        self
    }

    pub fn build(self) -> SearchRequest {
        self.req
    }
}
