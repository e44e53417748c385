/*!
Shared foundation for the search engine: the request and result data model
(§3), the cooperative cancellation token threaded through every component
(§5), per-path error types (§7), and the small text-sanitization helpers
snippets and JSON output are built from (§4.2).

Nothing in this crate touches a filesystem or spawns a thread — it's pure
data and pure functions, depended on by every other crate in the
workspace.
*/

mod cancel;
mod error;
mod model;
mod request;
mod text;

pub use crate::cancel::CancelToken;
pub use crate::error::{Error, ErrorKind};
pub use crate::model::{FileItem, FileMatchSummary, FileResult, MatchRecord, SearchStats};
pub use crate::request::{
    AlgorithmMode, BinaryMode, MmapMode, OutputMode, SearchRequest, SearchRequestBuilder,
    StableOutput, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_SNIPPET_BYTES, DEFAULT_MMAP_THRESHOLD_BYTES,
};
pub use crate::text::{json_escape, sanitize_snippet};
