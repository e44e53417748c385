/*!
The search engine (§4.6, §4.7): memory-mapped or chunked file reads, the
literal scan loop with streaming carry-over, binary detection, snippet
construction, and the parallel worker dispatch that ties them together.

This crate knows nothing about output formats or argument parsing; it
drives a [`Sink`] and reports per-file problems through a callback, the
same separation the teacher draws between `grep-searcher` and
`grep-printer`.
*/

mod binary;
mod engine;
mod mmap;
mod reader;
mod sink;
mod snippet;

pub use crate::binary::{BINARY_PROBE_BYTES, looks_binary};
pub use crate::engine::run;
pub use crate::mmap::MappedFile;
pub use crate::reader::{read_chunks, read_prefix};
pub use crate::sink::{RecordingSink, Sink};
