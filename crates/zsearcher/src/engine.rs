use std::collections::VecDeque;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use zenith_core::{
    BinaryMode, CancelToken, Error, ErrorKind, FileItem, FileMatchSummary, FileResult, MmapMode,
    OutputMode, SearchRequest, SearchStats, StableOutput,
};
use zenith_matcher::{Algorithm, LiteralMatcher};

use crate::binary::{BINARY_PROBE_BYTES, looks_binary};
use crate::mmap::MappedFile;
use crate::reader::{read_chunks, read_prefix};
use crate::sink::Sink;
use crate::snippet;

/// Runs one search end to end: enumerate, dispatch across worker threads,
/// and drive `sink` with the results, per the request's `output_mode`.
///
/// Per-file problems (unreadable files, failed mappings, I/O errors) are
/// reported through `on_error` and skip just that file. Cancellation via
/// `cancel` winds the run down at its designated check points (§4.7, §5)
/// and is reflected in the returned `SearchStats`, not as an error.
pub fn run(
    request: &SearchRequest,
    cancel: &CancelToken,
    sink: &mut dyn Sink,
    on_error: &mut (dyn FnMut(Error) + Send),
) -> io::Result<SearchStats> {
    let on_error_mutex = Mutex::new(on_error);
    let mut files =
        zenith_ignore::enumerate(request, cancel, |e| (*on_error_mutex.lock().unwrap())(e));
    files.sort_by(|a, b| a.normalized_path.cmp(&b.normalized_path));

    let n = files.len();
    let thread_count = effective_threads(request.threads).min(n.max(1));
    let queue = Mutex::new((0..n).collect::<VecDeque<usize>>());
    let any_match = AtomicBool::new(false);
    let interrupted = AtomicBool::new(false);
    let completed_files = AtomicUsize::new(0);
    let test_cancel_after = test_cancel_after_files();

    let pop_job = || -> Option<usize> { queue.lock().unwrap().pop_front() };

    let note_completion = |result: &FileResult| {
        if result.any_match {
            any_match.store(true, Ordering::SeqCst);
        }
        if !result.completed {
            interrupted.store(true, Ordering::SeqCst);
        }
        let done = completed_files.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = test_cancel_after {
            if done >= limit {
                cancel.cancel();
            }
        }
    };

    let sink_error: Mutex<Option<io::Error>> = Mutex::new(None);

    match request.stable_output {
        StableOutput::On => {
            let slots: Vec<Mutex<Option<FileResult>>> = (0..n).map(|_| Mutex::new(None)).collect();
            std::thread::scope(|scope| {
                for _ in 0..thread_count {
                    scope.spawn(|| {
                        while let Some(idx) = pop_job() {
                            if cancel.is_cancelled() {
                                let mut result = FileResult::new(files[idx].path.clone());
                                result.completed = false;
                                note_completion(&result);
                                *slots[idx].lock().unwrap() = Some(result);
                                continue;
                            }
                            let result = scan_file(request, &files[idx], cancel, &on_error_mutex);
                            note_completion(&result);
                            *slots[idx].lock().unwrap() = Some(result);
                        }
                    });
                }
            });
            for slot in slots {
                let result = slot.into_inner().unwrap();
                let Some(result) = result else { continue };
                if !result.completed {
                    continue;
                }
                if let Err(err) = emit_result(request, sink, &result) {
                    *sink_error.lock().unwrap() = Some(err);
                    break;
                }
            }
        }
        StableOutput::Off => {
            let sink_mutex = Mutex::new(sink);
            std::thread::scope(|scope| {
                for _ in 0..thread_count {
                    scope.spawn(|| {
                        while let Some(idx) = pop_job() {
                            if sink_error.lock().unwrap().is_some() {
                                break;
                            }
                            if cancel.is_cancelled() {
                                let mut result = FileResult::new(files[idx].path.clone());
                                result.completed = false;
                                note_completion(&result);
                                continue;
                            }
                            let result = scan_file(request, &files[idx], cancel, &on_error_mutex);
                            note_completion(&result);
                            if result.completed {
                                let mut guard = sink_mutex.lock().unwrap();
                                if let Err(err) = emit_result(request, &mut **guard, &result) {
                                    *sink_error.lock().unwrap() = Some(err);
                                }
                            }
                        }
                    });
                }
            });
        }
    }

    if let Some(err) = sink_error.into_inner().unwrap() {
        return Err(err);
    }
    Ok(SearchStats {
        any_match: any_match.load(Ordering::SeqCst),
        cancelled: cancel.is_cancelled() || interrupted.load(Ordering::SeqCst),
    })
}

fn effective_threads(requested: usize) -> usize {
    let n = if requested == 0 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
    } else {
        requested
    };
    n.clamp(1, 32)
}

/// `ZENITHSEARCH_TEST_CANCEL_AFTER_FILES`: a test-only hook that requests
/// cancellation once N files have completed. Absent in release builds.
#[cfg(debug_assertions)]
fn test_cancel_after_files() -> Option<usize> {
    std::env::var("ZENITHSEARCH_TEST_CANCEL_AFTER_FILES").ok()?.parse().ok()
}

#[cfg(not(debug_assertions))]
fn test_cancel_after_files() -> Option<usize> {
    None
}

fn emit_result(request: &SearchRequest, sink: &mut dyn Sink, result: &FileResult) -> io::Result<()> {
    if !result.any_match {
        return Ok(());
    }
    match request.output_mode {
        OutputMode::Matches => {
            for m in &result.matches {
                sink.match_found(m)?;
            }
        }
        OutputMode::Count => {
            sink.file_count(&FileMatchSummary {
                path: result.path.clone(),
                count: result.count,
                binary: result.binary,
            })?;
        }
        OutputMode::FilesWithMatches => {
            sink.files_with_matches(&FileMatchSummary {
                path: result.path.clone(),
                count: result.count,
                binary: result.binary,
            })?;
        }
    }
    Ok(())
}

fn scan_file(
    request: &SearchRequest,
    item: &FileItem,
    cancel: &CancelToken,
    on_error: &Mutex<&mut (dyn FnMut(Error) + Send)>,
) -> FileResult {
    let mut result = FileResult::new(item.path.clone());
    if cancel.is_cancelled() {
        result.completed = false;
        return result;
    }

    let matcher = zenith_matcher::select(request.algorithm_mode, request.pattern.len(), item.size);
    let path = Path::new(&item.path);
    let use_mmap = match request.mmap_mode {
        MmapMode::Off => false,
        MmapMode::On => true,
        MmapMode::Auto => item.size >= request.mmap_threshold_bytes,
    };

    if use_mmap {
        match MappedFile::open(path) {
            Ok(mapped) => {
                scan_mapped(request, &matcher, &mapped, cancel, &mut result);
                return result;
            }
            Err(err) => {
                if request.mmap_mode == MmapMode::On {
                    log::warn!("{}: mmap failed, falling back to streaming: {}", item.path, err);
                }
                // Auto-mode fallback is silent, per §4.6.
            }
        }
    }

    scan_streaming(request, &matcher, path, cancel, on_error, &mut result);
    result
}

fn scan_mapped(
    request: &SearchRequest,
    matcher: &Algorithm,
    mapped: &MappedFile,
    cancel: &CancelToken,
    result: &mut FileResult,
) {
    let bytes = mapped.as_bytes();
    let probe = &bytes[..bytes.len().min(BINARY_PROBE_BYTES)];
    result.binary = looks_binary(probe);
    if result.binary && request.binary_mode == BinaryMode::Skip {
        return;
    }
    if cancel.is_cancelled() {
        result.completed = false;
        return;
    }
    let offsets = matcher.find_all(bytes, &request.pattern);
    accept_matches(request, bytes, offsets.into_iter().map(|pos| (pos, pos as u64)), cancel, result);
}

fn scan_streaming(
    request: &SearchRequest,
    matcher: &Algorithm,
    path: &Path,
    cancel: &CancelToken,
    on_error: &Mutex<&mut (dyn FnMut(Error) + Send)>,
    result: &mut FileResult,
) {
    if request.binary_mode == BinaryMode::Skip {
        match read_prefix(path, BINARY_PROBE_BYTES) {
            Ok(prefix) => {
                if looks_binary(&prefix) {
                    result.binary = true;
                    return;
                }
            }
            Err(err) => {
                (*on_error.lock().unwrap())(Error::path(path, ErrorKind::Read(err)));
                return;
            }
        }
    }

    let pattern_len = request.pattern.len();
    let mut carry: Vec<u8> = Vec::new();
    let mut processed: u64 = 0;
    let read_result = read_chunks(path, request.chunk_size, cancel, |chunk| {
        let combined = [carry.as_slice(), chunk].concat();
        let carry_len = carry.len();
        let processed_before = processed;
        let offsets = matcher.find_all(&combined, &request.pattern);
        let accepted = offsets
            .into_iter()
            .filter(|&pos| pos + pattern_len > carry_len)
            .map(|pos| (pos, processed_before - carry_len as u64 + pos as u64));
        accept_matches(request, &combined, accepted, cancel, result);

        processed = processed_before + chunk.len() as u64;
        carry = if pattern_len <= 1 {
            Vec::new()
        } else {
            let keep = (pattern_len - 1).min(combined.len());
            combined[combined.len() - keep..].to_vec()
        };
        Ok(())
    });

    if let Err(err) = read_result {
        (*on_error.lock().unwrap())(Error::path(path, ErrorKind::Read(err)));
        // A read error is not a cancellation: the job still completes, just
        // with whatever matches were accepted before the error (usually
        // none). Only `cancel` observations set `completed = false`.
    }
}

/// Accumulates matches found in `buffer` into `result`, given an iterator
/// of `(position_in_buffer, absolute_file_offset)` pairs.
///
/// `count` always reflects the true total, even past `max_matches_per_file`
/// (§9, Open Question (b)): every accepted offset increments it, and the
/// cap only governs how many records get materialized.
fn accept_matches(
    request: &SearchRequest,
    buffer: &[u8],
    accepted: impl Iterator<Item = (usize, u64)>,
    cancel: &CancelToken,
    result: &mut FileResult,
) {
    for (pos, offset) in accepted {
        if cancel.is_cancelled() {
            result.completed = false;
            break;
        }
        result.count += 1;
        result.any_match = true;
        if request.output_mode == OutputMode::Count {
            continue;
        }
        if let Some(cap) = request.max_matches_per_file {
            if result.matches.len() >= cap {
                continue;
            }
        }
        let snippet = if request.no_snippet {
            String::new()
        } else {
            snippet::build(buffer, pos, request.pattern.len(), request.max_snippet_bytes)
        };
        result.matches.push(zenith_core::MatchRecord {
            path: result.path.clone(),
            offset,
            snippet,
            binary: result.binary,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;
    use std::fs;

    fn no_errors() -> impl FnMut(Error) + Send {
        |e| panic!("unexpected error: {e}")
    }

    #[test]
    fn finds_overlapping_matches_across_two_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"xxabcxxabc").unwrap();
        fs::write(dir.path().join("b.txt"), b"no match here").unwrap();

        let request = SearchRequest::builder("abc", vec![dir.path().to_path_buf()])
            .chunk_size(4)
            .mmap_mode(MmapMode::Off)
            .build();
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::default();
        let stats = run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        assert!(stats.any_match);
        assert!(!stats.cancelled);
        let offsets: Vec<u64> = sink.matches.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, vec![2, 7]);
    }

    #[test]
    fn count_mode_skips_building_records() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"aaaaaa").unwrap();

        let request = SearchRequest::builder("aaa", vec![dir.path().to_path_buf()])
            .output_mode(OutputMode::Count)
            .build();
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::default();
        run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        assert!(sink.matches.is_empty());
        assert_eq!(sink.counts.len(), 1);
        assert_eq!(sink.counts[0].count, 4);
    }

    #[test]
    fn binary_files_are_skipped_by_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.dat"), b"ab\0c abc").unwrap();

        let request = SearchRequest::builder("abc", vec![dir.path().to_path_buf()]).build();
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::default();
        let stats = run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        assert!(!stats.any_match);
        assert!(sink.matches.is_empty());
    }

    #[test]
    fn binary_mode_scan_still_reports_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bin.dat"), b"a\0bc").unwrap();

        let request = SearchRequest::builder("bc", vec![dir.path().to_path_buf()])
            .binary_mode(BinaryMode::Scan)
            .build();
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::default();
        let stats = run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        assert!(stats.any_match);
        let offsets: Vec<u64> = sink.matches.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, vec![2]);
    }

    #[test]
    fn max_matches_per_file_caps_records_not_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"abcabcabcabc").unwrap();

        let request = SearchRequest::builder("abc", vec![dir.path().to_path_buf()])
            .max_matches_per_file(Some(2))
            .build();
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::default();
        run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        assert_eq!(sink.matches.len(), 2);
    }

    #[test]
    fn pre_cancelled_token_yields_no_matches_and_reports_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"abc").unwrap();

        let request = SearchRequest::builder("abc", vec![dir.path().to_path_buf()]).build();
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut sink = RecordingSink::default();
        let stats = run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        assert!(!stats.any_match);
        assert!(stats.cancelled);
        assert!(sink.matches.is_empty());
    }

    #[test]
    fn stable_output_emits_in_path_order_regardless_of_thread_count() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["z.txt", "a.txt", "m.txt"] {
            fs::write(dir.path().join(name), b"abc").unwrap();
        }
        let request = SearchRequest::builder("abc", vec![dir.path().to_path_buf()])
            .threads(4)
            .build();
        let cancel = CancelToken::new();
        let mut sink = RecordingSink::default();
        run(&request, &cancel, &mut sink, &mut no_errors()).unwrap();

        let paths: Vec<&String> = sink.matches.iter().map(|m| &m.path).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn mmap_mode_agrees_with_streaming_mode() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"xxabcxxabc").unwrap();

        let streaming = SearchRequest::builder("abc", vec![dir.path().to_path_buf()])
            .mmap_mode(MmapMode::Off)
            .build();
        let mapped = SearchRequest::builder("abc", vec![dir.path().to_path_buf()])
            .mmap_mode(MmapMode::On)
            .build();

        let mut sink_a = RecordingSink::default();
        run(&streaming, &CancelToken::new(), &mut sink_a, &mut no_errors()).unwrap();
        let mut sink_b = RecordingSink::default();
        run(&mapped, &CancelToken::new(), &mut sink_b, &mut no_errors()).unwrap();

        let offsets_a: Vec<u64> = sink_a.matches.iter().map(|m| m.offset).collect();
        let offsets_b: Vec<u64> = sink_b.matches.iter().map(|m| m.offset).collect();
        assert_eq!(offsets_a, offsets_b);
    }
}
