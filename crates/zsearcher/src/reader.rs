use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use zenith_core::CancelToken;

/// Opens `path` and reads at most `max_bytes` bytes from the start, for
/// binary-detection probes ahead of a full scan.
pub fn read_prefix(path: &Path, max_bytes: usize) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; max_bytes];
    let mut total = 0;
    while total < buf.len() {
        match file.read(&mut buf[total..])? {
            0 => break,
            n => total += n,
        }
    }
    buf.truncate(total);
    Ok(buf)
}

/// Opens `path` and repeatedly reads up to `chunk_size` bytes, passing each
/// non-empty chunk to `on_chunk`.
///
/// `on_chunk` may return an error to short-circuit; that error (or any I/O
/// error) becomes this function's return value. `cancel` is checked between
/// chunks — a cancellation request stops reading at the next chunk
/// boundary without treating it as an error.
pub fn read_chunks(
    path: &Path,
    chunk_size: usize,
    cancel: &CancelToken,
    mut on_chunk: impl FnMut(&[u8]) -> io::Result<()>,
) -> io::Result<()> {
    let mut file = File::open(path)?;
    let mut buf = vec![0u8; chunk_size.max(1)];
    loop {
        if cancel.is_cancelled() {
            return Ok(());
        }
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        if filled == 0 {
            return Ok(());
        }
        on_chunk(&buf[..filled])?;
        if filled < buf.len() {
            // Short read at EOF: nothing more to read.
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn prefix_reads_at_most_requested_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"hello world").unwrap();
        assert_eq!(read_prefix(&path, 5).unwrap(), b"hello");
        assert_eq!(read_prefix(&path, 1000).unwrap(), b"hello world");
    }

    #[test]
    fn chunks_cover_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, b"xxabcxxabc").unwrap();
        let cancel = CancelToken::new();
        let mut seen = Vec::new();
        read_chunks(&path, 4, &cancel, |chunk| {
            seen.push(chunk.to_vec());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![b"xxab".to_vec(), b"cxxa".to_vec(), b"bc".to_vec()]);
    }

    #[test]
    fn cancellation_stops_between_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.txt");
        std::fs::write(&path, vec![b'a'; 100]).unwrap();
        let cancel = CancelToken::new();
        let mut count = 0;
        read_chunks(&path, 10, &cancel, |_| {
            count += 1;
            if count == 2 {
                cancel.cancel();
            }
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 2);
    }
}
