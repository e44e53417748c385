use std::fs::File;
use std::io;
use std::path::Path;

use memmap::Mmap;

/// A read-only memory mapping of a file.
///
/// The mapped byte span's lifetime is tied to this handle; the mapping
/// (and the underlying file descriptor) is released when it's dropped.
/// Match snippets must be copied into owned strings before that happens —
/// nothing in this type lets a borrow outlive the handle.
pub struct MappedFile {
    // `None` represents a zero-length file: mmap(2) rejects zero-length
    // mappings outright, so there's nothing to map and `as_bytes` just
    // returns an empty slice.
    inner: Option<Mmap>,
}

impl MappedFile {
    /// Maps `path` read-only.
    pub fn open(path: &Path) -> io::Result<MappedFile> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(MappedFile { inner: None });
        }
        // SAFETY: the mapping is read-only and this process does not rely
        // on the file's contents being stable if another process
        // truncates or rewrites it concurrently; a torn read here shows up
        // as a search over stale or partial bytes, not undefined behavior
        // in this process.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(MappedFile { inner: Some(mmap) })
    }

    /// The mapped byte span. Empty for a zero-length file.
    pub fn as_bytes(&self) -> &[u8] {
        match self.inner {
            Some(ref mmap) => &mmap[..],
            None => &[],
        }
    }

    /// The mapped file's size in bytes.
    pub fn size(&self) -> usize {
        self.as_bytes().len()
    }
}
