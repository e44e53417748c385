/*!
The file enumerator (§4.4): walks the request's input paths, applies the
include/exclude filter chain, and honors `.zenithignore` files scoped to
the directory subtree that declares them.

Enumeration is synchronous and finite. Per-entry problems — unreadable
directories, stat failures, unsupported file types — are reported through
an `on_error` callback and never abort the walk; only cancellation does.
The result is produced in traversal order; the caller is responsible for
sorting by `normalized_path` before dispatch (§4.7 step 2), since sort
order has nothing to do with how the filesystem happened to yield entries.
*/

mod filter;
mod pathutil;
mod zenithignore;

use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use zenith_core::{CancelToken, Error, ErrorKind, FileItem, SearchRequest};
use zenith_globset::Glob;

use crate::filter::{FilterConfig, compile_globs, normalize, passes_file_filters, should_prune_dir};

/// Walks `request.input_paths` and returns every `FileItem` that passes
/// the filter chain.
///
/// `on_error` is invoked once per per-entry problem; it never stops the
/// walk on its own. Cancellation via `cancel` does: once requested, the
/// walk winds down at its next check point and returns whatever it has
/// accumulated so far.
pub fn enumerate(
    request: &SearchRequest,
    cancel: &CancelToken,
    mut on_error: impl FnMut(Error),
) -> Vec<FileItem> {
    let cfg = FilterConfig {
        ignore_hidden: request.ignore_hidden,
        exclude_dirs: request.exclude_dirs.clone(),
        exclude_globs: compile_globs(&request.exclude_globs),
        include_globs: compile_globs(&request.include_globs),
        extensions: request.extensions.clone(),
        max_bytes: request.max_bytes,
    };
    let mut walker = Walker {
        cfg,
        no_ignore: request.no_ignore,
        follow_symlinks: request.follow_symlinks,
        ignore_cache: HashMap::new(),
        visited_dirs: HashSet::new(),
        out: Vec::new(),
    };
    for input in &request.input_paths {
        if cancel.is_cancelled() {
            break;
        }
        walker.walk_input_path(input, cancel, &mut on_error);
    }
    walker.out
}

struct Walker {
    cfg: FilterConfig,
    no_ignore: bool,
    follow_symlinks: bool,
    ignore_cache: HashMap<String, Rc<Vec<Glob>>>,
    visited_dirs: HashSet<PathBuf>,
    out: Vec<FileItem>,
}

impl Walker {
    fn stat(&self, path: &Path) -> std::io::Result<fs::Metadata> {
        if self.follow_symlinks { fs::metadata(path) } else { fs::symlink_metadata(path) }
    }

    fn load_ignore_frame(&mut self, dir: &Path) -> Option<Rc<Vec<Glob>>> {
        if self.no_ignore {
            return None;
        }
        let key = normalize(dir);
        if let Some(frame) = self.ignore_cache.get(&key) {
            return Some(Rc::clone(frame));
        }
        let globs = zenithignore::load(dir)?;
        let frame = Rc::new(globs);
        self.ignore_cache.insert(key, Rc::clone(&frame));
        Some(frame)
    }

    fn walk_input_path(
        &mut self,
        path: &Path,
        cancel: &CancelToken,
        on_error: &mut impl FnMut(Error),
    ) {
        let meta = match self.stat(path) {
            Ok(meta) => meta,
            Err(err) => {
                on_error(Error::path(path, ErrorKind::Path(format!("stat failed: {}", err))));
                return;
            }
        };
        if meta.is_file() {
            // A directly-named file is scoped against its own parent
            // directory's ignore file, if any: there's no broader walk
            // root to inherit patterns from.
            let mut stack = Vec::new();
            if let Some(parent) = path.parent() {
                if let Some(frame) = self.load_ignore_frame(parent) {
                    stack.push(frame);
                }
            }
            self.consider_file(path, meta.len(), &stack, on_error);
        } else if meta.is_dir() {
            if self.follow_symlinks {
                if let Ok(canon) = fs::canonicalize(path) {
                    self.visited_dirs.insert(canon);
                }
            }
            let mut stack = Vec::new();
            self.walk_dir(path, &mut stack, cancel, on_error);
        } else {
            on_error(Error::unsupported_path_type(path));
        }
    }

    fn walk_dir(
        &mut self,
        dir: &Path,
        ignore_stack: &mut Vec<Rc<Vec<Glob>>>,
        cancel: &CancelToken,
        on_error: &mut impl FnMut(Error),
    ) {
        if cancel.is_cancelled() {
            return;
        }

        let pushed = self.load_ignore_frame(dir);
        if let Some(ref frame) = pushed {
            ignore_stack.push(Rc::clone(frame));
        }

        let read_dir = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(err) => {
                on_error(Error::path(dir, ErrorKind::Path(format!("read dir failed: {}", err))));
                if pushed.is_some() {
                    ignore_stack.pop();
                }
                return;
            }
        };

        let mut entries: Vec<PathBuf> = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(entry) => entries.push(entry.path()),
                Err(err) => on_error(Error::path(dir, ErrorKind::Path(format!("{}", err)))),
            }
        }
        entries.sort();

        for entry_path in entries {
            if cancel.is_cancelled() {
                break;
            }
            self.walk_entry(&entry_path, ignore_stack, cancel, on_error);
        }

        if pushed.is_some() {
            ignore_stack.pop();
        }
    }

    fn walk_entry(
        &mut self,
        path: &Path,
        ignore_stack: &mut Vec<Rc<Vec<Glob>>>,
        cancel: &CancelToken,
        on_error: &mut impl FnMut(Error),
    ) {
        let meta = match self.stat(path) {
            Ok(meta) => meta,
            Err(err) => {
                on_error(Error::path(path, ErrorKind::Path(format!("stat failed: {}", err))));
                return;
            }
        };

        if meta.is_dir() {
            let basename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            let normalized = normalize(path);
            if should_prune_dir(&self.cfg, basename, &normalized, ignore_stack) {
                return;
            }
            if self.follow_symlinks {
                match fs::canonicalize(path) {
                    Ok(canon) => {
                        if !self.visited_dirs.insert(canon) {
                            return;
                        }
                    }
                    Err(err) => {
                        on_error(Error::path(
                            path,
                            ErrorKind::Path(format!("canonicalize failed: {}", err)),
                        ));
                        return;
                    }
                }
            }
            self.walk_dir(path, ignore_stack, cancel, on_error);
        } else if meta.is_file() {
            self.consider_file(path, meta.len(), &ignore_stack[..], on_error);
        } else {
            on_error(Error::unsupported_path_type(path));
        }
    }

    fn consider_file(
        &mut self,
        path: &Path,
        size: u64,
        ignore_stack: &[Rc<Vec<Glob>>],
        _on_error: &mut impl FnMut(Error),
    ) {
        let parent_basename =
            path.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str()).unwrap_or("");
        if !passes_file_filters(&self.cfg, path, parent_basename, size, ignore_stack) {
            return;
        }
        self.out.push(FileItem { path: path.display().to_string(), normalized_path: normalize(path), size });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn request(root: &Path) -> SearchRequest {
        SearchRequest::builder("pat", vec![root.to_path_buf()]).build()
    }

    fn names(items: &[FileItem]) -> Vec<String> {
        let mut v: Vec<String> = items.iter().map(|i| i.normalized_path.clone()).collect();
        v.sort();
        v
    }

    #[test]
    fn scenario_s6_ignore_scoping_and_include_globs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.cpp"), b"").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("ignored.txt"), b"").unwrap();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("node_modules").join("b.cpp"), b"").unwrap();
        let mut f = fs::File::create(root.join(".zenithignore")).unwrap();
        writeln!(f, "sub/ignored.txt").unwrap();
        drop(f);

        let mut req = request(root);
        req.exclude_dirs = vec!["node_modules".to_string()];
        req.include_globs = vec!["**/*.cpp".to_string()];

        let cancel = CancelToken::new();
        let items = enumerate(&req, &cancel, |_| {});
        assert_eq!(names(&items), vec![normalize(&root.join("a.cpp"))]);
    }

    #[test]
    fn hidden_files_are_skipped_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".hidden"), b"x").unwrap();
        fs::write(root.join("visible.txt"), b"x").unwrap();

        let req = request(root);
        let cancel = CancelToken::new();
        let items = enumerate(&req, &cancel, |_| {});
        assert_eq!(names(&items), vec![normalize(&root.join("visible.txt"))]);
    }

    #[test]
    fn max_bytes_filters_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("small.txt"), b"12345").unwrap();
        fs::write(root.join("big.txt"), vec![0u8; 100]).unwrap();

        let mut req = request(root);
        req.max_bytes = Some(10);
        let cancel = CancelToken::new();
        let items = enumerate(&req, &cancel, |_| {});
        assert_eq!(names(&items), vec![normalize(&root.join("small.txt"))]);
    }

    #[test]
    fn cancellation_stops_the_walk_early() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 0..50 {
            fs::write(root.join(format!("f{i}.txt")), b"x").unwrap();
        }
        let req = request(root);
        let cancel = CancelToken::new();
        cancel.cancel();
        let items = enumerate(&req, &cancel, |_| {});
        assert!(items.is_empty());
    }
}
