use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use zenith_globset::{Glob, lexically_normalize, to_forward_slashes};

use crate::pathutil::{basename_in, extension_of, is_hidden};

pub(crate) fn normalize(path: &Path) -> String {
    lexically_normalize(&to_forward_slashes(&path.to_string_lossy()))
}

pub(crate) fn compile_globs(patterns: &[String]) -> Vec<Glob> {
    patterns.iter().map(|p| Glob::new(p)).collect()
}

fn matches_any(globs: &[Glob], normalized_path: &str) -> bool {
    globs.iter().any(|g| g.is_match(normalized_path))
}

fn matches_ignore_stack(stack: &[Rc<Vec<Glob>>], normalized_path: &str) -> bool {
    stack.iter().any(|frame| matches_any(frame, normalized_path))
}

/// Compiled filter configuration, shared read-only across the whole walk.
pub(crate) struct FilterConfig {
    pub ignore_hidden: bool,
    pub exclude_dirs: Vec<String>,
    pub exclude_globs: Vec<Glob>,
    pub include_globs: Vec<Glob>,
    pub extensions: HashSet<String>,
    pub max_bytes: Option<u64>,
}

/// Reports whether a directory should be pruned from recursion: hidden,
/// named in `exclude_dirs`, or matched by `exclude_globs`. Ignore-file
/// patterns are also consulted here as a recursion-pruning optimization —
/// nothing under an ignored directory could ever pass the per-file chain,
/// so there's no point in descending.
pub(crate) fn should_prune_dir(
    cfg: &FilterConfig,
    basename: &str,
    normalized_path: &str,
    ignore_stack: &[Rc<Vec<Glob>>],
) -> bool {
    if cfg.ignore_hidden && basename.starts_with('.') {
        return true;
    }
    if basename_in(basename, &cfg.exclude_dirs) {
        return true;
    }
    if matches_any(&cfg.exclude_globs, normalized_path) {
        return true;
    }
    if matches_ignore_stack(ignore_stack, normalized_path) {
        return true;
    }
    false
}

/// Reports whether `path` passes every filter in the per-file chain (§4.4).
pub(crate) fn passes_file_filters(
    cfg: &FilterConfig,
    path: &Path,
    parent_basename: &str,
    size: u64,
    ignore_stack: &[Rc<Vec<Glob>>],
) -> bool {
    if cfg.ignore_hidden && is_hidden(path) {
        return false;
    }
    if basename_in(parent_basename, &cfg.exclude_dirs) {
        return false;
    }
    let normalized = normalize(path);
    if matches_any(&cfg.exclude_globs, &normalized) {
        return false;
    }
    if !cfg.extensions.is_empty() {
        match extension_of(path) {
            Some(ext) if cfg.extensions.contains(&ext) => {}
            _ => return false,
        }
    }
    if !cfg.include_globs.is_empty() && !matches_any(&cfg.include_globs, &normalized) {
        return false;
    }
    if let Some(max) = cfg.max_bytes {
        if size > max {
            return false;
        }
    }
    if matches_ignore_stack(ignore_stack, &normalized) {
        return false;
    }
    true
}
