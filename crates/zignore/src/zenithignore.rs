use std::path::Path;

use zenith_globset::{Glob, lexically_normalize, to_forward_slashes};

pub(crate) const IGNORE_FILE_NAME: &str = ".zenithignore";

/// Reads and compiles `dir/.zenithignore`.
///
/// Returns `None` when the file is missing, unreadable, or contains no
/// usable patterns. Per §7, ignore-file errors are swallowed: a missing or
/// unreadable ignore file is treated as absent, never reported.
pub(crate) fn load(dir: &Path) -> Option<Vec<Glob>> {
    let contents = std::fs::read_to_string(dir.join(IGNORE_FILE_NAME)).ok()?;
    let dir_normalized = lexically_normalize(&to_forward_slashes(&dir.to_string_lossy()));

    let mut globs = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let full = format!("{}/{}", dir_normalized, line);
        globs.push(Glob::new(&lexically_normalize(&full)));
    }
    if globs.is_empty() { None } else { Some(globs) }
}
