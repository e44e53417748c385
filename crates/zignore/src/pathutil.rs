use std::ffi::OsStr;
use std::path::Path;

/// Reports whether `path`'s basename starts with `.`.
pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Reports whether `basename` case-matches any entry in `dirs`.
///
/// Case folding applies only on platforms whose native filesystem is
/// case-insensitive (Windows); everywhere else this is a byte-for-byte
/// comparison.
pub(crate) fn basename_in(basename: &str, dirs: &[String]) -> bool {
    if cfg!(windows) {
        dirs.iter().any(|d| d.eq_ignore_ascii_case(basename))
    } else {
        dirs.iter().any(|d| d == basename)
    }
}

/// Returns a path's lowercase extension, including the leading `.`, or
/// `None` if the basename has no embedded `.`.
///
/// This is more liberal than `Path::extension`: the extension is simply
/// whatever follows (and includes) the last `.` in the basename, so a file
/// named `.gitignore` has extension `.gitignore`, not none.
pub(crate) fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let dot = name.rfind('.')?;
    Some(name[dot..].to_ascii_lowercase())
}
