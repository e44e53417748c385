use std::fmt;
use std::path::PathBuf;

/// An error tied to a specific path, encountered while enumerating, reading,
/// or mapping a file.
///
/// These are always reported to the error writer and the offending file is
/// skipped; they never abort the run. `IgnoreFileError` is the one
/// exception, per §7: a missing or unreadable `.zenithignore` is treated as
/// absent rather than reported.
#[derive(Debug)]
pub struct Error {
    pub path: Option<PathBuf>,
    pub kind: ErrorKind,
}

#[derive(Debug)]
pub enum ErrorKind {
    /// Stat failed, open failed, or the path is neither a file nor a
    /// directory.
    Path(String),
    /// I/O failed while reading file contents mid-scan.
    Read(std::io::Error),
    /// A memory mapping could not be established.
    Map(std::io::Error),
    /// A `.zenithignore` file could not be read or parsed. Callers
    /// typically swallow this kind rather than reporting it.
    IgnoreFile(std::io::Error),
}

impl Error {
    pub fn path(path: impl Into<PathBuf>, kind: ErrorKind) -> Error {
        Error { path: Some(path.into()), kind }
    }

    pub fn unsupported_path_type(path: impl Into<PathBuf>) -> Error {
        Error::path(path, ErrorKind::Path("unsupported path type".to_string()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {}", path.display(), self.kind)?;
        } else {
            write!(f, "{}", self.kind)?;
        }
        Ok(())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Path(msg) => write!(f, "{}", msg),
            ErrorKind::Read(err) => write!(f, "read error: {}", err),
            ErrorKind::Map(err) => write!(f, "mmap error: {}", err),
            ErrorKind::IgnoreFile(err) => write!(f, "ignore file error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Path(_) => None,
            ErrorKind::Read(err) | ErrorKind::Map(err) | ErrorKind::IgnoreFile(err) => Some(err),
        }
    }
}
