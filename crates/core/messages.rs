/*!
A locked stderr writer and the error-reporting macro built on it.

In unstable output mode the sink writes matches to stdout from worker
threads while the same threads may report per-file errors here; without
locking stdout first, the two streams can interleave mid-line on a
terminal that shows both.
*/

/// Like `eprintln!`, but locks stdout first so error lines never
/// interleave with concurrent match output on the same terminal.
#[macro_export]
macro_rules! eprintln_locked {
    ($($tt:tt)*) => {{
        use std::io::Write;
        let stdout = std::io::stdout().lock();
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "zs: ");
        let _ = writeln!(stderr, $($tt)*);
        drop(stdout);
    }}
}

/// Reports a per-file error to stderr, prefixed with its path when set.
pub(crate) fn report(err: zenith_core::Error) {
    eprintln_locked!("{}", err);
}
