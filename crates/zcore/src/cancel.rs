use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cooperative cancellation signal shared by the enumerator, the workers,
/// and the chunk reader.
///
/// Cloning a `CancelToken` shares the same underlying flag; there is
/// exactly one signal per run. Every blocking loop in the engine checks it
/// once per iteration (§4.7, §5): the directory walk between entries, the
/// worker loop between jobs and before each accepted match, and the chunk
/// reader between chunks.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    /// Signals cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Reports whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
