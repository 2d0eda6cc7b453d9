//! Cooperative cancellation of annealing runs.
//!
//! [`AnnealedImportanceSampler::run_until`](crate::ais::AnnealedImportanceSampler::run_until)
//! polls an [`AbortSignal`] between schedule transitions of every chain.

use std::sync::atomic::{AtomicBool, Ordering};

/// A signal checked by annealing chains between schedule steps.
///
/// Chains that observe an aborted signal stop immediately and discard their partial result;
/// chains that already finished are unaffected.
pub trait AbortSignal: Send + Sync {
    /// Return `true` if the caller has requested to stop sampling.
    fn is_aborted(&self) -> bool;
    /// Make `is_aborted()` return `true`.
    fn abort(&self);
    /// Make `is_aborted()` return `false`.
    fn reset(&self);
}

/// A signal that is never triggered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopAbortSignal;

impl NopAbortSignal {
    pub fn new() -> Self {
        Self
    }
}

impl AbortSignal for NopAbortSignal {
    fn is_aborted(&self) -> bool {
        false
    }

    fn abort(&self) {}

    fn reset(&self) {}
}

/// A signal that is triggered by setting an atomic boolean, e.g. from another thread.
#[derive(Debug, Default)]
pub struct AtomicAbortSignal {
    abort: AtomicBool,
}

impl AtomicAbortSignal {
    pub fn new() -> Self {
        Self {
            abort: AtomicBool::new(false),
        }
    }
}

impl AbortSignal for AtomicAbortSignal {
    fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.abort.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_signal_toggles() {
        let signal = AtomicAbortSignal::new();
        assert!(!signal.is_aborted());
        signal.abort();
        assert!(signal.is_aborted());
        signal.reset();
        assert!(!signal.is_aborted());
    }

    #[test]
    fn nop_signal_never_fires() {
        let signal = NopAbortSignal::new();
        signal.abort();
        assert!(!signal.is_aborted());
    }
}
