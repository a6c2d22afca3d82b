//! Cooperative cancellation shared by every send loop
//!
//! One flag, three producers (duration timer, SIGINT handler, socket
//! error), many polling consumers. The transition is one-directional:
//! once cancelled, a token never goes back to running.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag
///
/// Workers poll [`is_cancelled`](Self::is_cancelled) on every loop
/// iteration, so cancellation latency is bounded by one send attempt
/// per worker.
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation.
    ///
    /// Idempotent: all triggers race to the same terminal state. Returns
    /// `true` only for the call that performed the transition, so the
    /// winning trigger can be reported exactly once.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Check whether cancellation has been requested
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_starts_running() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_terminal() {
        let token = CancelToken::new();
        assert!(token.cancel());
        assert!(token.is_cancelled());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::new();
        assert!(token.cancel());
        assert!(!token.cancel());
        assert!(!token.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_exactly_one_trigger_wins() {
        // Simulate the duration timer and a transport error racing.
        let token = Arc::new(CancelToken::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let t = Arc::clone(&token);
                thread::spawn(move || t.cancel() as u64)
            })
            .collect();

        let transitions: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(transitions, 1);
        assert!(token.is_cancelled());
    }
}
