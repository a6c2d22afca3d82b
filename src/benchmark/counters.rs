//! Shared atomic counters for the send loops
//!
//! These are the ONLY mutable state shared between workers. Everything
//! else (payload, destination) is read-only.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between all send loops
///
/// Design principle: minimize contention by using relaxed ordering and
/// keeping counter operations simple (fetch_add). The orchestrator reads
/// final values only after the worker join barrier, so no stronger
/// ordering is needed.
pub struct SendCounters {
    /// Total payload bytes transferred by successful sends
    bytes_sent: AtomicU64,

    /// Sends that did not complete synchronously at issue time
    async_completions: AtomicU64,
}

impl SendCounters {
    /// Create new counters initialized to zero
    pub fn new() -> Self {
        Self {
            bytes_sent: AtomicU64::new(0),
            async_completions: AtomicU64::new(0),
        }
    }

    /// Record bytes transferred by one successful send
    #[inline]
    pub fn add_bytes(&self, n: u64) {
        self.bytes_sent.fetch_add(n, Ordering::Relaxed);
    }

    /// Record one send that deferred its completion
    #[inline]
    pub fn record_async_completion(&self) {
        self.async_completions.fetch_add(1, Ordering::Relaxed);
    }

    /// Total bytes sent so far (monotonically non-decreasing)
    #[inline]
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Asynchronously completed sends so far (monotonically non-decreasing)
    #[inline]
    pub fn async_completions(&self) -> u64 {
        self.async_completions.load(Ordering::Relaxed)
    }
}

impl Default for SendCounters {
    fn default() -> Self {
        Self::new()
    }
}
