//! Shared counter updated with a single fetch-and-add per step.

use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicI64, Ordering};

/// A signed 64-bit accumulator that any number of threads may add to.
///
/// Overflow wraps around in two's complement, the same as `i64::wrapping_add`.
/// Nothing here guards against it.
#[derive(Debug, Default)]
pub struct SharedCounter {
    value: CachePadded<AtomicI64>,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` as one indivisible step.
    pub fn add(&self, delta: i64) {
        // Only atomicity matters here: the sum is order-independent.
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    /// Reads the current value.
    ///
    /// Callers that want the final total must first join every writer; the
    /// join is what orders the writes before this read.
    pub fn load(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}
