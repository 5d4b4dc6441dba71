//! Marker for the suffix of recorded positions that may be stale.
//!
//! The range is `[lo, len)`: only the lower bound is stored, the upper bound
//! is always the live length of the set. Any shift of positions starting at
//! `p` can only invalidate positions at or above `p`, so widening is a
//! `min` on `lo`.

use core::cell::Cell;

#[derive(Debug, Default, Clone)]
pub(crate) struct BrokenRange {
    lo: Cell<Option<usize>>,
}

impl BrokenRange {
    pub(crate) const fn new() -> Self {
        Self { lo: Cell::new(None) }
    }

    /// Widen the range so that it covers every position from `p` upwards.
    #[inline]
    pub(crate) fn mark(&self, p: usize) {
        let lo = match self.lo.get() {
            Some(lo) => lo.min(p),
            None => p,
        };
        self.lo.set(Some(lo));
    }

    /// Lower bound of the pending range, if any.
    #[cfg(test)]
    pub(crate) fn start(&self) -> Option<usize> {
        self.lo.get()
    }

    /// Take the pending lower bound and clear the marker.
    #[inline]
    pub(crate) fn take(&self) -> Option<usize> {
        self.lo.take()
    }

    #[inline]
    pub(crate) fn clear(&self) {
        self.lo.set(None);
    }
}
