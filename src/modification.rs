//! Structural modification tracking.
//!
//! `Generation` is a per-set owner id plus a counter bumped on every
//! structural change. Cursors keep a `Stamp` of it and refuse to act on a
//! set that changed behind their back.

use crate::error::Error;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Snapshot of a set's identity and generation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Stamp {
    owner: u64,
    generation: u64,
}

/// Owner identity and structural generation of one set instance.
#[derive(Debug)]
pub(crate) struct Generation {
    owner: u64,
    count: u64,
}

impl Generation {
    /// Fresh tracker with a process-unique owner id.
    pub(crate) fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            count: 0,
        }
    }

    /// Record one structural change.
    #[inline]
    pub(crate) fn bump(&mut self) {
        self.count = self.count.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn stamp(&self) -> Stamp {
        Stamp {
            owner: self.owner,
            generation: self.count,
        }
    }

    /// Fail fast if `stamp` was taken from another set or an older generation.
    #[inline]
    pub(crate) fn check(&self, stamp: Stamp) -> Result<(), Error> {
        if stamp.owner != self.owner {
            return Err(Error::WrongSet);
        }
        if stamp.generation != self.count {
            return Err(Error::ConcurrentModification);
        }
        Ok(())
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self::new()
    }
}
