//! Construction-time configuration: capacity hint, load-factor hint and
//! hasher.

use crate::error::Error;
use crate::ordered_hash_set::OrderedHashSet;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;

pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Builder for `OrderedHashSet`.
///
/// The hints only size allocations: positional storage is reserved for
/// `capacity` elements and the hash index for `capacity / load_factor`.
#[derive(Debug, Clone)]
pub struct Builder<S = RandomState> {
    capacity: usize,
    load_factor: f32,
    hasher: S,
}

impl Builder<RandomState> {
    pub fn new() -> Self {
        Self {
            capacity: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            hasher: RandomState::new(),
        }
    }
}

impl Default for Builder<RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Builder<S> {
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the load-factor hint; must be finite and within `(0, 1]`.
    pub fn load_factor(mut self, load_factor: f32) -> Result<Self, Error> {
        if !(load_factor.is_finite() && load_factor > 0.0 && load_factor <= 1.0) {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        self.load_factor = load_factor;
        Ok(self)
    }

    pub fn hasher<S2>(self, hasher: S2) -> Builder<S2> {
        Builder {
            capacity: self.capacity,
            load_factor: self.load_factor,
            hasher,
        }
    }

    fn index_capacity(&self) -> usize {
        (self.capacity as f64 / f64::from(self.load_factor)).ceil() as usize
    }

    pub fn build<E>(self) -> OrderedHashSet<E, S> {
        let index_capacity = self.index_capacity();
        OrderedHashSet::from_parts(self.capacity, index_capacity, self.hasher)
    }

    /// Build and fill from `values`; later duplicates are dropped.
    pub fn build_from<E, I>(self, values: I) -> OrderedHashSet<E, S>
    where
        E: Eq + Hash,
        S: BuildHasher,
        I: IntoIterator<Item = E>,
    {
        let mut set = self.build();
        set.insert_all(values);
        set
    }
}
