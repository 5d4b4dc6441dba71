//! ElementIndex: hash index from element to its last-recorded position,
//! addressed through stable generational handles.
//!
//! Elements live in `SlotMap` slots; a `HashTable` of slot keys, hashed by
//! the precomputed element hash, finds a slot by value. Each slot carries
//! the element's last-recorded position in a `Cell` so the owning set can
//! rewrite positions from `&self`. The index never decides whether a
//! recorded position is trustworthy; that is the owner's broken range.

use core::borrow::Borrow;
use core::cell::Cell;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use hashbrown::hash_table::Entry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Handle(DefaultKey);

#[derive(Debug, Clone)]
struct Slot<E> {
    value: E,
    hash: u64,
    position: Cell<usize>,
}

#[derive(Clone)]
pub(crate) struct ElementIndex<E, S> {
    hasher: S,
    table: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Slot<E>>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum InsertError {
    DuplicateElement,
}

impl<E, S> ElementIndex<E, S> {
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: HashTable::with_capacity(capacity),
            slots: SlotMap::with_capacity_and_key(capacity),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.table.capacity().min(self.slots.capacity())
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    #[cfg(test)]
    pub(crate) fn value(&self, h: Handle) -> Option<&E> {
        self.slots.get(h.0).map(|s| &s.value)
    }

    /// Last position recorded for `h`; only exact outside the owner's broken range.
    #[inline]
    pub(crate) fn position(&self, h: Handle) -> Option<usize> {
        self.slots.get(h.0).map(|s| s.position.get())
    }

    #[inline]
    pub(crate) fn record_position(&self, h: Handle, position: usize) {
        if let Some(s) = self.slots.get(h.0) {
            s.position.set(position);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.table.clear();
        self.slots.clear();
    }

    /// Move every element out, in the order given by `order`.
    pub(crate) fn into_values(mut self, order: Vec<Handle>) -> Vec<E> {
        order
            .into_iter()
            .filter_map(|h| self.slots.remove(h.0).map(|s| s.value))
            .collect()
    }
}

impl<E, S> ElementIndex<E, S>
where
    E: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let slots = &self.slots;
        self.table.reserve(additional, |&k| {
            slots.get(k).map(|s| s.hash).unwrap_or(0)
        });
        self.slots.reserve(additional);
    }

    pub(crate) fn find<Q>(&self, q: &Q) -> Option<Handle>
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.table
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .map(|s| s.value.borrow() == q)
                    .unwrap_or(false)
            })
            .map(|&k| Handle(k))
    }

    pub(crate) fn contains<Q>(&self, q: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// Index `value` at `position`, or report that an equal element exists.
    pub(crate) fn insert(&mut self, value: E, position: usize) -> Result<Handle, InsertError> {
        let hash = self.make_hash(&value);
        match self.table.entry(
            hash,
            |&k| self.slots.get(k).map(|s| s.value == value).unwrap_or(false),
            |&k| self.slots.get(k).map(|s| s.hash).unwrap_or(0),
        ) {
            Entry::Occupied(_) => Err(InsertError::DuplicateElement),
            Entry::Vacant(v) => {
                let k = self.slots.insert(Slot {
                    value,
                    hash,
                    position: Cell::new(position),
                });
                let _ = v.insert(k);
                Ok(Handle(k))
            }
        }
    }

    /// Swap the stored value of `h` for an equal `value`, returning the old one.
    ///
    /// The caller guarantees `value` equals the stored element, so the hash
    /// and table placement stay valid.
    pub(crate) fn replace_value(&mut self, h: Handle, value: E) -> Option<E> {
        self.slots
            .get_mut(h.0)
            .map(|s| core::mem::replace(&mut s.value, value))
    }

    pub(crate) fn remove(&mut self, h: Handle) -> Option<E> {
        let k = h.0;
        let hash = self.slots.get(k)?.hash;

        // The table must never hold a key whose slot is gone.
        if let Ok(entry) = self.table.find_entry(hash, |&kk| kk == k) {
            let _ = entry.remove();
        }
        self.slots.remove(k).map(|s| s.value)
    }
}

impl<E, S> Index<Handle> for ElementIndex<E, S> {
    type Output = E;

    #[inline]
    fn index(&self, h: Handle) -> &E {
        &self.slots[h.0].value
    }
}
