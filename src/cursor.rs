//! Bidirectional cursor (list iterator) over an `OrderedHashSet`.
//!
//! A `Cursor` does not borrow the set between calls. Each call takes the set
//! as an argument: `&set` to move, `&mut set` to edit at the cursor. The
//! cursor remembers the owner and structural generation it last saw and
//! fails fast with `Error::ConcurrentModification` once the set has been
//! changed by anything other than this cursor.

use crate::error::Error;
use crate::modification::Stamp;
use crate::ordered_hash_set::OrderedHashSet;
use core::hash::{BuildHasher, Hash};

/// Position between two elements plus the element most recently stepped
/// over.
///
/// `position` is the index of the element `next` would return. `last` is
/// the index of the element returned by the latest `next`/`previous`;
/// `remove` and `set` act on it and clear it.
#[derive(Debug, Clone)]
pub struct Cursor {
    position: usize,
    last: Option<usize>,
    stamp: Stamp,
}

impl Cursor {
    pub(crate) fn new(position: usize, stamp: Stamp) -> Self {
        Self {
            position,
            last: None,
            stamp,
        }
    }

    /// Index of the element `next` would return.
    pub fn next_index(&self) -> usize {
        self.position
    }

    /// Index of the element `previous` would return.
    pub fn previous_index(&self) -> Option<usize> {
        self.position.checked_sub(1)
    }

    pub fn has_next<E, S>(&self, set: &OrderedHashSet<E, S>) -> bool {
        self.position < set.len()
    }

    pub fn has_previous(&self) -> bool {
        self.position > 0
    }

    pub fn next<'a, E, S>(&mut self, set: &'a OrderedHashSet<E, S>) -> Result<&'a E, Error> {
        set.check_stamp(self.stamp)?;
        let value = set
            .get(self.position)
            .map_err(|_| Error::NoSuchElement)?;
        self.last = Some(self.position);
        self.position += 1;
        Ok(value)
    }

    pub fn previous<'a, E, S>(&mut self, set: &'a OrderedHashSet<E, S>) -> Result<&'a E, Error> {
        set.check_stamp(self.stamp)?;
        let position = self.position.checked_sub(1).ok_or(Error::NoSuchElement)?;
        let value = set.get(position).map_err(|_| Error::NoSuchElement)?;
        self.position = position;
        self.last = Some(position);
        Ok(value)
    }

    /// Remove the element last returned by `next` or `previous`.
    pub fn remove<E, S>(&mut self, set: &mut OrderedHashSet<E, S>) -> Result<E, Error>
    where
        E: Eq + Hash,
        S: BuildHasher,
    {
        set.check_stamp(self.stamp)?;
        let last = self.last.ok_or(Error::NoCurrentElement)?;
        let removed = set.remove_at(last)?;
        if last < self.position {
            self.position -= 1;
        }
        self.last = None;
        self.stamp = set.stamp();
        Ok(removed)
    }

    /// Replace the element last returned by `next` or `previous`, with the
    /// semantics of `OrderedHashSet::replace_at`.
    ///
    /// If `value` was present before the cursor it leaves that position, so
    /// the cursor steps back one and `next` still yields the same element.
    pub fn set<E, S>(&mut self, set: &mut OrderedHashSet<E, S>, value: E) -> Result<E, Error>
    where
        E: Eq + Hash,
        S: BuildHasher,
    {
        set.check_stamp(self.stamp)?;
        let last = self.last.ok_or(Error::NoCurrentElement)?;
        let from = set.index_of(&value);
        let previous = set.replace_at(last, value)?;
        if let Some(from) = from {
            if from != last && from < self.position {
                self.position -= 1;
            }
        }
        self.last = None;
        self.stamp = set.stamp();
        Ok(previous)
    }

    /// Insert `value` before the cursor. The cursor moves past it only if it
    /// was actually inserted.
    pub fn add<E, S>(&mut self, set: &mut OrderedHashSet<E, S>, value: E) -> Result<bool, Error>
    where
        E: Eq + Hash,
        S: BuildHasher,
    {
        set.check_stamp(self.stamp)?;
        let inserted = set.insert_at(self.position, value)?;
        if inserted {
            self.position += 1;
        }
        self.last = None;
        self.stamp = set.stamp();
        Ok(inserted)
    }
}
