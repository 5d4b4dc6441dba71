//! OrderedHashSet: positional storage over an element index, with lazily
//! repaired positions.

use crate::broken_range::BrokenRange;
use crate::cursor::Cursor;
use crate::element_index::{ElementIndex, Handle};
use crate::error::Error;
use crate::iter::{IntoIter, Iter};
use crate::modification::{Generation, Stamp};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::ops::Index;
use std::collections::hash_map::RandomState;

/// A hash set that is also a list.
///
/// Elements are unique under `Eq` and keep the order in which they were
/// appended or explicitly positioned. Membership, append and positional
/// reads are O(1); positional lookup (`index_of`) is O(1) amortized;
/// inserting or removing at an arbitrary position is O(n).
///
/// Positions recorded in the hash index are not rewritten when an insert or
/// removal shifts the tail of the list. The shifted suffix is marked broken
/// and rewritten in one pass the next time a position-dependent query needs
/// it, so append-heavy workloads never pay for index maintenance.
///
/// ```
/// use ordered_hash_set::OrderedHashSet;
///
/// let mut set = OrderedHashSet::new();
/// set.insert("b");
/// set.insert_at(0, "a").unwrap();
/// assert!(!set.insert("b"));
/// assert_eq!(set, ["a", "b"]);
/// assert_eq!(set.index_of("b"), Some(1));
/// ```
pub struct OrderedHashSet<E, S = RandomState> {
    index: ElementIndex<E, S>,
    order: Vec<Handle>,
    broken: BrokenRange,
    generation: Generation,
}

impl<E> OrderedHashSet<E>
where
    E: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<E, S> OrderedHashSet<E, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_parts(capacity, capacity, hasher)
    }

    pub(crate) fn from_parts(order_capacity: usize, index_capacity: usize, hasher: S) -> Self {
        Self {
            index: ElementIndex::with_capacity_and_hasher(index_capacity, hasher),
            order: Vec::with_capacity(order_capacity),
            broken: BrokenRange::new(),
            generation: Generation::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of elements the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.order.capacity().min(self.index.capacity())
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    /// Element at `index`, or `Error::IndexOutOfBounds`.
    pub fn get(&self, index: usize) -> Result<&E, Error> {
        self.order
            .get(index)
            .map(|&h| &self.index[h])
            .ok_or(Error::IndexOutOfBounds {
                index,
                len: self.order.len(),
            })
    }

    pub fn first(&self) -> Option<&E> {
        self.order.first().map(|&h| &self.index[h])
    }

    pub fn last(&self) -> Option<&E> {
        self.order.last().map(|&h| &self.index[h])
    }

    /// Iterate in positional order.
    pub fn iter(&self) -> Iter<'_, E, S> {
        Iter::new(self.order.iter(), &self.index)
    }

    pub fn to_vec(&self) -> Vec<E>
    where
        E: Clone,
    {
        self.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        if !self.order.is_empty() {
            tracing::debug!(len = self.order.len(), "clearing ordered set");
        }
        self.order.clear();
        self.index.clear();
        self.broken.clear();
        self.generation.bump();
    }

    /// Bidirectional cursor positioned before the first element.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(0, self.generation.stamp())
    }

    /// Bidirectional cursor positioned before the element at `index`
    /// (`index == len` places it after the last element).
    pub fn cursor_at(&self, index: usize) -> Result<Cursor, Error> {
        self.check_insert_bound(index)?;
        Ok(Cursor::new(index, self.generation.stamp()))
    }

    pub(crate) fn stamp(&self) -> Stamp {
        self.generation.stamp()
    }

    pub(crate) fn check_stamp(&self, stamp: Stamp) -> Result<(), Error> {
        self.generation.check(stamp)
    }

    /// Rewrite every recorded position in the broken range from positional
    /// storage.
    fn repair(&self) {
        let Some(lo) = self.broken.take() else {
            return;
        };
        tracing::trace!(lo, len = self.order.len(), "repairing recorded positions");
        for (position, &h) in self.order.iter().enumerate().skip(lo) {
            self.index.record_position(h, position);
        }
    }

    fn check_bound(&self, index: usize) -> Result<(), Error> {
        if index < self.order.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                len: self.order.len(),
            })
        }
    }

    fn check_insert_bound(&self, index: usize) -> Result<(), Error> {
        if index <= self.order.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                len: self.order.len(),
            })
        }
    }

    /// Mark positions from `p` upwards as stale, unless nothing lives there.
    fn shifted_from(&self, p: usize) {
        if p < self.order.len() {
            self.broken.mark(p);
        }
    }
}

impl<E, S> OrderedHashSet<E, S>
where
    E: Eq + Hash,
    S: BuildHasher,
{
    pub fn reserve(&mut self, additional: usize) {
        self.order.reserve(additional);
        self.index.reserve(additional);
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains(value)
    }

    pub fn contains_all<'q, Q, I>(&self, values: I) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        values.into_iter().all(|q| self.index.contains(q))
    }

    /// Position of `value`, repairing stale positions first.
    pub fn index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.repair();
        let h = self.index.find(value)?;
        self.index.position(h)
    }

    /// Same as `index_of`; elements are unique, so first and last coincide.
    pub fn last_index_of<Q>(&self, value: &Q) -> Option<usize>
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index_of(value)
    }

    /// Append `value` unless an equal element is present.
    ///
    /// Returns `false` and leaves the set untouched for duplicates.
    pub fn insert(&mut self, value: E) -> bool {
        let position = self.order.len();
        match self.index.insert(value, position) {
            Ok(h) => {
                self.order.push(h);
                self.generation.bump();
                true
            }
            Err(_) => false,
        }
    }

    /// Append each value in turn; `true` if any was added.
    pub fn insert_all<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = E>,
    {
        let mut changed = false;
        for value in values {
            changed |= self.insert(value);
        }
        changed
    }

    /// Insert `value` at `index`, shifting later elements up by one.
    ///
    /// `index` may equal `len`. Returns `Ok(false)` if an equal element is
    /// already present anywhere in the set.
    pub fn insert_at(&mut self, index: usize, value: E) -> Result<bool, Error> {
        self.check_insert_bound(index)?;
        if index == self.order.len() {
            return Ok(self.insert(value));
        }
        match self.index.insert(value, index) {
            Ok(h) => {
                self.order.insert(index, h);
                self.shifted_from(index + 1);
                self.generation.bump();
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    /// Insert the values not yet present as one contiguous block at `index`,
    /// keeping their relative order. Returns `Ok(true)` if anything was
    /// inserted.
    ///
    /// If `values` panics, the elements taken so far stay in the set,
    /// appended at the end.
    pub fn extend_at<I>(&mut self, index: usize, values: I) -> Result<bool, Error>
    where
        I: IntoIterator<Item = E>,
    {
        self.check_insert_bound(index)?;
        let start = self.order.len();
        for value in values {
            // Appended first so every indexed element always has a position.
            if let Ok(h) = self.index.insert(value, self.order.len()) {
                self.order.push(h);
                self.generation.bump();
            }
        }
        let count = self.order.len() - start;
        if count == 0 {
            return Ok(false);
        }
        self.order[index..].rotate_right(count);
        for (k, &h) in self.order[index..index + count].iter().enumerate() {
            self.index.record_position(h, index + k);
        }
        self.shifted_from(index + count);
        tracing::trace!(index, count, len = self.order.len(), "inserted block");
        Ok(true)
    }

    /// Replace the element at `index` with `value`, returning the previous
    /// occupant.
    ///
    /// - `value` equal to the occupant: the stored value is swapped for the
    ///   argument; nothing moves.
    /// - `value` absent: it takes the occupant's position.
    /// - `value` present at another position `j`: the occupant leaves the
    ///   set and `value` moves into its slot, closing the gap at `j`. It
    ///   ends at `index` if `j > index`, otherwise at `index - 1`, and the
    ///   set shrinks by one.
    pub fn replace_at(&mut self, index: usize, value: E) -> Result<E, Error> {
        self.check_bound(index)?;
        self.repair();
        let occupant = self.order[index];
        match self.index.find(&value) {
            Some(h) if h == occupant => Ok(self.take_replaced(h, value)),
            Some(h) => {
                let from = self
                    .index
                    .position(h)
                    .expect("ordered handle missing from element index");
                self.order.remove(from);
                let target = if from < index { index - 1 } else { index };
                self.order[target] = h;
                self.index.record_position(h, target);
                self.shifted_from(from);
                self.generation.bump();
                drop(value);
                Ok(self.take_indexed(occupant))
            }
            None => {
                let h = match self.index.insert(value, index) {
                    Ok(h) => h,
                    Err(_) => unreachable!("absent element rejected by element index"),
                };
                self.order[index] = h;
                self.generation.bump();
                Ok(self.take_indexed(occupant))
            }
        }
    }

    /// Remove and return the element at `index`, shifting later elements down.
    pub fn remove_at(&mut self, index: usize) -> Result<E, Error> {
        self.check_bound(index)?;
        Ok(self.unlink_at(index))
    }

    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(value).is_some()
    }

    /// Remove the element equal to `value` and hand it back.
    pub fn take<Q>(&mut self, value: &Q) -> Option<E>
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let position = self.index_of(value)?;
        Some(self.unlink_at(position))
    }

    /// Remove every element equal to one of `values`; `true` if any was
    /// present.
    pub fn remove_all<'q, Q, I>(&mut self, values: I) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Hash + Eq + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        self.repair();
        let mut positions: Vec<usize> = values
            .into_iter()
            .filter_map(|q| self.index.find(q))
            .filter_map(|h| self.index.position(h))
            .collect();
        if positions.is_empty() {
            return false;
        }
        positions.sort_unstable_by(|a, b| b.cmp(a));
        positions.dedup();
        self.remove_descending(&positions);
        true
    }

    /// Keep only the elements for which `keep` returns `true`. The predicate
    /// sees elements in positional order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&E) -> bool,
    {
        let index = &self.index;
        let mut doomed: Vec<usize> = self
            .order
            .iter()
            .enumerate()
            .filter(|&(_, &h)| !keep(&index[h]))
            .map(|(position, _)| position)
            .collect();
        if doomed.is_empty() {
            return;
        }
        doomed.reverse();
        self.remove_descending(&doomed);
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<E> {
        let h = self.order.pop()?;
        self.generation.bump();
        Some(self.take_indexed(h))
    }

    fn unlink_at(&mut self, position: usize) -> E {
        let h = self.order.remove(position);
        self.shifted_from(position);
        self.generation.bump();
        self.take_indexed(h)
    }

    /// Remove `positions`, which must be strictly descending.
    fn remove_descending(&mut self, positions: &[usize]) {
        for &p in positions {
            let h = self.order.remove(p);
            drop(self.take_indexed(h));
        }
        if let Some(&lowest) = positions.last() {
            self.shifted_from(lowest);
        }
        self.generation.bump();
        tracing::trace!(
            removed = positions.len(),
            len = self.order.len(),
            "removed positions"
        );
    }

    fn take_indexed(&mut self, h: Handle) -> E {
        self.index
            .remove(h)
            .expect("ordered handle missing from element index")
    }

    fn take_replaced(&mut self, h: Handle, value: E) -> E {
        self.index
            .replace_value(h, value)
            .expect("ordered handle missing from element index")
    }

    /// Check that every recorded position is exact after repair.
    #[cfg(test)]
    pub(crate) fn audit(&self) {
        self.repair();
        assert_eq!(self.index.len(), self.order.len());
        for (position, &h) in self.order.iter().enumerate() {
            assert_eq!(self.index.position(h), Some(position));
            assert_eq!(self.index.find(&self.index[h]), Some(h));
        }
    }
}

impl<E> Default for OrderedHashSet<E>
where
    E: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S> Clone for OrderedHashSet<E, S>
where
    E: Clone,
    S: Clone,
{
    /// Deep copy; the clone is a distinct owner for cursor purposes.
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            order: self.order.clone(),
            broken: self.broken.clone(),
            generation: Generation::new(),
        }
    }
}

impl<E, S> fmt::Debug for OrderedHashSet<E, S>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<E, S> Index<usize> for OrderedHashSet<E, S> {
    type Output = E;

    /// ***Panics*** if `index` is out of bounds.
    fn index(&self, index: usize) -> &E {
        match self.get(index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<E, S1, S2> PartialEq<OrderedHashSet<E, S2>> for OrderedHashSet<E, S1>
where
    E: PartialEq,
{
    fn eq(&self, other: &OrderedHashSet<E, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<E, S> Eq for OrderedHashSet<E, S> where E: Eq {}

impl<E, S> PartialEq<[E]> for OrderedHashSet<E, S>
where
    E: PartialEq,
{
    fn eq(&self, other: &[E]) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<E, S> PartialEq<Vec<E>> for OrderedHashSet<E, S>
where
    E: PartialEq,
{
    fn eq(&self, other: &Vec<E>) -> bool {
        *self == **other
    }
}

impl<E, S, const N: usize> PartialEq<[E; N]> for OrderedHashSet<E, S>
where
    E: PartialEq,
{
    fn eq(&self, other: &[E; N]) -> bool {
        *self == other[..]
    }
}

impl<E, S> Hash for OrderedHashSet<E, S>
where
    E: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<E, S> FromIterator<E> for OrderedHashSet<E, S>
where
    E: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = E>>(iterable: I) -> Self {
        let iter = iterable.into_iter();
        let (low, _) = iter.size_hint();
        let mut set = Self::with_capacity_and_hasher(low, S::default());
        set.extend(iter);
        set
    }
}

impl<E, const N: usize> From<[E; N]> for OrderedHashSet<E>
where
    E: Eq + Hash,
{
    fn from(values: [E; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<E, S> Extend<E> for OrderedHashSet<E, S>
where
    E: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = E>>(&mut self, iterable: I) {
        self.insert_all(iterable);
    }
}

impl<'a, E, S> Extend<&'a E> for OrderedHashSet<E, S>
where
    E: Eq + Hash + Copy + 'a,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a E>>(&mut self, iterable: I) {
        self.insert_all(iterable.into_iter().copied());
    }
}

impl<'a, E, S> IntoIterator for &'a OrderedHashSet<E, S> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E, S> IntoIterator for OrderedHashSet<E, S> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.index.into_values(self.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn set_of(values: &[i32]) -> OrderedHashSet<i32> {
        values.iter().copied().collect()
    }

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut h = DefaultHasher::new();
        value.hash(&mut h);
        h.finish()
    }

    /// Invariant: appends never open a broken range.
    #[test]
    fn appends_keep_positions_exact() {
        let mut s = OrderedHashSet::new();
        for v in 0..100 {
            assert!(s.insert(v));
        }
        assert_eq!(s.broken.start(), None);
        assert_eq!(s.pop(), Some(99));
        assert_eq!(s.broken.start(), None);
        assert_eq!(s.index_of(&42), Some(42));
    }

    /// Invariant: a positional insert marks only the shifted tail, and the
    /// next position query clears the mark.
    #[test]
    fn insert_at_marks_shifted_tail() {
        let mut s = set_of(&[10, 11, 12, 13]);
        assert_eq!(s.insert_at(1, 99), Ok(true));
        assert_eq!(s.broken.start(), Some(2));
        // contains and get do not repair.
        assert!(s.contains(&12));
        assert_eq!(s.get(3), Ok(&12));
        assert_eq!(s.broken.start(), Some(2));

        assert_eq!(s.index_of(&12), Some(3));
        assert_eq!(s.broken.start(), None);
        s.audit();
    }

    /// Invariant: inserting or removing at the end behaves like append/pop.
    #[test]
    fn tail_operations_do_not_break_index() {
        let mut s = set_of(&[1, 2, 3]);
        assert_eq!(s.insert_at(3, 4), Ok(true));
        assert_eq!(s.remove_at(3), Ok(4));
        assert_eq!(s.broken.start(), None);
        assert_eq!(s, [1, 2, 3]);
    }

    /// Invariant: successive shifts widen the range down to the lowest
    /// touched position.
    #[test]
    fn broken_range_tracks_lowest_shift() {
        let mut s = set_of(&[0, 1, 2, 3, 4, 5]);
        s.remove_at(4).unwrap();
        assert_eq!(s.broken.start(), Some(4));
        s.insert_at(1, 9).unwrap();
        assert_eq!(s.broken.start(), Some(2));
        s.remove_at(3).unwrap();
        assert_eq!(s.broken.start(), Some(2));
        assert_eq!(s, [0, 9, 1, 3, 5]);
        for (position, v) in s.to_vec().iter().enumerate() {
            assert_eq!(s.index_of(v), Some(position));
        }
    }

    #[test]
    fn extend_at_inserts_block_and_skips_present() {
        let mut s = set_of(&[1, 2, 3]);
        assert_eq!(s.extend_at(1, [7, 2, 8, 7]), Ok(true));
        assert_eq!(s, [1, 7, 8, 2, 3]);
        assert_eq!(s.broken.start(), Some(3));
        assert_eq!(s.extend_at(0, [1, 8]), Ok(false));
        assert_eq!(
            s.extend_at(9, [4]),
            Err(Error::IndexOutOfBounds { index: 9, len: 5 })
        );
        s.audit();
    }

    /// Invariant: block positions are recorded exactly while the tail is stale.
    #[test]
    fn extend_at_block_positions_are_exact_before_repair() {
        let mut s = set_of(&[1, 2]);
        s.extend_at(1, [5, 6]).unwrap();
        let h5 = s.index.find(&5).unwrap();
        let h6 = s.index.find(&6).unwrap();
        assert_eq!(s.index.position(h5), Some(1));
        assert_eq!(s.index.position(h6), Some(2));
    }

    #[test]
    fn replace_at_with_equal_element_keeps_structure() {
        let mut s = set_of(&[1, 2, 3]);
        let before = s.stamp();
        assert_eq!(s.replace_at(1, 2), Ok(2));
        assert_eq!(s, [1, 2, 3]);
        assert_eq!(s.check_stamp(before), Ok(()));
    }

    #[test]
    fn replace_at_with_absent_element_swaps_in_place() {
        let mut s = set_of(&[1, 2, 3]);
        assert_eq!(s.replace_at(1, 9), Ok(2));
        assert_eq!(s, [1, 9, 3]);
        assert!(!s.contains(&2));
        assert_eq!(s.broken.start(), None);
        assert_eq!(s.index_of(&9), Some(1));
    }

    /// Invariant: an element pulled from later in the set lands in the
    /// occupant's slot.
    #[test]
    fn replace_at_pulls_later_element_forward() {
        let mut s = set_of(&[1, 2, 3, 4]);
        assert_eq!(s.replace_at(1, 4), Ok(2));
        assert_eq!(s, [1, 4, 3]);
        s.audit();
    }

    /// Invariant: an element pulled from earlier in the set lands where the
    /// occupant was, one position lower after the gap closes.
    #[test]
    fn replace_at_pulls_earlier_element_back() {
        let mut s = set_of(&[1, 2, 3, 4]);
        assert_eq!(s.replace_at(2, 1), Ok(3));
        assert_eq!(s, [2, 1, 4]);
        assert_eq!(s.index_of(&1), Some(1));
        s.audit();
    }

    #[test]
    fn replace_at_out_of_bounds() {
        let mut s = set_of(&[1]);
        assert_eq!(
            s.replace_at(1, 5),
            Err(Error::IndexOutOfBounds { index: 1, len: 1 })
        );
    }

    #[test]
    fn remove_all_removes_in_descending_order() {
        let mut s = set_of(&[0, 1, 2, 3, 4, 5, 6]);
        s.insert_at(0, 10).unwrap();
        assert!(s.remove_all([&5, &1, &10, &42, &1]));
        assert_eq!(s, [0, 2, 3, 4, 6]);
        assert!(!s.remove_all([&42]));
        s.audit();
    }

    #[test]
    fn retain_sees_positional_order() {
        let mut s = set_of(&[5, 4, 3, 2, 1]);
        let mut seen = Vec::new();
        s.retain(|&v| {
            seen.push(v);
            v % 2 == 1
        });
        assert_eq!(seen, vec![5, 4, 3, 2, 1]);
        assert_eq!(s, [5, 3, 1]);
        s.audit();
    }

    #[test]
    fn clear_resets_everything() {
        let mut s = set_of(&[1, 2, 3]);
        s.insert_at(0, 0).unwrap();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.broken.start(), None);
        assert!(!s.contains(&1));
        assert!(s.insert(1));
        assert_eq!(s.index_of(&1), Some(0));
    }

    /// Invariant: equality and hashing are order-sensitive.
    #[test]
    fn equality_and_hash_follow_order() {
        let a = set_of(&[1, 2, 3]);
        let b = set_of(&[1, 2, 3]);
        let c = set_of(&[3, 2, 1]);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
        assert_ne!(hash_of(&a), hash_of(&c));
        assert_eq!(a, vec![1, 2, 3]);
    }

    /// Invariant: a clone is equal but is a distinct owner for cursors.
    #[test]
    fn clone_is_deep_and_distinct() {
        let mut a = set_of(&[1, 2, 3]);
        a.remove_at(0).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);
        assert_eq!(b.check_stamp(a.stamp()), Err(Error::WrongSet));
        b.insert(9);
        assert_ne!(a, b);
        assert_eq!(b.index_of(&3), Some(1));
        b.audit();
    }

    #[test]
    fn debug_prints_as_list() {
        assert_eq!(format!("{:?}", set_of(&[3, 1, 2])), "[3, 1, 2]");
    }

    #[test]
    #[should_panic(expected = "index 3 out of range")]
    fn index_operator_panics_out_of_bounds() {
        let s = set_of(&[1, 2, 3]);
        let _ = s[3];
    }

    /// Invariant: `Eq` may look up the same set while a lookup is probing.
    #[test]
    fn nested_lookup_from_eq_is_allowed() {
        use std::cell::Cell;

        thread_local! {
            static OUTER: Cell<Option<&'static OrderedHashSet<Node>>> = const { Cell::new(None) };
            static NESTED: Cell<u32> = const { Cell::new(0) };
        }

        #[derive(Debug)]
        struct Node(u32);
        impl Hash for Node {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }
        impl PartialEq for Node {
            fn eq(&self, other: &Self) -> bool {
                // Taken for the nested call so it cannot recurse again.
                if let Some(set) = OUTER.with(Cell::take) {
                    let _ = set.contains(&Node(999));
                    let _ = set.index_of(&Node(2));
                    NESTED.with(|n| n.set(n.get() + 1));
                    OUTER.with(|c| c.set(Some(set)));
                }
                self.0 == other.0
            }
        }
        impl Eq for Node {}

        let set: &'static mut OrderedHashSet<Node> = Box::leak(Box::new(OrderedHashSet::new()));
        set.insert(Node(1));
        set.insert(Node(2));
        set.insert_at(0, Node(0)).unwrap();
        let set: &'static OrderedHashSet<Node> = set;
        OUTER.with(|c| c.set(Some(set)));

        assert!(set.contains(&Node(1)));
        assert_eq!(set.index_of(&Node(2)), Some(2));
        assert!(NESTED.with(Cell::get) > 0);
        OUTER.with(|c| c.set(None));
    }

    /// Invariant: a source iterator that panics leaves every indexed element
    /// with a position.
    #[test]
    fn extend_at_panic_keeps_index_and_order_in_step() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let mut s = set_of(&[100, 101]);
        let res = catch_unwind(AssertUnwindSafe(|| {
            let _ = s.extend_at(0, (0..5).map(|x| if x == 3 { panic!("source failed") } else { x }));
        }));
        assert!(res.is_err());
        assert_eq!(s.len(), 5);
        assert_eq!(s, [100, 101, 0, 1, 2]);
        assert_eq!(s.index_of(&0), Some(2));
        assert_eq!(s.index_of(&100), Some(0));
        s.audit();
    }

    /// Invariant: a panicking `Hash` while indexing the replacement leaves
    /// the occupant in place.
    #[test]
    fn replace_at_hash_panic_keeps_occupant() {
        use std::cell::Cell;
        use std::panic::{catch_unwind, AssertUnwindSafe};

        thread_local! {
            static NINES_HASHED: Cell<u32> = const { Cell::new(0) };
        }

        #[derive(Debug, PartialEq, Eq)]
        struct Fragile(u32);
        impl Hash for Fragile {
            fn hash<H: Hasher>(&self, state: &mut H) {
                if self.0 == 9 {
                    let n = NINES_HASHED.with(|c| {
                        c.set(c.get() + 1);
                        c.get()
                    });
                    // The lookup hashes once; indexing hashes again.
                    if n == 2 {
                        panic!("hash failed");
                    }
                }
                self.0.hash(state);
            }
        }

        let mut s: OrderedHashSet<Fragile> = [Fragile(1), Fragile(2)].into_iter().collect();
        let res = catch_unwind(AssertUnwindSafe(|| {
            let _ = s.replace_at(0, Fragile(9));
        }));
        assert!(res.is_err());
        assert_eq!(s, [Fragile(1), Fragile(2)]);
        assert_eq!(s.get(0), Ok(&Fragile(1)));
        assert!(s.contains(&Fragile(1)));
        s.audit();
    }
}
