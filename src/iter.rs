//! Positional-order iterators over `OrderedHashSet`.

use crate::element_index::{ElementIndex, Handle};
use core::fmt;
use core::iter::FusedIterator;
use core::slice;

/// Borrowing iterator in positional order.
pub struct Iter<'a, E, S> {
    order: slice::Iter<'a, Handle>,
    index: &'a ElementIndex<E, S>,
}

impl<'a, E, S> Iter<'a, E, S> {
    pub(crate) fn new(order: slice::Iter<'a, Handle>, index: &'a ElementIndex<E, S>) -> Self {
        Self { order, index }
    }
}

impl<'a, E, S> Iterator for Iter<'a, E, S> {
    type Item = &'a E;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        self.order.next().map(move |&h| &index[h])
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<E, S> DoubleEndedIterator for Iter<'_, E, S> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.index;
        self.order.next_back().map(move |&h| &index[h])
    }
}

impl<E, S> ExactSizeIterator for Iter<'_, E, S> {}

impl<E, S> FusedIterator for Iter<'_, E, S> {}

impl<E, S> Clone for Iter<'_, E, S> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            index: self.index,
        }
    }
}

impl<E: fmt::Debug, S> fmt::Debug for Iter<'_, E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Owning iterator in positional order.
#[derive(Debug)]
pub struct IntoIter<E> {
    inner: std::vec::IntoIter<E>,
}

impl<E> IntoIter<E> {
    pub(crate) fn new(values: Vec<E>) -> Self {
        Self {
            inner: values.into_iter(),
        }
    }
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    #[inline]
    fn next(&mut self) -> Option<E> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> DoubleEndedIterator for IntoIter<E> {
    #[inline]
    fn next_back(&mut self) -> Option<E> {
        self.inner.next_back()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {}

impl<E> FusedIterator for IntoIter<E> {}
