//! ordered-hash-set: a single-threaded hash set that is also a list.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: set semantics (unique elements, O(1) membership) and list
//!   semantics (positions, O(1) positional reads) over one shared order,
//!   without paying O(n) index maintenance on every positional edit.
//! - Layers:
//!   - ElementIndex<E, S>: structural layer. Elements live in generational
//!     slots; a hash table of slot keys finds an element by value. Each
//!     slot records the element's last-known position.
//!   - OrderedHashSet<E, S>: public layer. A `Vec` of slot handles is the
//!     canonical order; a broken-range marker says which recorded positions
//!     may be stale; a generation counter tracks structural changes.
//!   - Cursor: detached bidirectional list iterator that validates the
//!     set's owner id and generation on every call.
//!
//! Lazy index repair
//! - Appending records the exact position and never invalidates another.
//! - An insert or removal at position `p` shifts everything after it. The
//!   recorded positions of `[p, len)` are not rewritten; the broken range
//!   is widened to start at `p` instead.
//! - Queries that need an exact position (`index_of`, `remove`, `take`,
//!   `remove_all`, `replace_at`) first rewrite the broken range in a single
//!   scan and clear it. `contains`, `get`, `insert` and iteration never
//!   repair.
//! - Recorded positions live in `Cell`s, so `index_of` repairs through
//!   `&self`. This makes the set `!Sync`.
//!
//! Constraints
//! - Single-threaded: no atomics on the hot path, `!Sync`.
//! - User `Eq`/`Hash` may run nested read-only lookups (`contains`,
//!   `index_of`) on the same set; they only touch `Cell` positions.
//! - A panic from user code or a source iterator never leaves an element
//!   indexed without a position, or a position without an element.
//! - Elements are immutable while in the set; `E: Eq + Hash` must agree.
//! - Positional arguments outside their bound are reported as
//!   `Error::IndexOutOfBounds`; presence or absence never is an error.
//!
//! Structural modification
//! - Every change to membership or order bumps the set's generation. A
//!   `Cursor` keeps the generation it last saw and answers
//!   `Error::ConcurrentModification` once it differs. Borrowing iterators
//!   (`iter`) need no such check: the borrow checker already forbids
//!   mutation while they live.

mod broken_range;
pub mod builder;
pub mod cursor;
mod element_index;
mod error;
pub mod iter;
mod modification;
pub mod ordered_hash_set;
mod ordered_hash_set_proptest;

// Public surface
pub use builder::Builder;
pub use cursor::Cursor;
pub use error::Error;
pub use iter::{IntoIter, Iter};
pub use ordered_hash_set::OrderedHashSet;

/// Create an `OrderedHashSet` from a list of elements, dropping later
/// duplicates.
///
/// ```
/// use ordered_hash_set::ordered_hash_set;
///
/// let set = ordered_hash_set![2, 1, 2, 3];
/// assert_eq!(set, [2, 1, 3]);
/// ```
#[macro_export]
macro_rules! ordered_hash_set {
    () => {
        $crate::OrderedHashSet::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut set = $crate::OrderedHashSet::new();
        $(
            set.insert($value);
        )+
        set
    }};
}
