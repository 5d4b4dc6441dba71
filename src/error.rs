//! Error type shared by positional operations, cursors and the builder.

/// Failures reported by `OrderedHashSet`, `Cursor` and `Builder`.
///
/// Presence or absence of an element is never an error; those outcomes are
/// reported through `bool`/`Option` returns.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("index {index} out of range for ordered set of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("cursor has no current element: call next or previous first")]
    NoCurrentElement,
    #[error("cursor has no further element in that direction")]
    NoSuchElement,
    #[error("ordered set was structurally modified outside this cursor")]
    ConcurrentModification,
    #[error("cursor used with an ordered set it was not created from")]
    WrongSet,
    #[error("load factor {0} must be finite and within (0, 1]")]
    InvalidLoadFactor(f32),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn messages_name_the_offending_values() {
        let e = Error::IndexOutOfBounds { index: 7, len: 3 };
        assert_eq!(
            e.to_string(),
            "index 7 out of range for ordered set of length 3"
        );
        assert!(Error::InvalidLoadFactor(1.5).to_string().contains("1.5"));
    }
}
