//! Error types for persistent list operations.
//!
//! Every operation in this crate is pure, so errors are raised at the point
//! of violation and propagate to the caller unchanged; there is no retry or
//! recovery inside the library.

/// Represents a failed operation on a [`PersistentList`].
///
/// # Examples
///
/// ```rust
/// use pictura::persistent::{ListError, PersistentList};
///
/// let empty: PersistentList<i32> = PersistentList::new();
/// let error = empty.fold_left1(|a, b| a + b).unwrap_err();
/// assert_eq!(
///     format!("{}", error),
///     "fold_left1: empty list"
/// );
/// ```
///
/// [`PersistentList`]: crate::persistent::PersistentList
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// An operation that needs at least one element was applied to an
    /// empty list.
    EmptyList {
        /// The name of the operation that was attempted.
        operation: &'static str,
    },
    /// An index lookup fell outside `0..length`.
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the list at the time of the lookup.
        length: usize,
    },
    /// A chunk size of zero was passed to `group`.
    InvalidChunkSize {
        /// The rejected chunk size.
        size: usize,
    },
}

impl std::fmt::Display for ListError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyList { operation } => {
                write!(formatter, "{operation}: empty list")
            }
            Self::IndexOutOfRange { index, length } => {
                write!(
                    formatter,
                    "index {index} out of range for list of length {length}"
                )
            }
            Self::InvalidChunkSize { size } => {
                write!(formatter, "group({size}): chunk size must be > 0")
            }
        }
    }
}

impl std::error::Error for ListError {}
