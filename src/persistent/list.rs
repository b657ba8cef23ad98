//! Persistent (immutable) singly-linked list.
//!
//! This module provides [`PersistentList`], an immutable cons-list with
//! structural sharing and a combinator set modeled on Haskell's standard
//! list functions.
//!
//! # Overview
//!
//! `PersistentList` provides:
//!
//! - O(1) prepend (`cons`), head access, and tail access
//! - O(n) index access, append, and reverse
//! - Order-preserving combinators: `map`, `filter`, folds, `zip_with`,
//!   `intersperse`, `group`, and a ragged `transpose` over nested lists
//!
//! All operations return new lists without modifying the original, and
//! structural sharing ensures memory efficiency: any derived list that keeps
//! a suffix of the original keeps it by reference, not by copy.
//!
//! # Examples
//!
//! ```rust
//! use pictura::persistent::PersistentList;
//!
//! let list = PersistentList::new().cons(3).cons(2).cons(1);
//! assert_eq!(list.head(), Some(&1));
//! assert_eq!(list.len(), 3);
//!
//! // Structural sharing: the original list is preserved
//! let extended = list.cons(0);
//! assert_eq!(list.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4); // New list with prepended element
//!
//! // Build from an iterator
//! let list: PersistentList<i32> = (1..=5).collect();
//! assert_eq!(list.iter().sum::<i32>(), 15);
//! ```
//!
//! # Stack Safety
//!
//! Every combinator is implemented with loops over shared nodes or owned
//! buffers. Right folds are rewritten as reverse-then-fold, so no operation
//! recurses in proportion to the length of the list.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::ReferenceCounter;
use super::error::ListError;

/// Internal node structure for the persistent list.
///
/// Each node contains an element and an optional reference to the next node.
/// Reference counting enables structural sharing between lists.
struct Node<T> {
    /// The element stored in this node.
    element: T,
    /// Reference to the next node (if any).
    next: Option<ReferenceCounter<Self>>,
}

/// A persistent (immutable) singly-linked list.
///
/// # Time Complexity
///
/// | Operation    | Complexity |
/// |--------------|------------|
/// | `new`        | O(1)       |
/// | `cons`       | O(1)       |
/// | `head`       | O(1)       |
/// | `tail`       | O(1)       |
/// | `len`        | O(1)       |
/// | `get` / `at` | O(n)       |
/// | `append`     | O(n)       |
/// | `reverse`    | O(n)       |
///
/// # Examples
///
/// ```rust
/// use pictura::persistent::PersistentList;
///
/// let list = PersistentList::singleton(42);
/// assert_eq!(list.head(), Some(&42));
/// ```
#[derive(Clone)]
pub struct PersistentList<T> {
    /// Reference to the head node (if any).
    head: Option<ReferenceCounter<Node<T>>>,
    /// Cached length for O(1) access.
    length: usize,
}

impl<T> PersistentList<T> {
    /// Creates a new empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = PersistentList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            head: None,
            length: 0,
        }
    }

    /// Creates a list containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list = PersistentList::singleton(42);
    /// assert_eq!(list.head(), Some(&42));
    /// assert_eq!(list.len(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::new().cons(element)
    }

    /// Builds a list from a Vec.
    ///
    /// Uses `Vec::pop()` to consume elements from the end, so the list is
    /// built back to front without a separate reversal pass.
    fn build_from_vec(mut elements: Vec<T>) -> Self {
        let length = elements.len();
        let mut head: Option<ReferenceCounter<Node<T>>> = None;
        while let Some(element) = elements.pop() {
            head = Some(ReferenceCounter::new(Node {
                element,
                next: head,
            }));
        }
        Self { head, length }
    }

    /// Prepends an element to the front of the list.
    ///
    /// The new list shares all existing nodes with the original.
    ///
    /// # Complexity
    ///
    /// O(1) time and space
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list = PersistentList::new().cons(3).cons(2).cons(1);
    /// assert_eq!(list.head(), Some(&1));
    /// assert_eq!(list.len(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn cons(&self, element: T) -> Self {
        Self {
            head: Some(ReferenceCounter::new(Node {
                element,
                next: self.head.clone(),
            })),
            length: self.length + 1,
        }
    }

    /// Generates successive values while a condition holds.
    ///
    /// Returns `[seed, step(seed), step(step(seed)), ...]`, stopping before
    /// the first value for which `predicate` is false. If the seed itself
    /// fails the predicate, the result is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let powers = PersistentList::iterate_while(|x| *x < 100, |x| x * 2, 3);
    /// let collected: Vec<i32> = powers.into_iter().collect();
    /// assert_eq!(collected, vec![3, 6, 12, 24, 48, 96]);
    /// ```
    #[must_use]
    pub fn iterate_while<P, F>(predicate: P, step: F, seed: T) -> Self
    where
        P: Fn(&T) -> bool,
        F: Fn(&T) -> T,
    {
        let mut values = Vec::new();
        let mut current = seed;
        while predicate(&current) {
            let next = step(&current);
            values.push(current);
            current = next;
        }
        Self::build_from_vec(values)
    }

    /// Returns a reference to the first element of the list.
    ///
    /// Returns `None` if the list is empty. See [`try_head`] for the
    /// error-carrying variant.
    ///
    /// [`try_head`]: PersistentList::try_head
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list = PersistentList::new().cons(2).cons(1);
    /// assert_eq!(list.head(), Some(&1));
    ///
    /// let empty: PersistentList<i32> = PersistentList::new();
    /// assert_eq!(empty.head(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        self.head.as_ref().map(|node| &node.element)
    }

    /// Returns the list without its first element.
    ///
    /// If the list is empty, returns an empty list. The result shares every
    /// node with the original.
    ///
    /// # Complexity
    ///
    /// O(1) time and space
    #[inline]
    #[must_use]
    pub fn tail(&self) -> Self {
        self.head.as_ref().map_or_else(Self::new, |node| Self {
            head: node.next.clone(),
            length: self.length.saturating_sub(1),
        })
    }

    /// Returns a reference to the first element, or an error on an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyList`] if the list is empty.
    pub fn try_head(&self) -> Result<&T, ListError> {
        self.head().ok_or(ListError::EmptyList { operation: "head" })
    }

    /// Returns the list without its first element, or an error on an empty
    /// list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyList`] if the list is empty.
    pub fn try_tail(&self) -> Result<Self, ListError> {
        if self.is_empty() {
            return Err(ListError::EmptyList { operation: "tail" });
        }
        Ok(self.tail())
    }

    /// Decomposes the list into its head and tail.
    ///
    /// Returns `None` if the list is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list = PersistentList::new().cons(2).cons(1);
    /// if let Some((head, tail)) = list.uncons() {
    ///     assert_eq!(*head, 1);
    ///     assert_eq!(tail.head(), Some(&2));
    /// }
    /// ```
    #[inline]
    #[must_use]
    pub fn uncons(&self) -> Option<(&T, Self)> {
        self.head.as_ref().map(|node| {
            let tail = Self {
                head: node.next.clone(),
                length: self.length.saturating_sub(1),
            };
            (&node.element, tail)
        })
    }

    /// Returns a reference to the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds. See [`at`] for the
    /// error-carrying variant.
    ///
    /// [`at`]: PersistentList::at
    ///
    /// # Complexity
    ///
    /// O(n) where n = index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        let mut current = &self.head;
        let mut remaining = index;

        while let Some(node) = current {
            if remaining == 0 {
                return Some(&node.element);
            }
            remaining -= 1;
            current = &node.next;
        }
        None
    }

    /// Returns a reference to the element at the given index, or an error.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IndexOutOfRange`] if `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=3).collect();
    /// assert_eq!(list.at(2), Ok(&3));
    /// assert!(list.at(3).is_err());
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, ListError> {
        self.get(index).ok_or(ListError::IndexOutOfRange {
            index,
            length: self.length,
        })
    }

    /// Returns the number of elements in the list.
    ///
    /// # Complexity
    ///
    /// O(1) - the length is cached
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the list contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns an iterator over references to the elements.
    ///
    /// The iterator yields elements from front to back and can be restarted
    /// by calling `iter()` again; the underlying list is never consumed.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> PersistentListIterator<'_, T> {
        PersistentListIterator {
            current: self.head.as_ref(),
        }
    }

    /// Finds the index of the first element that satisfies the predicate.
    ///
    /// Returns `Some(index)` if an element is found, `None` otherwise.
    #[must_use]
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.iter().position(predicate)
    }

    /// Returns `true` if all elements satisfy the predicate.
    ///
    /// Short-circuits at the first failing element. Vacuously `true` on an
    /// empty list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// assert!(list.all(|x| *x > 0));
    /// assert!(!list.all(|x| *x < 5));
    /// ```
    #[must_use]
    pub fn all<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().all(predicate)
    }

    /// Returns `true` if any element satisfies the predicate.
    ///
    /// Short-circuits at the first passing element. `false` on an empty list.
    #[must_use]
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().any(predicate)
    }

    /// Applies a function to each element, preserving length and order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=3).collect();
    /// let doubled = list.map(|x| x * 2);
    /// let collected: Vec<i32> = doubled.into_iter().collect();
    /// assert_eq!(collected, vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn map<B, F>(&self, function: F) -> PersistentList<B>
    where
        F: FnMut(&T) -> B,
    {
        self.iter().map(function).collect()
    }

    /// Reduces the list with a left-associated fold.
    ///
    /// `fold_left(op, acc)` over `[x1, x2, ..., xk]` computes
    /// `(((acc op x1) op x2) ... op xk)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// assert_eq!(list.fold_left(0, |accumulator, x| accumulator + x), 15);
    /// ```
    #[must_use]
    pub fn fold_left<B, F>(&self, initial: B, function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.iter().fold(initial, function)
    }

    /// Reduces the list with a right-associated fold.
    ///
    /// `fold_right(last, op)` over `[x1, x2, ..., xk]` computes
    /// `x1 op (x2 op (... (xk op last)))`.
    ///
    /// Implemented as a reverse-then-fold so long lists cannot overflow the
    /// call stack.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=4).collect();
    /// // 1 - (2 - (3 - (4 - 0))) = -2
    /// assert_eq!(list.fold_right(0, |x, accumulator| x - accumulator), -2);
    /// ```
    #[must_use]
    pub fn fold_right<B, F>(&self, last: B, mut function: F) -> B
    where
        F: FnMut(&T, B) -> B,
    {
        let elements: Vec<&T> = self.iter().collect();
        elements
            .into_iter()
            .rev()
            .fold(last, |accumulator, element| function(element, accumulator))
    }

    /// Returns the final subsequence that starts at the first element
    /// violating the predicate.
    ///
    /// The result shares its nodes with the original list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// let dropped = list.drop_while(|x| *x < 3);
    /// let collected: Vec<i32> = dropped.into_iter().collect();
    /// assert_eq!(collected, vec![3, 4, 5]);
    /// ```
    #[must_use]
    pub fn drop_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        let mut current = &self.head;
        let mut skipped = 0;
        while let Some(node) = current {
            if !predicate(&node.element) {
                break;
            }
            skipped += 1;
            current = &node.next;
        }
        Self {
            head: current.clone(),
            length: self.length - skipped,
        }
    }
}

impl<T: Clone> PersistentList<T> {
    /// Generates a list from multiple copies of the same element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list = PersistentList::repeat(3, 'x');
    /// let collected: Vec<char> = list.into_iter().collect();
    /// assert_eq!(collected, vec!['x', 'x', 'x']);
    /// ```
    #[must_use]
    pub fn repeat(count: usize, element: T) -> Self {
        std::iter::repeat_n(element, count).collect()
    }

    /// Creates a list from a slice.
    ///
    /// The first element of the slice becomes the first element of the list.
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        let length = slice.len();
        let mut head: Option<ReferenceCounter<Node<T>>> = None;
        for element in slice.iter().rev() {
            head = Some(ReferenceCounter::new(Node {
                element: element.clone(),
                next: head,
            }));
        }
        Self { head, length }
    }

    /// Appends another list to this list.
    ///
    /// Returns a new list containing all elements from this list followed by
    /// all elements from the other list. This list's nodes are copied; the
    /// other list is shared at the tail, not copied.
    ///
    /// # Complexity
    ///
    /// O(n) where n = `self.len()`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list1: PersistentList<i32> = (1..=2).collect();
    /// let list2: PersistentList<i32> = (3..=4).collect();
    /// let combined = list1.append(&list2);
    ///
    /// let collected: Vec<&i32> = combined.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3, &4]);
    /// ```
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let mut elements: Vec<T> = self.iter().cloned().collect();
        let mut result = other.clone();
        while let Some(element) = elements.pop() {
            result = Self {
                head: Some(ReferenceCounter::new(Node {
                    element,
                    next: result.head,
                })),
                length: result.length + 1,
            };
        }
        result
    }

    /// Returns a new list with elements in reverse order.
    ///
    /// Every element is necessarily copied into a new node, since the link
    /// direction changes.
    ///
    /// # Complexity
    ///
    /// O(n) time and space
    #[must_use]
    pub fn reverse(&self) -> Self {
        let mut result = Self::new();
        for element in self {
            result = result.cons(element.clone());
        }
        result
    }

    /// Returns a new list containing the first `count` elements.
    ///
    /// If `count` exceeds the list's length, the whole list is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// assert_eq!(list.take(3).len(), 3);
    /// assert_eq!(list.take(10).len(), 5);
    /// assert!(list.take(0).is_empty());
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        let actual_count = count.min(self.len());
        self.iter().take(actual_count).cloned().collect()
    }

    /// Returns a new list with the first `count` elements removed.
    ///
    /// If `count` exceeds the list's length, returns an empty list. The
    /// result shares its nodes with the original list.
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        let mut current = self.clone();
        for _ in 0..count.min(self.len()) {
            current = current.tail();
        }
        current
    }

    /// Returns the maximal prefix whose elements all satisfy the predicate.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// let taken = list.take_while(|x| *x < 3);
    /// let collected: Vec<i32> = taken.into_iter().collect();
    /// assert_eq!(collected, vec![1, 2]);
    /// ```
    #[must_use]
    pub fn take_while<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        self.iter()
            .take_while(|element| predicate(element))
            .cloned()
            .collect()
    }

    /// Returns the elements satisfying the predicate, in the original
    /// relative order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=6).collect();
    /// let evens = list.filter(|x| x % 2 == 0);
    /// let collected: Vec<i32> = evens.into_iter().collect();
    /// assert_eq!(collected, vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn filter<P>(&self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        self.iter()
            .filter(|element| predicate(element))
            .cloned()
            .collect()
    }

    /// Folds the list using the first element as the initial accumulator.
    ///
    /// `fold_left1(op)` over `[x1, x2, ..., xk]` computes
    /// `((x1 op x2) ... op xk)`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyList`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// assert_eq!(list.fold_left1(|accumulator, x| accumulator + x), Ok(15));
    /// ```
    pub fn fold_left1<F>(&self, mut function: F) -> Result<T, ListError>
    where
        F: FnMut(T, T) -> T,
    {
        let mut iter = self.iter();
        let Some(first) = iter.next() else {
            return Err(ListError::EmptyList {
                operation: "fold_left1",
            });
        };
        Ok(iter.fold(first.clone(), |accumulator, element| {
            function(accumulator, element.clone())
        }))
    }

    /// Folds the list from the right using the last element as the initial
    /// accumulator.
    ///
    /// `fold_right1(op)` over `[x1, x2, ..., xk]` computes
    /// `x1 op (x2 op (... op xk))`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::EmptyList`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=4).collect();
    /// // 1 - (2 - (3 - 4)) = -2
    /// assert_eq!(list.fold_right1(|x, accumulator| x - accumulator), Ok(-2));
    /// ```
    pub fn fold_right1<F>(&self, mut function: F) -> Result<T, ListError>
    where
        F: FnMut(T, T) -> T,
    {
        let elements: Vec<T> = self.iter().cloned().collect();
        let mut iter = elements.into_iter().rev();
        let Some(last) = iter.next() else {
            return Err(ListError::EmptyList {
                operation: "fold_right1",
            });
        };
        Ok(iter.fold(last, |accumulator, element| function(element, accumulator)))
    }

    /// Combines corresponding elements of two lists with a binary operator.
    ///
    /// The result has the length of the shorter input list; surplus elements
    /// of the longer list are discarded without error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let left: PersistentList<i32> = (1..=3).collect();
    /// let right: PersistentList<i32> = (10..=14).collect();
    /// let sums = left.zip_with(&right, |a, b| a + b);
    /// let collected: Vec<i32> = sums.into_iter().collect();
    /// assert_eq!(collected, vec![11, 13, 15]);
    /// ```
    #[must_use]
    pub fn zip_with<U, C, F>(&self, other: &PersistentList<U>, mut function: F) -> PersistentList<C>
    where
        F: FnMut(&T, &U) -> C,
    {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| function(a, b))
            .collect()
    }

    /// Zips this list with another list into a list of pairs.
    ///
    /// The resulting list has the length of the shorter input list.
    #[must_use]
    pub fn zip<U: Clone>(&self, other: &PersistentList<U>) -> PersistentList<(T, U)> {
        self.zip_with(other, |a, b| (a.clone(), b.clone()))
    }

    /// Returns a new list with the separator inserted between consecutive
    /// elements.
    ///
    /// Empty and singleton lists are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=3).collect();
    /// let collected: Vec<i32> = list.intersperse(0).into_iter().collect();
    /// assert_eq!(collected, vec![1, 0, 2, 0, 3]);
    /// ```
    #[must_use]
    pub fn intersperse(&self, separator: T) -> Self {
        let mut iter = self.iter();
        let Some(first) = iter.next() else {
            return Self::new();
        };

        let mut result = Vec::with_capacity(self.len() * 2 - 1);
        result.push(first.clone());
        for element in iter {
            result.push(separator.clone());
            result.push(element.clone());
        }
        Self::build_from_vec(result)
    }

    /// Partitions the list into consecutive chunks of the given size.
    ///
    /// The last chunk may be shorter than `size`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidChunkSize`] if `size < 1`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list: PersistentList<i32> = (1..=5).collect();
    /// let chunks = list.group(2).unwrap();
    /// assert_eq!(chunks.len(), 3);
    /// assert_eq!(chunks.at(2).unwrap().len(), 1);
    /// ```
    pub fn group(&self, size: usize) -> Result<PersistentList<Self>, ListError> {
        if size < 1 {
            return Err(ListError::InvalidChunkSize { size });
        }
        let mut chunks = Vec::new();
        let mut rest = self.clone();
        while !rest.is_empty() {
            chunks.push(rest.take(size));
            rest = rest.drop_first(size);
        }
        Ok(PersistentList::build_from_vec(chunks))
    }

    /// Copies the elements into a `Vec`, preserving order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

// =============================================================================
// Specialized Methods for Integer Ranges
// =============================================================================

impl PersistentList<i32> {
    /// Returns the integer subrange `[start, end)`.
    ///
    /// Empty when `start >= end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let list = PersistentList::range(1, 4);
    /// let collected: Vec<i32> = list.into_iter().collect();
    /// assert_eq!(collected, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn range(start: i32, end: i32) -> Self {
        (start..end).collect()
    }

    /// Returns the integer subrange `[start, end]`.
    #[must_use]
    pub fn range_closed(start: i32, end: i32) -> Self {
        (start..=end).collect()
    }
}

// =============================================================================
// Specialized Methods for Nested Lists
// =============================================================================

impl<T: Clone> PersistentList<PersistentList<T>> {
    /// Turns rows into columns and columns into rows.
    ///
    /// Rows of unequal length are handled Haskell-style: at each step the
    /// heads of all currently non-empty rows form the next output row, and
    /// rows are discarded as they run out of elements rather than padded.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let rows: PersistentList<PersistentList<i32>> =
    ///     vec![vec![1, 2, 3], vec![4, 5]]
    ///         .into_iter()
    ///         .map(|row| row.into_iter().collect())
    ///         .collect();
    /// let columns = rows.transpose();
    ///
    /// let collected: Vec<Vec<i32>> = columns
    ///     .iter()
    ///     .map(|column| column.to_vec())
    ///     .collect();
    /// assert_eq!(collected, vec![vec![1, 4], vec![2, 5], vec![3]]);
    /// ```
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut rows: Vec<PersistentList<T>> =
            self.iter().filter(|row| !row.is_empty()).cloned().collect();
        let mut transposed: Vec<PersistentList<T>> = Vec::new();

        while !rows.is_empty() {
            let mut column = Vec::with_capacity(rows.len());
            let mut remaining = Vec::with_capacity(rows.len());
            for row in &rows {
                if let Some((head, tail)) = row.uncons() {
                    column.push(head.clone());
                    if !tail.is_empty() {
                        remaining.push(tail);
                    }
                }
            }
            transposed.push(PersistentList::build_from_vec(column));
            rows = remaining;
        }
        Self::build_from_vec(transposed)
    }

    /// Concatenates all inner lists into a single list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pictura::persistent::PersistentList;
    ///
    /// let nested: PersistentList<PersistentList<i32>> =
    ///     vec![vec![1, 2], vec![], vec![3]]
    ///         .into_iter()
    ///         .map(|row| row.into_iter().collect())
    ///         .collect();
    /// let collected: Vec<i32> = nested.flatten().into_iter().collect();
    /// assert_eq!(collected, vec![1, 2, 3]);
    /// ```
    #[must_use]
    pub fn flatten(&self) -> PersistentList<T> {
        let mut elements = Vec::new();
        for inner in self {
            elements.extend(inner.iter().cloned());
        }
        PersistentList::build_from_vec(elements)
    }

    /// Inserts a separator list between each inner list and flattens the
    /// result.
    #[must_use]
    pub fn intercalate(&self, separator: &PersistentList<T>) -> PersistentList<T> {
        let mut iter = self.iter();
        let Some(first) = iter.next() else {
            return PersistentList::new();
        };

        let mut elements: Vec<T> = first.iter().cloned().collect();
        for inner in iter {
            elements.extend(separator.iter().cloned());
            elements.extend(inner.iter().cloned());
        }
        PersistentList::build_from_vec(elements)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PersistentList`].
pub struct PersistentListIterator<'a, T> {
    current: Option<&'a ReferenceCounter<Node<T>>>,
}

impl<'a, T> Iterator for PersistentListIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.current.map(|node| {
            self.current = node.next.as_ref();
            &node.element
        })
    }
}

/// An owning iterator over elements of a [`PersistentList`].
///
/// Elements are cloned out of nodes that are still shared with other lists.
pub struct PersistentListIntoIterator<T> {
    list: PersistentList<T>,
}

impl<T: Clone> Iterator for PersistentListIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((head, tail)) = self.list.uncons() {
            let element = head.clone();
            self.list = tail;
            Some(element)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.length, Some(self.list.length))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentListIntoIterator<T> {
    fn len(&self) -> usize {
        self.list.length
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::build_from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone> IntoIterator for PersistentList<T> {
    type Item = T;
    type IntoIter = PersistentListIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentListIntoIterator { list: self }
    }
}

impl<'a, T> IntoIterator for &'a PersistentList<T> {
    type Item = &'a T;
    type IntoIter = PersistentListIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentList<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PersistentList<T> {}

impl<T: Hash> Hash for PersistentList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the length first to distinguish lists of different lengths
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentList<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // =========================================================================
    // Construction
    // =========================================================================

    #[rstest]
    fn test_new_creates_empty() {
        let list: PersistentList<i32> = PersistentList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
    }

    #[rstest]
    fn test_singleton() {
        let list = PersistentList::singleton(42);
        assert_eq!(list.head(), Some(&42));
        assert_eq!(list.len(), 1);
    }

    #[rstest]
    fn test_cons_does_not_modify_original() {
        let list1 = PersistentList::new().cons(1);
        let list2 = list1.cons(2);
        assert_eq!(list1.len(), 1);
        assert_eq!(list2.len(), 2);
        assert_eq!(list2.head(), Some(&2));
    }

    #[rstest]
    fn test_repeat() {
        let list = PersistentList::repeat(4, 'z');
        assert_eq!(list.len(), 4);
        assert!(list.all(|c| *c == 'z'));
    }

    #[rstest]
    fn test_repeat_zero_is_empty() {
        let list = PersistentList::repeat(0, 'z');
        assert!(list.is_empty());
    }

    #[rstest]
    fn test_range() {
        let list = PersistentList::range(0, 3);
        assert_eq!(list.to_vec(), vec![0, 1, 2]);
        assert!(PersistentList::range(3, 3).is_empty());
    }

    #[rstest]
    fn test_range_closed() {
        let list = PersistentList::range_closed(1, 3);
        assert_eq!(list.to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_iterate_while() {
        let list = PersistentList::iterate_while(|x| *x < 10, |x| x + 3, 1);
        assert_eq!(list.to_vec(), vec![1, 4, 7]);
    }

    #[rstest]
    fn test_iterate_while_failing_seed_is_empty() {
        let list = PersistentList::iterate_while(|x| *x < 0, |x| x + 1, 5);
        assert!(list.is_empty());
    }

    #[rstest]
    fn test_from_slice() {
        let list = PersistentList::from_slice(&[1, 2, 3]);
        assert_eq!(list.head(), Some(&1));
        assert_eq!(list.len(), 3);
    }

    // =========================================================================
    // Access
    // =========================================================================

    #[rstest]
    fn test_head_tail_uncons() {
        let list = PersistentList::new().cons(3).cons(2).cons(1);
        assert_eq!(list.head(), Some(&1));
        assert_eq!(list.tail().head(), Some(&2));
        let (head, tail) = list.uncons().unwrap();
        assert_eq!(*head, 1);
        assert_eq!(tail.len(), 2);
    }

    #[rstest]
    fn test_try_head_on_empty_is_error() {
        let empty: PersistentList<i32> = PersistentList::new();
        assert_eq!(
            empty.try_head(),
            Err(ListError::EmptyList { operation: "head" })
        );
        assert_eq!(empty.try_tail(), Err(ListError::EmptyList { operation: "tail" }));
    }

    #[rstest]
    fn test_try_head_on_non_empty() {
        let list = PersistentList::singleton(9);
        assert_eq!(list.try_head(), Ok(&9));
        assert!(list.try_tail().unwrap().is_empty());
    }

    #[rstest]
    fn test_at_in_range() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(list.at(0), Ok(&1));
        assert_eq!(list.at(2), Ok(&3));
    }

    #[rstest]
    fn test_at_out_of_range_is_error() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(
            list.at(3),
            Err(ListError::IndexOutOfRange {
                index: 3,
                length: 3
            })
        );
    }

    // =========================================================================
    // Combinators
    // =========================================================================

    #[rstest]
    fn test_append_shares_tail() {
        let list1: PersistentList<i32> = (1..=2).collect();
        let list2: PersistentList<i32> = (3..=4).collect();
        let combined = list1.append(&list2);
        assert_eq!(combined.to_vec(), vec![1, 2, 3, 4]);
        // both inputs unchanged
        assert_eq!(list1.len(), 2);
        assert_eq!(list2.len(), 2);
    }

    #[rstest]
    fn test_reverse() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(list.reverse().to_vec(), vec![3, 2, 1]);
    }

    #[rstest]
    #[case(0, vec![])]
    #[case(2, vec![1, 2])]
    #[case(9, vec![1, 2, 3, 4, 5])]
    fn test_take_saturates(#[case] count: usize, #[case] expected: Vec<i32>) {
        let list: PersistentList<i32> = (1..=5).collect();
        assert_eq!(list.take(count).to_vec(), expected);
    }

    #[rstest]
    #[case(0, vec![1, 2, 3, 4, 5])]
    #[case(2, vec![3, 4, 5])]
    #[case(9, vec![])]
    fn test_drop_first_saturates(#[case] count: usize, #[case] expected: Vec<i32>) {
        let list: PersistentList<i32> = (1..=5).collect();
        assert_eq!(list.drop_first(count).to_vec(), expected);
    }

    #[rstest]
    fn test_take_while_and_drop_while_partition() {
        let list: PersistentList<i32> = (1..=6).collect();
        let prefix = list.take_while(|x| *x < 4);
        let suffix = list.drop_while(|x| *x < 4);
        assert_eq!(prefix.to_vec(), vec![1, 2, 3]);
        assert_eq!(suffix.to_vec(), vec![4, 5, 6]);
    }

    #[rstest]
    fn test_filter_preserves_order() {
        let list: PersistentList<i32> = (1..=10).collect();
        assert_eq!(list.filter(|x| x % 3 == 0).to_vec(), vec![3, 6, 9]);
    }

    #[rstest]
    fn test_find_index() {
        let list: PersistentList<i32> = (1..=5).collect();
        assert_eq!(list.find_index(|x| *x > 3), Some(3));
        assert_eq!(list.find_index(|x| *x > 9), None);
    }

    #[rstest]
    fn test_all_any_short_circuit() {
        let list: PersistentList<i32> = (1..=5).collect();
        assert!(list.all(|x| *x <= 5));
        assert!(!list.all(|x| *x < 5));
        assert!(list.any(|x| *x == 3));
        assert!(!list.any(|x| *x == 7));

        let empty: PersistentList<i32> = PersistentList::new();
        assert!(empty.all(|_| false));
        assert!(!empty.any(|_| true));
    }

    #[rstest]
    fn test_map() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(list.map(|x| x * x).to_vec(), vec![1, 4, 9]);
    }

    #[rstest]
    fn test_fold_left_bracketing() {
        let list: PersistentList<i32> = (1..=4).collect();
        // ((((10 - 1) - 2) - 3) - 4) = 0
        assert_eq!(list.fold_left(10, |accumulator, x| accumulator - x), 0);
    }

    #[rstest]
    fn test_fold_right_bracketing() {
        let list: PersistentList<i32> = (1..=4).collect();
        // 1 - (2 - (3 - (4 - 0))) = -2
        assert_eq!(list.fold_right(0, |x, accumulator| x - accumulator), -2);
    }

    #[rstest]
    fn test_fold_left1() {
        let list: PersistentList<i32> = (1..=5).collect();
        assert_eq!(list.fold_left1(|a, b| a + b), Ok(15));
    }

    #[rstest]
    fn test_fold_right1() {
        let list: PersistentList<i32> = (1..=4).collect();
        assert_eq!(list.fold_right1(|a, b| a - b), Ok(-2));
    }

    #[rstest]
    fn test_fold1_on_empty_is_error() {
        let empty: PersistentList<i32> = PersistentList::new();
        assert_eq!(
            empty.fold_left1(|a, b| a + b),
            Err(ListError::EmptyList {
                operation: "fold_left1"
            })
        );
        assert_eq!(
            empty.fold_right1(|a, b| a + b),
            Err(ListError::EmptyList {
                operation: "fold_right1"
            })
        );
    }

    #[rstest]
    fn test_fold_right_on_long_list_does_not_overflow() {
        let list: PersistentList<i64> = (0..10_000).collect();
        assert_eq!(
            list.fold_right(0, |x, accumulator| x + accumulator),
            49_995_000
        );
    }

    #[rstest]
    fn test_zip_with_truncates_to_shorter() {
        let short: PersistentList<i32> = (1..=3).collect();
        let long: PersistentList<i32> = (1..=5).collect();
        let zipped = short.zip_with(&long, |a, b| a + b);
        assert_eq!(zipped.len(), 3);
        assert_eq!(zipped.to_vec(), vec![2, 4, 6]);
    }

    #[rstest]
    fn test_zip() {
        let numbers: PersistentList<i32> = (1..=2).collect();
        let letters: PersistentList<char> = ['a', 'b', 'c'].into_iter().collect();
        assert_eq!(numbers.zip(&letters).to_vec(), vec![(1, 'a'), (2, 'b')]);
    }

    #[rstest]
    fn test_intersperse() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(list.intersperse(0).to_vec(), vec![1, 0, 2, 0, 3]);
    }

    #[rstest]
    fn test_intersperse_singleton_and_empty_unaffected() {
        let single = PersistentList::singleton(1);
        assert_eq!(single.intersperse(0).to_vec(), vec![1]);
        let empty: PersistentList<i32> = PersistentList::new();
        assert!(empty.intersperse(0).is_empty());
    }

    #[rstest]
    fn test_group_last_chunk_may_be_short() {
        let list: PersistentList<i32> = (1..=5).collect();
        let chunks = list.group(2).unwrap();
        let collected: Vec<Vec<i32>> = chunks.iter().map(|chunk| chunk.to_vec()).collect();
        assert_eq!(collected, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }

    #[rstest]
    fn test_group_zero_is_error() {
        let list: PersistentList<i32> = (1..=5).collect();
        assert_eq!(list.group(0), Err(ListError::InvalidChunkSize { size: 0 }));
    }

    #[rstest]
    fn test_group_of_empty_is_empty() {
        let empty: PersistentList<i32> = PersistentList::new();
        assert!(empty.group(3).unwrap().is_empty());
    }

    // =========================================================================
    // Nested Lists
    // =========================================================================

    fn nested(rows: Vec<Vec<i32>>) -> PersistentList<PersistentList<i32>> {
        rows.into_iter()
            .map(|row| row.into_iter().collect())
            .collect()
    }

    #[rstest]
    fn test_transpose_rectangular() {
        let rows = nested(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let columns = rows.transpose();
        let collected: Vec<Vec<i32>> = columns.iter().map(|column| column.to_vec()).collect();
        assert_eq!(collected, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
    }

    #[rstest]
    fn test_transpose_ragged_drops_exhausted_rows() {
        let rows = nested(vec![vec![1, 2, 3], vec![4, 5]]);
        let columns = rows.transpose();
        let collected: Vec<Vec<i32>> = columns.iter().map(|column| column.to_vec()).collect();
        assert_eq!(collected, vec![vec![1, 4], vec![2, 5], vec![3]]);
    }

    #[rstest]
    fn test_transpose_skips_empty_rows() {
        let rows = nested(vec![vec![], vec![1, 2], vec![3]]);
        let columns = rows.transpose();
        let collected: Vec<Vec<i32>> = columns.iter().map(|column| column.to_vec()).collect();
        assert_eq!(collected, vec![vec![1, 3], vec![2]]);
    }

    #[rstest]
    fn test_transpose_of_empty_is_empty() {
        let rows: PersistentList<PersistentList<i32>> = PersistentList::new();
        assert!(rows.transpose().is_empty());
    }

    #[rstest]
    fn test_flatten() {
        let rows = nested(vec![vec![1], vec![], vec![2, 3]]);
        assert_eq!(rows.flatten().to_vec(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_intercalate() {
        let rows = nested(vec![vec![1, 2], vec![3, 4]]);
        let separator: PersistentList<i32> = PersistentList::singleton(0);
        assert_eq!(rows.intercalate(&separator).to_vec(), vec![1, 2, 0, 3, 4]);
    }

    // =========================================================================
    // Standard Traits
    // =========================================================================

    #[rstest]
    fn test_eq_is_structural_and_ordered() {
        let list1: PersistentList<i32> = (1..=3).collect();
        let list2: PersistentList<i32> = (1..=3).collect();
        let reversed = list1.reverse();
        assert_eq!(list1, list2);
        assert_ne!(list1, reversed);
    }

    #[rstest]
    fn test_empty_lists_are_equal() {
        let left: PersistentList<i32> = PersistentList::new();
        let right: PersistentList<i32> = PersistentList::new();
        assert_eq!(left, right);
    }

    #[rstest]
    fn test_display() {
        let list: PersistentList<i32> = (1..=3).collect();
        assert_eq!(format!("{list}"), "[1, 2, 3]");
        let empty: PersistentList<i32> = PersistentList::new();
        assert_eq!(format!("{empty}"), "[]");
    }

    #[rstest]
    fn test_iter_is_restartable() {
        let list: PersistentList<i32> = (1..=3).collect();
        let first: Vec<&i32> = list.iter().collect();
        let second: Vec<&i32> = list.iter().collect();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_hash_consistent_with_eq() {
        use std::collections::HashMap;

        let mut map: HashMap<PersistentList<i32>, &str> = HashMap::new();
        let key: PersistentList<i32> = (1..=3).collect();
        map.insert(key.clone(), "value");
        assert_eq!(map.get(&key), Some(&"value"));
    }
}
