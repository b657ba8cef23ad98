//! # pictura
//!
//! A functional text-composition library for Rust providing persistent lists
//! and a rectangular picture algebra.
//!
//! ## Overview
//!
//! This library has two layers:
//!
//! - **Persistent List**: [`persistent::PersistentList`], an immutable
//!   singly-linked list with structural sharing and a comprehensive set of
//!   combinators (folds, zips, ragged transpose, grouping, interspersion).
//! - **Picture Algebra**: [`picture::Picture`], an immutable rectangular block
//!   of characters stored as a list of lists, with alignment, padding,
//!   clipping, reflection, rotation, borders, and table assembly. Every
//!   picture operation is a composition of list combinators.
//!
//! ## Example
//!
//! ```rust
//! use pictura::picture::Picture;
//!
//! let cell = |glyph: char| Picture::solid(1, 1, glyph);
//! let row = Picture::table_row(
//!     &[cell('X'), cell('Y')].into_iter().collect(),
//!     Picture::TOP,
//! )
//! .unwrap();
//! assert_eq!(row.to_string(), "|X|Y|");
//! ```
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc` for structural sharing, making every
//!   structure shareable across threads.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use pictura::prelude::*;
/// ```
pub mod prelude {
    pub use crate::persistent::*;
    pub use crate::picture::*;
}

pub mod persistent;

pub mod picture;
