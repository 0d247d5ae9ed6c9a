//! This crate provides the
//! [`DynamicArray`](crate::generic::DynamicArray)
//! data structure: a contiguous growable array whose buffer doubles when full
//! and halves once it is less than a quarter full.
//! Alternating pushes and pops at a capacity boundary hence never reallocate
//! over and over.
//!
//! Every operation that could fail returns a [`Result`] instead of panicking:
//! out-of-range indices, popping from an empty array, or mutating an array that
//! has been flagged read-only are all reported with an [`Error`], and leave the
//! array untouched.
//!
//! ## Basic usage
//!
//! ```rust
//! use dynamic_array::DynamicArray;
//!
//! let mut array: DynamicArray<i32> = DynamicArray::new();
//! array.push(5)?;
//! array.push(3)?;
//! array.push(8)?;
//! array.push(1)?;
//! array.sort()?;
//! assert_eq!(array, [1, 3, 5, 8]);
//! # Ok::<(), dynamic_array::Error>(())
//! ```
//!
//! An array can be frozen:
//! ```rust
//! # use dynamic_array::{DynamicArray, Error};
//! let mut array: DynamicArray<i32> = vec![1, 2, 3].into();
//! array.set_read_only(true);
//! assert_eq!(array.push(4), Err(Error::ReadOnly));
//! assert_eq!(array.get(2), Ok(&3));
//! ```
//!
//! ## Metadata formats
//!
//! The length and capacity of an array are stored in a metadata format given as type parameter.
//! [`wide::DynamicArray`] (the default) stores them as two `usize`, while on 64-bit targets
//! [`lean::DynamicArray`] packs them with the read-only flag into a single `usize`.

pub mod raw;
pub mod error;
pub mod generic;
pub mod sort;
pub mod wide;
#[cfg(target_pointer_width = "64")]
pub mod lean;
#[cfg(not(target_pointer_width = "64"))]
pub mod lean {
	/// Re-exports `wide` for non-64-bit targets
	pub use super::wide::*;
}

pub use error::{
	Error,
	Result
};
pub use generic::DEFAULT_CAPACITY;
pub use wide::DynamicArray;
