//! Errors reported by fallible array operations.

use std::{
	error,
	fmt
};

/// Errors that can occur while accessing or mutating a [`DynamicArray`](crate::generic::DynamicArray).
///
/// A failed operation never mutates the array: length, capacity and contents
/// are left as they were.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
	/// A mutation was attempted on a read-only array.
	ReadOnly,

	/// An index outside of `[0, len)` (or `[0, len]` for insertion).
	Index {
		/// The offending index.
		index: usize,
		/// Length of the array at the time of the call.
		len: usize
	},

	/// The tail was removed from an empty array.
	Empty,

	/// A capacity change targeted a capacity below the current length,
	/// or above what the metadata format can represent.
	Capacity {
		/// Requested capacity.
		requested: usize,
		/// Length of the array at the time of the call.
		len: usize,
		/// Maximum capacity of the metadata format.
		max: usize
	},

	/// An operation needed to inspect an element that is absent (`None`).
	NullValue {
		/// Index of the first absent element.
		index: usize
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::ReadOnly => f.write_str("array is read-only"),
			Self::Index { index, len } => {
				write!(f, "index {} is out of bounds for length {}", index, len)
			},
			Self::Empty => f.write_str("array is empty"),
			Self::Capacity { requested, len, max } => {
				write!(f, "invalid capacity {}: must be between length {} and maximum {}", requested, len, max)
			},
			Self::NullValue { index } => {
				write!(f, "element at index {} is absent", index)
			}
		}
	}
}

impl error::Error for Error {}

/// Result of a fallible array operation.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_offending_values() {
		assert_eq!(Error::Index { index: 5, len: 3 }.to_string(), "index 5 is out of bounds for length 3");
		assert_eq!(
			Error::Capacity { requested: 1, len: 4, max: 10 }.to_string(),
			"invalid capacity 1: must be between length 4 and maximum 10"
		);
		assert_eq!(Error::NullValue { index: 2 }.to_string(), "element at index 2 is absent");
	}

	#[test]
	fn is_a_std_error() {
		let error: Box<dyn error::Error> = Box::new(Error::ReadOnly);
		assert_eq!(error.to_string(), "array is read-only");
	}
}
