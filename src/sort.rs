//! Stable top-down merge sort driven by a strict "comes before" predicate.
use core::ptr;

use crate::raw::RawBuffer;

/// Sorts `v` with a stable merge sort.
///
/// `is_lower(a, b)` must return `true` when `a` strictly comes before `b`.
/// Elements for which `is_lower` reports neither order keep their relative order.
///
/// If `is_lower` panics, `v` is left as a permutation of its original elements.
pub fn merge_sort<T, F>(v: &mut [T], is_lower: &mut F) where F: FnMut(&T, &T) -> bool {
	match v.len() {
		0 | 1 => (),
		2 => {
			if is_lower(&v[1], &v[0]) {
				v.swap(0, 1)
			}
		},
		len => {
			let mid = (len - 1) / 2 + 1;
			{
				let (left, right) = v.split_at_mut(mid);
				merge_sort(left, is_lower);
				merge_sort(right, is_lower);
			}
			merge(v, mid, is_lower)
		}
	}
}

/// Merges the sorted runs `v[..mid]` and `v[mid..]`.
///
/// The merged order is decided before any element is moved, so the predicate
/// never runs while the slice is in an intermediate state.
fn merge<T, F>(v: &mut [T], mid: usize, is_lower: &mut F) where F: FnMut(&T, &T) -> bool {
	let len = v.len();

	let mut order = Vec::with_capacity(len);
	let (mut left, mut right) = (0, mid);
	while left < mid && right < len {
		// ties take the left run.
		if is_lower(&v[right], &v[left]) {
			order.push(right);
			right += 1;
		} else {
			order.push(left);
			left += 1;
		}
	}
	order.extend(left..mid);
	order.extend(right..len);

	let mut scratch = RawBuffer::<T>::allocate(len);
	unsafe {
		let src = v.as_mut_ptr();
		let dst = scratch.as_mut_ptr();
		for (i, &from) in order.iter().enumerate() {
			ptr::copy_nonoverlapping(src.add(from), dst.add(i), 1);
		}
		ptr::copy_nonoverlapping(dst, src, len);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::panic::{
		self,
		AssertUnwindSafe
	};

	fn sorted(mut v: Vec<i32>) -> Vec<i32> {
		merge_sort(&mut v, &mut |a: &i32, b: &i32| a < b);
		v
	}

	#[test]
	fn sorts_small_ranges() {
		assert_eq!(sorted(vec![]), Vec::<i32>::new());
		assert_eq!(sorted(vec![1]), vec![1]);
		assert_eq!(sorted(vec![2, 1]), vec![1, 2]);
		assert_eq!(sorted(vec![3, 1, 2]), vec![1, 2, 3]);
		assert_eq!(sorted(vec![5, 3, 8, 1]), vec![1, 3, 5, 8]);
	}

	#[test]
	fn descending_predicate() {
		let mut v = vec![4, 9, 1, 7, 7, 2];
		merge_sort(&mut v, &mut |a: &i32, b: &i32| a > b);
		assert_eq!(v, vec![9, 7, 7, 4, 2, 1]);
	}

	#[test]
	fn equal_pair_is_not_swapped() {
		let mut v = vec![(1, 'a'), (1, 'b')];
		merge_sort(&mut v, &mut |a: &(i32, char), b: &(i32, char)| a.0 < b.0);
		assert_eq!(v, vec![(1, 'a'), (1, 'b')]);
	}

	#[test]
	fn panicking_predicate_keeps_every_element() {
		let mut v: Vec<String> = (0..9).rev().map(|i| i.to_string()).collect();
		let mut calls = 0;
		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			merge_sort(&mut v, &mut |a: &String, b: &String| {
				calls += 1;
				if calls == 12 {
					panic!("comparison failed")
				}
				a < b
			})
		}));
		assert!(result.is_err());

		let mut remaining = v.clone();
		remaining.sort();
		let expected: Vec<String> = (0..9).map(|i| i.to_string()).collect();
		assert_eq!(remaining, expected);
	}

	mod proptests {
		use super::*;
		use proptest::prelude::*;

		proptest! {
			#[test]
			fn matches_std_stable_sort(pairs in proptest::collection::vec((0u8..8, any::<u16>()), 0..64)) {
				let mut expected = pairs.clone();
				expected.sort_by_key(|p| p.0);

				let mut actual = pairs;
				merge_sort(&mut actual, &mut |a: &(u8, u16), b: &(u8, u16)| a.0 < b.0);
				prop_assert_eq!(actual, expected);
			}

			#[test]
			fn sorting_is_idempotent(values in proptest::collection::vec(any::<i32>(), 0..64)) {
				let once = sorted(values);
				let twice = sorted(once.clone());
				prop_assert_eq!(once, twice);
			}
		}
	}
}
