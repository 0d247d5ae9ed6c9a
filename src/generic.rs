use core::{
	cmp,
	fmt,
	hash::{
		Hash,
		Hasher
	},
	iter::FusedIterator,
	marker::PhantomData,
	mem::{
		self,
		ManuallyDrop
	},
	ops::Deref,
	ptr::{
		self,
		NonNull
	},
	slice
};

use crate::{
	error::{
		Error,
		Result
	},
	raw::{
		capacity_overflow,
		RawBuffer
	},
	sort
};

/// Capacity of an array created with [`DynamicArray::new`] or reset with [`DynamicArray::clear`].
pub const DEFAULT_CAPACITY: usize = 2;

/// Metadata representing the length, capacity and read-only flag of the array.
///
/// This crate provides two implementation of this trait:
/// [`wide::Meta`](crate::wide::Meta) stores the length and capacity with two `usize`.
/// Then the maximum size/capacity depends on the bit-depth of the plateform.
/// For 64-bit plateforms, this crate also provides [`lean::Meta`](crate::lean::Meta) that stores
/// the length, capacity and flag on a single `usize`.
/// As a result, the maximum size/capacity is `2^31 - 1`.
///
/// ## Safety
///
/// Every getter must return exactly what was last given to the matching setter
/// (or to `new`), for any value up to `MAX_LENGTH`.
/// The array relies on this to know which slots are initialized.
pub unsafe trait Meta: Copy {
	/// Maximum size/capacity of the array using this metadata format.
	const MAX_LENGTH: usize;

	/// Create a new writable metadata from an array's length and capacity.
	fn new(len: usize, capacity: usize) -> Self;

	/// Get the length of the array.
	fn len(&self) -> usize;

	/// Get the capacity of the buffer.
	fn capacity(&self) -> usize;

	/// Set the new length of the array.
	fn set_len(&mut self, len: usize);

	/// Set the new capacity of the buffer.
	fn set_capacity(&mut self, capacity: usize);

	fn is_read_only(&self) -> bool;

	fn set_read_only(&mut self, read_only: bool);
}

/// Contiguous growable array type with a hysteresis capacity policy.
///
/// The buffer doubles when a push or insertion finds it full,
/// and halves when a removal leaves it less than a quarter full,
/// so that alternating pushes and pops at a boundary never thrash.
///
/// An array can be flagged read-only, in which case every mutating operation
/// fails with [`Error::ReadOnly`] and leaves the array untouched.
///
/// Elements are moved in and out of the array.
/// The `*_cloned` variants and [`Clone`] are the only places where elements are duplicated.
///
/// The maximum capacity depends on the metadata format used,
/// given as type parameter `M` implementing the [`Meta`] trait.
///
/// # Examples
///
/// ```
/// # use dynamic_array::DynamicArray;
/// let mut array: DynamicArray<i32> = DynamicArray::new();
/// array.push(5)?;
/// array.push(3)?;
/// array.push(8)?;
/// array.push(1)?;
///
/// array.sort_by_lower(|a, b| a < b)?;
/// assert_eq!(array, [1, 3, 5, 8]);
/// assert_eq!(array.find(&8), Some(3));
///
/// assert_eq!(array.remove(1)?, 3);
/// assert_eq!(array.pop()?, 8);
/// assert_eq!(array.to_string(), "[1, 5]");
/// # Ok::<(), dynamic_array::Error>(())
/// ```
pub struct DynamicArray<M: Meta, T> {
	/// Metadata storing the length and capacity of the array.
	meta: M,

	/// Start of the buffer, dangling when nothing is allocated.
	ptr: NonNull<T>,

	/// The array owns values of type `T`.
	marker: PhantomData<T>
}

impl<M: Meta, T> Drop for DynamicArray<M, T> {
	fn drop(&mut self) {
		unsafe {
			// drop every element.
			ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len()));

			// free memory.
			drop(RawBuffer::from_raw_parts(self.ptr, self.capacity()))
		}
	}
}

impl<M: Meta, T> DynamicArray<M, T> {
	/// Creates a new empty array with capacity [`DEFAULT_CAPACITY`].
	#[inline]
	pub fn new() -> Self {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	/// Creates a new empty array with exactly the given capacity.
	///
	/// # Panics
	///
	/// Panics if `capacity` exceeds `M::MAX_LENGTH`.
	pub fn with_capacity(capacity: usize) -> Self {
		if capacity > M::MAX_LENGTH {
			capacity_overflow()
		}

		let (ptr, capacity) = RawBuffer::<T>::allocate(capacity).into_raw_parts();
		DynamicArray {
			meta: M::new(0, capacity),
			ptr,
			marker: PhantomData
		}
	}

	/// Capacity used by the filled constructors:
	/// the smallest power of two holding `len` elements, and at least [`DEFAULT_CAPACITY`].
	fn initial_capacity(len: usize) -> usize {
		match len.checked_next_power_of_two() {
			Some(capacity) if capacity <= M::MAX_LENGTH => cmp::max(capacity, DEFAULT_CAPACITY),
			_ => len
		}
	}

	/// Returns the length of the array.
	#[inline]
	pub fn len(&self) -> usize {
		self.meta.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of elements the buffer can hold before it must grow.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.meta.capacity()
	}

	#[inline]
	pub fn is_read_only(&self) -> bool {
		self.meta.is_read_only()
	}

	/// Sets or clears the read-only flag.
	///
	/// This is always permitted, even on a read-only array.
	#[inline]
	pub fn set_read_only(&mut self, read_only: bool) {
		self.meta.set_read_only(read_only)
	}

	#[inline]
	fn check_writable(&self) -> Result<()> {
		if self.is_read_only() {
			log::debug!("rejected mutation of a read-only array (len {})", self.len());
			Err(Error::ReadOnly)
		} else {
			Ok(())
		}
	}

	/// Extracts a slice containing the entire array.
	///
	/// Equivalent to `&s[..]`.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		unsafe {
			slice::from_raw_parts(self.ptr.as_ptr(), self.len())
		}
	}

	/// Mutable view of the live elements, ignoring the read-only flag.
	#[inline]
	fn slice_mut(&mut self) -> &mut [T] {
		unsafe {
			slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len())
		}
	}

	/// Extracts a mutable slice of the entire array.
	pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
		self.check_writable()?;
		Ok(self.slice_mut())
	}

	/// Returns an iterator over mutable references to the elements.
	pub fn iter_mut(&mut self) -> Result<slice::IterMut<'_, T>> {
		Ok(self.as_mut_slice()?.iter_mut())
	}

	/// Returns a reference to the element at `index`.
	pub fn get(&self, index: usize) -> Result<&T> {
		let len = self.len();
		self.as_slice().get(index).ok_or(Error::Index { index, len })
	}

	/// Returns a mutable reference to the element at `index`.
	pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
		self.check_writable()?;
		let len = self.len();
		self.slice_mut().get_mut(index).ok_or(Error::Index { index, len })
	}

	/// Replaces the element at `index` with `value`, returning the previous element.
	///
	/// On failure `value` is dropped.
	pub fn set(&mut self, index: usize, value: T) -> Result<T> {
		let slot = self.get_mut(index)?;
		Ok(mem::replace(slot, value))
	}

	/// Moves the live elements into a fresh buffer of exactly `new_capacity` slots.
	///
	/// This is the only place where the buffer is reallocated
	/// (apart from [`remove`](Self::remove) which compacts while relocating).
	fn relocate(&mut self, new_capacity: usize) {
		let len = self.len();
		let capacity = self.capacity();
		debug_assert!(new_capacity >= len);

		if new_capacity == capacity {
			return
		}

		log::trace!("relocating buffer: capacity {} -> {} (len {})", capacity, new_capacity, len);
		let mut buffer = RawBuffer::allocate(new_capacity);
		unsafe {
			ptr::copy_nonoverlapping(self.ptr.as_ptr(), buffer.as_mut_ptr(), len);
		}
		self.replace_buffer(buffer)
	}

	/// Installs `buffer` and frees the previous one without dropping anything in it.
	///
	/// The caller must already have moved the live elements into `buffer`.
	fn replace_buffer(&mut self, buffer: RawBuffer<T>) {
		let (ptr, capacity) = buffer.into_raw_parts();
		let previous = unsafe { RawBuffer::from_raw_parts(self.ptr, self.capacity()) };
		self.ptr = ptr;
		self.meta.set_capacity(capacity);
		drop(previous)
	}

	/// Makes room for `additional` more elements, doubling the capacity if needed.
	fn grow_amortized(&mut self, additional: usize) {
		let len = self.len();
		let required = match len.checked_add(additional) {
			Some(required) => required,
			None => capacity_overflow()
		};

		if required <= self.capacity() {
			return
		}

		// A capacity of 0 or 1 escapes to 1 and then doubles.
		let capacity = cmp::max(cmp::max(len.saturating_mul(2), required), 1);
		let capacity = cmp::min(capacity, M::MAX_LENGTH);
		if capacity < required {
			capacity_overflow()
		}

		self.relocate(capacity)
	}

	/// Capacity the buffer should have once it holds `len` elements after a removal.
	#[inline]
	fn shrunk_capacity(len: usize, capacity: usize) -> usize {
		if len < capacity / 4 {
			capacity / 2
		} else {
			capacity
		}
	}

	fn shrink_amortized(&mut self) {
		let capacity = Self::shrunk_capacity(self.len(), self.capacity());
		self.relocate(capacity)
	}

	/// Changes the capacity of the buffer to exactly `new_capacity`.
	///
	/// Unlike `Vec::reserve`, this is an absolute capacity and may shrink the buffer.
	///
	/// # Errors
	///
	/// Fails with [`Error::Capacity`] if `new_capacity` is smaller than the length
	/// or larger than `M::MAX_LENGTH`, and with [`Error::ReadOnly`] if the array is read-only.
	///
	/// ```
	/// # use dynamic_array::{DynamicArray, Error};
	/// let mut array: DynamicArray<char> = "abc".chars().collect();
	/// array.reserve(16)?;
	/// assert_eq!(array.capacity(), 16);
	/// assert!(matches!(array.reserve(2), Err(Error::Capacity { .. })));
	/// # Ok::<(), Error>(())
	/// ```
	pub fn reserve(&mut self, new_capacity: usize) -> Result<()> {
		self.check_writable()?;

		let len = self.len();
		if new_capacity < len || new_capacity > M::MAX_LENGTH {
			return Err(Error::Capacity {
				requested: new_capacity,
				len,
				max: M::MAX_LENGTH
			})
		}

		self.relocate(new_capacity);
		Ok(())
	}

	/// Shrinks the capacity of the buffer to exactly the length of the array.
	pub fn shrink_to_fit(&mut self) -> Result<()> {
		self.check_writable()?;
		self.relocate(self.len());
		Ok(())
	}

	/// Appends an element to the back of the array.
	///
	/// If the buffer is full, its capacity is doubled first.
	/// On failure `value` is dropped.
	#[inline]
	pub fn push(&mut self, value: T) -> Result<()> {
		self.check_writable()?;
		self.push_unchecked(value);
		Ok(())
	}

	/// Push ignoring the read-only flag.
	#[inline]
	fn push_unchecked(&mut self, value: T) {
		let len = self.len();
		if len == self.capacity() {
			self.grow_amortized(1);
		}

		unsafe {
			ptr::write(self.ptr.as_ptr().add(len), value);
			self.meta.set_len(len + 1);
		}
	}

	/// Removes the last element and returns it.
	///
	/// The buffer is halved if the array is left less than a quarter full.
	pub fn pop(&mut self) -> Result<T> {
		self.check_writable()?;

		let len = self.len();
		if len == 0 {
			return Err(Error::Empty)
		}

		let value = unsafe {
			self.meta.set_len(len - 1);
			ptr::read(self.ptr.as_ptr().add(len - 1))
		};

		self.shrink_amortized();
		Ok(value)
	}

	/// Inserts an element at position `index`, shifting all elements after it to the right.
	///
	/// `index` may be equal to the length, in which case this is a push.
	pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
		self.check_writable()?;

		let len = self.len();
		if index > len {
			return Err(Error::Index { index, len })
		}

		// space for the new element
		if len == self.capacity() {
			self.grow_amortized(1);
		}

		unsafe {
			let p = self.ptr.as_ptr().add(index);
			// Shift everything over to make space. (Duplicating the
			// `index`th element into two consecutive places.)
			ptr::copy(p, p.add(1), len - index);
			// Write it in, overwriting the first copy of the `index`th
			// element.
			ptr::write(p, value);
			self.meta.set_len(len + 1);
		}

		Ok(())
	}

	/// Removes and returns the element at position `index`, shifting all elements after it to the left.
	///
	/// The shrink test is made with the length the array will have after the removal.
	/// When it calls for a smaller buffer, the remaining elements are moved into the new buffer in a
	/// single pass that skips the removed element. Otherwise they are compacted in place.
	///
	/// ```
	/// # use dynamic_array::{DynamicArray, Error};
	/// let mut array: DynamicArray<i32> = DynamicArray::with_capacity(8);
	/// array.extend(vec![1, 2, 3]);
	///
	/// assert_eq!(array.remove(0)?, 1);
	/// assert_eq!(array.capacity(), 8);
	/// assert_eq!(array.remove(0)?, 2); // 1 < 8 / 4
	/// assert_eq!(array.capacity(), 4);
	/// assert_eq!(array, [3]);
	///
	/// assert_eq!(array.remove(5), Err(Error::Index { index: 5, len: 1 }));
	/// # Ok::<(), Error>(())
	/// ```
	pub fn remove(&mut self, index: usize) -> Result<T> {
		self.check_writable()?;

		let len = self.len();
		if index >= len {
			return Err(Error::Index { index, len })
		}

		let capacity = self.capacity();
		let new_capacity = Self::shrunk_capacity(len - 1, capacity);

		// allocate before anything is moved out.
		let buffer = if new_capacity == capacity {
			None
		} else {
			log::trace!("relocating buffer: capacity {} -> {} (len {})", capacity, new_capacity, len - 1);
			Some(RawBuffer::<T>::allocate(new_capacity))
		};

		unsafe {
			let src = self.ptr.as_ptr();
			let value = ptr::read(src.add(index));

			match buffer {
				Some(mut buffer) => {
					let dst = buffer.as_mut_ptr();
					ptr::copy_nonoverlapping(src, dst, index);
					ptr::copy_nonoverlapping(src.add(index + 1), dst.add(index), len - index - 1);
					self.meta.set_len(len - 1);
					self.replace_buffer(buffer)
				},
				None => {
					// Shift everything down to fill in that spot.
					ptr::copy(src.add(index + 1), src.add(index), len - index - 1);
					self.meta.set_len(len - 1)
				}
			}

			Ok(value)
		}
	}

	/// Removes the first element matching `predicate`.
	///
	/// Returns `Ok(None)` without touching the array if nothing matches.
	pub fn remove_item_by<F>(&mut self, predicate: F) -> Result<Option<T>> where F: FnMut(&T) -> bool {
		self.check_writable()?;

		match self.find_by(predicate) {
			Some(index) => self.remove(index).map(Some),
			None => Ok(None)
		}
	}

	/// Removes the first element equal to `item`.
	#[inline]
	pub fn remove_item(&mut self, item: &T) -> Result<Option<T>> where T: PartialEq {
		self.remove_item_by(|element| element == item)
	}

	/// Drops every element past `len`, then applies the shrink policy once.
	///
	/// If `len` is greater than the array's current length, this has no effect.
	pub fn truncate(&mut self, len: usize) -> Result<()> {
		self.check_writable()?;

		if self.drop_tail(len) {
			self.shrink_amortized()
		}

		Ok(())
	}

	/// Returns `true` if anything was dropped.
	fn drop_tail(&mut self, len: usize) -> bool {
		let current = self.len();
		if len >= current {
			return false
		}

		unsafe {
			let tail = ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(len), current - len);
			self.meta.set_len(len);
			ptr::drop_in_place(tail);
		}

		true
	}

	/// Drops every element and resets the buffer to [`DEFAULT_CAPACITY`].
	pub fn clear(&mut self) -> Result<()> {
		self.check_writable()?;
		self.drop_tail(0);
		self.relocate(DEFAULT_CAPACITY);
		Ok(())
	}

	/// Returns the index of the first element matching `predicate`.
	#[inline]
	pub fn find_by<F>(&self, predicate: F) -> Option<usize> where F: FnMut(&T) -> bool {
		self.iter().position(predicate)
	}

	/// Returns the index of the first element equal to `item`.
	#[inline]
	pub fn find(&self, item: &T) -> Option<usize> where T: PartialEq {
		self.find_by(|element| element == item)
	}

	/// Sorts the array with a stable merge sort.
	///
	/// `is_lower(a, b)` must return `true` when `a` strictly comes before `b`.
	/// Elements for which `is_lower` reports neither order keep their relative order.
	///
	/// ```
	/// # use dynamic_array::DynamicArray;
	/// let mut array: DynamicArray<(u8, char)> = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')].into();
	/// array.sort_by_lower(|a, b| a.0 < b.0)?;
	/// assert_eq!(array, [(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
	/// # Ok::<(), dynamic_array::Error>(())
	/// ```
	pub fn sort_by_lower<F>(&mut self, mut is_lower: F) -> Result<()> where F: FnMut(&T, &T) -> bool {
		self.check_writable()?;
		sort::merge_sort(self.slice_mut(), &mut is_lower);
		Ok(())
	}

	/// Sorts the array in natural order.
	#[inline]
	pub fn sort(&mut self) -> Result<()> where T: Ord {
		self.sort_by_lower(|a, b| a < b)
	}

	/// Converts the array into a `Vec` holding the same buffer.
	pub fn into_vec(self) -> Vec<T> {
		let mut this = ManuallyDrop::new(self);
		let len = this.len();
		let capacity = this.capacity();

		unsafe {
			if capacity == 0 || mem::size_of::<T>() == 0 {
				// nothing is allocated.
				let mut vec = Vec::with_capacity(len);
				ptr::copy_nonoverlapping(this.ptr.as_ptr(), vec.as_mut_ptr(), len);
				vec.set_len(len);
				vec
			} else {
				// The buffer was allocated by the global allocator with `Layout::array::<T>(capacity)`.
				Vec::from_raw_parts(this.ptr.as_ptr(), len, capacity)
			}
		}
	}

	/// Converts the array into a boxed slice holding exactly its elements.
	#[inline]
	pub fn into_boxed_slice(self) -> Box<[T]> {
		self.into_vec().into_boxed_slice()
	}
}

impl<M: Meta, T> DynamicArray<M, T> where T: Clone {
	/// Creates an array holding `len` clones of `value`.
	///
	/// The capacity is the smallest power of two holding `len` elements,
	/// and at least [`DEFAULT_CAPACITY`].
	pub fn from_elem(len: usize, value: &T) -> Self {
		let mut array = Self::with_capacity(Self::initial_capacity(len));
		array.extend_with(len, value.clone());
		array
	}

	/// Creates an array holding clones of the elements of `slice`.
	///
	/// The capacity is chosen as in [`from_elem`](Self::from_elem).
	pub fn from_slice(slice: &[T]) -> Self {
		let mut array = Self::with_capacity(Self::initial_capacity(slice.len()));
		array.extend_cloned(slice);
		array
	}

	/// Appends a clone of `value`.
	#[inline]
	pub fn push_cloned(&mut self, value: &T) -> Result<()> {
		self.check_writable()?;
		self.push_unchecked(value.clone());
		Ok(())
	}

	/// Replaces the element at `index` with a clone of `value`, returning the previous element.
	#[inline]
	pub fn set_cloned(&mut self, index: usize, value: &T) -> Result<T> {
		let slot = self.get_mut(index)?;
		Ok(mem::replace(slot, value.clone()))
	}

	/// Resizes the array in-place so that its length is equal to `new_len`.
	///
	/// If `new_len` is greater than the length, the array is extended by the
	/// difference, with each additional slot filled with `value`.
	/// Otherwise the array is truncated.
	pub fn resize(&mut self, new_len: usize, value: T) -> Result<()> {
		self.check_writable()?;

		let len = self.len();
		if new_len > len {
			self.extend_with(new_len - len, value)
		} else if self.drop_tail(new_len) {
			self.shrink_amortized()
		}

		Ok(())
	}

	/// Appends clones of `items`, growing the buffer once if needed.
	fn extend_cloned(&mut self, items: &[T]) {
		self.grow_amortized(items.len());

		unsafe {
			let mut ptr = self.ptr.as_ptr().add(self.len());
			let mut local_len = SetLenOnDrop::new(&mut self.meta);

			for item in items {
				ptr::write(ptr, item.clone());
				ptr = ptr.add(1);
				// Increment the length in every step in case `clone` panics
				local_len.increment_len(1);
			}
		}
	}

	/// Appends `n` copies of `value`: `n - 1` clones and `value` itself.
	fn extend_with(&mut self, n: usize, value: T) {
		self.grow_amortized(n);

		unsafe {
			let mut ptr = self.ptr.as_ptr().add(self.len());
			// Use SetLenOnDrop to work around bug where compiler
			// may not realize the store through `ptr` through self.set_len()
			// don't alias.
			let mut local_len = SetLenOnDrop::new(&mut self.meta);

			// Write all elements except the last one
			for _ in 1..n {
				ptr::write(ptr, value.clone());
				ptr = ptr.add(1);
				// Increment the length in every step in case `clone` panics
				local_len.increment_len(1);
			}

			if n > 0 {
				// We can write the last element directly without cloning needlessly
				ptr::write(ptr, value);
				local_len.increment_len(1);
			}

			// len set by scope guard
		}
	}
}

impl<M: Meta, T> DynamicArray<M, Option<T>> {
	/// Returns the index of the first element equal to `Some(item)`.
	///
	/// Fails with [`Error::NullValue`] if an absent element is met before a match.
	pub fn find_present(&self, item: &T) -> Result<Option<usize>> where T: PartialEq {
		for (index, element) in self.iter().enumerate() {
			match element {
				Some(element) if element == item => return Ok(Some(index)),
				Some(_) => (),
				None => return Err(Error::NullValue { index })
			}
		}

		Ok(None)
	}

	/// Sorts the present elements in natural order.
	///
	/// Fails with [`Error::NullValue`], without sorting anything, if any element is absent.
	pub fn sort_present(&mut self) -> Result<()> where T: Ord {
		self.check_writable()?;

		if let Some(index) = self.find_by(Option::is_none) {
			return Err(Error::NullValue { index })
		}

		self.sort_by_lower(|a, b| a < b)
	}

	/// Renders the array as [`Display`](fmt::Display) does, with absent elements written as `Null`.
	///
	/// ```
	/// # use dynamic_array::DynamicArray;
	/// let array: DynamicArray<Option<i32>> = vec![Some(1), None, Some(3)].into();
	/// assert_eq!(array.display_nullable().to_string(), "[1, Null, 3]");
	/// ```
	#[inline]
	pub fn display_nullable(&self) -> DisplayNullable<'_, T> {
		DisplayNullable {
			elements: self.as_slice()
		}
	}
}

// Set the length of the array when the `SetLenOnDrop` value goes out of scope.
//
// The idea is: The length field in SetLenOnDrop is a local variable
// that the optimizer will see does not alias with any stores through the array's data
// pointer. This is a workaround for alias analysis issue #32155
struct SetLenOnDrop<'a, M: Meta> {
	meta: &'a mut M,
	local_len: usize,
}

impl<'a, M: Meta> SetLenOnDrop<'a, M> {
	#[inline]
	fn new(meta: &'a mut M) -> Self {
		SetLenOnDrop { local_len: meta.len(), meta }
	}

	#[inline]
	fn increment_len(&mut self, increment: usize) {
		self.local_len += increment;
	}
}

impl<M: Meta> Drop for SetLenOnDrop<'_, M> {
	#[inline]
	fn drop(&mut self) {
		self.meta.set_len(self.local_len);
	}
}

/// Helper returned by [`DynamicArray::display_nullable`].
pub struct DisplayNullable<'a, T> {
	elements: &'a [Option<T>]
}

impl<'a, T: fmt::Display> fmt::Display for DisplayNullable<'a, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_list(f, self.elements.iter(), |element, f| match element {
			Some(element) => fmt::Display::fmt(element, f),
			None => f.write_str("Null")
		})
	}
}

fn write_list<'e, E: 'e, I, F>(f: &mut fmt::Formatter<'_>, elements: I, mut write: F) -> fmt::Result where
	I: Iterator<Item = &'e E>,
	F: FnMut(&E, &mut fmt::Formatter<'_>) -> fmt::Result
{
	f.write_str("[")?;
	for (i, element) in elements.enumerate() {
		if i > 0 {
			f.write_str(", ")?;
		}
		write(element, f)?;
	}
	f.write_str("]")
}

impl<M: Meta, T: fmt::Display> fmt::Display for DynamicArray<M, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_list(f, self.iter(), fmt::Display::fmt)
	}
}

impl<M: Meta, T: fmt::Debug> fmt::Debug for DynamicArray<M, T> {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&**self, f)
	}
}

impl<M: Meta, T> Default for DynamicArray<M, T> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

/// Deep-clones every element into a fresh buffer of the same capacity.
///
/// The read-only flag is preserved.
impl<M: Meta, T: Clone> Clone for DynamicArray<M, T> {
	fn clone(&self) -> Self {
		let mut array = Self::with_capacity(self.capacity());
		array.extend_cloned(self.as_slice());
		array.set_read_only(self.is_read_only());
		array
	}
}

unsafe impl<M: Meta + Send, T: Send> Send for DynamicArray<M, T> {}
unsafe impl<M: Meta + Sync, T: Sync> Sync for DynamicArray<M, T> {}

impl<M: Meta, T> Deref for DynamicArray<M, T> {
	type Target = [T];

	#[inline]
	fn deref(&self) -> &[T] {
		self.as_slice()
	}
}

impl<M: Meta, T> AsRef<[T]> for DynamicArray<M, T> {
	#[inline]
	fn as_ref(&self) -> &[T] {
		self
	}
}

impl<'v, M: Meta, T> IntoIterator for &'v DynamicArray<M, T> {
	type Item = &'v T;
	type IntoIter = slice::Iter<'v, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.as_slice().iter()
	}
}

/// An iterator that moves out of an array.
pub struct IntoIter<T> {
	inner: std::vec::IntoIter<T>
}

impl<T> IntoIter<T> {
	/// Returns the remaining elements as a slice.
	#[inline]
	pub fn as_slice(&self) -> &[T] {
		self.inner.as_slice()
	}
}

impl<T> Iterator for IntoIter<T> {
	type Item = T;

	#[inline]
	fn next(&mut self) -> Option<T> {
		self.inner.next()
	}

	#[inline]
	fn size_hint(&self) -> (usize, Option<usize>) {
		self.inner.size_hint()
	}
}

impl<T> DoubleEndedIterator for IntoIter<T> {
	#[inline]
	fn next_back(&mut self) -> Option<T> {
		self.inner.next_back()
	}
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
	}
}

impl<M: Meta, T> IntoIterator for DynamicArray<M, T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	#[inline]
	fn into_iter(self) -> Self::IntoIter {
		IntoIter {
			inner: self.into_vec().into_iter()
		}
	}
}

impl<M: Meta, T> DynamicArray<M, T> {
	/// Appends every item of `iterator` one at a time, through the growth policy.
	pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iterator: I) -> Result<()> {
		self.check_writable()?;
		for element in iterator {
			self.push_unchecked(element)
		}
		Ok(())
	}
}

/// # Panics
///
/// Panics if the array is read-only. Use [`DynamicArray::try_extend`] to get an error instead.
impl<M: Meta, T> Extend<T> for DynamicArray<M, T> {
	#[inline]
	fn extend<I: IntoIterator<Item = T>>(&mut self, iterator: I) {
		if let Err(e) = self.try_extend(iterator) {
			panic!("cannot extend array: {}", e)
		}
	}
}

impl<'a, M: Meta, T: 'a + Clone> Extend<&'a T> for DynamicArray<M, T> {
	#[inline]
	fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iterator: I) {
		self.extend(iterator.into_iter().cloned())
	}
}

impl<M: Meta, T> std::iter::FromIterator<T> for DynamicArray<M, T> {
	fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
		let mut array = Self::new();
		for element in iterator {
			array.push_unchecked(element)
		}
		array
	}
}

impl<M: Meta, T> From<Vec<T>> for DynamicArray<M, T> {
	/// Takes over the vector's buffer when the metadata format can represent its capacity.
	fn from(vec: Vec<T>) -> Self {
		if mem::size_of::<T>() == 0 || vec.capacity() > M::MAX_LENGTH {
			let mut array = Self::with_capacity(vec.len());
			for element in vec {
				array.push_unchecked(element)
			}
			return array
		}

		let mut vec = ManuallyDrop::new(vec);
		let len = vec.len();
		let capacity = vec.capacity();

		DynamicArray {
			meta: M::new(len, capacity),
			ptr: unsafe { NonNull::new_unchecked(vec.as_mut_ptr()) },
			marker: PhantomData
		}
	}
}

impl<'s, M: Meta, T: Clone> From<&'s [T]> for DynamicArray<M, T> {
	#[inline]
	fn from(slice: &'s [T]) -> Self {
		Self::from_slice(slice)
	}
}

impl<M: Meta, T> From<DynamicArray<M, T>> for Vec<T> {
	#[inline]
	fn from(array: DynamicArray<M, T>) -> Vec<T> {
		array.into_vec()
	}
}

impl<'v, M: Meta, T: Clone> From<&'v DynamicArray<M, T>> for Vec<T> {
	#[inline]
	fn from(array: &'v DynamicArray<M, T>) -> Vec<T> {
		array.to_vec()
	}
}

impl<M: Meta, T> From<DynamicArray<M, T>> for Box<[T]> {
	#[inline]
	fn from(array: DynamicArray<M, T>) -> Box<[T]> {
		array.into_boxed_slice()
	}
}

macro_rules! impl_slice_eq1 {
	([$($vars:tt)*] $lhs:ty, $rhs:ty) => {
		impl<$($vars)*> PartialEq<$rhs> for $lhs where T: PartialEq<U> {
			#[inline]
			fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
			#[inline]
			fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
		}
	}
}

impl_slice_eq1! { [T, U, O: Meta, P: Meta] DynamicArray<O, T>, DynamicArray<P, U> }
impl_slice_eq1! { [T, U, M: Meta] DynamicArray<M, T>, Vec<U> }
impl_slice_eq1! { [T, U, M: Meta] Vec<T>, DynamicArray<M, U> }
impl_slice_eq1! { [T, U, M: Meta] DynamicArray<M, T>, &[U] }
impl_slice_eq1! { [T, U, M: Meta] DynamicArray<M, T>, &mut [U] }
impl_slice_eq1! { [T, U, M: Meta] &[T], DynamicArray<M, U> }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] DynamicArray<M, T>, [U; N] }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] DynamicArray<M, T>, &[U; N] }
impl_slice_eq1! { [T, U, M: Meta, const N: usize] [T; N], DynamicArray<M, U> }

impl<M: Meta, T: Eq> Eq for DynamicArray<M, T> {}

/// Lexicographic comparison: an empty array compares less than any non-empty array.
impl<M: Meta, T: PartialOrd> PartialOrd for DynamicArray<M, T> {
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
		PartialOrd::partial_cmp(&**self, &**other)
	}
}

impl<M: Meta, T: Ord> Ord for DynamicArray<M, T> {
	#[inline]
	fn cmp(&self, other: &Self) -> cmp::Ordering {
		Ord::cmp(&**self, &**other)
	}
}

impl<M: Meta, T: Hash> Hash for DynamicArray<M, T> {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		Hash::hash(&**self, state)
	}
}
