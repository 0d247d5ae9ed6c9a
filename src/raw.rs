use core::{
	alloc::Layout,
	mem,
	ptr::NonNull
};
use std::alloc::{
	self,
	handle_alloc_error
};

/// A low-level utility for more ergonomically managing an array buffer.
///
/// This type does not in anyway inspect the memory that it manages. When dropped it *will*
/// free its memory, but it *won't* try to drop its contents. It is up to the user of `RawBuffer`
/// to handle the actual things *stored* inside of a `RawBuffer`.
///
/// Zero-sized types and zero capacities never allocate: the pointer is then dangling
/// and the capacity is only bookkeeping.
pub struct RawBuffer<T> {
	/// Start of the allocation.
	ptr: NonNull<T>,

	/// Number of `T` slots in the allocation.
	capacity: usize
}

impl<T> Drop for RawBuffer<T> {
	fn drop(&mut self) {
		if let Some((ptr, layout)) = self.current_memory() {
			unsafe {
				alloc::dealloc(ptr.as_ptr(), layout)
			}
		}
	}
}

impl<T> RawBuffer<T> {
	/// Allocates an uninitialized buffer able to hold exactly `capacity` elements.
	///
	/// # Panics
	///
	/// Panics if the requested size overflows `isize::MAX` bytes.
	/// Aborts through [`handle_alloc_error`] if the allocator fails.
	pub fn allocate(capacity: usize) -> Self {
		if capacity == 0 || mem::size_of::<T>() == 0 {
			return RawBuffer {
				ptr: NonNull::dangling(),
				capacity
			}
		}

		let layout = match Layout::array::<T>(capacity) {
			Ok(layout) => layout,
			Err(_) => capacity_overflow(),
		};
		if alloc_guard(layout.size()).is_err() {
			capacity_overflow()
		}

		let ptr = unsafe { alloc::alloc(layout) };
		match NonNull::new(ptr as *mut T) {
			Some(ptr) => RawBuffer { ptr, capacity },
			None => handle_alloc_error(layout)
		}
	}

	/// Takes back ownership of a buffer previously released with [`into_raw_parts`](Self::into_raw_parts).
	///
	/// ## Safety
	///
	/// `ptr` and `capacity` must describe an allocation made by [`RawBuffer::allocate`]
	/// (or by `Vec<T>` with the global allocator) that is not owned by anything else.
	#[inline]
	pub unsafe fn from_raw_parts(ptr: NonNull<T>, capacity: usize) -> Self {
		RawBuffer { ptr, capacity }
	}

	/// Releases the allocation without freeing it.
	#[inline]
	pub fn into_raw_parts(self) -> (NonNull<T>, usize) {
		let parts = (self.ptr, self.capacity);
		mem::forget(self);
		parts
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	#[inline]
	pub fn as_ptr(&self) -> *const T {
		self.ptr.as_ptr()
	}

	#[inline]
	pub fn as_mut_ptr(&mut self) -> *mut T {
		self.ptr.as_ptr()
	}

	/// Returns the current allocated memory and layout.
	///
	/// Returns `None` if nothing was allocated (zero capacity or zero-sized `T`).
	fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
		if self.capacity == 0 || mem::size_of::<T>() == 0 {
			None
		} else {
			// We have an allocated chunk of memory, so we can bypass runtime
			// checks to get our current layout.
			unsafe {
				let align = mem::align_of::<T>();
				let size = mem::size_of::<T>() * self.capacity;
				let layout = Layout::from_size_align_unchecked(size, align);
				Some((self.ptr.cast(), layout))
			}
		}
	}
}

// We need to guarantee the following:
// * We don't ever allocate `> isize::MAX` byte-size objects.
// * We don't overflow `usize::MAX` and actually allocate too little.
//
// On 64-bit we just need to check for overflow since trying to allocate
// `> isize::MAX` bytes will surely fail. On 32-bit and 16-bit we need to add
// an extra guard for this in case we're running on a platform which can use
// all 4GB in user-space, e.g., PAE or x32.
#[inline]
fn alloc_guard(alloc_size: usize) -> Result<(), ()> {
	if usize::BITS < 64 && alloc_size > isize::MAX as usize {
		Err(())
	} else {
		Ok(())
	}
}

// One central function responsible for reporting capacity overflows, so that
// there is only one location which panics.
pub(crate) fn capacity_overflow() -> ! {
	panic!("capacity overflow");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zero_capacity_does_not_allocate() {
		let buffer = RawBuffer::<u64>::allocate(0);
		assert_eq!(buffer.capacity(), 0);
		assert!(buffer.current_memory().is_none());
	}

	#[test]
	fn zero_sized_types_keep_bookkeeping_capacity() {
		let buffer = RawBuffer::<()>::allocate(16);
		assert_eq!(buffer.capacity(), 16);
		assert!(buffer.current_memory().is_none());
	}

	#[test]
	fn raw_parts_round_trip() {
		let mut buffer = RawBuffer::<u32>::allocate(4);
		unsafe {
			buffer.as_mut_ptr().write(7);
			buffer.as_mut_ptr().add(3).write(9);
		}

		let (ptr, capacity) = buffer.into_raw_parts();
		assert_eq!(capacity, 4);

		let buffer = unsafe { RawBuffer::from_raw_parts(ptr, capacity) };
		unsafe {
			assert_eq!(*buffer.as_ptr(), 7);
			assert_eq!(*buffer.as_ptr().add(3), 9);
		}
	}

	#[test]
	#[should_panic(expected = "capacity overflow")]
	fn oversized_allocation_panics() {
		let _ = RawBuffer::<u64>::allocate(usize::MAX);
	}
}
