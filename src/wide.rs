/// Metadata storing the length and capacity as two `usize`, like `Vec` does.
#[derive(Clone, Copy, Debug)]
pub struct Meta {
	len: usize,
	capacity: usize,
	read_only: bool
}

unsafe impl crate::generic::Meta for Meta {
	const MAX_LENGTH: usize = std::isize::MAX as usize;

	fn new(len: usize, capacity: usize) -> Self {
		assert!(len <= capacity);

		Meta {
			len,
			capacity,
			read_only: false
		}
	}

	fn len(&self) -> usize {
		self.len
	}

	fn capacity(&self) -> usize {
		self.capacity
	}

	fn set_len(&mut self, len: usize) {
		self.len = len
	}

	fn set_capacity(&mut self, capacity: usize) {
		self.capacity = capacity
	}

	fn is_read_only(&self) -> bool {
		self.read_only
	}

	fn set_read_only(&mut self, read_only: bool) {
		self.read_only = read_only
	}
}

pub type DynamicArray<T> = crate::generic::DynamicArray<Meta, T>;
