/// Metadata packing the length, the capacity and the read-only flag in a single `usize`.
///
/// The length lives in the high 32 bits, the read-only flag in bit 31
/// and the capacity in the low 31 bits.
#[derive(Clone, Copy, Debug)]
pub struct Meta {
	data: usize
}

const CAP_MASK: usize = (1 << 31) - 1;
const READ_ONLY_BIT: usize = 1 << 31;
const LEN_SHIFT: u32 = 32;

unsafe impl crate::generic::Meta for Meta {
	const MAX_LENGTH: usize = CAP_MASK;

	fn new(len: usize, capacity: usize) -> Self {
		assert!(len <= capacity);
		assert!(capacity <= Self::MAX_LENGTH);

		Meta {
			data: len << LEN_SHIFT | capacity
		}
	}

	fn len(&self) -> usize {
		self.data >> LEN_SHIFT
	}

	fn capacity(&self) -> usize {
		self.data & CAP_MASK
	}

	fn set_len(&mut self, len: usize) {
		assert!(len <= Self::MAX_LENGTH);
		self.data = (len << LEN_SHIFT) | (self.data & (READ_ONLY_BIT | CAP_MASK))
	}

	fn set_capacity(&mut self, capacity: usize) {
		assert!(capacity <= Self::MAX_LENGTH);
		self.data = (self.data & !CAP_MASK) | capacity
	}

	fn is_read_only(&self) -> bool {
		self.data & READ_ONLY_BIT != 0
	}

	fn set_read_only(&mut self, read_only: bool) {
		if read_only {
			self.data |= READ_ONLY_BIT
		} else {
			self.data &= !READ_ONLY_BIT
		}
	}
}

pub type DynamicArray<T> = crate::generic::DynamicArray<Meta, T>;
