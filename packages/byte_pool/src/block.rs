use std::fmt;
use std::ptr::NonNull;

use crate::{AllocError, Result};

/// One contiguous buffer known to the pool.
///
/// A block is owned either by the registry (while its buffer is handed out to a caller) or by
/// exactly one bucket (while parked for reuse). It moves between the two as a `Box<Block>`;
/// moving the box never moves the buffer, so the address handed to the caller stays valid.
pub(crate) struct Block {
    data: Box<[u8]>,

    /// Link to the next parked block. Only ever `Some` while the block sits in a bucket.
    pub(crate) next: Option<Box<Block>>,
}

impl Block {
    /// Allocates a new zero-filled block of exactly `capacity` bytes.
    ///
    /// The allocation is fallible: if the allocator refuses, no memory is held and the
    /// error is returned to the caller instead of aborting the process.
    pub(crate) fn try_new_zeroed(capacity: usize) -> Result<Box<Self>> {
        debug_assert!(capacity > 0);

        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|source| AllocError::OutOfMemory { capacity, source })?;
        data.resize(capacity, 0);

        Ok(Box::new(Self {
            data: data.into_boxed_slice(),
            next: None,
        }))
    }

    #[must_use]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The address of the buffer, used as the registry key.
    #[must_use]
    pub(crate) fn addr(&self) -> usize {
        self.data.as_ptr().addr()
    }

    #[must_use]
    pub(crate) fn ptr(&mut self) -> NonNull<u8> {
        NonNull::from(&mut *self.data).cast::<u8>()
    }

    /// Overwrites the entire buffer with zeroes, erasing whatever the previous user wrote.
    pub(crate) fn zero(&mut self) {
        self.data.fill(0);
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("addr", &self.addr())
            .field("capacity", &self.capacity())
            .field("linked", &self.next.is_some())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Block: Send, Sync);

    #[test]
    fn new_block_is_zeroed_and_sized() {
        let block = Block::try_new_zeroed(64).unwrap();

        assert_eq!(block.capacity(), 64);
        assert!(block.data.iter().all(|&b| b == 0));
        assert!(block.next.is_none());
    }

    #[test]
    fn zero_erases_previous_contents() {
        let mut block = Block::try_new_zeroed(16).unwrap();
        block.data.fill(0xAB);

        block.zero();

        assert!(block.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn ptr_matches_addr() {
        let mut block = Block::try_new_zeroed(8).unwrap();

        assert_eq!(block.ptr().as_ptr().addr(), block.addr());
    }

    #[test]
    fn address_is_stable_across_box_moves() {
        let mut block = Block::try_new_zeroed(32).unwrap();
        let before = block.ptr();

        let mut holder = vec![block];
        let mut block = holder.pop().unwrap();

        assert_eq!(block.ptr(), before);
    }

    #[test]
    fn unsatisfiable_allocation_is_reported() {
        // Anything above isize::MAX is rejected by the reservation itself, without touching
        // the allocator.
        let capacity = usize::MAX - 7;

        match Block::try_new_zeroed(capacity) {
            Err(AllocError::OutOfMemory {
                capacity: reported, ..
            }) => assert_eq!(reported, capacity),
            other => panic!("expected OutOfMemory, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_describes_block() {
        let block = Block::try_new_zeroed(24).unwrap();
        let output = format!("{block:?}");

        assert!(output.contains("Block"));
        assert!(output.contains("capacity: 24"));
        assert!(output.contains("linked: false"));
    }
}
