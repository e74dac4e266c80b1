use std::ptr::NonNull;
use std::slice;

/// A zero-initialized buffer handed out by a [`BytePool`][crate::BytePool] or
/// [`RawBytePool`][crate::RawBytePool].
///
/// The memory behind the handle is owned by the pool, not by the handle. Dropping the handle
/// without returning it via `free()` leaves the buffer registered as in use until the pool is
/// cleared or dropped.
///
/// The handle is neither [`Clone`] nor [`Copy`]: returning it to the pool consumes it, so the
/// stale handle cannot be used again afterwards.
///
/// # Example
///
/// ```rust
/// use byte_pool::BytePool;
///
/// let pool = BytePool::new();
///
/// let mut buffer = pool.alloc(100).unwrap();
/// assert_eq!(buffer.len(), 100);
/// assert!(buffer.capacity() >= 100);
///
/// // SAFETY: The buffer has not been freed and the pool has not been cleared or dropped.
/// let bytes = unsafe { buffer.as_mut_slice() };
/// bytes[0] = 42;
///
/// pool.free(buffer);
/// ```
#[derive(Debug)]
pub struct PooledBytes {
    ptr: NonNull<u8>,
    len: usize,
    capacity: usize,
}

// SAFETY: The handle is only an address and two lengths. Every access to the memory behind it
// goes through unsafe methods whose callers guarantee exclusive, non-dangling access, and the
// pool that owns the memory is itself thread-safe.
unsafe impl Send for PooledBytes {}

// SAFETY: Shared access to the handle only exposes the address and lengths; reading the memory
// requires unsafe code whose caller guarantees the absence of concurrent writes.
unsafe impl Sync for PooledBytes {}

impl PooledBytes {
    pub(crate) fn new(ptr: NonNull<u8>, len: usize, capacity: usize) -> Self {
        debug_assert!(len > 0);
        debug_assert!(len <= capacity);

        Self { ptr, len, capacity }
    }

    /// The address of the first byte of the buffer.
    ///
    /// This is also the identity of the buffer as far as the pool is concerned, e.g. for
    /// [`contains()`][crate::BytePool::contains] and [`free_ptr()`][crate::BytePool::free_ptr].
    #[must_use]
    #[inline]
    pub fn ptr(&self) -> NonNull<u8> {
        self.ptr
    }

    /// The number of bytes the caller asked for.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; the pool never hands out zero-sized buffers.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of bytes actually allocated for the buffer.
    ///
    /// This is the requested length rounded up to the size class (or, for oversized buffers,
    /// to the pool alignment). The whole capacity is zeroed on allocation.
    #[must_use]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Views the requested length of the buffer as a byte slice.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - the buffer has not been returned to the pool;
    /// - the pool that handed it out has not been cleared or dropped;
    /// - nothing writes to the buffer for the lifetime of the returned slice.
    #[must_use]
    #[inline]
    pub unsafe fn as_slice(&self) -> &[u8] {
        // SAFETY: The pool allocated at least `len` initialized bytes at `ptr` and keeps them
        // alive while the buffer is in use; the caller guarantees it still is.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Views the requested length of the buffer as a mutable byte slice.
    ///
    /// # Safety
    ///
    /// The caller must ensure that:
    /// - the buffer has not been returned to the pool;
    /// - the pool that handed it out has not been cleared or dropped;
    /// - no other reference to the buffer exists for the lifetime of the returned slice.
    #[must_use]
    #[inline]
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: The pool allocated at least `len` initialized bytes at `ptr` and never touches
        // them while the buffer is in use; the caller guarantees exclusivity and liveness.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::indexing_slicing,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(PooledBytes: Send, Sync, std::fmt::Debug);
    assert_not_impl_any!(PooledBytes: Clone, Copy);

    #[test]
    fn accessors_report_construction_values() {
        let mut storage = [0_u8; 32];
        let ptr = NonNull::from(&mut storage).cast::<u8>();

        let pooled = PooledBytes::new(ptr, 20, 32);

        assert_eq!(pooled.ptr(), ptr);
        assert_eq!(pooled.len(), 20);
        assert_eq!(pooled.capacity(), 32);
        assert!(!pooled.is_empty());
    }

    #[test]
    fn slices_cover_requested_length() {
        let mut storage = [0_u8; 16];
        let ptr = NonNull::from(&mut storage).cast::<u8>();

        let mut pooled = PooledBytes::new(ptr, 10, 16);

        // SAFETY: `storage` outlives the handle and nothing else accesses it.
        let bytes = unsafe { pooled.as_mut_slice() };
        assert_eq!(bytes.len(), 10);
        bytes.fill(7);

        // SAFETY: As above, and the mutable slice is no longer used.
        let bytes = unsafe { pooled.as_slice() };
        assert!(bytes.iter().all(|&b| b == 7));

        assert_eq!(storage[9], 7);
        assert_eq!(storage[10], 0);
    }
}
