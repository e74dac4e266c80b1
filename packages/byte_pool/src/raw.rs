use std::fmt;
use std::num::NonZero;
use std::ptr::NonNull;

use foldhash::{HashMap, HashMapExt};
use tracing::{debug, trace};

use crate::{AllocError, Block, Bucket, BytePoolBuilder, PooledBytes, SizeClass, SizeClasses};

/// A pool of zero-initialized byte buffers that recycles freed buffers by size class.
///
/// This is the single-threaded core of [`BytePool`][crate::BytePool]. Every operation takes
/// `&mut self`; wrap it in [`BytePool`][crate::BytePool] to share it between threads.
///
/// Requests are rounded up to a size class (a multiple of the configured size rate). Buffers
/// returned via [`free()`][Self::free] are parked on their class's free list, up to
/// [`bucket_limit()`][Self::bucket_limit] per class, and handed out again by later requests
/// of the same class. Requests above [`max_pooled_size()`][Self::max_pooled_size] are served
/// directly by the allocator and released directly when freed.
///
/// The pool tracks every buffer it has handed out and not yet taken back. Only those buffers
/// count towards [`len()`][Self::len]; parked buffers do not.
///
/// # Example
///
/// ```rust
/// use byte_pool::RawBytePool;
///
/// let mut pool = RawBytePool::new();
///
/// let buffer = pool.alloc(100).unwrap();
/// let addr = buffer.ptr();
/// assert_eq!(pool.len(), 1);
///
/// pool.free(buffer);
/// assert_eq!(pool.len(), 0);
/// assert_eq!(pool.parked_len(), 1);
///
/// // The freed buffer is reused for the next request of the same size class.
/// let buffer = pool.alloc(120).unwrap();
/// assert_eq!(buffer.ptr(), addr);
/// ```
///
/// # Thread safety
///
/// This type is thread-mobile ([`Send`]). All mutation requires `&mut self`, so sharing it
/// between threads requires external synchronization. [`BytePool`][crate::BytePool] provides
/// exactly that.
pub struct RawBytePool {
    classes: SizeClasses,

    /// One free list per size class, indexed by `SizeClasses::bucket_index()`.
    buckets: Box<[Bucket]>,

    /// Every buffer currently handed out to a caller, keyed by buffer address.
    /// Parked blocks are never in here.
    registry: HashMap<usize, Box<Block>>,

    bucket_limit: usize,
}

impl RawBytePool {
    /// Creates a pool with the default configuration: 32-byte size classes up to 4096 bytes,
    /// retaining up to 10 freed buffers per class.
    ///
    /// For custom configuration, use [`RawBytePool::builder()`][Self::builder].
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let pool = RawBytePool::new();
    ///
    /// assert_eq!(pool.size_rate().get(), 32);
    /// assert_eq!(pool.max_pooled_size(), 4096);
    /// assert_eq!(pool.bucket_limit(), 10);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build_raw()
    }

    /// Creates a builder for configuring and constructing a pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::num::NonZero;
    ///
    /// use byte_pool::RawBytePool;
    ///
    /// let pool = RawBytePool::builder()
    ///     .size_rate(NonZero::new(128).unwrap())
    ///     .max_pooled_size(8192)
    ///     .build_raw();
    ///
    /// assert_eq!(pool.max_pooled_size(), 8192);
    /// ```
    #[inline]
    pub fn builder() -> BytePoolBuilder {
        BytePoolBuilder::new()
    }

    pub(crate) fn new_inner(classes: SizeClasses, bucket_limit: usize) -> Self {
        let buckets = (0..classes.bucket_count())
            .map(|_| Bucket::default())
            .collect::<Box<[_]>>();

        debug!(
            size_rate = classes.size_rate().get(),
            max_pooled_size = classes.max_pooled_size(),
            bucket_count = buckets.len(),
            bucket_limit,
            "byte pool created"
        );

        Self {
            classes,
            buckets,
            registry: HashMap::new(),
            bucket_limit,
        }
    }

    /// The width of each size class in bytes.
    #[must_use]
    #[inline]
    pub fn size_rate(&self) -> NonZero<usize> {
        self.classes.size_rate()
    }

    /// The largest request (in bytes) that is served from, and recycled into, a size class.
    ///
    /// Larger requests are still served, but never recycled.
    #[must_use]
    #[inline]
    pub fn max_pooled_size(&self) -> usize {
        self.classes.max_pooled_size()
    }

    /// The maximum number of freed buffers each size class retains for reuse.
    #[must_use]
    #[inline]
    pub fn bucket_limit(&self) -> usize {
        self.bucket_limit
    }

    /// Changes the maximum number of freed buffers each size class retains for reuse.
    ///
    /// The new limit applies from the next [`free()`][Self::free] onwards. Buffers already
    /// parked beyond a lowered limit stay parked until reused or cleared. A limit of zero
    /// disables recycling: every freed buffer is released immediately.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    /// pool.set_bucket_limit(0);
    ///
    /// let buffer = pool.alloc(64).unwrap();
    /// pool.free(buffer);
    ///
    /// assert_eq!(pool.parked_len(), 0);
    /// ```
    #[inline]
    pub fn set_bucket_limit(&mut self, limit: usize) {
        self.bucket_limit = limit;
    }

    /// Hands out a zero-filled buffer of at least `size` bytes.
    ///
    /// Returns `None` if `size` is zero or if the memory could not be allocated. In both cases
    /// the pool is left unchanged. Use [`try_alloc()`][Self::try_alloc] to learn which.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// assert!(pool.alloc(0).is_none());
    ///
    /// let buffer = pool.alloc(45).unwrap();
    /// assert_eq!(buffer.len(), 45);
    /// assert_eq!(buffer.capacity(), 64);
    ///
    /// // SAFETY: The buffer is still in use and the pool is alive.
    /// assert!(unsafe { buffer.as_slice() }.iter().all(|&b| b == 0));
    /// ```
    #[must_use]
    pub fn alloc(&mut self, size: usize) -> Option<PooledBytes> {
        self.try_alloc(size).ok()
    }

    /// Hands out a zero-filled buffer of at least `size` bytes, explaining any failure.
    ///
    /// If a freed buffer of the matching size class is parked, it is reused. Otherwise a new
    /// buffer is allocated. Either way, the full capacity of the buffer is zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::ZeroSize`] if `size` is zero and [`AllocError::CapacityOverflow`]
    /// if `size` cannot be padded to the pool alignment. Returns
    /// [`AllocError::OutOfMemory`] if the allocator refused the buffer itself and
    /// [`AllocError::TrackingOutOfMemory`] if it refused the memory needed to track one more
    /// buffer in use.
    ///
    /// The pool is unchanged after any error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::{AllocError, RawBytePool};
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// assert!(matches!(pool.try_alloc(0), Err(AllocError::ZeroSize)));
    ///
    /// let buffer = pool.try_alloc(5000).unwrap();
    /// assert_eq!(buffer.capacity(), 5000);
    /// ```
    pub fn try_alloc(&mut self, size: usize) -> Result<PooledBytes, AllocError> {
        let class = self.classes.classify(size)?;
        let capacity = class.capacity();

        // Every path below ends with a registry insert, which must not fail once a parked
        // block has been taken out of its bucket.
        self.registry
            .try_reserve(1)
            .map_err(|source| AllocError::TrackingOutOfMemory { source })?;

        let mut block = match class {
            SizeClass::Pooled { index, .. } => {
                if let Some(mut block) = self.bucket_mut(index).pop() {
                    debug_assert_eq!(block.capacity(), capacity);

                    trace!(requested = size, capacity, bucket = index, "reusing parked buffer");
                    block.zero();
                    block
                } else {
                    let block = Block::try_new_zeroed(capacity)?;

                    trace!(requested = size, capacity, bucket = index, "allocated new buffer");
                    block
                }
            }
            SizeClass::Oversized { .. } => {
                let block = Block::try_new_zeroed(capacity)?;

                trace!(requested = size, capacity, "allocated oversized buffer");
                block
            }
        };

        let pooled = PooledBytes::new(block.ptr(), size, block.capacity());

        let previous = self.registry.insert(block.addr(), block);
        debug_assert!(
            previous.is_none(),
            "allocator returned an address that is still registered as in use"
        );

        Ok(pooled)
    }

    /// Returns a buffer to the pool.
    ///
    /// The buffer is parked for reuse if its size class has room under the
    /// [bucket limit][Self::bucket_limit], otherwise its memory is released. Oversized buffers
    /// are always released.
    ///
    /// A buffer that this pool does not consider in use (e.g. one handed out by another pool)
    /// is silently ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// let buffer = pool.alloc(10).unwrap();
    /// pool.free(buffer);
    ///
    /// assert!(pool.is_empty());
    /// ```
    pub fn free(&mut self, buffer: PooledBytes) {
        self.free_ptr(buffer.ptr());
    }

    /// Returns the buffer at `ptr` to the pool, if this pool considers it in use.
    ///
    /// This is [`free()`][Self::free] for callers that only hold the address, e.g. because
    /// buffers from several sources are mixed together. Addresses the pool does not consider in
    /// use, including addresses already freed, are silently ignored.
    ///
    /// After this call, any [`PooledBytes`] handle for the same buffer is stale and must not be
    /// used to access memory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// let buffer = pool.alloc(10).unwrap();
    /// let ptr = buffer.ptr();
    ///
    /// pool.free_ptr(ptr);
    /// assert!(!pool.contains(ptr));
    ///
    /// // Freeing again is a no-op.
    /// pool.free_ptr(ptr);
    /// assert_eq!(pool.parked_len(), 1);
    /// ```
    pub fn free_ptr(&mut self, ptr: NonNull<u8>) {
        let Some(block) = self.registry.remove(&ptr.as_ptr().addr()) else {
            return;
        };

        let capacity = block.capacity();

        if capacity > self.classes.max_pooled_size() {
            trace!(capacity, "released oversized buffer");
            drop(block);
            return;
        }

        let index = self.classes.bucket_index(capacity);
        debug_assert_eq!(self.classes.class_capacity(index), capacity);

        let limit = self.bucket_limit;
        let bucket = self.bucket_mut(index);

        if bucket.len() < limit {
            bucket.push(block);
            trace!(capacity, bucket = index, parked = bucket.len(), "parked buffer");
        } else {
            drop(block);
            trace!(capacity, bucket = index, limit, "released buffer, bucket is full");
        }
    }

    /// Whether the buffer at `ptr` was handed out by this pool and has not been freed since.
    ///
    /// Parked buffers are not considered contained.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::ptr::NonNull;
    ///
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// let buffer = pool.alloc(10).unwrap();
    /// let ptr = buffer.ptr();
    /// assert!(pool.contains(ptr));
    ///
    /// let mut foreign = [0_u8; 10];
    /// assert!(!pool.contains(NonNull::from(&mut foreign).cast()));
    ///
    /// pool.free(buffer);
    /// assert!(!pool.contains(ptr));
    /// ```
    #[must_use]
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.registry.contains_key(&ptr.as_ptr().addr())
    }

    /// Releases every buffer known to the pool, both in use and parked.
    ///
    /// Handles to buffers that were in use become stale and must not be used to access memory.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// let in_use = pool.alloc(10).unwrap();
    /// let parked = pool.alloc(10).unwrap();
    /// pool.free(parked);
    ///
    /// pool.clear();
    ///
    /// assert!(pool.is_empty());
    /// assert_eq!(pool.parked_len(), 0);
    /// assert!(!pool.contains(in_use.ptr()));
    /// ```
    pub fn clear(&mut self) {
        let in_use = self.registry.len();
        let parked = self.parked_len();

        self.registry.clear();

        for bucket in &mut self.buckets {
            bucket.clear();
        }

        debug!(in_use, parked, "byte pool cleared");
    }

    /// The number of buffers currently handed out and not yet freed.
    ///
    /// Parked buffers are not counted.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no buffers are currently handed out.
    ///
    /// An empty pool may still hold parked buffers.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// The number of freed buffers parked for reuse, across all size classes.
    #[must_use]
    pub fn parked_len(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }

    /// The number of freed buffers parked for reuse in the size class that serves requests of
    /// `size` bytes.
    ///
    /// Always zero for zero-sized and oversized requests, as those are never recycled.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::new();
    ///
    /// let buffer = pool.alloc(40).unwrap();
    /// pool.free(buffer);
    ///
    /// // 40 and 64 bytes share the 64-byte size class.
    /// assert_eq!(pool.parked_len_for(64), 1);
    /// assert_eq!(pool.parked_len_for(32), 0);
    /// ```
    #[must_use]
    pub fn parked_len_for(&self, size: usize) -> usize {
        match self.classes.classify(size) {
            Ok(SizeClass::Pooled { index, .. }) => self.buckets.get(index).map_or(0, Bucket::len),
            Ok(SizeClass::Oversized { .. }) | Err(_) => 0,
        }
    }

    fn bucket_mut(&mut self, index: usize) -> &mut Bucket {
        self.buckets
            .get_mut(index)
            .expect("bucket index is always derived from a capacity within the pooled range")
    }
}

impl Default for RawBytePool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RawBytePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBytePool")
            .field("size_rate", &self.classes.size_rate())
            .field("max_pooled_size", &self.classes.max_pooled_size())
            .field("bucket_limit", &self.bucket_limit)
            .field("in_use", &self.registry.len())
            .field("parked", &self.parked_len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(
    clippy::indexing_slicing,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(RawBytePool: Send, Default, fmt::Debug);

    fn pool_32_4096() -> RawBytePool {
        RawBytePool::builder()
            .size_rate(nz!(32))
            .max_pooled_size(4096)
            .build_raw()
    }

    fn fill(buffer: &mut PooledBytes, value: u8) {
        // SAFETY: Only called on buffers that are in use by a live pool.
        unsafe { buffer.as_mut_slice() }.fill(value);
    }

    fn is_zeroed(buffer: &PooledBytes) -> bool {
        // SAFETY: Only called on buffers that are in use by a live pool.
        unsafe { buffer.as_slice() }.iter().all(|&b| b == 0)
    }

    #[test]
    fn new_pool_is_empty() {
        let pool = RawBytePool::new();

        assert_eq!(pool.len(), 0);
        assert!(pool.is_empty());
        assert_eq!(pool.parked_len(), 0);
        assert_eq!(pool.buckets.len(), 128);
    }

    #[test]
    fn zero_size_alloc_changes_nothing() {
        let mut pool = pool_32_4096();

        assert!(pool.alloc(0).is_none());
        assert!(matches!(pool.try_alloc(0), Err(AllocError::ZeroSize)));
        assert!(pool.is_empty());
    }

    #[test]
    fn alloc_rounds_up_to_class() {
        let mut pool = pool_32_4096();

        let buffer = pool.alloc(45).unwrap();

        assert_eq!(buffer.len(), 45);
        assert_eq!(buffer.capacity(), 64);
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(buffer.ptr()));
    }

    #[test]
    fn free_recycles_same_storage() {
        let mut pool = pool_32_4096();

        let first = pool.alloc(100).unwrap();
        let addr = first.ptr();
        pool.free(first);

        assert_eq!(pool.len(), 0);
        assert_eq!(pool.parked_len_for(100), 1);

        let second = pool.alloc(100).unwrap();
        assert_eq!(second.ptr(), addr);
        assert_eq!(pool.parked_len(), 0);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn recycling_works_across_sizes_of_same_class() {
        let mut pool = pool_32_4096();

        let first = pool.alloc(33).unwrap();
        let addr = first.ptr();
        pool.free(first);

        let second = pool.alloc(64).unwrap();
        assert_eq!(second.ptr(), addr);
        assert_eq!(second.len(), 64);
    }

    #[test]
    fn different_class_does_not_reuse() {
        let mut pool = pool_32_4096();

        let first = pool.alloc(32).unwrap();
        pool.free(first);

        let _second = pool.alloc(33).unwrap();

        // The 32-byte buffer is still parked.
        assert_eq!(pool.parked_len_for(32), 1);
        assert_eq!(pool.parked_len_for(33), 0);
    }

    #[test]
    fn recycled_buffer_is_zeroed() {
        let mut pool = pool_32_4096();

        let mut first = pool.alloc(64).unwrap();
        fill(&mut first, 0xFF);
        pool.free(first);

        let second = pool.alloc(64).unwrap();
        assert!(is_zeroed(&second));
    }

    #[test]
    fn recycled_buffer_is_zeroed_beyond_previous_length() {
        let mut pool = pool_32_4096();

        let mut first = pool.alloc(10).unwrap();
        fill(&mut first, 0xFF);
        pool.free(first);

        // Same class, larger request: the bytes past the old length must be zero too.
        let second = pool.alloc(32).unwrap();
        assert!(is_zeroed(&second));
    }

    #[test]
    fn parked_buffers_are_reused_most_recent_first() {
        let mut pool = pool_32_4096();

        let a = pool.alloc(8).unwrap();
        let b = pool.alloc(8).unwrap();
        let b_addr = b.ptr();

        pool.free(a);
        pool.free(b);

        assert_eq!(pool.alloc(8).unwrap().ptr(), b_addr);
    }

    #[test]
    fn bucket_limit_is_enforced() {
        let mut pool = pool_32_4096();
        pool.set_bucket_limit(3);

        let buffers = (0..4).map(|_| pool.alloc(200).unwrap()).collect::<Vec<_>>();
        let ptrs = buffers.iter().map(PooledBytes::ptr).collect::<Vec<_>>();

        for buffer in buffers {
            pool.free(buffer);
        }

        assert_eq!(pool.parked_len_for(200), 3);
        assert_eq!(pool.parked_len(), 3);
        assert!(pool.is_empty());
        assert!(ptrs.iter().all(|&ptr| !pool.contains(ptr)));

        // Reissued buffers are the three parked ones; the fourth was released.
        let released = ptrs[3];
        for _ in 0..3 {
            let buffer = pool.alloc(200).unwrap();
            assert_ne!(buffer.ptr(), released);
        }
    }

    #[test]
    fn zero_bucket_limit_disables_recycling() {
        let mut pool = RawBytePool::builder().bucket_limit(0).build_raw();

        for size in [1, 100, 4096] {
            let buffer = pool.alloc(size).unwrap();
            pool.free(buffer);
        }

        assert_eq!(pool.parked_len(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn lowering_limit_applies_to_next_free() {
        let mut pool = pool_32_4096();

        let a = pool.alloc(50).unwrap();
        let b = pool.alloc(50).unwrap();
        let c = pool.alloc(50).unwrap();

        pool.free(a);
        pool.free(b);
        assert_eq!(pool.parked_len_for(50), 2);

        pool.set_bucket_limit(1);
        assert_eq!(pool.bucket_limit(), 1);

        // Already parked buffers stay; the new free is released.
        pool.free(c);
        assert_eq!(pool.parked_len_for(50), 2);
    }

    #[test]
    fn oversized_is_never_parked() {
        let mut pool = pool_32_4096();

        let buffer = pool.alloc(4097).unwrap();
        assert_eq!(buffer.capacity(), 4104);
        assert!(pool.contains(buffer.ptr()));

        pool.free(buffer);

        assert_eq!(pool.parked_len(), 0);
        assert!(pool.is_empty());
    }

    #[test]
    fn oversized_buffer_is_zeroed() {
        let mut pool = pool_32_4096();

        let buffer = pool.alloc(5000).unwrap();
        assert!(is_zeroed(&buffer));
    }

    #[test]
    fn unsatisfiable_request_leaves_pool_unchanged() {
        let mut pool = pool_32_4096();
        let _held = pool.alloc(10).unwrap();

        assert!(matches!(
            pool.try_alloc(usize::MAX),
            Err(AllocError::CapacityOverflow { .. })
        ));
        assert!(matches!(
            pool.try_alloc(usize::MAX - 7),
            Err(AllocError::OutOfMemory { .. })
        ));
        assert!(pool.alloc(usize::MAX - 7).is_none());

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.parked_len(), 0);
    }

    #[test]
    fn foreign_pointer_is_ignored() {
        let mut pool = pool_32_4096();
        let held = pool.alloc(10).unwrap();

        let mut foreign = [0_u8; 16];
        let foreign_ptr = NonNull::from(&mut foreign).cast::<u8>();

        assert!(!pool.contains(foreign_ptr));
        pool.free_ptr(foreign_ptr);

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.parked_len(), 0);
        assert!(pool.contains(held.ptr()));
    }

    #[test]
    fn buffer_from_other_pool_is_ignored() {
        let mut pool_a = pool_32_4096();
        let mut pool_b = pool_32_4096();

        let buffer = pool_a.alloc(10).unwrap();
        let ptr = buffer.ptr();

        pool_b.free(buffer);

        assert!(pool_a.contains(ptr));
        assert_eq!(pool_b.parked_len(), 0);
    }

    #[test]
    fn double_free_is_noop() {
        let mut pool = pool_32_4096();

        let buffer = pool.alloc(10).unwrap();
        let ptr = buffer.ptr();

        pool.free_ptr(ptr);
        let len_after_first = pool.len();
        let parked_after_first = pool.parked_len();

        pool.free_ptr(ptr);

        assert_eq!(pool.len(), len_after_first);
        assert_eq!(pool.parked_len(), parked_after_first);
        assert_eq!(pool.parked_len(), 1);
    }

    #[test]
    fn clear_releases_in_use_and_parked() {
        let mut pool = pool_32_4096();

        let in_use = [pool.alloc(10).unwrap(), pool.alloc(5000).unwrap()];
        let parked = pool.alloc(100).unwrap();
        pool.free(parked);

        pool.clear();

        assert_eq!(pool.len(), 0);
        assert!(pool.is_empty());
        assert_eq!(pool.parked_len(), 0);
        assert!(in_use.iter().all(|buffer| !pool.contains(buffer.ptr())));

        // Stale handles are ignored once the pool has let go of their buffers.
        for buffer in in_use {
            pool.free(buffer);
        }
        assert_eq!(pool.parked_len(), 0);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut pool = pool_32_4096();
        let _buffer = pool.alloc(10).unwrap();

        pool.clear();
        pool.clear();

        assert!(pool.is_empty());
    }

    #[test]
    fn pool_is_usable_after_clear() {
        let mut pool = pool_32_4096();
        let buffer = pool.alloc(10).unwrap();
        pool.free(buffer);
        pool.clear();

        let buffer = pool.alloc(10).unwrap();
        assert!(pool.contains(buffer.ptr()));
        pool.free(buffer);
        assert_eq!(pool.parked_len(), 1);
    }

    #[test]
    fn parked_len_for_unpooled_sizes_is_zero() {
        let mut pool = pool_32_4096();
        let buffer = pool.alloc(4096).unwrap();
        pool.free(buffer);

        assert_eq!(pool.parked_len_for(0), 0);
        assert_eq!(pool.parked_len_for(4097), 0);
        assert_eq!(pool.parked_len_for(usize::MAX), 0);
        assert_eq!(pool.parked_len_for(4096), 1);
    }

    #[test]
    fn end_to_end_sizes() {
        const SIZES: [usize; 16] = [
            4, 26, 30, 45, 60, 150, 500, 32, 49, 3056, 4096, 4099, 128, 582, 1024, 1025,
        ];

        let mut pool = pool_32_4096();

        let buffers = SIZES
            .iter()
            .map(|&size| pool.alloc(size).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(pool.len(), SIZES.len());

        for buffer in buffers {
            assert!(pool.contains(buffer.ptr()));
            pool.free(buffer);
        }
        assert!(pool.is_empty());

        pool.clear();
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.parked_len(), 0);
    }

    #[test]
    fn debug_output_reports_counts() {
        let mut pool = pool_32_4096();
        let _buffer = pool.alloc(10).unwrap();

        let output = format!("{pool:?}");

        assert!(output.contains("RawBytePool"));
        assert!(output.contains("in_use: 1"));
        assert!(output.contains("parked: 0"));
    }
}
