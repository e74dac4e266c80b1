use std::num::NonZero;
use std::ptr::NonNull;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{AllocError, BytePoolBuilder, PooledBytes, RawBytePool};

/// A thread-safe pool of zero-initialized byte buffers that recycles freed buffers by size
/// class.
///
/// This type is a cloneable handle to a shared [`RawBytePool`]. Every operation acquires a
/// single pool-wide lock for its full duration, so operations from any number of threads are
/// fully serialized against each other. Clones refer to the same pool.
///
/// See [`RawBytePool`] for the recycling rules.
///
/// # Example
///
/// ```rust
/// use std::thread;
///
/// use byte_pool::BytePool;
///
/// let pool = BytePool::new();
///
/// let worker_pool = pool.clone();
/// let handle = thread::spawn(move || {
///     let buffer = worker_pool.alloc(256).unwrap();
///     worker_pool.free(buffer);
/// });
/// handle.join().unwrap();
///
/// // The buffer freed by the worker is parked for reuse.
/// assert!(pool.is_empty());
/// assert_eq!(pool.parked_len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct BytePool {
    inner: Arc<Mutex<RawBytePool>>,
}

impl From<RawBytePool> for BytePool {
    /// Wraps an existing single-threaded pool for shared use.
    ///
    /// Buffers already handed out by the raw pool remain valid and can be freed via the
    /// new handle.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::{BytePool, RawBytePool};
    ///
    /// let mut raw = RawBytePool::new();
    /// let buffer = raw.alloc(10).unwrap();
    ///
    /// let pool = BytePool::from(raw);
    /// assert!(pool.contains(buffer.ptr()));
    /// pool.free(buffer);
    /// ```
    fn from(pool: RawBytePool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }
}

impl BytePool {
    /// Creates a pool with the default configuration: 32-byte size classes up to 4096 bytes,
    /// retaining up to 10 freed buffers per class.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::new();
    ///
    /// assert!(pool.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for configuring and constructing a pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::builder().max_pooled_size(1024).build();
    /// ```
    #[inline]
    pub fn builder() -> BytePoolBuilder {
        BytePoolBuilder::new()
    }

    /// The width of each size class in bytes.
    #[must_use]
    pub fn size_rate(&self) -> NonZero<usize> {
        self.inner.lock().size_rate()
    }

    /// The largest request (in bytes) that is served from, and recycled into, a size class.
    #[must_use]
    pub fn max_pooled_size(&self) -> usize {
        self.inner.lock().max_pooled_size()
    }

    /// The maximum number of freed buffers each size class retains for reuse.
    #[must_use]
    pub fn bucket_limit(&self) -> usize {
        self.inner.lock().bucket_limit()
    }

    /// Changes the maximum number of freed buffers each size class retains for reuse.
    ///
    /// Takes effect from the next [`free()`][Self::free] onwards. Zero disables recycling.
    pub fn set_bucket_limit(&self, limit: usize) {
        self.inner.lock().set_bucket_limit(limit);
    }

    /// Hands out a zero-filled buffer of at least `size` bytes.
    ///
    /// Returns `None` if `size` is zero or if the memory could not be allocated, leaving the
    /// pool unchanged.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    ///
    /// # Example
    ///
    /// ```rust
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::new();
    ///
    /// let buffer = pool.alloc(26).unwrap();
    /// assert_eq!(buffer.capacity(), 32);
    ///
    /// assert!(pool.alloc(0).is_none());
    /// ```
    #[must_use]
    pub fn alloc(&self, size: usize) -> Option<PooledBytes> {
        self.inner.lock().alloc(size)
    }

    /// Hands out a zero-filled buffer of at least `size` bytes, explaining any failure.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    ///
    /// # Errors
    ///
    /// See [`RawBytePool::try_alloc()`]. The pool is unchanged after any error.
    pub fn try_alloc(&self, size: usize) -> Result<PooledBytes, AllocError> {
        self.inner.lock().try_alloc(size)
    }

    /// Returns a buffer to the pool, parking it for reuse or releasing it.
    ///
    /// Buffers this pool does not consider in use are silently ignored.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    pub fn free(&self, buffer: PooledBytes) {
        self.inner.lock().free(buffer);
    }

    /// Returns the buffer at `ptr` to the pool, if this pool considers it in use.
    ///
    /// Addresses the pool does not consider in use, including addresses already freed, are
    /// silently ignored. Any [`PooledBytes`] handle for the same buffer becomes stale.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    pub fn free_ptr(&self, ptr: NonNull<u8>) {
        self.inner.lock().free_ptr(ptr);
    }

    /// Whether the buffer at `ptr` was handed out by this pool and has not been freed since.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    #[must_use]
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        self.inner.lock().contains(ptr)
    }

    /// Releases every buffer known to the pool, both in use and parked.
    ///
    /// Handles to buffers that were in use become stale and must not be used to access memory.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// The number of buffers currently handed out and not yet freed.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether no buffers are currently handed out.
    ///
    /// This operation may block if another thread is currently accessing the pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// The number of freed buffers parked for reuse, across all size classes.
    #[must_use]
    pub fn parked_len(&self) -> usize {
        self.inner.lock().parked_len()
    }

    /// The number of freed buffers parked for reuse in the size class that serves requests of
    /// `size` bytes.
    #[must_use]
    pub fn parked_len_for(&self, size: usize) -> usize {
        self.inner.lock().parked_len_for(size)
    }
}

impl Default for BytePool {
    fn default() -> Self {
        Self::new()
    }
}
