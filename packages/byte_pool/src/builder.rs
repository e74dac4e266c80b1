use std::num::NonZero;

use crate::constants::{
    DEFAULT_BUCKET_LIMIT, DEFAULT_MAX_POOLED_SIZE, DEFAULT_SIZE_RATE, SIZE_ALIGN,
};
use crate::{BytePool, RawBytePool, SizeClasses};

/// Builder for creating an instance of [`BytePool`] or [`RawBytePool`].
///
/// All settings are optional. The defaults are 32-byte size classes, a pooling ceiling of
/// 4096 bytes and a bucket limit of 10 parked buffers per size class.
///
/// The size rate and the ceiling are fixed for the lifetime of the pool. The bucket limit can
/// be changed later via `set_bucket_limit()`.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use byte_pool::BytePool;
///
/// // Default configuration.
/// let pool = BytePool::builder().build();
///
/// // Coarser size classes with a higher ceiling, retaining fewer buffers.
/// let pool = BytePool::builder()
///     .size_rate(NonZero::new(128).unwrap())
///     .max_pooled_size(16 * 1024)
///     .bucket_limit(4)
///     .build();
///
/// assert_eq!(pool.max_pooled_size(), 16 * 1024);
/// ```
#[derive(Debug)]
#[must_use]
pub struct BytePoolBuilder {
    size_rate: NonZero<usize>,
    max_pooled_size: usize,
    bucket_limit: usize,
}

impl BytePoolBuilder {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            size_rate: DEFAULT_SIZE_RATE,
            max_pooled_size: DEFAULT_MAX_POOLED_SIZE,
            bucket_limit: DEFAULT_BUCKET_LIMIT,
        }
    }

    /// Sets the width of each size class in bytes.
    ///
    /// Every pooled request is rounded up to a multiple of this value.
    ///
    /// # Panics
    ///
    /// Panics if `size_rate` is not a multiple of 8.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::num::NonZero;
    ///
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::builder()
    ///     .size_rate(NonZero::new(64).unwrap())
    ///     .build();
    ///
    /// assert_eq!(pool.size_rate().get(), 64);
    /// ```
    #[inline]
    pub fn size_rate(mut self, size_rate: NonZero<usize>) -> Self {
        assert!(
            size_rate.get().is_multiple_of(SIZE_ALIGN),
            "size rate {size_rate} must be a multiple of {SIZE_ALIGN}"
        );
        self.size_rate = size_rate;
        self
    }

    /// Sets the largest request (in bytes) that is served from a size class.
    ///
    /// Larger requests are served directly by the allocator and never recycled. The value
    /// must be a multiple of the size rate; this is verified by [`build()`][Self::build].
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::builder().max_pooled_size(1024).build();
    ///
    /// assert_eq!(pool.max_pooled_size(), 1024);
    /// ```
    #[inline]
    pub fn max_pooled_size(mut self, max_pooled_size: usize) -> Self {
        self.max_pooled_size = max_pooled_size;
        self
    }

    /// Sets how many freed buffers each size class retains for reuse.
    ///
    /// Zero disables recycling: every freed buffer is released immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::builder().bucket_limit(100).build();
    ///
    /// assert_eq!(pool.bucket_limit(), 100);
    /// ```
    #[inline]
    pub fn bucket_limit(mut self, bucket_limit: usize) -> Self {
        self.bucket_limit = bucket_limit;
        self
    }

    /// Builds a thread-safe pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the ceiling is zero or not a multiple of the size rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_pool::BytePool;
    ///
    /// let pool = BytePool::builder().build();
    /// ```
    #[must_use]
    #[inline]
    pub fn build(self) -> BytePool {
        BytePool::from(self.build_raw())
    }

    /// Builds a single-threaded pool with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the ceiling is zero or not a multiple of the size rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use byte_pool::RawBytePool;
    ///
    /// let mut pool = RawBytePool::builder().bucket_limit(2).build_raw();
    ///
    /// let buffer = pool.alloc(16).unwrap();
    /// pool.free(buffer);
    /// ```
    #[must_use]
    pub fn build_raw(self) -> RawBytePool {
        let classes = SizeClasses::new(self.size_rate, self.max_pooled_size);
        RawBytePool::new_inner(classes, self.bucket_limit)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(BytePoolBuilder: Send, Sync, std::fmt::Debug);

    #[test]
    fn builder_new_creates_default_state() {
        let builder = BytePoolBuilder::new();

        assert_eq!(builder.size_rate, DEFAULT_SIZE_RATE);
        assert_eq!(builder.max_pooled_size, DEFAULT_MAX_POOLED_SIZE);
        assert_eq!(builder.bucket_limit, DEFAULT_BUCKET_LIMIT);
    }

    #[test]
    fn setters_store_values() {
        let builder = BytePoolBuilder::new()
            .size_rate(nz!(16))
            .max_pooled_size(256)
            .bucket_limit(3);

        assert_eq!(builder.size_rate.get(), 16);
        assert_eq!(builder.max_pooled_size, 256);
        assert_eq!(builder.bucket_limit, 3);
    }

    #[test]
    fn setters_can_be_overridden() {
        let builder = BytePoolBuilder::new()
            .bucket_limit(3)
            .bucket_limit(7)
            .max_pooled_size(64)
            .max_pooled_size(128);

        assert_eq!(builder.bucket_limit, 7);
        assert_eq!(builder.max_pooled_size, 128);
    }

    #[test]
    fn build_raw_applies_configuration() {
        let pool = BytePoolBuilder::new()
            .size_rate(nz!(128))
            .max_pooled_size(4096)
            .bucket_limit(0)
            .build_raw();

        assert_eq!(pool.size_rate().get(), 128);
        assert_eq!(pool.max_pooled_size(), 4096);
        assert_eq!(pool.bucket_limit(), 0);
    }

    #[test]
    fn build_applies_configuration() {
        let pool = BytePoolBuilder::new()
            .size_rate(nz!(8))
            .max_pooled_size(64)
            .bucket_limit(1)
            .build();

        assert_eq!(pool.size_rate().get(), 8);
        assert_eq!(pool.max_pooled_size(), 64);
        assert_eq!(pool.bucket_limit(), 1);
    }

    #[test]
    fn setter_order_does_not_matter() {
        // The ceiling is only validated against the size rate at build time.
        let pool = BytePoolBuilder::new()
            .max_pooled_size(192)
            .size_rate(nz!(64))
            .build_raw();

        assert_eq!(pool.max_pooled_size(), 192);
    }

    #[test]
    #[should_panic]
    fn unaligned_size_rate_panics() {
        let _builder = BytePoolBuilder::new().size_rate(nz!(20));
    }

    #[test]
    #[should_panic]
    fn ceiling_not_multiple_of_rate_panics() {
        let _pool = BytePoolBuilder::new()
            .size_rate(nz!(64))
            .max_pooled_size(100)
            .build_raw();
    }

    #[test]
    #[should_panic]
    fn zero_ceiling_panics() {
        let _pool = BytePoolBuilder::new().max_pooled_size(0).build();
    }

    #[test]
    fn builder_can_move_between_threads() {
        let builder = BytePoolBuilder::new().bucket_limit(5);
        let handle = thread::spawn(move || builder.build());
        let pool = handle.join().expect("thread completed successfully");

        assert_eq!(pool.bucket_limit(), 5);
    }
}
