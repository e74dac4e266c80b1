use std::num::NonZero;

use crate::constants::SIZE_ALIGN;
use crate::{AllocError, Result};

/// Where a request of a given size is served from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SizeClass {
    /// Served from (and recycled into) the bucket at `index`, whose buffers are all exactly
    /// `capacity` bytes long.
    Pooled { index: usize, capacity: usize },

    /// Above the pooling ceiling. Allocated directly and released directly on free.
    Oversized { capacity: usize },
}

impl SizeClass {
    #[must_use]
    pub(crate) fn capacity(self) -> usize {
        match self {
            Self::Pooled { capacity, .. } | Self::Oversized { capacity } => capacity,
        }
    }
}

/// The size class layout of a pool: classes of `size_rate` bytes each, up to and including
/// `max_pooled_size`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SizeClasses {
    size_rate: NonZero<usize>,
    max_pooled_size: usize,
}

impl SizeClasses {
    /// # Panics
    ///
    /// Panics if `size_rate` is not a multiple of the pool alignment or if `max_pooled_size`
    /// is zero or not a multiple of both `size_rate` and the pool alignment.
    #[must_use]
    pub(crate) fn new(size_rate: NonZero<usize>, max_pooled_size: usize) -> Self {
        assert!(
            size_rate.get().is_multiple_of(SIZE_ALIGN),
            "size rate {size_rate} must be a multiple of {SIZE_ALIGN}"
        );
        assert!(
            max_pooled_size > 0,
            "max pooled size must be greater than zero"
        );
        assert!(
            max_pooled_size.is_multiple_of(size_rate.get()),
            "max pooled size {max_pooled_size} must be a multiple of the size rate {size_rate}"
        );
        assert!(
            max_pooled_size.is_multiple_of(SIZE_ALIGN),
            "max pooled size {max_pooled_size} must be a multiple of {SIZE_ALIGN}"
        );

        Self {
            size_rate,
            max_pooled_size,
        }
    }

    #[must_use]
    pub(crate) fn size_rate(&self) -> NonZero<usize> {
        self.size_rate
    }

    #[must_use]
    pub(crate) fn max_pooled_size(&self) -> usize {
        self.max_pooled_size
    }

    /// Number of buckets, one per size class.
    #[must_use]
    #[expect(
        clippy::integer_division,
        reason = "the ceiling is asserted to be a multiple of the size rate"
    )]
    pub(crate) fn bucket_count(&self) -> usize {
        self.max_pooled_size / self.size_rate.get()
    }

    /// Determines the class that serves a request for `requested` bytes.
    pub(crate) fn classify(&self, requested: usize) -> Result<SizeClass> {
        if requested == 0 {
            return Err(AllocError::ZeroSize);
        }

        if requested > self.max_pooled_size {
            let capacity = requested
                .checked_next_multiple_of(SIZE_ALIGN)
                .ok_or(AllocError::CapacityOverflow { requested })?;

            return Ok(SizeClass::Oversized { capacity });
        }

        // Cannot overflow: max_pooled_size is itself a multiple of the size rate.
        let capacity = requested.next_multiple_of(self.size_rate.get());

        Ok(SizeClass::Pooled {
            index: self.bucket_index(capacity),
            capacity,
        })
    }

    /// Bucket slot for a buffer of `capacity` bytes.
    ///
    /// `capacity` must be a positive multiple of the size rate no greater than the ceiling.
    #[must_use]
    #[expect(
        clippy::integer_division,
        reason = "every class capacity is a multiple of the size rate"
    )]
    pub(crate) fn bucket_index(&self, capacity: usize) -> usize {
        debug_assert!(capacity > 0 && capacity <= self.max_pooled_size);
        debug_assert!(capacity.is_multiple_of(self.size_rate.get()));

        (capacity / self.size_rate.get()).wrapping_sub(1)
    }

    /// Capacity of every buffer parked in the bucket at `index`.
    #[must_use]
    pub(crate) fn class_capacity(&self, index: usize) -> usize {
        debug_assert!(index < self.bucket_count());

        index
            .wrapping_add(1)
            .wrapping_mul(self.size_rate.get())
    }
}
