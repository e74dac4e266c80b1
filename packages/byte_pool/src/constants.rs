use std::num::NonZero;

use new_zealand::nz;

/// Every buffer capacity handed out by the pool is a multiple of this many bytes.
pub(crate) const SIZE_ALIGN: usize = 8;

pub(crate) const DEFAULT_SIZE_RATE: NonZero<usize> = nz!(32);

pub(crate) const DEFAULT_MAX_POOLED_SIZE: usize = 4096;

/// How many freed buffers each size class retains before further frees are released outright.
pub(crate) const DEFAULT_BUCKET_LIMIT: usize = 10;
