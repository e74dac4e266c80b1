use std::collections::TryReserveError;

use thiserror::Error;

/// Reasons why a pool could not hand out a buffer.
///
/// None of these leave a trace in the pool: a failed allocation mutates no pool state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AllocError {
    /// The caller asked for a buffer of zero bytes. The pool never performs such allocations.
    #[error("cannot allocate a zero-sized buffer")]
    ZeroSize,

    /// The requested size cannot be padded to the pool alignment without overflowing `usize`.
    #[error("requested size of {requested} bytes cannot be padded to the pool alignment")]
    CapacityOverflow {
        /// The size the caller asked for.
        requested: usize,
    },

    /// The underlying allocator refused to provide the memory.
    #[error("failed to allocate a buffer of {capacity} bytes")]
    OutOfMemory {
        /// The number of bytes the pool tried to allocate.
        capacity: usize,

        /// The error reported by the underlying allocator.
        #[source]
        source: TryReserveError,
    },

    /// The pool could not grow its record of buffers in use to make room for one more.
    #[error("failed to make room to track another buffer in use")]
    TrackingOutOfMemory {
        /// The error reported by the underlying allocator.
        #[source]
        source: TryReserveError,
    },
}

/// A specialized `Result` type for pool operations, returning the crate's
/// [`AllocError`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, AllocError>;
