//! A pool of zero-initialized byte buffers that recycles freed buffers by size class.
//!
//! This package provides [`BytePool`], a thread-safe pool for workloads that allocate and free
//! many short-lived buffers of similar size, e.g. message parsing or I/O staging. Instead of
//! returning freed buffers to the allocator, the pool parks them on a per-size-class free list
//! and hands them out again, zeroed, on the next request of the same class.
//!
//! # Size classes
//!
//! Requests are rounded up to a multiple of the *size rate* (32 bytes by default). Each
//! multiple up to and including the *ceiling* (4096 bytes by default) is a size class with its
//! own free list, which retains at most [`bucket_limit()`][BytePool::bucket_limit] buffers.
//! Frees beyond that limit release the buffer to the allocator.
//!
//! Requests above the ceiling are still served, padded to a multiple of 8 bytes, but are
//! always allocated fresh and released immediately when freed.
//!
//! # Features
//!
//! - **Zeroed buffers**: Every buffer is zero-filled when handed out, including reused ones.
//! - **Bounded retention**: Each size class parks at most a configurable number of buffers.
//! - **Ownership checks**: [`contains()`][BytePool::contains] tells whether an address is a
//!   buffer currently handed out by the pool; freeing anything else is a no-op.
//! - **Bulk release**: [`clear()`][BytePool::clear] releases everything the pool knows about.
//! - **Thread-safe and single-threaded variants**: [`BytePool`] serializes all operations
//!   behind one lock, [`RawBytePool`] is the unlocked core for single-owner use.
//!
//! # Example
//!
//! ```rust
//! use byte_pool::BytePool;
//!
//! let pool = BytePool::new();
//!
//! let mut buffer = pool.alloc(100).unwrap();
//! assert_eq!(buffer.capacity(), 128);
//!
//! // SAFETY: The buffer is in use and the pool is alive.
//! unsafe { buffer.as_mut_slice() }.copy_from_slice(&[1; 100]);
//!
//! let addr = buffer.ptr();
//! assert!(pool.contains(addr));
//! pool.free(buffer);
//! assert!(!pool.contains(addr));
//!
//! // The next request of the same size class reuses the buffer, zeroed.
//! let buffer = pool.alloc(128).unwrap();
//! assert_eq!(buffer.ptr(), addr);
//! // SAFETY: The buffer is in use and the pool is alive.
//! assert!(unsafe { buffer.as_slice() }.iter().all(|&b| b == 0));
//! ```
//!
//! # Logging
//!
//! The pool emits [`tracing`](https://docs.rs/tracing) events: `debug` when a pool is created
//! or cleared, `trace` for every buffer allocated, reused, parked or released.

mod block;
mod bucket;
mod builder;
mod constants;
mod error;
mod pool;
mod pooled;
mod raw;
mod size_class;

pub(crate) use block::*;
pub(crate) use bucket::*;
pub use builder::*;
pub use error::AllocError;
pub(crate) use error::Result;
pub use pool::*;
pub use pooled::*;
pub use raw::*;
pub(crate) use size_class::*;
