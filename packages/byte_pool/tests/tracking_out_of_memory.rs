//! Verifies that running out of memory while tracking a buffer leaves the pool unchanged.
//!
//! These tests install a global allocator that refuses every request made by a thread while
//! that thread has asked for failures, so the pool's own bookkeeping allocations can be made
//! to fail on demand.

#![cfg(not(miri))] // Miri replaces the global allocator, so cannot be used here.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::ptr;

use byte_pool::{AllocError, PooledBytes, RawBytePool};

thread_local! {
    static FAIL_ALLOCATIONS: Cell<bool> = const { Cell::new(false) };
}

struct FailingAllocator;

// SAFETY: We either refuse the request by returning null, which every caller must handle, or
// forward it to the system allocator.
unsafe impl GlobalAlloc for FailingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if FAIL_ALLOCATIONS.with(Cell::get) {
            return ptr::null_mut();
        }

        // SAFETY: We forward the call to the system allocator with the caller's guarantees.
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        // SAFETY: Every non-null pointer we handed out came from the system allocator.
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static ALLOCATOR: FailingAllocator = FailingAllocator;

fn with_failing_allocations<R>(f: impl FnOnce() -> R) -> R {
    FAIL_ALLOCATIONS.with(|fail| fail.set(true));
    let result = f();
    FAIL_ALLOCATIONS.with(|fail| fail.set(false));

    result
}

#[test]
fn full_registry_fails_recycle_hit_without_losing_parked_buffer() {
    const MAX_ROUNDS: usize = 1_000;

    let mut pool = RawBytePool::new();

    let parked = pool.alloc(64).unwrap();
    let parked_addr = parked.ptr();
    pool.free(parked);
    assert_eq!(pool.parked_len_for(64), 1);

    let mut held: Vec<PooledBytes> = Vec::new();

    // Keep adding buffers in use until the registry has no spare room left. Until then, a
    // recycle hit needs no allocation at all and succeeds even with a failing allocator.
    for _ in 0..MAX_ROUNDS {
        let result = with_failing_allocations(|| pool.try_alloc(64));

        match result {
            Ok(buffer) => {
                assert_eq!(buffer.ptr(), parked_addr);
                pool.free(buffer);

                held.push(pool.alloc(32).unwrap());
            }
            Err(error) => {
                assert!(matches!(error, AllocError::TrackingOutOfMemory { .. }));

                // Nothing changed: the parked buffer is still parked and nothing new is in use.
                assert_eq!(pool.parked_len_for(64), 1);
                assert_eq!(pool.len(), held.len());
                assert!(!pool.contains(parked_addr));

                // With memory available again, the parked buffer is handed out as usual.
                let buffer = pool.alloc(64).unwrap();
                assert_eq!(buffer.ptr(), parked_addr);
                assert_eq!(pool.parked_len_for(64), 0);

                pool.free(buffer);
                for buffer in held {
                    pool.free(buffer);
                }
                assert!(pool.is_empty());

                return;
            }
        }
    }

    panic!("the registry never ran out of spare room in {MAX_ROUNDS} rounds");
}

#[test]
fn full_registry_fails_fresh_alloc_without_side_effects() {
    const MAX_ROUNDS: usize = 1_000;

    let mut pool = RawBytePool::new();
    let mut held: Vec<PooledBytes> = Vec::new();

    for _ in 0..MAX_ROUNDS {
        // Nothing is parked in the 128-byte class, so this is always a fresh allocation.
        let result = with_failing_allocations(|| pool.try_alloc(128));

        match result {
            Ok(_) => panic!("a fresh buffer cannot be allocated while allocations fail"),
            Err(AllocError::OutOfMemory { capacity, .. }) => {
                // The registry still had room; only the buffer itself was refused.
                assert_eq!(capacity, 128);
                assert_eq!(pool.len(), held.len());

                held.push(pool.alloc(32).unwrap());
            }
            Err(error) => {
                assert!(matches!(error, AllocError::TrackingOutOfMemory { .. }));
                assert_eq!(pool.len(), held.len());
                assert_eq!(pool.parked_len(), 0);

                for buffer in held {
                    pool.free(buffer);
                }
                assert!(pool.is_empty());

                return;
            }
        }
    }

    panic!("the registry never ran out of spare room in {MAX_ROUNDS} rounds");
}
