//! Basic benchmarks for the `byte_pool` package.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use byte_pool::{BytePool, RawBytePool};
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

const SMALL_SIZE: usize = 100;
const OVERSIZED: usize = 5000;

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("byte_pool_basic");

    let allocs_op = allocs.operation("build_default");
    group.bench_function("build_default", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(RawBytePool::new()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("alloc_miss");
    group.bench_function("alloc_miss", |b| {
        b.iter_custom(|iters| {
            let mut pools = iter::repeat_with(RawBytePool::new)
                .take(usize::try_from(iters).unwrap())
                .collect::<Vec<_>>();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for pool in &mut pools {
                _ = black_box(pool.alloc(black_box(SMALL_SIZE)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("alloc_free_recycled");
    group.bench_function("alloc_free_recycled", |b| {
        b.iter_custom(|iters| {
            let mut pool = RawBytePool::new();

            // Park one buffer so every iteration is a recycle hit.
            let warm = pool.alloc(SMALL_SIZE).unwrap();
            pool.free(warm);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let buffer = pool.alloc(black_box(SMALL_SIZE)).unwrap();
                pool.free(black_box(buffer));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("alloc_free_oversized");
    group.bench_function("alloc_free_oversized", |b| {
        b.iter_custom(|iters| {
            let mut pool = RawBytePool::new();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let buffer = pool.alloc(black_box(OVERSIZED)).unwrap();
                pool.free(black_box(buffer));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("vec_baseline");
    group.bench_function("vec_baseline", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(vec![0_u8; black_box(SMALL_SIZE)]));
            }

            start.elapsed()
        });
    });

    group.finish();

    let mut shared_group = c.benchmark_group("byte_pool_shared");

    let allocs_op = allocs.operation("shared_alloc_free_recycled");
    shared_group.bench_function("alloc_free_recycled", |b| {
        b.iter_custom(|iters| {
            let pool = BytePool::new();

            let warm = pool.alloc(SMALL_SIZE).unwrap();
            pool.free(warm);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let buffer = pool.alloc(black_box(SMALL_SIZE)).unwrap();
                pool.free(black_box(buffer));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("shared_mixed_batch");
    shared_group.bench_function("mixed_batch", |b| {
        const SIZES: [usize; 8] = [4, 45, 150, 500, 1024, 3056, 4096, 4099];

        b.iter_custom(|iters| {
            let pool = BytePool::new();

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let batch = SIZES
                    .iter()
                    .map(|&size| pool.alloc(size).unwrap())
                    .collect::<Vec<_>>();

                for buffer in batch {
                    pool.free(buffer);
                }
            }

            start.elapsed()
        });
    });

    shared_group.finish();

    allocs.print_to_stdout();
}
