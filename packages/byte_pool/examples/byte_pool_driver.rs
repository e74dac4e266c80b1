//! Allocates a batch of buffers of varying sizes, frees each one after confirming the pool owns
//! it, then clears the pool, printing the number of buffers in use after each step.

use std::num::NonZero;

use byte_pool::BytePool;

const SIZES: [usize; 16] = [
    4, 26, 30, 45, 60, 150, 500, 32, 49, 3056, 4096, 4099, 128, 582, 1024, 1025,
];

fn main() {
    let pool = BytePool::builder()
        .size_rate(NonZero::new(32).unwrap())
        .max_pooled_size(4096)
        .build();

    println!(
        "Pool: size rate {} bytes, ceiling {} bytes, {} parked buffers per class",
        pool.size_rate(),
        pool.max_pooled_size(),
        pool.bucket_limit()
    );

    let mut buffers = Vec::with_capacity(SIZES.len());

    for size in SIZES {
        match pool.alloc(size) {
            Some(buffer) => {
                println!(
                    "alloc({size:>4}) -> {:p} capacity {:>4}, in use: {}",
                    buffer.ptr(),
                    buffer.capacity(),
                    pool.len()
                );
                buffers.push(buffer);
            }
            None => println!("alloc({size:>4}) -> failed"),
        }
    }

    for buffer in buffers {
        let ptr = buffer.ptr();

        if pool.contains(ptr) {
            pool.free(buffer);
            println!("free({ptr:p}), in use: {}", pool.len());
        }
    }

    println!("Parked for reuse: {}", pool.parked_len());

    pool.clear();
    println!("After clear, in use: {}", pool.len());
}
