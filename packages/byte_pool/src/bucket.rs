use crate::Block;

/// A LIFO free list of parked blocks that all share one size class.
///
/// The most recently parked block is reused first, which tends to hand out memory that is
/// still warm in the cache.
#[derive(Debug, Default)]
pub(crate) struct Bucket {
    count: usize,
    head: Option<Box<Block>>,
}

impl Bucket {
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) fn push(&mut self, mut block: Box<Block>) {
        debug_assert!(block.next.is_none(), "block is already linked into a bucket");

        block.next = self.head.take();
        self.head = Some(block);

        // Cannot overflow: every parked block is a distinct live heap allocation.
        self.count = self.count.wrapping_add(1);
    }

    pub(crate) fn pop(&mut self) -> Option<Box<Block>> {
        let mut block = self.head.take()?;
        self.head = block.next.take();

        debug_assert!(self.count > 0);
        self.count = self.count.wrapping_sub(1);

        Some(block)
    }

    /// Releases every parked block back to the allocator.
    pub(crate) fn clear(&mut self) {
        // Unlinking one block at a time keeps drop from recursing down the chain.
        while let Some(block) = self.pop() {
            drop(block);
        }

        debug_assert!(self.is_empty());
        debug_assert_eq!(self.count, 0);
    }
}

impl Drop for Bucket {
    #[cfg_attr(test, mutants::skip)] // Mutations only change how deep the field drop recursion goes.
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn block(capacity: usize) -> Box<Block> {
        Block::try_new_zeroed(capacity).unwrap()
    }

    #[test]
    fn new_bucket_is_empty() {
        let mut bucket = Bucket::default();

        assert_eq!(bucket.len(), 0);
        assert!(bucket.is_empty());
        assert!(bucket.pop().is_none());
    }

    #[test]
    fn push_then_pop_counts() {
        let mut bucket = Bucket::default();

        bucket.push(block(32));
        bucket.push(block(32));
        assert_eq!(bucket.len(), 2);
        assert!(!bucket.is_empty());

        let popped = bucket.pop().unwrap();
        assert!(popped.next.is_none());
        assert_eq!(bucket.len(), 1);

        _ = bucket.pop().unwrap();
        assert_eq!(bucket.len(), 0);
        assert!(bucket.is_empty());
    }

    #[test]
    fn pop_is_last_in_first_out() {
        let mut bucket = Bucket::default();

        let first = block(32);
        let first_addr = first.addr();
        let second = block(32);
        let second_addr = second.addr();

        bucket.push(first);
        bucket.push(second);

        assert_eq!(bucket.pop().unwrap().addr(), second_addr);
        assert_eq!(bucket.pop().unwrap().addr(), first_addr);
    }

    #[test]
    fn clear_releases_everything() {
        let mut bucket = Bucket::default();

        for _ in 0..5 {
            bucket.push(block(16));
        }

        bucket.clear();

        assert_eq!(bucket.len(), 0);
        assert!(bucket.is_empty());
    }

    #[test]
    fn dropping_long_chain_does_not_recurse() {
        // Miri test runtime scales with memory usage.
        let count = if cfg!(miri) { 1_000 } else { 100_000 };

        let mut bucket = Bucket::default();

        for _ in 0..count {
            bucket.push(block(8));
        }

        drop(bucket);
    }
}
