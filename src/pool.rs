//! Recycling of sample objects between the decoder thread and the consumer.
//!
//! A [`Pooled`] object goes back to its pool when dropped, from whichever
//! thread held it last. Wrapping it in an `Arc` gives the shared hand-off the
//! queue needs: the object is recycled once the queue and every consumer
//! holding it have let go.

use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// Snapshot of a pool's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Objects handed out and not yet returned.
    pub outstanding: usize,
    /// Objects sitting in the free list.
    pub available: usize,
    /// High-watermark for `outstanding`.
    pub limit: usize,
}

#[derive(Debug)]
struct PoolInner<T> {
    free: Mutex<Vec<Box<T>>>,
    outstanding: AtomicUsize,
    // Bumped by `reset`; objects from an older generation are not recycled.
    generation: AtomicU64,
    limit: usize,
}

impl<T> PoolInner<T> {
    fn release(&self, object: Box<T>, generation: u64) {
        if generation != self.generation.load(Ordering::Acquire) {
            return;
        }
        let released = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if released.is_err() {
            log::warn!("pool released more objects than it handed out");
        }

        let mut free = self.free.lock();
        if free.len() < self.limit {
            free.push(object);
        }
    }
}

/// A bounded pool of reusable sample objects.
#[derive(Debug)]
pub struct SamplePool<T> {
    inner: Arc<PoolInner<T>>,
}

impl<T: Default> SamplePool<T> {
    /// Creates a pool that hands out at most `limit` objects at a time.
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::new()),
                outstanding: AtomicUsize::new(0),
                generation: AtomicU64::new(0),
                limit,
            }),
        }
    }

    /// Takes a recycled object, or constructs one if the free list is empty.
    ///
    /// Returns `None` once `limit` objects are outstanding, so a consumer that
    /// stops draining cannot make the pool grow without bound.
    pub fn acquire(&self) -> Option<Pooled<T>> {
        let inner = &self.inner;
        let reserved = inner
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < inner.limit).then_some(n + 1)
            });
        if reserved.is_err() {
            return None;
        }

        let object = inner.free.lock().pop().unwrap_or_default();

        Some(Pooled {
            object: ManuallyDrop::new(object),
            pool: Arc::downgrade(inner),
            generation: inner.generation.load(Ordering::Acquire),
        })
    }
}

impl<T> SamplePool<T> {
    /// Drops all pooled objects and forgets the in-flight ones.
    ///
    /// Objects still held elsewhere are destroyed instead of recycled when
    /// their last holder lets go.
    pub fn reset(&self) {
        let mut free = self.inner.free.lock();
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.outstanding.store(0, Ordering::Release);
        free.clear();
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            outstanding: self.inner.outstanding.load(Ordering::Acquire),
            available: self.inner.free.lock().len(),
            limit: self.inner.limit,
        }
    }
}

/// An object on loan from a [`SamplePool`].
#[derive(Debug)]
pub struct Pooled<T> {
    // Taken exactly once, in `Drop`.
    object: ManuallyDrop<Box<T>>,
    pool: Weak<PoolInner<T>>,
    generation: u64,
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.object
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.object
    }
}

impl<T> Drop for Pooled<T> {
    fn drop(&mut self) {
        // SAFETY: `object` is never touched again after this.
        let object = unsafe { ManuallyDrop::take(&mut self.object) };
        if let Some(pool) = self.pool.upgrade() {
            pool.release(object, self.generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Default)]
    struct Block {
        data: Vec<u8>,
    }

    #[test]
    fn acquire_creates_when_empty() {
        let pool = SamplePool::<Block>::new(4);
        let block = pool.acquire().unwrap();
        assert!(block.data.is_empty());
        assert_eq!(
            pool.stats(),
            PoolStats {
                outstanding: 1,
                available: 0,
                limit: 4
            }
        );
    }

    #[test]
    fn released_object_is_reused() {
        let pool = SamplePool::<Block>::new(4);

        let mut block = pool.acquire().unwrap();
        block.data.resize(1024, 7);
        let storage = block.data.as_ptr();
        let object = &*block as *const Block;
        drop(block);

        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(pool.stats().available, 1);

        let block = pool.acquire().unwrap();
        assert_eq!(&*block as *const Block, object);
        assert_eq!(block.data.as_ptr(), storage);
        assert_eq!(block.data.len(), 1024);
    }

    #[test]
    fn limit_caps_outstanding_objects() {
        let pool = SamplePool::<Block>::new(2);
        let a = pool.acquire().unwrap();
        let _b = pool.acquire().unwrap();
        assert!(pool.acquire().is_none());

        drop(a);
        assert!(pool.acquire().is_some());
    }

    #[test]
    fn shared_object_returns_after_last_reference() {
        let pool = SamplePool::<Block>::new(4);
        let shared = Arc::new(pool.acquire().unwrap());
        let consumer = Arc::clone(&shared);

        drop(shared);
        assert_eq!(pool.stats().outstanding, 1);

        thread::spawn(move || drop(consumer)).join().unwrap();
        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(pool.stats().available, 1);
    }

    #[test]
    fn reset_discards_in_flight_objects() {
        let pool = SamplePool::<Block>::new(4);
        let idle = pool.acquire().unwrap();
        let in_flight = pool.acquire().unwrap();
        drop(idle);
        assert_eq!(pool.stats().available, 1);

        pool.reset();
        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(pool.stats().available, 0);

        drop(in_flight);
        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(pool.stats().available, 0);
    }

    #[test]
    fn stale_release_leaves_new_generation_counts_alone() {
        let pool = SamplePool::<Block>::new(4);
        let stale = pool.acquire().unwrap();
        pool.reset();

        let fresh = pool.acquire().unwrap();
        drop(stale);
        assert_eq!(pool.stats().outstanding, 1);

        drop(fresh);
        assert_eq!(pool.stats().outstanding, 0);
        assert_eq!(pool.stats().available, 1);
    }

    #[test]
    fn objects_outliving_the_pool_are_dropped() {
        static DROPPED: AtomicUsize = AtomicUsize::new(0);

        #[derive(Default)]
        struct Tracked;

        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPPED.fetch_add(1, Ordering::SeqCst);
            }
        }

        let pool = SamplePool::<Tracked>::new(4);
        let kept = pool.acquire().unwrap();
        let orphan = pool.acquire().unwrap();
        drop(kept);
        assert_eq!(DROPPED.load(Ordering::SeqCst), 0);

        drop(pool);
        assert_eq!(DROPPED.load(Ordering::SeqCst), 1);
        drop(orphan);
        assert_eq!(DROPPED.load(Ordering::SeqCst), 2);
    }
}
