//! Lock-free single-producer/single-consumer FIFOs between the audio callback
//! and the UI-rate analysis tick.
//!
//! Two flavours share the same ring: [`block_fifo`] moves fixed-size blocks of
//! `Copy` samples, [`item_fifo`] moves whole owned values such as display
//! paths. Neither side ever blocks or allocates after construction; a full
//! FIFO drops the incoming data and an empty one reports `false`/`None`.
//!
//! "Preparing" a FIFO means building a new pair. Both halves are owned, so the
//! borrow checker guarantees nobody is pushing or pulling while that happens.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    CachingCons, CachingProd, HeapRb,
};

use crate::error::EqError;

/// Writing half of a block FIFO. Owned by the audio callback.
pub struct BlockProducer<T> {
    inner: CachingProd<Arc<HeapRb<T>>>,
    block_size: usize,
    dropped: Arc<AtomicU64>,
}

/// Reading half of a block FIFO. Owned by the analysis tick.
pub struct BlockConsumer<T> {
    inner: CachingCons<Arc<HeapRb<T>>>,
    block_size: usize,
    dropped: Arc<AtomicU64>,
}

/// Create a FIFO holding up to `capacity` blocks of `block_size` elements.
pub fn block_fifo<T: Copy>(
    capacity: usize,
    block_size: usize,
) -> Result<(BlockProducer<T>, BlockConsumer<T>), EqError> {
    if block_size == 0 {
        return Err(EqError::InvalidBlockSize(block_size));
    }
    if capacity == 0 {
        return Err(EqError::InvalidCapacity(capacity));
    }
    let slots = capacity
        .checked_mul(block_size)
        .ok_or(EqError::InvalidCapacity(capacity))?;

    let rb = HeapRb::<T>::new(slots);
    let (prod, cons) = rb.split();
    let dropped = Arc::new(AtomicU64::new(0));

    Ok((
        BlockProducer {
            inner: prod,
            block_size,
            dropped: Arc::clone(&dropped),
        },
        BlockConsumer {
            inner: cons,
            block_size,
            dropped,
        },
    ))
}

impl<T: Copy> BlockProducer<T> {
    /// Enqueue one whole block.
    ///
    /// Returns `false` without writing anything when the block has the wrong
    /// length or there is no room for all of it; queued blocks are never
    /// overwritten.
    pub fn push(&mut self, block: &[T]) -> bool {
        if block.len() != self.block_size {
            return false;
        }
        if self.inner.vacant_len() < self.block_size {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.inner.push_slice(block) == self.block_size
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Blocks that still fit without dropping.
    pub fn free_blocks(&self) -> usize {
        self.inner.vacant_len() / self.block_size
    }
}

impl<T: Copy> BlockConsumer<T> {
    /// Dequeue the oldest block into `out`.
    ///
    /// Returns `false` and leaves `out` untouched when no complete block is
    /// queued or `out` has the wrong length.
    pub fn pull(&mut self, out: &mut [T]) -> bool {
        if out.len() != self.block_size || self.inner.occupied_len() < self.block_size {
            return false;
        }
        self.inner.pop_slice(out) == self.block_size
    }

    /// Complete blocks waiting to be read.
    pub fn available_for_reading(&self) -> usize {
        self.inner.occupied_len() / self.block_size
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Blocks rejected by the producer because the FIFO was full.
    pub fn dropped_blocks(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Discard everything queued so far.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Writing half of an item FIFO.
pub struct ItemProducer<T> {
    inner: CachingProd<Arc<HeapRb<T>>>,
}

/// Reading half of an item FIFO.
pub struct ItemConsumer<T> {
    inner: CachingCons<Arc<HeapRb<T>>>,
}

/// Create a FIFO of up to `capacity` owned items.
pub fn item_fifo<T>(capacity: usize) -> Result<(ItemProducer<T>, ItemConsumer<T>), EqError> {
    if capacity == 0 {
        return Err(EqError::InvalidCapacity(capacity));
    }
    let (prod, cons) = HeapRb::<T>::new(capacity).split();
    Ok((ItemProducer { inner: prod }, ItemConsumer { inner: cons }))
}

impl<T> ItemProducer<T> {
    /// Enqueue `item`, or drop it when the FIFO is full.
    pub fn push(&mut self, item: T) -> bool {
        self.inner.try_push(item).is_ok()
    }
}

impl<T> ItemConsumer<T> {
    pub fn pop(&mut self) -> Option<T> {
        self.inner.try_pop()
    }

    /// Drain the FIFO and keep only the newest item.
    pub fn pop_latest(&mut self) -> Option<T> {
        let mut latest = None;
        while let Some(item) = self.inner.try_pop() {
            latest = Some(item);
        }
        latest
    }

    pub fn len(&self) -> usize {
        self.inner.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
