//! Lock-free per-thread transport buffer
//!
//! Classic single-producer single-consumer ring: the owning thread
//! pushes, the drain thread pops. Capacity is a power of two so slot
//! indexing is a mask, and the head/tail indices live on their own
//! cache lines.

use crate::core::record::LogRecord;
use crossbeam_utils::CachePadded;
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Default slot count per producer thread.
pub const DEFAULT_CAPACITY: usize = 1 << 16;

/// Occupancy fraction above which a buffer reports `nearly_full`.
const NEARLY_FULL_NUM: usize = 9;
const NEARLY_FULL_DEN: usize = 10;

/// Single-producer single-consumer ring buffer for [`LogRecord`]s.
///
/// One slot is sacrificed to distinguish full from empty: the buffer is
/// full when `(tail + 1) % capacity == head`. Push releases the tail so
/// the consumer's acquire of it synchronizes the slot contents; pop is
/// symmetric on the head.
pub struct ProducerBuffer {
    slots: Box<[UnsafeCell<Option<LogRecord>>]>,
    mask: usize,
    nearly_full_mark: usize,
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
    active: AtomicBool,
}

// SAFETY: only the owning producer thread calls push (writes slots at
// tail), only the drain thread calls pop (takes slots at head), and the
// release/acquire pair on the indices transfers slot ownership between
// them. No slot is accessed by both sides at once.
unsafe impl Send for ProducerBuffer {}
unsafe impl Sync for ProducerBuffer {}

impl ProducerBuffer {
    /// Create a buffer with `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is not a power of two greater than one.
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity.is_power_of_two() && capacity > 1,
            "capacity must be a power of two greater than one"
        );

        let slots: Vec<UnsafeCell<Option<LogRecord>>> =
            (0..capacity).map(|_| UnsafeCell::new(None)).collect();

        Self {
            slots: slots.into_boxed_slice(),
            mask: capacity - 1,
            nearly_full_mark: capacity * NEARLY_FULL_NUM / NEARLY_FULL_DEN,
            head: CachePadded::new(AtomicUsize::new(0)),
            tail: CachePadded::new(AtomicUsize::new(0)),
            active: AtomicBool::new(true),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push a record. Only the owning producer thread may call this.
    ///
    /// Never blocks and never allocates; on a full buffer the record is
    /// handed back so the caller can retry.
    pub fn push(&self, record: LogRecord) -> Result<(), LogRecord> {
        let tail = self.tail.load(Ordering::Relaxed);
        let next = (tail + 1) & self.mask;
        if next == self.head.load(Ordering::Acquire) {
            return Err(record);
        }

        // SAFETY: the slot at `tail` is outside the consumer's visible
        // range until the release store below publishes it.
        unsafe {
            *self.slots[tail].get() = Some(record);
        }
        self.tail.store(next, Ordering::Release);
        Ok(())
    }

    /// Pop the oldest record. Only the drain thread may call this.
    pub fn pop(&self) -> Option<LogRecord> {
        let head = self.head.load(Ordering::Relaxed);
        if head == self.tail.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: the acquire of tail above guarantees the producer's
        // write to this slot is visible, and the producer will not touch
        // it again until head advances past it.
        let record = unsafe { (*self.slots[head].get()).take() };
        self.head.store((head + 1) & self.mask, Ordering::Release);
        record
    }

    /// Number of records currently queued.
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Relaxed);
        tail.wrapping_sub(head) & self.mask
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// True when occupancy is at or above 90% of capacity.
    pub fn nearly_full(&self) -> bool {
        self.len() >= self.nearly_full_mark
    }

    /// True until the owning thread exits.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Called from the owning thread's teardown hook. The buffer stays
    /// drainable; the registry drops it once the consumer has emptied it.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}
