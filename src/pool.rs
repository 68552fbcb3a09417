//! Bounded single-producer/single-consumer slot pool.
//!
//! The producer (periodic control task) never blocks: it writes into an
//! idle slot if there is one and otherwise takes back the oldest unread
//! slot, dropping that sample. The consumer takes the oldest unread slot,
//! copies it out and hands the slot back with `return_slot`.
//!
//! Each slot owns one atomic word: a 30-bit publish sequence number in the
//! high bits and the slot state in the low two bits. Every transition out
//! of `ACTIVE` is a compare-and-swap on the whole word, so a reclaim and a
//! take can never both win the same slot, and a slot rewritten behind the
//! consumer's back fails the consumer's swap instead of being read out of
//! order.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

const IDLE: u32 = 0;
const WRITING: u32 = 1;
const ACTIVE: u32 = 2;
const CHECKED_OUT: u32 = 3;

const STATE_MASK: u32 = 0b11;
const SEQ_SHIFT: u32 = 2;
const SEQ_MASK: u32 = u32::MAX >> SEQ_SHIFT;

#[inline]
const fn pack(seq: u32, state: u32) -> u32 {
    ((seq & SEQ_MASK) << SEQ_SHIFT) | state
}

#[inline]
const fn state(word: u32) -> u32 {
    word & STATE_MASK
}

#[inline]
const fn seq(word: u32) -> u32 {
    word >> SEQ_SHIFT
}

// `a` was published before `b`, modulo sequence wrap.
#[inline]
fn is_older(a: u32, b: u32) -> bool {
    let d = b.wrapping_sub(a) & SEQ_MASK;
    d != 0 && d < (SEQ_MASK >> 1)
}

/// Number of slots in each state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Occupancy {
    pub idle: usize,
    pub writing: usize,
    pub active: usize,
    pub checked_out: usize,
}

impl Occupancy {
    pub fn total(&self) -> usize {
        self.idle + self.writing + self.active + self.checked_out
    }
}

pub struct SlotPool<T, const N: usize> {
    tags: [AtomicU32; N],
    slots: [UnsafeCell<T>; N],
}

// Slot contents are only touched by the side that owns the slot's state:
// the producer while WRITING, the consumer right after winning ACTIVE ->
// CHECKED_OUT.
unsafe impl<T: Send, const N: usize> Sync for SlotPool<T, N> {}

impl<T: Copy, const N: usize> SlotPool<T, N> {
    pub const CAPACITY: usize = N;

    /// Pool with every slot idle and holding `fill`.
    pub fn new(fill: T) -> Self {
        SlotPool { tags: core::array::from_fn(|_| AtomicU32::new(pack(0, IDLE))),
                   slots: core::array::from_fn(|_| UnsafeCell::new(fill)) }
    }

    /// Hands out the two ends. Borrowing `self` mutably guarantees there
    /// is only ever one of each.
    pub fn split(&mut self) -> (Publisher<'_, T, N>, Reader<'_, T, N>) {
        let pool: &Self = self;
        (Publisher { pool, next_seq: 0, reclaimed: 0 }, Reader { pool })
    }

    pub fn occupancy(&self) -> Occupancy {
        let mut o = Occupancy::default();
        for tag in self.tags.iter() {
            match state(tag.load(Ordering::Acquire)) {
                IDLE => o.idle += 1,
                WRITING => o.writing += 1,
                ACTIVE => o.active += 1,
                _ => o.checked_out += 1,
            }
        }
        o
    }

    fn oldest_active(&self) -> Option<(usize, u32)> {
        let mut oldest: Option<(usize, u32)> = None;
        for (i, tag) in self.tags.iter().enumerate() {
            let word = tag.load(Ordering::Acquire);
            if state(word) != ACTIVE {
                continue;
            }
            let replace = match oldest {
                Some((_, best)) => is_older(seq(word), seq(best)),
                None => true,
            };
            if replace {
                oldest = Some((i, word));
            }
        }
        oldest
    }

    fn all_checked_out(&self) -> bool {
        self.tags.iter().all(|tag| state(tag.load(Ordering::Acquire)) == CHECKED_OUT)
    }

    fn has_active_older_than(&self, s: u32) -> bool {
        self.tags.iter().any(|tag| {
                            let word = tag.load(Ordering::Acquire);
                            state(word) == ACTIVE && is_older(seq(word), s)
                        })
    }
}

/// Producer end. Lives in the periodic control context.
pub struct Publisher<'a, T, const N: usize> {
    pool: &'a SlotPool<T, N>,
    next_seq: u32,
    reclaimed: u32,
}

impl<'a, T: Copy, const N: usize> Publisher<'a, T, N> {
    /// Stores `value` as the newest unread entry. Prefers an idle slot,
    /// else overwrites the oldest unread one. Returns `false` without
    /// writing only when every slot is checked out by the reader.
    pub fn publish(&mut self, value: T) -> bool {
        let seq = self.next_seq & SEQ_MASK;
        let index = match self.acquire(seq) {
            Some(index) => index,
            None => return false,
        };
        // SAFETY: slot is WRITING, which only the producer can leave.
        unsafe { *self.pool.slots[index].get() = value };
        self.pool.tags[index].store(pack(seq, ACTIVE), Ordering::Release);
        self.next_seq = self.next_seq.wrapping_add(1);
        true
    }

    /// Samples dropped so far because the reader fell behind.
    pub fn reclaimed(&self) -> u32 {
        self.reclaimed
    }

    pub fn occupancy(&self) -> Occupancy {
        self.pool.occupancy()
    }

    fn acquire(&mut self, seq: u32) -> Option<usize> {
        let writing = pack(seq, WRITING);
        // Each retry means the reader moved a slot between scans (took
        // one or handed one back), so the loop is lock-free.
        loop {
            for (i, tag) in self.pool.tags.iter().enumerate() {
                let word = tag.load(Ordering::Acquire);
                if state(word) == IDLE
                   && tag.compare_exchange(word, writing, Ordering::AcqRel, Ordering::Acquire)
                         .is_ok()
                {
                    return Some(i);
                }
            }
            if let Some((i, word)) = self.pool.oldest_active() {
                if self.pool.tags[i]
                       .compare_exchange(word, writing, Ordering::AcqRel, Ordering::Acquire)
                       .is_ok()
                {
                    self.reclaimed = self.reclaimed.wrapping_add(1);
                    return Some(i);
                }
                continue;
            }
            if self.pool.all_checked_out() {
                return None;
            }
        }
    }
}

/// Proof of a checked-out slot; give it back with `Reader::return_slot`.
#[derive(Debug, PartialEq, Eq)]
pub struct SlotHandle {
    index: usize,
    word: u32,
}

/// A value taken from the pool together with the slot it came from.
#[derive(Debug)]
pub struct Taken<T> {
    pub handle: SlotHandle,
    pub value: T,
}

/// Consumer end. Lives in the slower reader context.
pub struct Reader<'a, T, const N: usize> {
    pool: &'a SlotPool<T, N>,
}

impl<'a, T: Copy, const N: usize> Reader<'a, T, N> {
    /// Checks out the oldest unread entry, or `None` when nothing is
    /// pending.
    pub fn take(&mut self) -> Option<Taken<T>> {
        loop {
            let (index, word) = self.pool.oldest_active()?;
            let checked_out = pack(seq(word), CHECKED_OUT);
            let tag = &self.pool.tags[index];
            if tag.compare_exchange(word, checked_out, Ordering::AcqRel, Ordering::Acquire)
                  .is_err()
            {
                // reclaimed by the producer, that sample is gone
                continue;
            }
            // The scan is not a snapshot: an older entry may have been
            // published into a slot already passed over. Put this one back.
            if self.pool.has_active_older_than(seq(word)) {
                tag.store(word, Ordering::Release);
                continue;
            }
            // SAFETY: CHECKED_OUT slots are never written by the producer.
            let value = unsafe { *self.pool.slots[index].get() };
            return Some(Taken { handle: SlotHandle { index, word: checked_out }, value });
        }
    }

    /// Marks the slot idle again. Returns `false` for a handle that does
    /// not match a checked-out slot of this pool.
    pub fn return_slot(&mut self, handle: SlotHandle) -> bool {
        match self.pool.tags.get(handle.index) {
            Some(tag) => tag.compare_exchange(handle.word,
                                              pack(seq(handle.word), IDLE),
                                              Ordering::AcqRel,
                                              Ordering::Acquire)
                            .is_ok(),
            None => false,
        }
    }

    /// Unread entries currently in the pool.
    pub fn pending(&self) -> usize {
        self.pool.occupancy().active
    }

    pub fn occupancy(&self) -> Occupancy {
        self.pool.occupancy()
    }
}

impl<'a, T: Copy + Default, const N: usize> Reader<'a, T, N> {
    /// Next value in publish order (the oldest unread one), with its
    /// slot already returned; `T::default()` when there is none.
    pub fn next_value(&mut self) -> T {
        match self.take() {
            Some(Taken { handle, value }) => {
                self.return_slot(handle);
                value
            }
            None => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing() {
        let w = pack(12345, ACTIVE);
        assert_eq!(state(w), ACTIVE);
        assert_eq!(seq(w), 12345);
        assert_eq!(seq(pack(SEQ_MASK + 3, IDLE)), 2);
    }

    #[test]
    fn age_survives_wrap() {
        assert!(is_older(1, 2));
        assert!(!is_older(2, 1));
        assert!(!is_older(5, 5));
        assert!(is_older(SEQ_MASK, 0));
        assert!(is_older(SEQ_MASK - 1, 3));
    }

    #[test]
    fn fifo_within_capacity() {
        let mut pool: SlotPool<u32, 4> = SlotPool::new(0);
        let (mut tx, mut rx) = pool.split();
        for v in 1..=4 {
            assert!(tx.publish(v));
        }
        for v in 1..=4 {
            assert_eq!(rx.next_value(), v);
        }
        assert!(rx.take().is_none());
        assert_eq!(rx.next_value(), 0);
    }

    #[test]
    fn overflow_reclaims_oldest() {
        let mut pool: SlotPool<u32, 3> = SlotPool::new(0);
        let (mut tx, mut rx) = pool.split();
        for v in 1..=5 {
            assert!(tx.publish(v));
        }
        assert_eq!(tx.reclaimed(), 2);
        assert_eq!(rx.pending(), 3);
        assert_eq!(rx.next_value(), 3);
        assert_eq!(rx.next_value(), 4);
        assert_eq!(rx.next_value(), 5);
    }

    #[test]
    fn checked_out_slots_are_never_reclaimed() {
        let mut pool: SlotPool<u32, 2> = SlotPool::new(0);
        let (mut tx, mut rx) = pool.split();
        tx.publish(1);
        tx.publish(2);
        let a = rx.take().unwrap();
        let b = rx.take().unwrap();
        assert_eq!((a.value, b.value), (1, 2));

        assert!(!tx.publish(3));
        assert_eq!(tx.occupancy().checked_out, 2);

        assert!(rx.return_slot(a.handle));
        assert!(tx.publish(3));
        assert_eq!(rx.next_value(), 3);
        assert!(rx.return_slot(b.handle));
        assert_eq!(rx.occupancy().idle, 2);
    }

    #[test]
    fn sequence_numbers_wrap_cleanly() {
        let mut pool: SlotPool<u32, 2> = SlotPool::new(0);
        let (mut tx, mut rx) = pool.split();
        tx.next_seq = SEQ_MASK - 1;
        tx.publish(10);
        tx.publish(11);
        tx.publish(12);
        assert_eq!(rx.next_value(), 11);
        assert_eq!(rx.next_value(), 12);
    }
}
