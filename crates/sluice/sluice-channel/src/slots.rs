//! Owed-count slot buffer and cursor arithmetic for the broadcast queue.
//!
//! Every element pushed into a [`BroadcastQueue`](crate::BroadcastQueue) is
//! stamped with a monotonically increasing sequence number, and every reader
//! keeps its position as a sequence number as well. Because cursors never
//! refer to a physical index, evicting the front slot only bumps `head_seq`;
//! no reader has to be adjusted.
//!
//! # Layout
//!
//! ```text
//! head_seq = 5
//! slots    = [ e5 (owed 1) | e6 (owed 2) | e7 (owed 2) ]
//! write_seq = head_seq + slots.len() = 8
//!
//! reader A: read_seq = 5  -> covers e5, e6, e7
//! reader B: read_seq = 6  -> covers e6, e7   (registered after e5 was pushed)
//! ```
//!
//! When A consumes e5 its owed-count drops to zero and the slot is evicted:
//! `head_seq` becomes 6, both cursors stay exactly where they were.
//!
//! # Invariants
//!
//! - `head_seq <= read_seq <= write_seq` for every registered reader.
//! - A slot's owed-count equals the number of registered readers whose range
//!   still covers it. Readers consume front-to-back, so counts only ever reach
//!   zero at the front.

use std::collections::VecDeque;

/// A buffered element plus the number of readers that still have to consume it.
struct Slot<T> {
    value: T,
    owed: usize,
}

pub(crate) struct SlotBuffer<T> {
    slots: VecDeque<Slot<T>>,
    /// Sequence number of `slots[0]`.
    head_seq: u64,
    /// Number of readers currently registered against this buffer.
    readers: usize,
}

impl<T> SlotBuffer<T> {
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            head_seq: 0,
            readers: 0,
        }
    }

    #[inline]
    pub fn readers(&self) -> usize {
        self.readers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Sequence number the next pushed element will receive.
    #[inline]
    pub fn write_seq(&self) -> u64 {
        self.head_seq + self.slots.len() as u64
    }

    /// Number of elements between `read_seq` and the end of the buffer.
    #[inline]
    pub fn available(&self, read_seq: u64) -> usize {
        self.write_seq().saturating_sub(read_seq) as usize
    }

    /// Registers a reader positioned at the current end of the buffer.
    ///
    /// The new reader covers nothing, so no owed-count changes.
    pub fn register(&mut self) -> u64 {
        self.readers += 1;
        self.write_seq()
    }

    /// Registers a reader that covers everything from `read_seq` onwards.
    ///
    /// Used when a cursor is duplicated: the duplicate owes a consumption for
    /// every element the original still covers.
    pub fn register_at(&mut self, read_seq: u64) {
        self.readers += 1;
        let start = self.offset_of(read_seq);
        for slot in self.slots.range_mut(start..) {
            slot.owed += 1;
        }
    }

    /// Deregisters a reader, settling the counts for its remaining range.
    pub fn unregister(&mut self, read_seq: u64) {
        self.release(read_seq);
        self.readers = self.readers.saturating_sub(1);
    }

    /// Releases the owed-counts held for `[read_seq, write_seq)` and evicts
    /// whatever became fully consumed.
    pub fn release(&mut self, read_seq: u64) {
        let start = self.offset_of(read_seq);
        for slot in self.slots.range_mut(start..) {
            slot.owed = slot.owed.saturating_sub(1);
        }
        self.evict();
    }

    /// Appends `value` owed to every registered reader.
    ///
    /// Returns `false` (and drops `value`) when nobody is registered.
    pub fn push(&mut self, value: T) -> bool {
        if self.readers == 0 {
            return false;
        }
        self.slots.push_back(Slot {
            value,
            owed: self.readers,
        });
        true
    }

    /// Consumes the element at `read_seq` on behalf of one reader.
    ///
    /// The last reader to consume an element takes it by value; every other
    /// reader gets a clone.
    pub fn take(&mut self, read_seq: u64) -> Option<T>
    where
        T: Clone,
    {
        let idx = self.index_of(read_seq)?;
        let owed = {
            let slot = &mut self.slots[idx];
            slot.owed = slot.owed.saturating_sub(1);
            slot.owed
        };

        if owed == 0 && idx == 0 {
            let slot = self.slots.pop_front()?;
            self.head_seq += 1;
            self.evict();
            return Some(slot.value);
        }

        Some(self.slots[idx].value.clone())
    }

    /// Elements covered by a reader at `read_seq`, front to back.
    pub fn covered(&self, read_seq: u64) -> impl Iterator<Item = &T> {
        let start = self.offset_of(read_seq);
        self.slots.range(start..).map(|slot| &slot.value)
    }

    /// Drops every buffered element, returning how many were discarded.
    pub fn drain(&mut self) -> usize {
        let dropped = self.slots.len();
        self.head_seq += dropped as u64;
        self.slots.clear();
        dropped
    }

    /// Physical index for `read_seq`, if that element is still buffered.
    #[inline]
    fn index_of(&self, read_seq: u64) -> Option<usize> {
        if read_seq < self.head_seq || read_seq >= self.write_seq() {
            return None;
        }
        Some((read_seq - self.head_seq) as usize)
    }

    /// Physical index a range starting at `read_seq` begins at, clamped.
    #[inline]
    fn offset_of(&self, read_seq: u64) -> usize {
        (read_seq.saturating_sub(self.head_seq) as usize).min(self.slots.len())
    }

    fn evict(&mut self) {
        while self.slots.front().is_some_and(|slot| slot.owed == 0) {
            self.slots.pop_front();
            self.head_seq += 1;
        }
    }
}
