// Copyright 2026 the Vanta Engine authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! FIFO queue over a forward-moving buffer window.
//!
//! This is **not** a wraparound ring buffer. The `head` (write) and `tail`
//! (read) offsets only ever advance into the backing buffer; they reset to
//! the buffer start solely when the queue becomes empty (`tail == head`).
//! Sustained enqueue/dequeue churn without ever draining therefore advances
//! both offsets monotonically and triggers capacity growth even though
//! elements have been logically removed. That is a deliberate
//! simplicity-over-memory-reuse trade-off the rest of the engine's
//! capacity-growth behavior depends on, not an oversight.

use crate::alloc::{self, NativeRelease};
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ptr;

const DEFAULT_CAPACITY: usize = 4;

/// A growable FIFO queue over native memory with forward-only offsets.
///
/// Not internally synchronized; see
/// [`SharedNativeQueue`](crate::shared_queue::SharedNativeQueue) for the
/// lock-guarded variant.
pub struct NativeQueue<T: Pod> {
    data: *mut T,
    head: usize,
    tail: usize,
    capacity: usize,
}

// SAFETY: Pod elements, exclusively owned buffer; same reasoning as
// NativeList.
unsafe impl<T: Pod> Send for NativeQueue<T> {}

impl<T: Pod> NativeQueue<T> {
    /// Creates an empty queue with no allocation.
    pub fn new() -> Self {
        Self {
            data: ptr::null_mut(),
            head: 0,
            tail: 0,
            capacity: 0,
        }
    }

    /// Creates an empty queue with a pre-allocated, zeroed buffer. A zero
    /// request allocates nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut queue = Self::new();
        if capacity > 0 {
            queue.ensure_capacity(capacity);
        }
        queue
    }

    /// Returns the number of elements currently in the queue.
    #[inline]
    pub fn len(&self) -> usize {
        self.head - self.tail
    }

    /// Returns true if the queue holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns the buffer capacity in elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current write offset. Diagnostic; offsets only advance
    /// until an empty-queue reset.
    #[inline]
    pub fn head_offset(&self) -> usize {
        self.head
    }

    /// Returns the current read offset. Diagnostic.
    #[inline]
    pub fn tail_offset(&self) -> usize {
        self.tail
    }

    /// Grows the buffer so at least `required` slots are addressable,
    /// doubling the capacity (`max(required, cap == 0 ? 4 : 2 * cap)`).
    /// Growth is keyed on the absolute write offset, so a queue that has
    /// churned far into its buffer grows even while nearly empty.
    pub fn ensure_capacity(&mut self, required: usize) {
        if required <= self.capacity && !self.data.is_null() {
            return;
        }
        let mut new_capacity = if self.capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            2 * self.capacity
        };
        if new_capacity < required {
            new_capacity = required;
        }
        if self.data.is_null() {
            self.data = alloc::alloc_array(new_capacity);
        } else {
            // SAFETY: self.data was allocated with self.capacity elements.
            self.data = unsafe { alloc::realloc_array(self.data, self.capacity, new_capacity) };
        }
        self.capacity = new_capacity;
    }

    /// Appends an element at the write offset. Amortized O(1).
    pub fn enqueue(&mut self, item: T) {
        self.ensure_capacity(self.head + 1);
        // SAFETY: ensure_capacity guarantees head < capacity.
        unsafe { self.data.add(self.head).write(item) };
        self.head += 1;
    }

    /// Removes and returns the element at the read offset, zeroing its slot.
    ///
    /// Calling this on an empty queue is a caller error; it is
    /// debug-asserted and not checked in release builds. Use
    /// [`try_dequeue`](Self::try_dequeue) for the checked form.
    pub fn dequeue(&mut self) -> T {
        debug_assert!(!self.is_empty(), "dequeue on empty NativeQueue");
        // SAFETY: tail < head <= capacity, slot holds an initialized element.
        let value = unsafe {
            let slot = self.data.add(self.tail);
            let value = slot.read();
            slot.write(T::zeroed());
            value
        };
        self.tail += 1;
        if self.tail == self.head {
            // Empty again: the only point where the window rewinds.
            self.head = 0;
            self.tail = 0;
        }
        value
    }

    /// Removes and returns the front element, or `None` when empty.
    pub fn try_dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.dequeue())
    }

    /// Returns a copy of the front element without removing it.
    ///
    /// Empty-queue peek is a caller error like [`dequeue`](Self::dequeue).
    pub fn peek(&self) -> T {
        debug_assert!(!self.is_empty(), "peek on empty NativeQueue");
        // SAFETY: tail < head, slot holds an initialized element.
        unsafe { self.data.add(self.tail).read() }
    }

    /// Returns a copy of the front element, or `None` when empty.
    pub fn try_peek(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.peek())
    }

    /// Returns the live window as a slice, front to back.
    pub fn as_slice(&self) -> &[T] {
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: [tail, head) holds initialized elements.
        unsafe { std::slice::from_raw_parts(self.data.add(self.tail), self.len()) }
    }

    /// Copies the live window into the front of `dst`, front to back.
    ///
    /// `dst` must be at least `len` elements long.
    pub fn copy_to(&self, dst: &mut [T]) {
        let src = self.as_slice();
        dst[..src.len()].copy_from_slice(src);
    }

    /// Zeroes the live window and resets both offsets to the buffer start.
    pub fn clear(&mut self) {
        if !self.data.is_null() && !self.is_empty() {
            // SAFETY: [tail, head) lies inside the buffer.
            unsafe { ptr::write_bytes(self.data.add(self.tail), 0, self.len()) };
        }
        self.head = 0;
        self.tail = 0;
    }

    /// Frees the buffer and resets to the all-zero empty state. Safe to call
    /// more than once; a later drop is a no-op.
    pub fn release(&mut self) {
        // SAFETY: self.data was allocated with self.capacity elements.
        unsafe { alloc::free_array(self.data, self.capacity) };
        self.data = ptr::null_mut();
        self.head = 0;
        self.tail = 0;
        self.capacity = 0;
    }
}

impl<T: Pod + PartialEq> NativeQueue<T> {
    /// Returns true if some element in the live window equals `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.as_slice().contains(item)
    }
}

impl<T: Pod> Default for NativeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> Drop for NativeQueue<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Pod> NativeRelease for NativeQueue<T> {
    fn release(&mut self) {
        NativeQueue::release(self);
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for NativeQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = NativeQueue::new();
        queue.enqueue(1u32);
        queue.enqueue(2);
        queue.enqueue(3);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek(), 1);
        assert_eq!(queue.len(), 3, "peek must not remove");
        assert_eq!(queue.dequeue(), 1);
        assert_eq!(queue.dequeue(), 2);
        assert_eq!(queue.dequeue(), 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_offsets_advance_without_reuse() {
        let mut queue = NativeQueue::with_capacity(4);
        queue.enqueue(1u32);
        queue.enqueue(2);
        queue.enqueue(3);
        assert_eq!(queue.dequeue(), 1);
        assert_eq!(queue.dequeue(), 2);

        // Two slots were logically freed below the window, but the write
        // offset keeps advancing: no wraparound.
        assert_eq!(queue.tail_offset(), 2);
        assert_eq!(queue.head_offset(), 3);
        queue.enqueue(4);
        assert_eq!(queue.head_offset(), 4);

        // Next enqueue exceeds the buffer even though len == 2 < capacity:
        // churn triggers growth instead of reusing freed slots.
        queue.enqueue(5);
        assert_eq!(queue.capacity(), 8);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.as_slice(), &[3, 4, 5]);
    }

    #[test]
    fn test_empty_reset_rewinds_window() {
        let mut queue = NativeQueue::new();
        for i in 0..3u32 {
            queue.enqueue(i);
        }
        for _ in 0..3 {
            queue.dequeue();
        }
        // Drained: both offsets reset to the buffer start.
        assert_eq!(queue.head_offset(), 0);
        assert_eq!(queue.tail_offset(), 0);

        queue.enqueue(42);
        assert_eq!(queue.head_offset(), 1);
        assert_eq!(queue.try_peek(), Some(42));
    }

    #[test]
    fn test_dequeue_zeroes_slot() {
        let mut queue = NativeQueue::new();
        queue.enqueue(7u64);
        queue.enqueue(8);
        queue.dequeue();
        // Slot 0 was zeroed on dequeue.
        assert_eq!(unsafe { *queue.data }, 0);
    }

    #[test]
    fn test_try_dequeue_on_empty() {
        let mut queue = NativeQueue::<u32>::new();
        assert_eq!(queue.try_dequeue(), None);
        assert_eq!(queue.try_peek(), None);
        queue.enqueue(1);
        assert_eq!(queue.try_dequeue(), Some(1));
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn test_contains_and_copy_to() {
        let mut queue = NativeQueue::new();
        for i in 0..5u16 {
            queue.enqueue(i * 2);
        }
        queue.dequeue();

        assert!(queue.contains(&6));
        assert!(!queue.contains(&0), "dequeued element is out of the window");

        let mut out = [0u16; 4];
        queue.copy_to(&mut out);
        assert_eq!(out, [2, 4, 6, 8]);
    }

    #[test]
    fn test_clear_resets_offsets() {
        let mut queue = NativeQueue::new();
        for i in 0..6u32 {
            queue.enqueue(i);
        }
        queue.dequeue();
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.head_offset(), 0);
        assert_eq!(queue.tail_offset(), 0);
        queue.enqueue(9);
        assert_eq!(queue.dequeue(), 9);
    }

    #[test]
    fn test_with_capacity_zero_stays_unallocated() {
        let queue = NativeQueue::<u32>::with_capacity(0);
        assert_eq!(queue.capacity(), 0);

        let mut queue = queue;
        queue.enqueue(1);
        assert_eq!(queue.capacity(), 4, "first enqueue takes the default");
    }

    #[test]
    fn test_release_resets_to_empty() {
        let mut queue = NativeQueue::new();
        queue.enqueue(1u8);
        queue.release();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 0);
        queue.release();
    }
}
