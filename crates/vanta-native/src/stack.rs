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

//! LIFO stack over a single native array with doubling growth.

use crate::alloc::{self, NativeRelease};
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ptr;

const DEFAULT_CAPACITY: usize = 4;

/// A growable LIFO stack over native memory.
///
/// Same buffer discipline as [`NativeList`](crate::list::NativeList):
/// doubling growth, zeroed initial allocation, explicit or drop-driven
/// release. Not internally synchronized.
pub struct NativeStack<T: Pod> {
    data: *mut T,
    len: usize,
    capacity: usize,
}

// SAFETY: Pod elements, exclusively owned buffer.
unsafe impl<T: Pod> Send for NativeStack<T> {}

impl<T: Pod> NativeStack<T> {
    /// Creates an empty stack with no allocation.
    pub fn new() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }

    /// Creates an empty stack with a pre-allocated, zeroed buffer. A zero
    /// request allocates nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut stack = Self::new();
        if capacity > 0 {
            stack.ensure_capacity(capacity);
        }
        stack
    }

    /// Returns the number of elements on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the stack holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the buffer capacity in elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the elements as a slice, bottom to top.
    pub fn as_slice(&self) -> &[T] {
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: [0, len) holds initialized elements.
        unsafe { std::slice::from_raw_parts(self.data, self.len) }
    }

    /// Grows the buffer so at least `required` elements fit, doubling the
    /// capacity (`max(required, cap == 0 ? 4 : 2 * cap)`).
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

    /// Pushes an element onto the top. Amortized O(1).
    pub fn push(&mut self, item: T) {
        self.ensure_capacity(self.len + 1);
        // SAFETY: ensure_capacity guarantees len < capacity.
        unsafe { self.data.add(self.len).write(item) };
        self.len += 1;
    }

    /// Removes and returns the top element, zeroing its slot.
    ///
    /// Calling this on an empty stack is a caller error; it is
    /// debug-asserted and not checked in release builds. Use
    /// [`try_pop`](Self::try_pop) for the checked form.
    pub fn pop(&mut self) -> T {
        debug_assert!(self.len > 0, "pop on empty NativeStack");
        // SAFETY: slot len - 1 holds an initialized element.
        let value = unsafe {
            let slot = self.data.add(self.len - 1);
            let value = slot.read();
            slot.write(T::zeroed());
            value
        };
        self.len -= 1;
        value
    }

    /// Removes and returns the top element, or `None` when empty.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.pop())
    }

    /// Returns a copy of the top element without removing it.
    ///
    /// Empty-stack peek is a caller error like [`pop`](Self::pop).
    pub fn peek(&self) -> T {
        debug_assert!(self.len > 0, "peek on empty NativeStack");
        // SAFETY: slot len - 1 holds an initialized element.
        unsafe { self.data.add(self.len - 1).read() }
    }

    /// Returns a copy of the top element, or `None` when empty.
    pub fn try_peek(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.peek())
    }

    /// Drops all elements by resetting the length. The buffer is kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Frees the buffer and resets to the all-zero empty state. Safe to call
    /// more than once; a later drop is a no-op.
    pub fn release(&mut self) {
        // SAFETY: self.data was allocated with self.capacity elements.
        unsafe { alloc::free_array(self.data, self.capacity) };
        self.data = ptr::null_mut();
        self.len = 0;
        self.capacity = 0;
    }
}

impl<T: Pod> Default for NativeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> Drop for NativeStack<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Pod> NativeRelease for NativeStack<T> {
    fn release(&mut self) {
        NativeStack::release(self);
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for NativeStack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_order() {
        let mut stack = NativeStack::new();
        stack.push(1u32);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.pop(), 3);
        assert_eq!(stack.pop(), 2);
        assert_eq!(stack.pop(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut stack = NativeStack::new();
        stack.push(5u8);
        assert_eq!(stack.peek(), 5);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.try_peek(), Some(5));
    }

    #[test]
    fn test_try_variants_on_empty() {
        let mut stack = NativeStack::<u64>::new();
        assert_eq!(stack.try_pop(), None);
        assert_eq!(stack.try_peek(), None);
    }

    #[test]
    fn test_doubling_growth() {
        let mut stack = NativeStack::new();
        for i in 0..5u32 {
            stack.push(i);
        }
        assert_eq!(stack.capacity(), 8);
        for i in 0..100u32 {
            stack.push(i);
        }
        assert!(stack.len() <= stack.capacity());
        assert_eq!(stack.as_slice()[..5], [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_pop_zeroes_slot() {
        let mut stack = NativeStack::new();
        stack.push(0xFFu8);
        stack.pop();
        assert_eq!(unsafe { *stack.data }, 0);
    }

    #[test]
    fn test_with_capacity_zero_stays_unallocated() {
        let stack = NativeStack::<u32>::with_capacity(0);
        assert_eq!(stack.capacity(), 0);

        let mut stack = stack;
        stack.push(1);
        assert_eq!(stack.capacity(), 4, "first push takes the default");
    }

    #[test]
    fn test_release_resets_to_empty() {
        let mut stack = NativeStack::new();
        stack.push(1u16);
        stack.release();
        assert!(stack.is_empty());
        assert_eq!(stack.capacity(), 0);
        stack.release();
    }
}
