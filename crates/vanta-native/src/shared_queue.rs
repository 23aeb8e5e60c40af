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

//! Lock-guarded variant of the forward-window queue.
//!
//! Every operation takes a single coarse mutex for the duration of the
//! critical section — no I/O and no user callbacks run while it is held.
//! The type exists for *correctness* under concurrent access, not for
//! scalability; enqueue/dequeue are linearizable under the lock.

use crate::queue::NativeQueue;
use bytemuck::Pod;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A forward-window queue safe for simultaneous use from multiple threads.
///
/// Wraps a [`NativeQueue`] in one mutex; all of the inner queue's
/// forward-moving-window semantics (including growth keyed on the absolute
/// write offset) carry over unchanged.
pub struct SharedNativeQueue<T: Pod> {
    inner: Mutex<NativeQueue<T>>,
}

impl<T: Pod> SharedNativeQueue<T> {
    /// Creates an empty queue with no allocation.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(NativeQueue::new()),
        }
    }

    /// Creates an empty queue with a pre-allocated, zeroed buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(NativeQueue::with_capacity(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NativeQueue<T>> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            // The guarded state is Pod data and stays structurally valid
            // whatever the panicking thread was doing mid-operation.
            log::warn!("SharedNativeQueue: recovering from a poisoned lock");
            poisoned.into_inner()
        })
    }

    /// Appends an element at the write offset.
    pub fn enqueue(&self, item: T) {
        self.lock().enqueue(item);
    }

    /// Removes and returns the front element, or `None` when empty.
    pub fn try_dequeue(&self) -> Option<T> {
        self.lock().try_dequeue()
    }

    /// Returns a copy of the front element without removing it.
    pub fn try_peek(&self) -> Option<T> {
        self.lock().try_peek()
    }

    /// Returns the number of elements currently in the queue.
    ///
    /// The value is a snapshot; concurrent producers or consumers may have
    /// changed it by the time the caller acts on it.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the queue held no elements at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Grows the buffer so at least `required` slots are addressable.
    pub fn ensure_capacity(&self, required: usize) {
        self.lock().ensure_capacity(required);
    }

    /// Copies the live window into the front of `dst`, front to back.
    pub fn copy_to(&self, dst: &mut [T]) {
        self.lock().copy_to(dst);
    }

    /// Zeroes the live window and resets both offsets to the buffer start.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Consumes the wrapper, returning the inner single-threaded queue.
    pub fn into_inner(self) -> NativeQueue<T> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Pod + PartialEq> SharedNativeQueue<T> {
    /// Returns true if some element in the live window equals `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.lock().contains(item)
    }
}

impl<T: Pod> Default for SharedNativeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for SharedNativeQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedNativeQueue").field(&*self.lock()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_thread_fifo() {
        let queue = SharedNativeQueue::new();
        queue.enqueue(1u32);
        queue.enqueue(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.try_peek(), Some(1));
        assert_eq!(queue.try_dequeue(), Some(1));
        assert_eq!(queue.try_dequeue(), Some(2));
        assert_eq!(queue.try_dequeue(), None);
    }

    #[test]
    fn test_two_producers_drain_exactly_once() {
        let queue = SharedNativeQueue::<u64>::new();

        std::thread::scope(|scope| {
            let queue = &queue;
            for t in 0..2u64 {
                scope.spawn(move || {
                    for i in 0..1000u64 {
                        queue.enqueue(t * 1000 + i);
                    }
                });
            }
        });

        assert_eq!(queue.len(), 2000);
        let mut drained = Vec::new();
        while let Some(value) = queue.try_dequeue() {
            drained.push(value);
        }
        drained.sort_unstable();
        let expected: Vec<u64> = (0..2000).collect();
        assert_eq!(drained, expected, "no duplicates and no lost items");
    }

    #[test]
    fn test_contains_and_clear() {
        let queue = SharedNativeQueue::new();
        for i in 0..4u16 {
            queue.enqueue(i);
        }
        assert!(queue.contains(&3));
        queue.clear();
        assert!(queue.is_empty());
        assert!(!queue.contains(&3));
    }

    #[test]
    fn test_into_inner() {
        let queue = SharedNativeQueue::new();
        queue.enqueue(11u8);
        let mut inner = queue.into_inner();
        assert_eq!(inner.dequeue(), 11);
    }
}
