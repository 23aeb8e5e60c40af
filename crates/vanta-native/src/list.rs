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

//! The primary growable-array container of the native substrate.
//!
//! [`NativeList`] owns a single contiguous buffer `(data, len, capacity)`
//! allocated through [`crate::alloc`]. Growth at least doubles, amortizing
//! reallocation to O(1) per append. Elements occupy `[0, len)`; the range
//! `[len, capacity)` is unspecified after growth (it is zeroed only by the
//! initial allocation and by [`NativeList::erase`]).
//!
//! The list is deliberately not internally synchronized: concurrent use from
//! multiple threads without external synchronization is a data race, except
//! through the explicitly named *preallocated* operations, which atomically
//! mutate the length counter only and push the capacity invariant onto the
//! caller.

use crate::alloc;
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

const DEFAULT_CAPACITY: usize = 4;

/// A growable array over native memory.
///
/// Element types are bound by [`Pod`]: fixed layout, no drop glue, valid when
/// zero-filled. The list owns its buffer; ownership moves with the value and
/// the buffer is released on drop (or earlier via
/// [`release`](NativeList::release)).
pub struct NativeList<T: Pod> {
    data: *mut T,
    len: AtomicUsize,
    capacity: usize,
}

// SAFETY: Pod element types carry no references, no interior mutability and
// no drop glue; the buffer is exclusively owned by the list value. Shared
// access only mutates through the atomic length counter or `unsafe` methods
// whose contracts the caller audits.
unsafe impl<T: Pod> Send for NativeList<T> {}
unsafe impl<T: Pod> Sync for NativeList<T> {}

impl<T: Pod> NativeList<T> {
    /// Creates an empty list with no allocation.
    pub fn new() -> Self {
        Self {
            data: ptr::null_mut(),
            len: AtomicUsize::new(0),
            capacity: 0,
        }
    }

    /// Creates an empty list with a pre-allocated, zeroed buffer of
    /// `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut list = Self::new();
        list.set_capacity(capacity);
        list
    }

    /// Creates a list holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> Self {
        let mut list = Self::with_capacity(values.len());
        list.append_slice(values);
        list
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Returns true if the list holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements the buffer can hold without
    /// reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a raw pointer to the buffer (null when unallocated).
    #[inline]
    pub fn as_ptr(&self) -> *mut T {
        self.data
    }

    /// Returns the live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: elements [0, len) are initialized and the buffer outlives
        // the borrow of self.
        unsafe { std::slice::from_raw_parts(self.data, self.len()) }
    }

    /// Returns the live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.data.is_null() {
            return &mut [];
        }
        let len = self.len();
        // SAFETY: as for as_slice, with exclusivity from &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.data, len) }
    }

    /// Returns the first element, if any.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the last element, if any.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Checked element access.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Checked mutable element access.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    #[inline]
    fn len_mut(&mut self) -> &mut usize {
        self.len.get_mut()
    }

    /// Reallocates the buffer to exactly `capacity` elements, truncating the
    /// length when shrinking. The initial allocation is zeroed; a growing
    /// reallocation leaves the new tail unspecified.
    pub fn set_capacity(&mut self, capacity: usize) {
        if self.data.is_null() {
            self.data = alloc::alloc_array(capacity);
            self.capacity = capacity;
            return;
        }
        // SAFETY: self.data was allocated with self.capacity elements.
        self.data = unsafe { alloc::realloc_array(self.data, self.capacity, capacity) };
        self.capacity = capacity;
        let len = self.len_mut();
        if capacity < *len {
            *len = capacity;
        }
    }

    fn grow(&mut self, min_capacity: usize) {
        let len = self.len();
        let mut new_capacity = if len == 0 { DEFAULT_CAPACITY } else { 2 * len };
        if new_capacity < min_capacity {
            new_capacity = min_capacity;
        }
        self.set_capacity(new_capacity);
    }

    /// Ensures the buffer can hold at least `capacity` elements, growing by
    /// the doubling policy (`max(capacity, len == 0 ? 4 : 2 * len)`).
    pub fn reserve(&mut self, capacity: usize) {
        if self.capacity < capacity || self.data.is_null() {
            self.grow(capacity);
        }
    }

    /// Sets the length to `new_len`, reallocating to exactly that capacity
    /// when it differs. Newly exposed elements are zeroed.
    pub fn resize(&mut self, new_len: usize) {
        let len = self.len();
        if len == new_len {
            return;
        }
        self.set_capacity(new_len);
        if new_len > len {
            // A growing reallocation leaves the tail unspecified; zero it so
            // the safe accessors never observe stale heap contents.
            // SAFETY: [len, new_len) lies inside the reallocated buffer.
            unsafe { ptr::write_bytes(self.data.add(len), 0, new_len - len) };
        }
        *self.len_mut() = new_len;
    }

    /// Appends an element. Amortized O(1).
    pub fn push(&mut self, item: T) {
        let len = self.len();
        self.reserve(len + 1);
        // SAFETY: reserve guarantees capacity > len.
        unsafe { self.data.add(len).write(item) };
        *self.len_mut() += 1;
    }

    /// Removes and returns the last element, zeroing its slot.
    ///
    /// Calling this on an empty list is a caller error; it is debug-asserted
    /// and not checked in release builds.
    pub fn pop(&mut self) -> T {
        let len = self.len();
        debug_assert!(len > 0, "pop on empty NativeList");
        // SAFETY: slot len - 1 holds an initialized element.
        let value = unsafe {
            let slot = self.data.add(len - 1);
            let value = slot.read();
            slot.write(T::zeroed());
            value
        };
        *self.len_mut() -= 1;
        value
    }

    /// Appends a copy of every element in `values`.
    pub fn append_slice(&mut self, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let len = self.len();
        self.reserve(len + values.len());
        // SAFETY: reserve guarantees room; the source slice cannot overlap a
        // buffer we may have just reallocated.
        unsafe { ptr::copy_nonoverlapping(values.as_ptr(), self.data.add(len), values.len()) };
        *self.len_mut() += values.len();
    }

    /// Removes the element at `index`, shifting every following element left
    /// by one slot. O(n) worst case.
    pub fn remove_at(&mut self, index: usize) {
        let len = self.len();
        debug_assert!(index < len, "remove_at out of range");
        if index == len - 1 {
            // SAFETY: last slot is initialized.
            unsafe { self.data.add(index).write(T::zeroed()) };
            *self.len_mut() -= 1;
            return;
        }
        // SAFETY: both ranges lie inside [0, len); copy handles the overlap.
        unsafe {
            ptr::copy(
                self.data.add(index + 1),
                self.data.add(index),
                len - index - 1,
            );
        }
        *self.len_mut() -= 1;
    }

    /// Inserts `item` at `index`, shifting elements at and after `index`
    /// right by one slot.
    pub fn insert(&mut self, index: usize, item: T) {
        let len = self.len();
        debug_assert!(index <= len, "insert out of range");
        self.reserve(len + 1);
        // SAFETY: reserve guarantees room for len + 1 elements; copy handles
        // the overlapping shift.
        unsafe {
            ptr::copy(self.data.add(index), self.data.add(index + 1), len - index);
            self.data.add(index).write(item);
        }
        *self.len_mut() += 1;
    }

    /// Returns the index of the first element matching `predicate`.
    pub fn first_index_of(&self, predicate: impl Fn(&T) -> bool) -> Option<usize> {
        self.as_slice().iter().position(predicate)
    }

    /// Copies the live elements into the front of `dst`.
    ///
    /// `dst` must be at least `len` elements long.
    pub fn copy_to(&self, dst: &mut [T]) {
        let src = self.as_slice();
        dst[..src.len()].copy_from_slice(src);
    }

    /// Reverses the element order in place.
    pub fn reverse(&mut self) {
        self.as_mut_slice().reverse();
    }

    /// Drops all elements by resetting the length. The buffer is kept and
    /// not zeroed.
    pub fn clear(&mut self) {
        *self.len_mut() = 0;
    }

    /// Zeroes the entire buffer up to capacity. The length is unchanged.
    pub fn erase(&mut self) {
        if self.data.is_null() {
            return;
        }
        // SAFETY: the buffer spans capacity elements.
        unsafe { ptr::write_bytes(self.data, 0, self.capacity) };
    }

    /// Releases this list's buffer and takes ownership of `other`'s buffer,
    /// length and capacity. Consuming the donor by value makes reuse of the
    /// moved-from list impossible.
    pub fn adopt(&mut self, other: Self) {
        // SAFETY: self.data was allocated with self.capacity elements.
        unsafe { alloc::free_array(self.data, self.capacity) };
        self.data = other.data;
        self.capacity = other.capacity;
        *self.len_mut() = other.len();
        std::mem::forget(other);
    }

    /// Frees the buffer and resets to the all-zero empty state. Safe to call
    /// more than once; a later drop is a no-op.
    pub fn release(&mut self) {
        // SAFETY: self.data was allocated with self.capacity elements (or is
        // null, in which case this is a no-op).
        unsafe { alloc::free_array(self.data, self.capacity) };
        self.data = ptr::null_mut();
        self.capacity = 0;
        *self.len_mut() = 0;
    }

    // --- Preallocated concurrent operations ---
    //
    // These atomically mutate the length counter only, without reserving
    // capacity, so multiple threads can append to a pre-sized buffer without
    // a lock. The payload write after the counter bump is NOT covered by the
    // atomic: a reader must not touch a freshly claimed index until it has
    // independent confirmation the writer finished.

    /// Atomically claims the next slot and writes `item` into it.
    ///
    /// # Safety
    ///
    /// The caller must have pre-reserved enough capacity for every
    /// concurrent push; the claimed slot must lie below `capacity`. No other
    /// thread may be mutating the buffer through `&mut` methods.
    pub unsafe fn push_preallocated(&self, item: T) {
        let slot = self.len.fetch_add(1, Ordering::AcqRel);
        debug_assert!(
            slot < self.capacity,
            "push_preallocated requires pre-reserved capacity"
        );
        self.data.add(slot).write(item);
    }

    /// Atomically releases the last slot and returns its element.
    ///
    /// # Safety
    ///
    /// The list must be non-empty for every concurrent pop, and the element
    /// at the claimed slot must be fully written. No other thread may be
    /// mutating the buffer through `&mut` methods.
    pub unsafe fn pop_preallocated(&self) -> T {
        let slot = self.len.fetch_sub(1, Ordering::AcqRel) - 1;
        self.data.add(slot).read()
    }

    /// Atomically advances the length by `count`, returning the first index
    /// of the claimed span for the caller to fill.
    ///
    /// # Safety
    ///
    /// As [`push_preallocated`](Self::push_preallocated): the whole claimed
    /// span must lie below the pre-reserved capacity, and the caller must
    /// initialize it before any safe accessor observes those indices.
    pub unsafe fn claim_slots(&self, count: usize) -> usize {
        self.len.fetch_add(count, Ordering::AcqRel)
    }
}

impl<T: Pod + PartialEq> NativeList<T> {
    /// Returns the index of the first element equal to `item`.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.as_slice().iter().position(|e| e == item)
    }

    /// Returns true if some element equals `item`.
    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    /// Removes the first element equal to `item`. Returns false if no
    /// element matched.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }
}

impl<T: Pod> Default for NativeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Pod> Drop for NativeList<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Pod> alloc::NativeRelease for NativeList<T> {
    fn release(&mut self) {
        NativeList::release(self);
    }
}

impl<T: Pod> Index<usize> for NativeList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Pod> IndexMut<usize> for NativeList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for NativeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}
