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

//! Wide (UTF-16 code unit) native string.
//!
//! Mirrors [`NativeString`](crate::string::NativeString) unit for unit; the
//! element type is `u16` and the terminator is a zero code unit. Lengths and
//! capacities count code units, not bytes and not characters.

use crate::alloc;
use crate::string::NativeString;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};
use std::ptr;

const DEFAULT_CAPACITY: usize = 4;

/// A growable UTF-16 string over native memory, always zero-terminated at
/// `data[len]`.
///
/// The allocation is `capacity + 1` code units; the terminator slot is not
/// counted by `capacity` or `len`. Content equality and content hashing;
/// explicit or drop-driven release.
pub struct NativeWString {
    data: *mut u16,
    len: usize,
    capacity: usize,
}

// SAFETY: exclusively owned buffer, no interior references.
unsafe impl Send for NativeWString {}

impl NativeWString {
    /// Creates an empty string with a default-sized zeroed buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty string with room for `capacity` code units plus the
    /// terminator.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: alloc::alloc_array(capacity + 1),
            len: 0,
            capacity,
        }
    }

    /// Creates a string holding a copy of `units`.
    pub fn from_units(units: &[u16]) -> Self {
        let mut string = Self::with_capacity(units.len());
        string.append_units(units);
        string
    }

    /// Returns the content length in code units.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity in code units (excluding the terminator slot).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the content as a code-unit slice (without the terminator).
    pub fn as_units(&self) -> &[u16] {
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: [0, len) is initialized content.
        unsafe { std::slice::from_raw_parts(self.data, self.len) }
    }

    /// Returns the content as a mutable code-unit slice.
    pub fn as_mut_units(&mut self) -> &mut [u16] {
        if self.data.is_null() {
            return &mut [];
        }
        // SAFETY: as as_units, with exclusivity from &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.data, self.len) }
    }

    /// Returns the zero-terminated buffer pointer for foreign APIs.
    ///
    /// Null only for a released string. The pointer is invalidated by any
    /// operation that grows the buffer.
    #[inline]
    pub fn c_str(&self) -> *const u16 {
        self.data
    }

    /// Checked code-unit access.
    pub fn at(&self, index: usize) -> Option<u16> {
        self.as_units().get(index).copied()
    }

    #[inline]
    fn write_terminator(&mut self) {
        debug_assert!(!self.data.is_null() && self.len <= self.capacity);
        // SAFETY: the allocation is capacity + 1 units, so slot len is valid.
        unsafe { *self.data.add(self.len) = 0 };
    }

    /// Reallocates to exactly `capacity` content units (plus the terminator
    /// slot), truncating when shrinking and zero-filling the tail.
    pub fn set_capacity(&mut self, capacity: usize) {
        if self.data.is_null() {
            self.data = alloc::alloc_array(capacity + 1);
            self.capacity = capacity;
            self.len = 0;
            return;
        }
        // SAFETY: the live allocation is self.capacity + 1 units.
        self.data = unsafe { alloc::realloc_array(self.data, self.capacity + 1, capacity + 1) };
        if self.len > capacity {
            self.len = capacity;
        }
        self.capacity = capacity;
        for i in self.len..=capacity {
            // SAFETY: [len, capacity] lies inside the new allocation.
            unsafe { *self.data.add(i) = 0 };
        }
    }

    /// Reallocates only if `capacity` exceeds the current capacity — exact,
    /// no over-provisioning.
    pub fn grow(&mut self, capacity: usize) {
        if self.capacity < capacity || self.data.is_null() {
            self.set_capacity(capacity);
        }
    }

    /// Grows to `2 * capacity` if `capacity` exceeds the current capacity,
    /// over-provisioning for append-heavy call sites.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.capacity < capacity || self.data.is_null() {
            self.grow(capacity * 2);
        }
    }

    /// Shrinks the buffer to exactly the content length.
    pub fn shrink_to_fit(&mut self) {
        self.set_capacity(self.len);
    }

    /// Sets the content length, growing as needed and zero-filling from the
    /// new length through the end of the buffer.
    pub fn resize(&mut self, len: usize) {
        self.ensure_capacity(len);
        self.len = len;
        for i in len..=self.capacity {
            // SAFETY: [len, capacity] lies inside the allocation.
            unsafe { *self.data.add(i) = 0 };
        }
    }

    /// Appends one code unit.
    pub fn push(&mut self, unit: u16) {
        self.ensure_capacity(self.len + 1);
        // SAFETY: ensure_capacity guarantees len < capacity.
        unsafe { *self.data.add(self.len) = unit };
        self.len += 1;
        self.write_terminator();
    }

    /// Appends a code-unit slice.
    pub fn append_units(&mut self, units: &[u16]) {
        if units.is_empty() {
            return;
        }
        self.ensure_capacity(self.len + units.len());
        // SAFETY: room for len + units.len() content units is guaranteed and
        // the source cannot overlap a freshly reallocated buffer.
        unsafe { ptr::copy_nonoverlapping(units.as_ptr(), self.data.add(self.len), units.len()) };
        self.len += units.len();
        self.write_terminator();
    }

    /// Appends a `&str`, encoding it to UTF-16.
    pub fn push_str(&mut self, s: &str) {
        for unit in s.encode_utf16() {
            self.push(unit);
        }
    }

    /// Appends another wide string's content.
    pub fn append(&mut self, other: &NativeWString) {
        self.append_units(other.as_units());
    }

    /// Inserts one code unit at `index`, shifting the rest right.
    pub fn insert(&mut self, index: usize, unit: u16) {
        debug_assert!(index <= self.len, "insert out of range");
        self.grow(self.len + 1);
        // SAFETY: room for len + 1 units; copy handles the overlap.
        unsafe {
            ptr::copy(
                self.data.add(index),
                self.data.add(index + 1),
                self.len - index,
            );
            *self.data.add(index) = unit;
        }
        self.len += 1;
        self.write_terminator();
    }

    /// Inserts a code-unit slice at `index`, shifting the rest right.
    pub fn insert_slice(&mut self, index: usize, units: &[u16]) {
        debug_assert!(index <= self.len, "insert_slice out of range");
        if units.is_empty() {
            return;
        }
        self.grow(self.len + units.len());
        // SAFETY: room guaranteed; the shift overlap is handled by copy and
        // the replacement write targets the vacated gap.
        unsafe {
            ptr::copy(
                self.data.add(index),
                self.data.add(index + units.len()),
                self.len - index,
            );
            ptr::copy_nonoverlapping(units.as_ptr(), self.data.add(index), units.len());
        }
        self.len += units.len();
        self.write_terminator();
    }

    /// Zeroes the content and resets the length.
    pub fn clear(&mut self) {
        if !self.data.is_null() {
            // SAFETY: [0, len) lies inside the allocation.
            unsafe { ptr::write_bytes(self.data, 0, self.len) };
        }
        self.len = 0;
    }

    /// Zeroes the content units without changing the length.
    pub fn erase(&mut self) {
        if !self.data.is_null() {
            // SAFETY: [0, len) lies inside the allocation.
            unsafe { ptr::write_bytes(self.data, 0, self.len) };
        }
    }

    /// Length-gated unit-wise comparison against a code-unit slice.
    pub fn compare(&self, other: &[u16]) -> bool {
        self.as_units() == other
    }

    /// Returns true if the content begins with `prefix`.
    pub fn starts_with(&self, prefix: &[u16]) -> bool {
        self.as_units().starts_with(prefix)
    }

    /// Returns true if the content ends with `suffix`.
    pub fn ends_with(&self, suffix: &[u16]) -> bool {
        self.as_units().ends_with(suffix)
    }

    /// Returns true if `needle` occurs anywhere in the content.
    pub fn contains_seq(&self, needle: &[u16]) -> bool {
        self.find(needle, 0).is_some()
    }

    /// Replaces every occurrence of one code unit with another.
    pub fn replace_unit(&mut self, target: u16, replacement: u16) {
        for unit in self.as_mut_units() {
            if *unit == target {
                *unit = replacement;
            }
        }
    }

    /// Replaces every occurrence of `target` with `replacement`, in place,
    /// in a single left-to-right scan.
    ///
    /// Same algorithm as the byte variant: the scan resumes after a written
    /// replacement (never re-matching inside it) and rewinds on a
    /// partial-match mismatch.
    pub fn replace(&mut self, target: &[u16], replacement: &[u16]) {
        if target.is_empty() || self.len < target.len() {
            return;
        }
        let mut cmp = 0;
        let mut i = 0;
        while i < self.len {
            // SAFETY: i < len throughout; the buffer is never shrunk below
            // the resume index inside this loop.
            if unsafe { *self.data.add(i) } == target[cmp] {
                cmp += 1;
                if cmp == target.len() {
                    let idx = i + 1 - cmp;
                    let new_len = self.len - cmp + replacement.len();
                    self.grow(new_len);

                    let remainder = self.len - idx - target.len();
                    if remainder > 0 {
                        // SAFETY: source and destination ranges lie inside
                        // the (possibly grown) allocation.
                        unsafe {
                            ptr::copy(
                                self.data.add(idx + target.len()),
                                self.data.add(idx + replacement.len()),
                                remainder,
                            );
                        }
                    }
                    // SAFETY: [idx, idx + replacement.len()) is in bounds.
                    unsafe {
                        ptr::copy_nonoverlapping(
                            replacement.as_ptr(),
                            self.data.add(idx),
                            replacement.len(),
                        );
                    }
                    self.len = new_len;
                    self.write_terminator();

                    i = idx + replacement.len();
                    cmp = 0;
                    continue;
                }
            } else if cmp != 0 {
                i -= cmp;
                cmp = 0;
            }
            i += 1;
        }
    }

    /// Finds the first occurrence of `needle` at or after `from`, returning
    /// its start index.
    pub fn find(&self, needle: &[u16], from: usize) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len.saturating_sub(from) {
            return None;
        }
        let units = self.as_units();
        let mut cmp = 0;
        let mut i = from;
        while i < self.len {
            if units[i] == needle[cmp] {
                cmp += 1;
                if cmp == needle.len() {
                    return Some(i + 1 - cmp);
                }
            } else if cmp != 0 {
                i -= cmp;
                cmp = 0;
            }
            i += 1;
        }
        None
    }

    /// Finds the last occurrence of `needle`, returning its start index.
    pub fn find_last(&self, needle: &[u16]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len {
            return None;
        }
        let units = self.as_units();
        (0..=self.len - needle.len())
            .rev()
            .find(|&start| &units[start..start + needle.len()] == needle)
    }

    /// Allocates a new string holding `length` units starting at `index`.
    pub fn substring(&self, index: usize, length: usize) -> NativeWString {
        NativeWString::from_units(&self.as_units()[index..index + length])
    }

    /// Allocates a new string holding everything from `index` to the end.
    pub fn substring_from(&self, index: usize) -> NativeWString {
        NativeWString::from_units(&self.as_units()[index..])
    }

    /// Exchanges buffer, length and capacity with `other`. O(1), no copy.
    pub fn swap(&mut self, other: &mut NativeWString) {
        std::mem::swap(self, other);
    }

    /// Narrows each code unit to a byte by truncation. Exact for ASCII and
    /// Latin-1 content; anything above U+00FF loses its high byte.
    pub fn to_narrow(&self) -> NativeString {
        let mut narrow = NativeString::with_capacity(self.len);
        for &unit in self.as_units() {
            narrow.push(unit as u8);
        }
        narrow
    }

    /// Decodes the content to an owned `String`, replacing unpaired
    /// surrogates with U+FFFD.
    pub fn to_utf8(&self) -> String {
        String::from_utf16_lossy(self.as_units())
    }

    /// Frees the buffer and resets to the all-zero state. Safe to call more
    /// than once; a later drop is a no-op.
    pub fn release(&mut self) {
        if !self.data.is_null() {
            // SAFETY: the live allocation is self.capacity + 1 units.
            unsafe { alloc::free_array(self.data, self.capacity + 1) };
        }
        self.data = ptr::null_mut();
        self.len = 0;
        self.capacity = 0;
    }
}

impl Default for NativeWString {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NativeWString {
    fn drop(&mut self) {
        self.release();
    }
}

impl alloc::NativeRelease for NativeWString {
    fn release(&mut self) {
        NativeWString::release(self);
    }
}

impl Clone for NativeWString {
    /// Deep copy of the content into a freshly sized buffer.
    fn clone(&self) -> Self {
        Self::from_units(self.as_units())
    }
}

impl From<&str> for NativeWString {
    fn from(s: &str) -> Self {
        let mut string = Self::with_capacity(s.len());
        string.push_str(s);
        string
    }
}

impl PartialEq for NativeWString {
    fn eq(&self, other: &Self) -> bool {
        self.as_units() == other.as_units()
    }
}
impl Eq for NativeWString {}

impl PartialEq<str> for NativeWString {
    fn eq(&self, other: &str) -> bool {
        self.len == other.encode_utf16().count()
            && self.as_units().iter().copied().eq(other.encode_utf16())
    }
}

impl PartialEq<&str> for NativeWString {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl Hash for NativeWString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_units().hash(state);
    }
}

impl Index<usize> for NativeWString {
    type Output = u16;

    fn index(&self, index: usize) -> &u16 {
        &self.as_units()[index]
    }
}

impl IndexMut<usize> for NativeWString {
    fn index_mut(&mut self, index: usize) -> &mut u16 {
        &mut self.as_mut_units()[index]
    }
}

impl fmt::Display for NativeWString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_utf8())
    }
}

impl fmt::Debug for NativeWString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeWString({:?})", self.to_utf8())
    }
}
