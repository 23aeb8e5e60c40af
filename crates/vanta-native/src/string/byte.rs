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

//! Byte-buffer (UTF-8) native string.

use crate::alloc;
use crate::string::NativeWString;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};
use std::ptr;

const DEFAULT_CAPACITY: usize = 4;

/// A growable byte string over native memory, always null-terminated at
/// `data[len]`.
///
/// The allocation is `capacity + 1` bytes: the terminator slot is not
/// counted by `capacity` or `len`. Content equality and content hashing;
/// explicit or drop-driven release.
pub struct NativeString {
    data: *mut u8,
    len: usize,
    capacity: usize,
}

// SAFETY: exclusively owned byte buffer, no interior references.
unsafe impl Send for NativeString {}

impl NativeString {
    /// Creates an empty string with a default-sized zeroed buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty string with room for `capacity` bytes plus the
    /// terminator.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: alloc::alloc_array(capacity + 1),
            len: 0,
            capacity,
        }
    }

    /// Creates a string holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut string = Self::with_capacity(bytes.len());
        string.append_bytes(bytes);
        string
    }

    /// Returns the content length in bytes (excluding the terminator).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the string is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the capacity in bytes (excluding the terminator slot).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the content as a byte slice (without the terminator).
    pub fn as_bytes(&self) -> &[u8] {
        if self.data.is_null() {
            return &[];
        }
        // SAFETY: [0, len) is initialized content.
        unsafe { std::slice::from_raw_parts(self.data, self.len) }
    }

    /// Returns the content as a mutable byte slice.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        if self.data.is_null() {
            return &mut [];
        }
        // SAFETY: as as_bytes, with exclusivity from &mut self.
        unsafe { std::slice::from_raw_parts_mut(self.data, self.len) }
    }

    /// Returns the null-terminated buffer pointer for foreign APIs.
    ///
    /// Null only for a released string. The pointer is invalidated by any
    /// operation that grows the buffer.
    #[inline]
    pub fn c_str(&self) -> *const u8 {
        self.data
    }

    /// Checked byte access.
    pub fn at(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    #[inline]
    fn write_terminator(&mut self) {
        debug_assert!(!self.data.is_null() && self.len <= self.capacity);
        // SAFETY: the allocation is capacity + 1 bytes, so slot len is valid.
        unsafe { *self.data.add(self.len) = 0 };
    }

    /// Reallocates to exactly `capacity` content bytes (plus the terminator
    /// slot), truncating when shrinking and null-filling the tail.
    pub fn set_capacity(&mut self, capacity: usize) {
        if self.data.is_null() {
            self.data = alloc::alloc_array(capacity + 1);
            self.capacity = capacity;
            self.len = 0;
            return;
        }
        // SAFETY: the live allocation is self.capacity + 1 bytes.
        self.data = unsafe { alloc::realloc_array(self.data, self.capacity + 1, capacity + 1) };
        if self.len > capacity {
            self.len = capacity;
        }
        self.capacity = capacity;
        // SAFETY: [len, capacity] lies inside the new allocation.
        unsafe { ptr::write_bytes(self.data.add(self.len), 0, capacity + 1 - self.len) };
    }

    /// Reallocates only if `capacity` exceeds the current capacity — exact,
    /// no over-provisioning. Callers expecting repeated appends use
    /// [`ensure_capacity`](Self::ensure_capacity) instead.
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

    /// Sets the content length, growing as needed and null-filling from the
    /// new length through the end of the buffer.
    pub fn resize(&mut self, len: usize) {
        self.ensure_capacity(len);
        self.len = len;
        // SAFETY: [len, capacity] lies inside the allocation.
        unsafe { ptr::write_bytes(self.data.add(len), 0, self.capacity + 1 - len) };
    }

    /// Appends one byte.
    pub fn push(&mut self, byte: u8) {
        self.ensure_capacity(self.len + 1);
        // SAFETY: ensure_capacity guarantees len < capacity.
        unsafe { *self.data.add(self.len) = byte };
        self.len += 1;
        self.write_terminator();
    }

    /// Appends a byte slice.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.ensure_capacity(self.len + bytes.len());
        // SAFETY: room for len + bytes.len() content bytes is guaranteed and
        // the source cannot overlap a freshly reallocated buffer.
        unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), self.data.add(self.len), bytes.len()) };
        self.len += bytes.len();
        self.write_terminator();
    }

    /// Appends a `&str`'s UTF-8 bytes.
    pub fn push_str(&mut self, s: &str) {
        self.append_bytes(s.as_bytes());
    }

    /// Appends another native string's content.
    pub fn append(&mut self, other: &NativeString) {
        self.append_bytes(other.as_bytes());
    }

    /// Inserts one byte at `index`, shifting the rest right.
    pub fn insert(&mut self, index: usize, byte: u8) {
        debug_assert!(index <= self.len, "insert out of range");
        self.grow(self.len + 1);
        // SAFETY: room for len + 1 bytes; copy handles the overlap.
        unsafe {
            ptr::copy(
                self.data.add(index),
                self.data.add(index + 1),
                self.len - index,
            );
            *self.data.add(index) = byte;
        }
        self.len += 1;
        self.write_terminator();
    }

    /// Inserts a byte slice at `index`, shifting the rest right.
    pub fn insert_slice(&mut self, index: usize, bytes: &[u8]) {
        debug_assert!(index <= self.len, "insert_slice out of range");
        if bytes.is_empty() {
            return;
        }
        self.grow(self.len + bytes.len());
        // SAFETY: room guaranteed; the shift overlap is handled by copy and
        // the replacement write targets the vacated gap.
        unsafe {
            ptr::copy(
                self.data.add(index),
                self.data.add(index + bytes.len()),
                self.len - index,
            );
            ptr::copy_nonoverlapping(bytes.as_ptr(), self.data.add(index), bytes.len());
        }
        self.len += bytes.len();
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

    /// Zeroes the content bytes without changing the length.
    pub fn erase(&mut self) {
        if !self.data.is_null() {
            // SAFETY: [0, len) lies inside the allocation.
            unsafe { ptr::write_bytes(self.data, 0, self.len) };
        }
    }

    /// Length-gated byte-wise comparison against a byte slice.
    pub fn compare(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }

    /// Returns true if the content begins with `prefix`.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.as_bytes().starts_with(prefix)
    }

    /// Returns true if the content ends with `suffix`.
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.as_bytes().ends_with(suffix)
    }

    /// Returns true if `needle` occurs anywhere in the content.
    pub fn contains_seq(&self, needle: &[u8]) -> bool {
        self.find(needle, 0).is_some()
    }

    /// Replaces every occurrence of one byte with another. Single pass, no
    /// size change.
    pub fn replace_unit(&mut self, target: u8, replacement: u8) {
        for b in self.as_mut_bytes() {
            if *b == target {
                *b = replacement;
            }
        }
    }

    /// Replaces every occurrence of `target` with `replacement`, in place,
    /// in a single left-to-right scan.
    ///
    /// Handles shrinking and growing replacements by shifting the remainder
    /// of the buffer around each match. Scanning resumes immediately after a
    /// written replacement, so replacement text is never re-matched; a
    /// partial-match mismatch rewinds to the byte after the tentative start
    /// so adjacent and self-overlapping occurrences are still found.
    ///
    /// Note that `replace(a, b)` followed by `replace(b, a)` does not
    /// round-trip when `a` can occur inside `b`; that is inherent to
    /// replace-all, not a defect.
    pub fn replace(&mut self, target: &[u8], replacement: &[u8]) {
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
                        // Shift the tail to fit a replacement of different
                        // length; copy handles both directions.
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

                    // Resume after the replacement; never re-match inside it.
                    i = idx + replacement.len();
                    cmp = 0;
                    continue;
                }
            } else if cmp != 0 {
                // Mismatch mid-candidate: restart at the byte after the
                // tentative match start.
                i -= cmp;
                cmp = 0;
            }
            i += 1;
        }
    }

    /// Finds the first occurrence of `needle` at or after `from`, returning
    /// its start index. Naive linear scan.
    pub fn find(&self, needle: &[u8], from: usize) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len.saturating_sub(from) {
            return None;
        }
        let bytes = self.as_bytes();
        let mut cmp = 0;
        let mut i = from;
        while i < self.len {
            if bytes[i] == needle[cmp] {
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
    /// Naive backward scan.
    pub fn find_last(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.len {
            return None;
        }
        let bytes = self.as_bytes();
        (0..=self.len - needle.len())
            .rev()
            .find(|&start| &bytes[start..start + needle.len()] == needle)
    }

    /// Allocates a new string holding `length` bytes starting at `index`.
    pub fn substring(&self, index: usize, length: usize) -> NativeString {
        NativeString::from_bytes(&self.as_bytes()[index..index + length])
    }

    /// Allocates a new string holding everything from `index` to the end.
    pub fn substring_from(&self, index: usize) -> NativeString {
        NativeString::from_bytes(&self.as_bytes()[index..])
    }

    /// Exchanges buffer, length and capacity with `other`. O(1), no copy.
    pub fn swap(&mut self, other: &mut NativeString) {
        std::mem::swap(self, other);
    }

    /// Widens each byte to a UTF-16 code unit. Exact for ASCII (and
    /// Latin-1) content; multi-byte UTF-8 sequences are widened byte-wise,
    /// not decoded.
    pub fn to_wide(&self) -> NativeWString {
        let mut wide = NativeWString::with_capacity(self.len);
        for &b in self.as_bytes() {
            wide.push(b as u16);
        }
        wide
    }

    /// Frees the buffer and resets to the all-zero state. Safe to call more
    /// than once; a later drop is a no-op.
    pub fn release(&mut self) {
        if !self.data.is_null() {
            // SAFETY: the live allocation is self.capacity + 1 bytes.
            unsafe { alloc::free_array(self.data, self.capacity + 1) };
        }
        self.data = ptr::null_mut();
        self.len = 0;
        self.capacity = 0;
    }
}

impl Default for NativeString {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for NativeString {
    fn drop(&mut self) {
        self.release();
    }
}

impl alloc::NativeRelease for NativeString {
    fn release(&mut self) {
        NativeString::release(self);
    }
}

impl Clone for NativeString {
    /// Deep copy of the content into a freshly sized buffer.
    fn clone(&self) -> Self {
        Self::from_bytes(self.as_bytes())
    }
}

impl From<&str> for NativeString {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl PartialEq for NativeString {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for NativeString {}

impl PartialEq<str> for NativeString {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for NativeString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Hash for NativeString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Index<usize> for NativeString {
    type Output = u8;

    fn index(&self, index: usize) -> &u8 {
        &self.as_bytes()[index]
    }
}

impl IndexMut<usize> for NativeString {
    fn index_mut(&mut self, index: usize) -> &mut u8 {
        &mut self.as_mut_bytes()[index]
    }
}

impl fmt::Display for NativeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Debug for NativeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeString({:?})", String::from_utf8_lossy(self.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminator_of(s: &NativeString) -> u8 {
        unsafe { *s.c_str().add(s.len()) }
    }

    #[test]
    fn test_from_str_round_trip() {
        let s = NativeString::from("hello");
        assert_eq!(s.len(), 5);
        assert_eq!(s, "hello");
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_grow_is_exact_ensure_capacity_doubles() {
        let mut a = NativeString::with_capacity(0);
        a.grow(10);
        assert_eq!(a.capacity(), 10);

        let mut b = NativeString::with_capacity(0);
        b.ensure_capacity(10);
        assert_eq!(b.capacity(), 20);

        // Neither touches a buffer that is already large enough.
        a.grow(5);
        assert_eq!(a.capacity(), 10);
        b.ensure_capacity(15);
        assert_eq!(b.capacity(), 20);
    }

    #[test]
    fn test_set_capacity_truncates_and_null_fills() {
        let mut s = NativeString::from("abcdef");
        s.set_capacity(3);
        assert_eq!(s, "abc");
        assert_eq!(s.capacity(), 3);
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_push_and_append_keep_terminator() {
        let mut s = NativeString::new();
        s.push(b'a');
        s.push_str("bc");
        s.append_bytes(b"def");
        assert_eq!(s, "abcdef");
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_insert_start_middle_end() {
        let mut s = NativeString::from("bd");
        s.insert(0, b'a');
        assert_eq!(s, "abd");
        s.insert(2, b'c');
        assert_eq!(s, "abcd");
        s.insert(4, b'e');
        assert_eq!(s, "abcde");
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_insert_slice() {
        let mut s = NativeString::from("helo");
        s.insert_slice(3, b"l");
        assert_eq!(s, "hello");
        s.insert_slice(5, b", world");
        assert_eq!(s, "hello, world");
    }

    #[test]
    fn test_replace_growing_no_rematch() {
        // The scan must not re-match inside the freshly written replacement:
        // "the cATATc sATAT" would be the rematch failure mode.
        let mut s = NativeString::from("the cat sat");
        s.replace(b"at", b"ATAT");
        assert_eq!(s, "the cATAT sATAT");
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_replace_shrinking() {
        let mut s = NativeString::from("aXXbXXc");
        s.replace(b"XX", b"Y");
        assert_eq!(s, "aYbYc");
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_replace_equal_length_and_no_occurrence() {
        let mut s = NativeString::from("banana");
        s.replace(b"an", b"om");
        assert_eq!(s, "bomoma");

        let mut t = NativeString::from("banana");
        t.replace(b"xyz", b"!");
        assert_eq!(t, "banana");
    }

    #[test]
    fn test_replace_adjacent_occurrences() {
        // m = 2 non-overlapping occurrences; the length arithmetic must hold.
        let mut s = NativeString::from("aaaa");
        s.replace(b"aa", b"b");
        assert_eq!(s, "bb");
        assert_eq!(s.len(), 4 - 2 * 2 + 2 * 1);
    }

    #[test]
    fn test_replace_each_scalar_once() {
        // Growing replacement containing the target must not loop forever.
        let mut s = NativeString::from("aaa");
        s.replace(b"a", b"aa");
        assert_eq!(s, "aaaaaa");
    }

    #[test]
    fn test_replace_at_end_of_content() {
        let mut s = NativeString::from("lights out");
        s.replace(b"out", b"on");
        assert_eq!(s, "lights on");
    }

    #[test]
    fn test_replace_round_trip_not_guaranteed() {
        // Documented: the reverse replace also hits target text that the
        // forward replace introduced.
        let mut s = NativeString::from("cat");
        s.replace(b"a", b"aa");
        assert_eq!(s, "caat");
        s.replace(b"aa", b"a");
        assert_eq!(s, "cat"); // happens to round-trip here...
        let mut t = NativeString::from("aa");
        t.replace(b"a", b"ab");
        assert_eq!(t, "abab");
        t.replace(b"ab", b"a");
        assert_eq!(t, "aa"); // ...and degenerates for nested occurrences.
    }

    #[test]
    fn test_replace_unit() {
        let mut s = NativeString::from("a-b-c");
        s.replace_unit(b'-', b'+');
        assert_eq!(s, "a+b+c");
    }

    #[test]
    fn test_find_inside_failed_partial_match() {
        // A failed partial match must rewind: "ab" starts inside "aa".
        let s = NativeString::from("aab");
        assert_eq!(s.find(b"ab", 0), Some(1));
    }

    #[test]
    fn test_find_and_find_last() {
        let s = NativeString::from("the cat sat on the mat");
        assert_eq!(s.find(b"at", 0), Some(5));
        assert_eq!(s.find(b"at", 6), Some(9));
        assert_eq!(s.find(b"dog", 0), None);
        assert_eq!(s.find_last(b"at"), Some(20));
        assert_eq!(s.find_last(b"the"), Some(15));
        assert_eq!(s.find_last(b"dog"), None);
    }

    #[test]
    fn test_prefix_suffix_contains() {
        let s = NativeString::from("vanta.native");
        assert!(s.starts_with(b"vanta"));
        assert!(s.ends_with(b".native"));
        assert!(s.contains_seq(b"a.n"));
        assert!(!s.contains_seq(b"nn"));
        assert!(s.compare(b"vanta.native"));
        assert!(!s.compare(b"vanta"));
    }

    #[test]
    fn test_substring_and_clone() {
        let s = NativeString::from("hello, world");
        let hello = s.substring(0, 5);
        let world = s.substring_from(7);
        assert_eq!(hello, "hello");
        assert_eq!(world, "world");

        let copy = s.clone();
        assert_eq!(copy, s);
        assert_ne!(copy.c_str(), s.c_str(), "clone must be a deep copy");
    }

    #[test]
    fn test_content_equality_and_hash() {
        use std::collections::HashSet;

        let a = NativeString::from("same");
        let b = NativeString::from("same");
        assert_ne!(a.c_str(), b.c_str());
        assert_eq!(a, b, "strings compare by content, not address");

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_swap_is_pointer_exchange() {
        let mut a = NativeString::from("first");
        let mut b = NativeString::from("second");
        let (pa, pb) = (a.c_str(), b.c_str());
        a.swap(&mut b);
        assert_eq!(a, "second");
        assert_eq!(b, "first");
        assert_eq!(a.c_str(), pb);
        assert_eq!(b.c_str(), pa);
    }

    #[test]
    fn test_resize_null_fills() {
        let mut s = NativeString::from("abcdef");
        s.resize(3);
        assert_eq!(s, "abc");
        assert_eq!(terminator_of(&s), 0);
        s.resize(5);
        assert_eq!(s.len(), 5);
        assert_eq!(s.as_bytes(), &[b'a', b'b', b'c', 0, 0]);
    }

    #[test]
    fn test_clear_and_at() {
        let mut s = NativeString::from("xyz");
        assert_eq!(s.at(1), Some(b'y'));
        assert_eq!(s.at(3), None);
        s.clear();
        assert!(s.is_empty());
        assert_eq!(terminator_of(&s), 0);
    }

    #[test]
    fn test_to_wide_ascii() {
        let s = NativeString::from("abc");
        let w = s.to_wide();
        assert_eq!(w.as_units(), &[b'a' as u16, b'b' as u16, b'c' as u16]);
    }

    #[test]
    fn test_release_resets_to_empty() {
        let mut s = NativeString::from("leak-free");
        s.release();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), 0);
        assert!(s.c_str().is_null());
        s.release();
    }
}
