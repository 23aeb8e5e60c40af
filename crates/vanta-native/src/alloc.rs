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

//! Typed allocation over the host heap allocator.
//!
//! Every allocation made through this module is zero-initialized. That trades
//! a small amount of throughput for eliminating an entire bug class (reads of
//! uninitialized native memory) in the containers built on top of it.
//!
//! Out-of-memory is not a recoverable condition at this layer: the infallible
//! entry points go through [`std::alloc::handle_alloc_error`]. Callers that
//! can degrade gracefully (e.g. abort a single resource load) use
//! [`try_alloc_array`] instead.
//!
//! The host allocator requires the layout at free time, so the free functions
//! take the element count that was allocated. Containers track their capacity,
//! which makes this a zero-cost requirement in practice.

use bytemuck::Pod;
use std::alloc::{self, handle_alloc_error, Layout};
use std::ptr::NonNull;
use thiserror::Error;

/// Failure of a fallible allocation request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The host allocator could not satisfy the request.
    #[error("host allocator could not provide {bytes} bytes")]
    Exhausted {
        /// The number of bytes that were requested.
        bytes: usize,
    },
    /// `count * size_of::<T>()` overflowed the addressable byte range.
    #[error("element count {count} overflows the addressable byte range")]
    SizeOverflow {
        /// The element count that was requested.
        count: usize,
    },
}

/// Element-level teardown capability for types that own nested native buffers.
///
/// This models "run element destructors, then release storage" for
/// trivially-relocatable element types — e.g. a list of lists, where each
/// slot owns a buffer the outer container knows nothing about. See
/// [`free_array_deep`].
pub trait NativeRelease {
    /// Releases any native memory owned by this value and resets it to its
    /// empty state. Must be safe to call more than once.
    fn release(&mut self);
}

#[inline]
fn array_layout<T>(count: usize) -> Layout {
    debug_assert!(
        std::mem::size_of::<T>() != 0,
        "zero-sized element types are not supported by the native allocator"
    );
    match Layout::array::<T>(count) {
        Ok(layout) => layout,
        // Byte-count overflow is a documented caller hazard; treat it the
        // same as exhaustion on the infallible path.
        Err(_) => handle_alloc_error(Layout::new::<T>()),
    }
}

/// Allocates a zero-initialized block of exactly `byte_width` bytes.
///
/// Returns null for a zero-byte request. Aborts via
/// [`handle_alloc_error`] if the host allocator cannot satisfy the request.
pub fn alloc_bytes(byte_width: usize) -> *mut u8 {
    alloc_array::<u8>(byte_width)
}

/// Allocates a zero-initialized array of `count` elements of `T`.
///
/// Returns null for `count == 0`. The caller guarantees that
/// `count * size_of::<T>()` does not overflow; overflow is treated as
/// allocation failure, not checked as a distinct error.
pub fn alloc_array<T: Pod>(count: usize) -> *mut T {
    if count == 0 {
        return std::ptr::null_mut();
    }
    let layout = array_layout::<T>(count);
    // SAFETY: layout has non-zero size (count > 0, T is not zero-sized).
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    if ptr.is_null() {
        handle_alloc_error(layout);
    }
    ptr.cast()
}

/// Allocates a single zero-initialized `T`.
pub fn alloc_one<T: Pod>() -> *mut T {
    alloc_array(1)
}

/// Fallible variant of [`alloc_array`] for callers that can recover from
/// resource exhaustion at a coarser granularity.
pub fn try_alloc_array<T: Pod>(count: usize) -> Result<NonNull<T>, AllocError> {
    debug_assert!(std::mem::size_of::<T>() != 0);
    let layout = Layout::array::<T>(count).map_err(|_| AllocError::SizeOverflow { count })?;
    if layout.size() == 0 {
        return Err(AllocError::Exhausted { bytes: 0 });
    }
    // SAFETY: layout has non-zero size.
    let ptr = unsafe { alloc::alloc_zeroed(layout) };
    NonNull::new(ptr.cast()).ok_or(AllocError::Exhausted {
        bytes: layout.size(),
    })
}

/// Resizes an array previously returned by [`alloc_array`] from `old_count`
/// to `new_count` elements, preserving the leading `min(old, new)` elements.
///
/// Unlike the initial allocation, the newly exposed tail is **not** zeroed;
/// containers that need zeroed tails do so themselves on first allocation.
/// Passing null behaves like a fresh (zeroed) allocation.
///
/// # Safety
///
/// `ptr` must be null or a block allocated by this module with exactly
/// `old_count` elements, and must not be used again after the call.
pub unsafe fn realloc_array<T: Pod>(ptr: *mut T, old_count: usize, new_count: usize) -> *mut T {
    if ptr.is_null() {
        return alloc_array(new_count);
    }
    if new_count == 0 {
        free_array(ptr, old_count);
        return std::ptr::null_mut();
    }
    let old_layout = array_layout::<T>(old_count);
    let new_layout = array_layout::<T>(new_count);
    let raw = alloc::realloc(ptr.cast(), old_layout, new_layout.size());
    if raw.is_null() {
        handle_alloc_error(new_layout);
    }
    raw.cast()
}

/// Releases an array previously returned by [`alloc_array`] or
/// [`realloc_array`]. Freeing null is a no-op. Double-free is undefined
/// behavior and is not guarded.
///
/// # Safety
///
/// `ptr` must be null or a block allocated by this module with exactly
/// `count` elements, not freed before.
pub unsafe fn free_array<T>(ptr: *mut T, count: usize) {
    if ptr.is_null() {
        return;
    }
    let layout = Layout::array::<T>(count).unwrap_or_else(|_| Layout::new::<T>());
    alloc::dealloc(ptr.cast(), layout);
}

/// Releases a single `T` previously returned by [`alloc_one`].
///
/// # Safety
///
/// Same contract as [`free_array`] with a count of one.
pub unsafe fn free_one<T>(ptr: *mut T) {
    free_array(ptr, 1);
}

/// Releases a byte block previously returned by [`alloc_bytes`].
///
/// # Safety
///
/// Same contract as [`free_array`].
pub unsafe fn free_bytes(ptr: *mut u8, byte_width: usize) {
    free_array(ptr, byte_width);
}

/// Runs [`NativeRelease::release`] on every element of the array, then
/// releases the block itself.
///
/// # Safety
///
/// `ptr` must be null or a block allocated by this module with exactly
/// `count` initialized elements, not freed before.
pub unsafe fn free_array_deep<T: NativeRelease>(ptr: *mut T, count: usize) {
    if ptr.is_null() {
        return;
    }
    for i in 0..count {
        (*ptr.add(i)).release();
    }
    free_array(ptr, count);
}
