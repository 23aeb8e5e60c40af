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

//! Pointer-identity wrapper types.
//!
//! [`RawPtr`], [`Ptr<T>`] and [`PtrPtr<T>`] are value types carrying exactly
//! one raw address and nothing else. They compare and hash by address, which
//! makes them usable as map keys and cross-subsystem handles without holding
//! a borrow on the memory they reference.
//!
//! Holding a wrapper never implies ownership and never extends the referent's
//! lifetime: the originating container (or an explicit allocator call) is the
//! sole authority over when the memory becomes invalid. Casting between
//! wrapper types reinterprets the address without any validation — this
//! mirrors raw pointer semantics and is not a safety boundary.

use std::fmt;
use std::hash::{Hash, Hasher};

/// An untyped address-identity handle.
///
/// Two `RawPtr`s are equal iff their addresses are bit-identical.
pub struct RawPtr(*mut ());

impl RawPtr {
    /// A null handle.
    pub const NULL: RawPtr = RawPtr(std::ptr::null_mut());

    /// Wraps a raw pointer of any pointee type.
    #[inline]
    pub fn new<T>(ptr: *mut T) -> Self {
        RawPtr(ptr.cast())
    }

    /// Wraps a platform-integer address.
    #[inline]
    pub fn from_addr(addr: usize) -> Self {
        RawPtr(addr as *mut ())
    }

    /// Returns the address as a platform integer.
    #[inline]
    pub fn addr(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if the wrapped address is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Reinterprets the address as a typed pointer wrapper. Unchecked.
    #[inline]
    pub fn cast<T>(&self) -> Ptr<T> {
        Ptr(self.0.cast())
    }

    /// Returns the wrapped raw pointer.
    #[inline]
    pub fn get(&self) -> *mut () {
        self.0
    }
}

impl Clone for RawPtr {
    fn clone(&self) -> Self {
        *self
    }
}
impl Copy for RawPtr {}

impl Default for RawPtr {
    fn default() -> Self {
        Self::NULL
    }
}

impl PartialEq for RawPtr {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl Eq for RawPtr {}

impl Hash for RawPtr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as usize);
    }
}

impl fmt::Debug for RawPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawPtr({:#x})", self.0 as usize)
    }
}

impl<T> From<*mut T> for RawPtr {
    fn from(ptr: *mut T) -> Self {
        RawPtr::new(ptr)
    }
}

impl From<usize> for RawPtr {
    fn from(addr: usize) -> Self {
        RawPtr::from_addr(addr)
    }
}

impl From<RawPtr> for usize {
    fn from(ptr: RawPtr) -> Self {
        ptr.addr()
    }
}

// SAFETY: a RawPtr is an opaque address with no owning or dereferencing
// capability in safe code; sending or sharing the handle itself is sound.
unsafe impl Send for RawPtr {}
unsafe impl Sync for RawPtr {}

/// A typed address-identity handle.
///
/// Identical identity semantics to [`RawPtr`]; the type parameter exists so
/// call sites keep their element type without a cast at every use. All
/// dereferencing accessors are `unsafe` — the wrapper performs no validity
/// tracking of its own.
pub struct Ptr<T>(*mut T);

impl<T> Ptr<T> {
    /// Wraps a typed raw pointer.
    #[inline]
    pub fn new(ptr: *mut T) -> Self {
        Ptr(ptr)
    }

    /// A null handle.
    #[inline]
    pub fn null() -> Self {
        Ptr(std::ptr::null_mut())
    }

    /// Wraps the address of an existing value.
    ///
    /// The wrapper does not borrow the value; its validity window is whatever
    /// the caller tracks externally.
    #[inline]
    pub fn from_ref(value: &T) -> Self {
        Ptr(value as *const T as *mut T)
    }

    /// Wraps a platform-integer address. Unchecked.
    #[inline]
    pub fn from_addr(addr: usize) -> Self {
        Ptr(addr as *mut T)
    }

    /// Returns the address as a platform integer.
    #[inline]
    pub fn addr(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if the wrapped address is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the wrapped raw pointer.
    #[inline]
    pub fn get(&self) -> *mut T {
        self.0
    }

    /// Erases the element type. Unchecked.
    #[inline]
    pub fn erase(&self) -> RawPtr {
        RawPtr::new(self.0)
    }

    /// Reinterprets the address as a wrapper of a different element type.
    /// No layout compatibility check is performed.
    #[inline]
    pub fn cast<U>(&self) -> Ptr<U> {
        Ptr(self.0.cast())
    }

    /// Reads the referent.
    ///
    /// # Safety
    ///
    /// The address must point at a valid, initialized `T` for the duration
    /// of the read.
    #[inline]
    pub unsafe fn read(&self) -> T {
        self.0.read()
    }

    /// Writes the referent.
    ///
    /// # Safety
    ///
    /// The address must point at valid, writable storage for a `T`.
    #[inline]
    pub unsafe fn write(&self, value: T) {
        self.0.write(value);
    }

    /// Borrows the referent.
    ///
    /// # Safety
    ///
    /// The address must point at a valid `T` that outlives the returned
    /// reference, with no conflicting mutable access.
    #[inline]
    pub unsafe fn as_ref<'a>(&self) -> &'a T {
        &*self.0
    }

    /// Mutably borrows the referent.
    ///
    /// # Safety
    ///
    /// As [`Ptr::as_ref`], plus exclusivity of the returned borrow.
    #[allow(clippy::mut_from_ref)]
    #[inline]
    pub unsafe fn as_mut<'a>(&self) -> &'a mut T {
        &mut *self.0
    }
}

impl<T> Clone for Ptr<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Ptr<T> {}

impl<T> Default for Ptr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> PartialEq for Ptr<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl<T> Eq for Ptr<T> {}

impl<T> Hash for Ptr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as usize);
    }
}

impl<T> fmt::Debug for Ptr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ptr({:#x})", self.0 as usize)
    }
}

impl<T> From<*mut T> for Ptr<T> {
    fn from(ptr: *mut T) -> Self {
        Ptr::new(ptr)
    }
}

impl<T> From<Ptr<T>> for RawPtr {
    fn from(ptr: Ptr<T>) -> Self {
        ptr.erase()
    }
}

impl<T> From<RawPtr> for Ptr<T> {
    fn from(ptr: RawPtr) -> Self {
        ptr.cast()
    }
}

// SAFETY: as for RawPtr — the wrapper itself carries no capability beyond
// the address; all dereferencing is `unsafe` and caller-audited.
unsafe impl<T> Send for Ptr<T> {}
unsafe impl<T> Sync for Ptr<T> {}

/// An address-identity handle to an array of pointers (`T**` shape), as
/// produced by foreign APIs that return pointer tables.
pub struct PtrPtr<T>(*mut *mut T);

impl<T> PtrPtr<T> {
    /// Wraps a pointer-to-pointer.
    #[inline]
    pub fn new(ptr: *mut *mut T) -> Self {
        PtrPtr(ptr)
    }

    /// Wraps a platform-integer address. Unchecked.
    #[inline]
    pub fn from_addr(addr: usize) -> Self {
        PtrPtr(addr as *mut *mut T)
    }

    /// Returns the address as a platform integer.
    #[inline]
    pub fn addr(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if the wrapped address is null.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    /// Returns the wrapped raw pointer.
    #[inline]
    pub fn get(&self) -> *mut *mut T {
        self.0
    }

    /// Reads the pointer stored at `index`.
    ///
    /// # Safety
    ///
    /// The address must point at a valid pointer table with more than
    /// `index` entries.
    #[inline]
    pub unsafe fn entry(&self, index: usize) -> Ptr<T> {
        Ptr::new(*self.0.add(index))
    }
}

impl<T> Clone for PtrPtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for PtrPtr<T> {}

impl<T> Default for PtrPtr<T> {
    fn default() -> Self {
        PtrPtr(std::ptr::null_mut())
    }
}

impl<T> PartialEq for PtrPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}
impl<T> Eq for PtrPtr<T> {}

impl<T> Hash for PtrPtr<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.0 as usize);
    }
}

impl<T> fmt::Debug for PtrPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PtrPtr({:#x})", self.0 as usize)
    }
}

impl<T> From<*mut *mut T> for PtrPtr<T> {
    fn from(ptr: *mut *mut T) -> Self {
        PtrPtr::new(ptr)
    }
}

unsafe impl<T> Send for PtrPtr<T> {}
unsafe impl<T> Sync for PtrPtr<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_equality_is_by_address() {
        let a = 1u32;
        let b = 1u32;
        let pa = Ptr::from_ref(&a);
        let pb = Ptr::from_ref(&b);

        // Same content, different addresses: not equal.
        assert_ne!(pa, pb);
        // Same address wrapped twice, via different paths: equal.
        assert_eq!(pa, Ptr::from_addr(&a as *const u32 as usize));
    }

    #[test]
    fn test_cast_preserves_address() {
        let value = 7u64;
        let typed = Ptr::from_ref(&value);
        let erased = typed.erase();
        let back: Ptr<u64> = erased.cast();

        assert_eq!(typed.addr(), erased.addr());
        assert_eq!(typed, back);
    }

    #[test]
    fn test_usize_round_trip() {
        let raw = RawPtr::from_addr(0xDEAD_B000);
        let addr: usize = raw.into();
        assert_eq!(addr, 0xDEAD_B000);
        assert_eq!(RawPtr::from(addr), raw);
    }

    #[test]
    fn test_null_default() {
        assert!(RawPtr::default().is_null());
        assert!(Ptr::<u8>::default().is_null());
        assert!(PtrPtr::<u8>::default().is_null());
        assert_eq!(RawPtr::default(), RawPtr::NULL);
    }

    #[test]
    fn test_usable_as_map_key() {
        let a = 1u32;
        let b = 2u32;
        let mut map: HashMap<RawPtr, &str> = HashMap::new();
        map.insert(Ptr::from_ref(&a).erase(), "a");
        map.insert(Ptr::from_ref(&b).erase(), "b");

        assert_eq!(map.get(&Ptr::from_ref(&a).erase()), Some(&"a"));
        assert_eq!(map.get(&Ptr::from_ref(&b).erase()), Some(&"b"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_read_write_through_handle() {
        let mut value = 5u32;
        let ptr = Ptr::new(&mut value as *mut u32);
        unsafe {
            ptr.write(11);
            assert_eq!(ptr.read(), 11);
        }
        assert_eq!(value, 11);
    }
}
