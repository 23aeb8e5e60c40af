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

//! Handle-to-object association tables.
//!
//! [`NativeObjectMap`] is the single-threaded table; [`SharedNativeObjectMap`]
//! wraps it in a read/write lock for resolution from driver threads. Neither
//! owns the native memory behind a handle: registering a pointer here tracks
//! the association only, the native side's lifetime stays with whatever
//! allocated it.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use vanta_native::RawPtr;

/// A shared, type-erased object registered against a native handle.
pub type BridgedObject = Arc<dyn Any + Send + Sync>;

/// Associates native handles with the managed objects they stand for.
///
/// Keys compare by address ([`RawPtr`] identity), never by pointee content.
/// Registering a handle that is already present replaces the old
/// association; resolving an unknown handle yields `None`.
#[derive(Default)]
pub struct NativeObjectMap {
    entries: HashMap<RawPtr, BridgedObject>,
}

impl NativeObjectMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `object` against `handle`, replacing any existing
    /// association for the same address.
    pub fn add_mapping(&mut self, handle: RawPtr, object: BridgedObject) {
        if self.entries.insert(handle, object).is_some() {
            log::trace!("NativeObjectMap: re-registered handle {handle:?}");
        }
    }

    /// Resolves a handle to its registered object.
    pub fn managed_object(&self, handle: RawPtr) -> Option<BridgedObject> {
        self.entries.get(&handle).cloned()
    }

    /// Resolves a handle and downcasts to `T`; `None` if the handle is
    /// unknown or registered under a different concrete type.
    pub fn managed_object_as<T: Any + Send + Sync>(&self, handle: RawPtr) -> Option<Arc<T>> {
        self.entries
            .get(&handle)
            .and_then(|object| Arc::clone(object).downcast::<T>().ok())
    }

    /// Returns true if an object is registered against `handle`.
    pub fn contains(&self, handle: RawPtr) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Removes the association for `handle`, returning whether one existed.
    pub fn remove_mapping(&mut self, handle: RawPtr) -> bool {
        self.entries.remove(&handle).is_some()
    }

    /// Removes every association. The native memory behind the handles is
    /// untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of registered handles.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handles are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for NativeObjectMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeObjectMap")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// A [`NativeObjectMap`] behind a read/write lock.
///
/// Resolution is the hot path (driver callbacks looking handles up), so
/// reads take the shared side of the lock; registration and removal take
/// the exclusive side.
#[derive(Default)]
pub struct SharedNativeObjectMap {
    inner: RwLock<NativeObjectMap>,
}

impl SharedNativeObjectMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(NativeObjectMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, NativeObjectMap> {
        self.inner.read().unwrap_or_else(|poisoned| {
            // The table is plain associations; a panic mid-insert cannot
            // leave it structurally broken.
            log::warn!("SharedNativeObjectMap: recovering from a poisoned lock");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, NativeObjectMap> {
        self.inner.write().unwrap_or_else(|poisoned| {
            log::warn!("SharedNativeObjectMap: recovering from a poisoned lock");
            poisoned.into_inner()
        })
    }

    /// Registers `object` against `handle`, replacing any existing
    /// association for the same address.
    pub fn add_mapping(&self, handle: RawPtr, object: BridgedObject) {
        self.write().add_mapping(handle, object);
    }

    /// Resolves a handle to its registered object.
    pub fn managed_object(&self, handle: RawPtr) -> Option<BridgedObject> {
        self.read().managed_object(handle)
    }

    /// Resolves a handle and downcasts to `T`.
    pub fn managed_object_as<T: Any + Send + Sync>(&self, handle: RawPtr) -> Option<Arc<T>> {
        self.read().managed_object_as::<T>(handle)
    }

    /// Returns true if an object is registered against `handle`.
    pub fn contains(&self, handle: RawPtr) -> bool {
        self.read().contains(handle)
    }

    /// Removes the association for `handle`, returning whether one existed.
    pub fn remove_mapping(&self, handle: RawPtr) -> bool {
        self.write().remove_mapping(handle)
    }

    /// Removes every association.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns the number of registered handles at the time of the call.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no handles were registered at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Consumes the wrapper, returning the inner single-threaded map.
    pub fn into_inner(self) -> NativeObjectMap {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SharedNativeObjectMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedNativeObjectMap")
            .field(&*self.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanta_native::NativeList;

    #[derive(Debug, PartialEq)]
    struct Texture {
        id: u32,
    }

    #[derive(Debug)]
    struct Buffer;

    #[test]
    fn test_register_and_resolve() {
        let mut map = NativeObjectMap::new();
        let list = NativeList::<u32>::with_capacity(4);
        let handle = RawPtr::from_addr(list.as_ptr() as usize);

        map.add_mapping(handle, Arc::new(Texture { id: 7 }));
        let resolved = map.managed_object_as::<Texture>(handle).unwrap();
        assert_eq!(resolved.id, 7);
        assert!(map.contains(handle));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_re_register_replaces() {
        let mut map = NativeObjectMap::new();
        let handle = RawPtr::from_addr(0x1000);

        map.add_mapping(handle, Arc::new(Texture { id: 1 }));
        map.add_mapping(handle, Arc::new(Texture { id: 2 }));

        assert_eq!(map.len(), 1);
        assert_eq!(map.managed_object_as::<Texture>(handle).unwrap().id, 2);
    }

    #[test]
    fn test_downcast_wrong_type() {
        let mut map = NativeObjectMap::new();
        let handle = RawPtr::from_addr(0x2000);
        map.add_mapping(handle, Arc::new(Buffer));

        assert!(map.managed_object(handle).is_some());
        assert!(map.managed_object_as::<Texture>(handle).is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let mut map = NativeObjectMap::new();
        let a = RawPtr::from_addr(0x10);
        let b = RawPtr::from_addr(0x20);
        map.add_mapping(a, Arc::new(Buffer));
        map.add_mapping(b, Arc::new(Buffer));

        assert!(map.remove_mapping(a));
        assert!(!map.remove_mapping(a), "second remove finds nothing");
        assert!(map.managed_object(a).is_none());

        map.clear();
        assert!(map.is_empty());
        assert!(!map.contains(b));
    }

    #[test]
    fn test_unknown_handle_resolves_to_none() {
        let map = NativeObjectMap::new();
        assert!(map.managed_object(RawPtr::from_addr(0xDEAD)).is_none());
    }

    #[test]
    fn test_shared_map_concurrent_access() {
        let map = SharedNativeObjectMap::new();

        std::thread::scope(|scope| {
            let map = &map;
            for t in 0..4usize {
                scope.spawn(move || {
                    for i in 0..100usize {
                        let handle = RawPtr::from_addr(0x1_0000 * (t + 1) + i);
                        map.add_mapping(handle, Arc::new(Texture { id: i as u32 }));
                        // Readers interleave with writers on other threads.
                        assert_eq!(
                            map.managed_object_as::<Texture>(handle).unwrap().id,
                            i as u32
                        );
                    }
                });
            }
        });

        assert_eq!(map.len(), 400);
        let inner = map.into_inner();
        assert!(inner.contains(RawPtr::from_addr(0x1_0000)));
    }
}
