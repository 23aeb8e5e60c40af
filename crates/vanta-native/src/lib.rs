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

//! # Vanta Native
//!
//! Unmanaged-memory containers for the engine's foreign-interop layer:
//! a zero-initializing allocator facade, typed pointer wrappers with
//! address-identity semantics, and growable list/queue/stack/string types
//! whose buffers live outside the Rust object graph so their addresses can
//! be handed to graphics drivers and other foreign APIs.
//!
//! Element types are [`bytemuck::Pod`]: plain bytes with no drop glue, no
//! padding-sensitive invariants, and a valid all-zero value. Containers
//! free their buffer on drop, and also expose an explicit, idempotent
//! `release` for call sites that manage lifetime by hand.

#![warn(missing_docs)]

pub mod alloc;
pub mod list;
pub mod ptr;
pub mod queue;
pub mod shared_queue;
pub mod stack;
pub mod string;

pub use alloc::{AllocError, NativeRelease};
pub use list::NativeList;
pub use ptr::{Ptr, PtrPtr, RawPtr};
pub use queue::NativeQueue;
pub use shared_queue::SharedNativeQueue;
pub use stack::NativeStack;
pub use string::{NativeString, NativeWString};
