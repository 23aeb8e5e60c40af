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

//! # Vanta Bridge
//!
//! Associates raw native handles with the owning Rust objects they belong
//! to, so a pointer coming back from a foreign API (a driver callback, a
//! plugin boundary) can be resolved to its high-level counterpart. Keys are
//! [`RawPtr`](vanta_native::RawPtr) values compared by address; values are
//! shared, type-erased objects recovered by downcast.

#![warn(missing_docs)]

pub mod map;

pub use map::{NativeObjectMap, SharedNativeObjectMap};
