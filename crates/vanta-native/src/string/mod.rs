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

//! Native-buffer string types.
//!
//! [`NativeString`] stores UTF-8 bytes, [`NativeWString`] stores UTF-16 code
//! units; both keep their buffer one unit larger than `capacity` so a
//! terminating zero always follows the content (`data[len] == 0` after every
//! mutation). The two types deliberately duplicate their buffer logic rather
//! than share a generic core — byte and wide call sites diverge enough at the
//! encoding boundary that the duplication reads better than the abstraction.
//!
//! Unlike the pointer wrappers, equality and hashing operate over *content*:
//! pointer wrappers model "same memory", strings model "same text".

mod byte;
mod wide;

pub use byte::NativeString;
pub use wide::NativeWString;
