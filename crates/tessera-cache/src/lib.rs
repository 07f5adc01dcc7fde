// Copyright 2025 eraflo
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

//! # Tessera Cache
//!
//! The leaf component of the asset layer: a reference-keyed store mapping a
//! [`CacheKey`](tessera_core::CacheKey) to an [`AssetCacheEntry`], with no
//! I/O of its own.
//!
//! It exists so the remote loader and the bundle asset manager can share the
//! same de-duplication discipline under independent key namespaces; each
//! orchestrator owns its own [`CacheIndex`] instance.

#![warn(missing_docs)]

mod entry;
mod index;

pub use entry::{AssetCacheEntry, CacheStatus, WaiterReceiver};
pub use index::CacheIndex;
