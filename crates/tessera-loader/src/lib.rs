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

//! # Tessera Loader
//!
//! The download/cache orchestration engine: request de-duplication, a
//! concurrency-limited download admission queue, dual persistence backends
//! (native filesystem vs. durable key-value database), composite-asset
//! assembly, and reference-aware release of bundle-local assets.
//!
//! The two orchestrators are [`RemoteLoader`] (remote URLs) and
//! [`AssetManager`] (bundle-local paths). Both share the de-duplication
//! discipline of [`tessera_cache::CacheIndex`] under independent key
//! namespaces, and both are owned by an explicitly constructed
//! [`AssetContext`] rather than global state.

#![warn(missing_docs)]

pub mod backend;
pub mod context;
pub mod manager;
pub mod remote;

pub use backend::StorageBackend;
pub use context::AssetContext;
pub use manager::{AssetManager, ReleaseInfo};
pub use remote::RemoteLoader;
