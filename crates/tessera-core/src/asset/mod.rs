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

//! Provides the foundational traits and primitive types for the asset system.
//!
//! This module defines the "common language" for all asset-related
//! operations: the [`Asset`] marker trait, the type-erased [`AssetPayload`]
//! handle that carries a decoded asset through the cache, and the
//! [`AssetKind`] tag that selects which decoder applies to a blob of bytes.
//!
//! It has no knowledge of how assets are fetched or stored.

mod kind;
mod payload;

pub use kind::*;
pub use payload::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce the guarantees the cache relies on:
/// - `Send` + `Sync`: the asset can be shared with background download tasks.
/// - `'static`: the asset holds no borrowed data, so it can live in the cache
///   for the lifetime of the application.
///
/// # Examples
///
/// ```
/// use tessera_core::asset::Asset;
///
/// struct Texture {
///     // ... fields
/// }
///
/// impl Asset for Texture {}
/// ```
pub trait Asset: Send + Sync + 'static {}
