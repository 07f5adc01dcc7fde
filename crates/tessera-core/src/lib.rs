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

//! # Tessera Core
//!
//! Foundational crate containing the traits, key types, and interface
//! contracts shared by the asset caching and loading layer.
//!
//! Nothing in this crate performs I/O. The higher-level crates
//! (`tessera-cache`, `tessera-loader`) build the actual orchestration on top
//! of the contracts defined here.

#![warn(missing_docs)]

pub mod asset;
pub mod collab;
pub mod config;
pub mod error;
pub mod key;

pub use asset::{Asset, AssetKind, AssetPayload};
pub use config::LoaderConfig;
pub use error::{AssetError, TransportError};
pub use key::{CacheKey, Namespace, RemoteUrl};
