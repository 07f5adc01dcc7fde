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

use crate::asset::{AssetKind, AssetPayload};
use crate::error::AssetError;
use async_trait::async_trait;
use std::sync::Arc;

/// Progress callback: `(finished, total)` item counts.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// A named container of addressable local assets resolved by path.
#[async_trait]
pub trait Bundle: Send + Sync {
    /// Synchronous cache check for an already-resident asset.
    fn get(&self, path: &str, kind: AssetKind) -> Option<AssetPayload>;

    /// Asynchronously loads an asset from the bundle, reporting progress if
    /// a callback is supplied.
    async fn load(
        &self,
        path: &str,
        kind: AssetKind,
        progress: Option<ProgressFn>,
    ) -> Result<AssetPayload, AssetError>;

    /// Releases the underlying resource for `path`.
    fn release(&self, path: &str, kind: AssetKind);
}

/// Resolves bundle identifiers to handles.
///
/// A bundle must be loaded before assets are requested from it; that is a
/// caller precondition, not something the asset layer retries.
pub trait BundleProvider: Send + Sync {
    /// Returns a handle to a currently loaded bundle, or `None`.
    fn bundle(&self, id: &str) -> Option<Arc<dyn Bundle>>;
}
