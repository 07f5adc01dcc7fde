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

//! Explicit composition root for the asset layer.
//!
//! Applications build one [`AssetContext`] at startup and pass it (or the
//! orchestrators it owns) to whoever loads assets. There is no global
//! singleton; tests construct as many isolated contexts as they like.

use crate::backend::StorageBackend;
use crate::manager::AssetManager;
use crate::remote::RemoteLoader;
use std::sync::Arc;
use tessera_core::collab::{AssetDecoder, BundleProvider, Transport};
use tessera_core::LoaderConfig;

/// Owns the two orchestrators and the collaborators they share.
pub struct AssetContext {
    remote: Arc<RemoteLoader>,
    assets: AssetManager,
}

impl AssetContext {
    /// Wires a context from its collaborators and configuration.
    pub fn new(
        bundles: Arc<dyn BundleProvider>,
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn AssetDecoder>,
        backend: StorageBackend,
        config: &LoaderConfig,
    ) -> Self {
        Self {
            remote: RemoteLoader::new(transport, decoder, backend, config),
            assets: AssetManager::new(bundles),
        }
    }

    /// The remote-URL orchestrator.
    pub fn remote(&self) -> &Arc<RemoteLoader> {
        &self.remote
    }

    /// The bundle-local orchestrator.
    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    /// Drives the download admission loop. Call once per scheduling
    /// interval from whatever loop owns the application's time.
    pub fn tick(&self) {
        self.remote.tick();
    }
}
