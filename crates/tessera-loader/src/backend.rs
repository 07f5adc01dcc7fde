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

//! Persistence strategy for remote downloads.
//!
//! The target capability decides the strategy exactly once, at construction
//! time; call sites never branch on the platform ad hoc.

use std::fmt;
use std::sync::Arc;
use tessera_core::collab::{KeyValueStore, LocalStore};

/// Where remote downloads are persisted.
pub enum StorageBackend {
    /// Native-storage-capable target: downloads go through the admission
    /// queue and land as files under the store's writable root.
    NativeFile(Arc<dyn LocalStore>),
    /// Network-direct target: raw responses are persisted into a durable
    /// key-value database when one is available, or not at all.
    DurableKeyValue(Option<Arc<dyn KeyValueStore>>),
}

impl StorageBackend {
    /// Selects the native filesystem strategy.
    pub fn native(store: Arc<dyn LocalStore>) -> Self {
        StorageBackend::NativeFile(store)
    }

    /// Selects the durable-database strategy.
    pub fn database(database: Arc<dyn KeyValueStore>) -> Self {
        StorageBackend::DurableKeyValue(Some(database))
    }

    /// Network-direct target without a durable database: every non-cached
    /// request goes to the network.
    pub fn network_only() -> Self {
        StorageBackend::DurableKeyValue(None)
    }
}

impl fmt::Debug for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::NativeFile(_) => f.write_str("StorageBackend::NativeFile"),
            StorageBackend::DurableKeyValue(Some(_)) => {
                f.write_str("StorageBackend::DurableKeyValue")
            }
            StorageBackend::DurableKeyValue(None) => {
                f.write_str("StorageBackend::DurableKeyValue(unavailable)")
            }
        }
    }
}
