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

use crate::entry::AssetCacheEntry;
use ahash::AHashMap;
use tessera_core::CacheKey;

/// The reference-keyed entry store.
///
/// Holds no business logic and performs no I/O; access is single-owner
/// behind the orchestrator's lock, so there is no concurrency control here.
/// The invariant it maintains is purely structural: at most one entry per
/// key.
#[derive(Debug, Default)]
pub struct CacheIndex {
    entries: AHashMap<CacheKey, AssetCacheEntry>,
}

impl CacheIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry.
    pub fn get(&self, key: &CacheKey) -> Option<&AssetCacheEntry> {
        self.entries.get(key)
    }

    /// Looks up an entry for mutation.
    pub fn get_mut(&mut self, key: &CacheKey) -> Option<&mut AssetCacheEntry> {
        self.entries.get_mut(key)
    }

    /// Installs an entry under its own key, replacing any previous one.
    pub fn insert(&mut self, entry: AssetCacheEntry) {
        self.entries.insert(entry.key().clone(), entry);
    }

    /// Removes and returns an entry.
    pub fn remove(&mut self, key: &CacheKey) -> Option<AssetCacheEntry> {
        self.entries.remove(key)
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries currently indexed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
