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

use async_trait::async_trait;

/// The browser-style durable key-value database, present only on
/// network-direct targets.
///
/// Raw responses are persisted per table (one table per
/// [`AssetKind`](crate::asset::AssetKind)) keyed by canonical URL.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Looks up a previously persisted raw response.
    async fn get(&self, table: &str, key: &str) -> Option<Vec<u8>>;

    /// Persists a raw response. Failures are the implementation's concern;
    /// the cache layer treats persistence as best effort.
    async fn put(&self, table: &str, key: &str, value: Vec<u8>);
}
