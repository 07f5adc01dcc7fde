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

use crate::error::AssetError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// The native durable filesystem, present only on native-storage-capable
/// targets.
///
/// Metadata queries are synchronous and cheap; reads and writes are the
/// suspension points.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Root directory downloads are persisted under.
    fn writable_root(&self) -> PathBuf;

    /// Returns `true` if a file exists at `path`.
    fn file_exists(&self, path: &Path) -> bool;

    /// Returns `true` if a directory exists at `path`.
    fn directory_exists(&self, path: &Path) -> bool;

    /// Creates a directory (and any missing parents). Returns `false` on
    /// failure.
    fn create_directory(&self, path: &Path) -> bool;

    /// Removes a file. Removing an absent file is a no-op.
    fn remove_file(&self, path: &Path);

    /// Reads the full contents of a file.
    async fn load(&self, path: &Path) -> Result<Vec<u8>, AssetError>;

    /// Writes bytes to a file, replacing existing content. Returns `false`
    /// on failure.
    async fn write(&self, path: &Path, bytes: &[u8]) -> bool;
}
