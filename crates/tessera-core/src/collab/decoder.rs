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

/// The asset runtime that turns raw bytes into display-ready objects.
///
/// The cache layer's responsibility ends at handing bytes to this
/// collaborator and caching what comes back. Decoding may itself suspend
/// (e.g. texture upload), which is why [`decode`](AssetDecoder::decode) is
/// async.
#[async_trait]
pub trait AssetDecoder: Send + Sync {
    /// Decodes raw bytes into an asset object of the given kind.
    async fn decode(&self, kind: AssetKind, bytes: Vec<u8>) -> Result<AssetPayload, AssetError>;

    /// Builds one composite asset out of its three independently fetched,
    /// already-decoded parts.
    ///
    /// Assembly requires validated correlation between the parts, which is
    /// why the parts are fetched in strict sequence rather than in parallel.
    fn assemble_composite(
        &self,
        name: &str,
        binary: AssetPayload,
        document: AssetPayload,
        companion: AssetPayload,
    ) -> Result<AssetPayload, AssetError>;
}
