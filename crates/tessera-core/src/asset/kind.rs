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

use crate::collab::ResponseKind;

/// Identifies which decoder applies to a fetched asset.
///
/// The kind also selects the durable-database table used by the
/// key-value persistence backend, so that raw responses of different
/// shapes never share a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// An image decoded into a texture object.
    Texture,
    /// A structured document (e.g. JSON).
    Document,
    /// A companion text blob correlated with another part (e.g. an atlas).
    CompanionText,
    /// A composite asset assembled out of several independently fetched parts.
    Composite,
    /// Raw bytes with no dedicated decoder.
    Generic,
}

impl AssetKind {
    /// The durable-database table raw responses of this kind are persisted to.
    pub fn database_table(self) -> &'static str {
        match self {
            AssetKind::Texture => "cache_png",
            AssetKind::Document => "cache_json",
            AssetKind::CompanionText => "cache_atlas",
            AssetKind::Composite | AssetKind::Generic => "cache_data",
        }
    }

    /// The transport response shape requested when fetching this kind.
    pub fn response_kind(self) -> ResponseKind {
        match self {
            AssetKind::Texture | AssetKind::Composite | AssetKind::Generic => ResponseKind::Binary,
            AssetKind::Document | AssetKind::CompanionText => ResponseKind::Text,
        }
    }
}
