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

use crate::error::TransportError;
use async_trait::async_trait;

/// The response shape a request asks the transport for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Raw bytes (images, packed data).
    Binary,
    /// Text content (structured documents, atlases).
    Text,
}

/// The HTTP-like request client used to perform remote fetches.
///
/// Timeout policy is entirely this collaborator's concern; the cache layer
/// defines none of its own. A request runs to completion once issued; there
/// is no cancellation primitive.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a request and resolves with the response body.
    ///
    /// When `auto_cache_bust` is set, the implementation appends a volatile
    /// timestamp parameter (see
    /// [`RemoteUrl::CACHE_BUST_PARAM`](crate::key::RemoteUrl::CACHE_BUST_PARAM))
    /// so intermediary caches are bypassed.
    async fn send(
        &self,
        url: &str,
        response: ResponseKind,
        auto_cache_bust: bool,
    ) -> Result<Vec<u8>, TransportError>;
}
