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

//! The error hierarchy of the asset layer.
//!
//! All failures are local to a single cache entry. None of them cross the
//! public loading operations: callers observe failure only as a `None`
//! result delivered through their completion channel, and the failed entry
//! is evicted from the index. There is no automatic retry anywhere; a caller
//! that wants one re-invokes the load.

use crate::asset::AssetKind;
use std::path::PathBuf;
use thiserror::Error;

/// A transport-level request failure.
#[derive(Debug, Clone, Error)]
#[error("request failed with code {code}: {reason}")]
pub struct TransportError {
    /// Transport-specific error code.
    pub code: i32,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Errors raised while fetching, persisting, or decoding an asset.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The requested bundle is not currently loaded. A caller precondition
    /// failure; the request fails fast and is not retried.
    #[error("bundle '{0}' is not loaded")]
    BundleNotLoaded(String),

    /// A sub-fetch of a composite asset failed, aborting the whole
    /// composite.
    #[error("composite part '{part}' failed to load")]
    PartFetchFailed {
        /// URL of the part that failed.
        part: String,
    },

    /// The transport reported a failure.
    #[error("network request for '{url}' failed")]
    Network {
        /// The URL that was requested.
        url: String,
        /// The underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// A downloaded response could not be written to local storage. Treated
    /// identically to a network failure.
    #[error("failed to write '{path}' to local storage")]
    StorageWrite {
        /// Destination path of the failed write.
        path: PathBuf,
    },

    /// A persisted file could not be read back from local storage.
    #[error("failed to read '{path}' from local storage: {reason}")]
    StorageRead {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The decoder rejected fetched bytes.
    #[error("failed to decode {kind:?} asset: {reason}")]
    Decode {
        /// Kind the bytes were expected to decode as.
        kind: AssetKind,
        /// Decoder-reported reason.
        reason: String,
    },
}
