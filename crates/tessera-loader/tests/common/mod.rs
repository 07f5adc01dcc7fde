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

//! Shared collaborator doubles for the loader integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tessera_core::collab::{
    AssetDecoder, Bundle, BundleProvider, KeyValueStore, LocalStore, ProgressFn, ResponseKind,
    Transport,
};
use tessera_core::{Asset, AssetError, AssetKind, AssetPayload, TransportError};
use tokio::sync::Semaphore;

/// Decoded form every mock produces: the raw bytes tagged with their kind.
pub struct DecodedBytes {
    pub kind: AssetKind,
    pub bytes: Vec<u8>,
}
impl Asset for DecodedBytes {}

/// Assembled composite produced by [`ByteDecoder::assemble_composite`].
pub struct CompositeAsset {
    pub name: String,
    pub binary: AssetPayload,
    pub document: AssetPayload,
    pub companion: AssetPayload,
}
impl Asset for CompositeAsset {}

/// Scripted transport double.
///
/// Responds from a URL->bytes table (a missing URL is a 404), records every
/// request, and can be gated: a gated send blocks until the test adds a
/// permit, which lets tests hold downloads in flight deterministically.
pub struct MockTransport {
    responses: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<(String, bool)>>,
    gate: Option<Arc<Semaphore>>,
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
            started: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    /// A transport whose sends block until permits are added to the
    /// returned gate.
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let transport = Arc::new(Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: Some(Arc::clone(&gate)),
            started: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        });
        (transport, gate)
    }

    pub fn respond(&self, url: &str, bytes: &[u8]) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), bytes.to_vec());
    }

    /// Every `(url, auto_cache_bust)` pair received, in arrival order.
    pub fn calls(&self) -> Vec<(String, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of sends that have entered the transport so far.
    pub fn started_count(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Highest number of sends ever simultaneously in flight.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        url: &str,
        _response: ResponseKind,
        auto_cache_bust: bool,
    ) -> Result<Vec<u8>, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), auto_cache_bust));
        self.started.fetch_add(1, Ordering::SeqCst);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let responses = self.responses.lock().unwrap();
        responses.get(url).cloned().ok_or_else(|| TransportError {
            code: 404,
            reason: format!("no scripted response for {url}"),
        })
    }
}

/// Real-filesystem store rooted at a temporary directory.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: &Path) -> Arc<Self> {
        Arc::new(Self {
            root: root.to_path_buf(),
        })
    }
}

#[async_trait]
impl LocalStore for DiskStore {
    fn writable_root(&self) -> PathBuf {
        self.root.clone()
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_directory(&self, path: &Path) -> bool {
        std::fs::create_dir_all(path).is_ok()
    }

    fn remove_file(&self, path: &Path) {
        let _ = std::fs::remove_file(path);
    }

    async fn load(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        std::fs::read(path).map_err(|err| AssetError::StorageRead {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> bool {
        std::fs::write(path, bytes).is_ok()
    }
}

/// In-memory durable key-value database.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, table: &str, key: &str) -> bool {
        self.tables
            .lock()
            .unwrap()
            .contains_key(&(table.to_string(), key.to_string()))
    }

    pub fn insert(&self, table: &str, key: &str, value: &[u8]) {
        self.tables
            .lock()
            .unwrap()
            .insert((table.to_string(), key.to_string()), value.to_vec());
    }

    pub fn len(&self) -> usize {
        self.tables.lock().unwrap().len()
    }
}

#[async_trait]
impl KeyValueStore for MemoryDatabase {
    async fn get(&self, table: &str, key: &str) -> Option<Vec<u8>> {
        self.tables
            .lock()
            .unwrap()
            .get(&(table.to_string(), key.to_string()))
            .cloned()
    }

    async fn put(&self, table: &str, key: &str, value: Vec<u8>) {
        self.insert(table, key, &value);
    }
}

/// Decoder double: wraps bytes as [`DecodedBytes`], rejects the byte string
/// `corrupt`, and assembles composites by bundling the three part payloads.
pub struct ByteDecoder;

impl ByteDecoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl AssetDecoder for ByteDecoder {
    async fn decode(&self, kind: AssetKind, bytes: Vec<u8>) -> Result<AssetPayload, AssetError> {
        if bytes == b"corrupt" {
            return Err(AssetError::Decode {
                kind,
                reason: "corrupt bytes".to_string(),
            });
        }
        Ok(AssetPayload::new(DecodedBytes { kind, bytes }))
    }

    fn assemble_composite(
        &self,
        name: &str,
        binary: AssetPayload,
        document: AssetPayload,
        companion: AssetPayload,
    ) -> Result<AssetPayload, AssetError> {
        Ok(AssetPayload::new(CompositeAsset {
            name: name.to_string(),
            binary,
            document,
            companion,
        }))
    }
}

/// Unwraps a payload produced by [`ByteDecoder::decode`] back into bytes.
pub fn decoded_bytes(payload: &AssetPayload) -> Vec<u8> {
    payload.downcast::<DecodedBytes>().unwrap().bytes.clone()
}

/// Scripted bundle double with separately controllable `get` and `load`
/// tables, an optional gate on `load`, and release recording.
pub struct MockBundle {
    resident: Mutex<HashMap<String, Vec<u8>>>,
    loadable: Mutex<HashMap<String, Vec<u8>>>,
    gate: Option<Arc<Semaphore>>,
    load_calls: AtomicUsize,
    releases: Mutex<Vec<String>>,
}

impl MockBundle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            resident: Mutex::new(HashMap::new()),
            loadable: Mutex::new(HashMap::new()),
            gate: None,
            load_calls: AtomicUsize::new(0),
            releases: Mutex::new(Vec::new()),
        })
    }

    /// A bundle whose loads block until permits are added to the returned
    /// gate.
    pub fn gated() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let bundle = Arc::new(Self {
            resident: Mutex::new(HashMap::new()),
            loadable: Mutex::new(HashMap::new()),
            gate: Some(Arc::clone(&gate)),
            load_calls: AtomicUsize::new(0),
            releases: Mutex::new(Vec::new()),
        });
        (bundle, gate)
    }

    /// Makes `path` hit the synchronous `get` fast path.
    pub fn preload(&self, path: &str, bytes: &[u8]) {
        self.resident
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
    }

    /// Makes `path` loadable through the async `load` path.
    pub fn provide(&self, path: &str, bytes: &[u8]) {
        self.loadable
            .lock()
            .unwrap()
            .insert(path.to_string(), bytes.to_vec());
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn release_count(&self, path: &str) -> usize {
        self.releases
            .lock()
            .unwrap()
            .iter()
            .filter(|released| released.as_str() == path)
            .count()
    }
}

#[async_trait]
impl Bundle for MockBundle {
    fn get(&self, path: &str, kind: AssetKind) -> Option<AssetPayload> {
        self.resident
            .lock()
            .unwrap()
            .get(path)
            .map(|bytes| AssetPayload::new(DecodedBytes {
                kind,
                bytes: bytes.clone(),
            }))
    }

    async fn load(
        &self,
        path: &str,
        kind: AssetKind,
        progress: Option<ProgressFn>,
    ) -> Result<AssetPayload, AssetError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        if let Some(progress) = progress {
            progress(1, 1);
        }
        let bytes = self.loadable.lock().unwrap().get(path).cloned();
        match bytes {
            Some(bytes) => Ok(AssetPayload::new(DecodedBytes { kind, bytes })),
            None => Err(AssetError::Decode {
                kind,
                reason: format!("no scripted content for {path}"),
            }),
        }
    }

    fn release(&self, path: &str, _kind: AssetKind) {
        self.releases.lock().unwrap().push(path.to_string());
    }
}

/// Provider double over a fixed id->bundle table.
#[derive(Default)]
pub struct MockBundleProvider {
    bundles: Mutex<HashMap<String, Arc<MockBundle>>>,
}

impl MockBundleProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(&self, id: &str, bundle: Arc<MockBundle>) {
        self.bundles.lock().unwrap().insert(id.to_string(), bundle);
    }
}

impl BundleProvider for MockBundleProvider {
    fn bundle(&self, id: &str) -> Option<Arc<dyn Bundle>> {
        self.bundles
            .lock()
            .unwrap()
            .get(id)
            .map(|bundle| Arc::clone(bundle) as Arc<dyn Bundle>)
    }
}
