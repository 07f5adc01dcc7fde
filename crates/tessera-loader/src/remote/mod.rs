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

//! Remote asset downloading and caching.
//!
//! [`RemoteLoader`] is the single de-duplication point for remote fetches.
//! Every request funnels through one private fetch path: a `Loaded` cache
//! hit resolves immediately, a `Pending` hit attaches the caller to the
//! in-flight entry's waiter list, and a miss installs a `Pending` entry
//! *before* the first suspension point so no concurrent request can race
//! past the check.
//!
//! On native targets downloads do not start immediately: they enter a FIFO
//! admission queue drained by [`tick`](RemoteLoader::tick), which an
//! external driver invokes once per scheduling interval. The queue bounds
//! global download concurrency independently of how many logical callers
//! are waiting.

mod queue;

use crate::backend::StorageBackend;
use ahash::AHashMap;
use queue::{DownloadQueue, DownloadTask};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tessera_cache::{AssetCacheEntry, CacheIndex, CacheStatus, WaiterReceiver};
use tessera_core::collab::{AssetDecoder, LocalStore, Transport};
use tessera_core::{AssetKind, AssetPayload, CacheKey, LoaderConfig, RemoteUrl};

/// The parts of a composite asset, in the order they must be fetched:
/// binary blob first, then the structured document, then the companion
/// text. Stage N+1 starts only after stage N delivered.
const COMPOSITE_STAGES: [(&str, AssetKind); 3] = [
    ("png", AssetKind::Texture),
    ("json", AssetKind::Document),
    ("atlas", AssetKind::CompanionText),
];

/// What the fetch path decided to do for a request, computed under the
/// index lock and executed after it is released.
enum FetchPlan {
    /// Already loaded; resolve immediately.
    Hit(AssetPayload),
    /// In flight; wait for the owning fetch to finish.
    Wait(WaiterReceiver),
    /// First request on a native target; this caller owns the fetch.
    StartNative {
        rx: WaiterReceiver,
        store: Arc<dyn LocalStore>,
        destination: PathBuf,
    },
    /// First request on a network-direct target.
    StartDatabase,
}

/// Orchestrates download, de-duplication, concurrency-limited admission,
/// persistence, and composite-asset assembly for remote URLs.
pub struct RemoteLoader {
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn AssetDecoder>,
    backend: StorageBackend,
    index: Mutex<CacheIndex>,
    /// Fast path for already-decoded images, keyed by canonical URL.
    image_cache: Mutex<AHashMap<String, AssetPayload>>,
    queue: Mutex<DownloadQueue>,
    max_concurrent_tasks: AtomicUsize,
}

impl RemoteLoader {
    /// Creates a loader with the given collaborators and persistence
    /// strategy.
    pub fn new(
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn AssetDecoder>,
        backend: StorageBackend,
        config: &LoaderConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            decoder,
            backend,
            index: Mutex::new(CacheIndex::new()),
            image_cache: Mutex::new(AHashMap::new()),
            queue: Mutex::new(DownloadQueue::new()),
            max_concurrent_tasks: AtomicUsize::new(config.max_concurrent_tasks.max(1)),
        })
    }

    /// Current cap on simultaneously running native downloads.
    pub fn max_concurrent_tasks(&self) -> usize {
        self.max_concurrent_tasks.load(Ordering::Relaxed)
    }

    /// Adjusts the download cap at runtime (clamped to at least 1). Affects
    /// only the admission loop.
    pub fn set_max_concurrent_tasks(&self, max: usize) {
        self.max_concurrent_tasks
            .store(max.max(1), Ordering::Relaxed);
    }

    /// Loads a remote image.
    ///
    /// Resolves `None` immediately for empty input. Already-decoded images
    /// are served from a dedicated sub-cache; everything else goes through
    /// the generic fetch path, and the decoded result is stored back into
    /// the sub-cache before resolving.
    pub async fn load_image(&self, url: &str, persist: bool) -> Option<AssetPayload> {
        let remote = RemoteUrl::parse(url)?;

        if let Some(image) = self.image_cache.lock().unwrap().get(remote.as_str()) {
            log::debug!("decoded-image cache hit for {}", remote.as_str());
            return Some(image.clone());
        }

        let payload = self
            .fetch_and_cache(&remote, AssetKind::Texture, persist)
            .await?;
        self.image_cache
            .lock()
            .unwrap()
            .insert(remote.as_str().to_string(), payload.clone());
        Some(payload)
    }

    /// Assembles a three-part composite asset.
    ///
    /// The parts are fetched in strict sequence (binary blob first, then
    /// the structured document, then the companion text) because assembly
    /// requires validated correlation between them; fetching in parallel
    /// buys nothing here.
    /// Any part failing aborts the whole composite and every waiter
    /// receives `None`.
    pub async fn load_composite(
        &self,
        base_path: &str,
        name: &str,
        persist: bool,
    ) -> Option<AssetPayload> {
        if base_path.trim().is_empty() || name.trim().is_empty() {
            return None;
        }
        let composite_url = RemoteUrl::parse(&format!("{base_path}/{name}"))?;
        let key = CacheKey::remote(&composite_url);

        let wait = {
            let mut index = self.index.lock().unwrap();
            if let Some(entry) = index.get_mut(&key) {
                match entry.status() {
                    CacheStatus::Loaded => return entry.payload().cloned(),
                    _ => Some(entry.register_waiter()),
                }
            } else {
                index.insert(AssetCacheEntry::new(key.clone(), AssetKind::Composite));
                None
            }
        };
        if let Some(rx) = wait {
            return rx.await.ok().flatten();
        }

        let mut parts = Vec::with_capacity(COMPOSITE_STAGES.len());
        for (ext, kind) in COMPOSITE_STAGES {
            let part_url = match RemoteUrl::parse(&format!("{base_path}/{name}.{ext}")) {
                Some(url) => url,
                None => {
                    self.fail_entry(&key);
                    return None;
                }
            };
            match self.fetch_and_cache(&part_url, kind, persist).await {
                Some(part) => parts.push(part),
                None => {
                    log::warn!(
                        "composite part {} failed, aborting {}",
                        part_url.as_str(),
                        composite_url.as_str()
                    );
                    self.fail_entry(&key);
                    return None;
                }
            }
        }

        let mut parts = parts.into_iter();
        let (binary, document, companion) = (parts.next()?, parts.next()?, parts.next()?);
        match self
            .decoder
            .assemble_composite(name, binary, document, companion)
        {
            Ok(payload) => {
                let mut index = self.index.lock().unwrap();
                if let Some(entry) = index.get_mut(&key) {
                    entry.mark_loaded(payload.clone());
                    entry.finish_waiters(Some(payload.clone()));
                }
                Some(payload)
            }
            Err(err) => {
                log::warn!("failed to assemble composite {name}: {err}");
                self.fail_entry(&key);
                None
            }
        }
    }

    /// The admission loop, driven by an external tick source.
    ///
    /// Admits queued downloads while slots are free under the cap; each
    /// admitted download runs as its own task so the tick never blocks.
    /// Earlier-queued downloads are never starved by later ones, only
    /// bounded by the cap. A download that hangs in the transport pins its
    /// slot; timeout policy belongs to the transport collaborator.
    pub fn tick(self: &Arc<Self>) {
        loop {
            let task = {
                let mut queue = self.queue.lock().unwrap();
                match queue.admit(self.max_concurrent_tasks()) {
                    Some(task) => task,
                    None => break,
                }
            };
            log::debug!("starting download of {}", task.url.as_str());
            let loader = Arc::clone(self);
            tokio::spawn(async move {
                loader.run_download(task).await;
            });
        }
    }

    /// The single de-duplication point every remote fetch funnels through.
    async fn fetch_and_cache(
        &self,
        url: &RemoteUrl,
        kind: AssetKind,
        persist: bool,
    ) -> Option<AssetPayload> {
        let key = CacheKey::remote(url);

        // The Pending entry must be installed before the first suspension
        // point, or a second concurrent request could race past this check.
        let plan = {
            let mut index = self.index.lock().unwrap();
            if let Some(entry) = index.get_mut(&key) {
                match (entry.status(), entry.payload()) {
                    (CacheStatus::Loaded, Some(payload)) => FetchPlan::Hit(payload.clone()),
                    _ => FetchPlan::Wait(entry.register_waiter()),
                }
            } else {
                let mut entry = AssetCacheEntry::new(key.clone(), kind);
                match &self.backend {
                    StorageBackend::NativeFile(store) => {
                        let destination = store.writable_root().join(url.storage_rel_path());
                        entry.set_storage_path(destination.clone());
                        let rx = entry.register_native_waiter();
                        index.insert(entry);
                        FetchPlan::StartNative {
                            rx,
                            store: Arc::clone(store),
                            destination,
                        }
                    }
                    StorageBackend::DurableKeyValue(_) => {
                        index.insert(entry);
                        FetchPlan::StartDatabase
                    }
                }
            }
        };

        match plan {
            FetchPlan::Hit(payload) => Some(payload),
            FetchPlan::Wait(rx) => rx.await.ok().flatten(),
            FetchPlan::StartNative {
                rx,
                store,
                destination,
            } => {
                self.begin_native_fetch(&store, url, kind, persist, &destination)
                    .await;
                rx.await.ok().flatten()
            }
            FetchPlan::StartDatabase => self.begin_database_fetch(url, kind, persist).await,
        }
    }

    /// Native persistence path for a fresh miss: serve from local storage
    /// when a persisted copy exists, otherwise queue a download.
    async fn begin_native_fetch(
        &self,
        store: &Arc<dyn LocalStore>,
        url: &RemoteUrl,
        kind: AssetKind,
        persist: bool,
        destination: &Path,
    ) {
        if store.file_exists(destination) {
            if persist {
                log::debug!(
                    "{} already persisted at {}, bypassing network",
                    url.as_str(),
                    destination.display()
                );
                self.load_local(store, url, destination).await;
                return;
            }
            // Not meant to persist: discard the stale copy and re-download.
            log::debug!("{} is not persistent, re-downloading", url.as_str());
            store.remove_file(destination);
        } else {
            let dir = store.writable_root().join(url.dir());
            if !store.directory_exists(&dir) && !store.create_directory(&dir) {
                log::warn!("could not create storage directory {}", dir.display());
            }
        }
        self.push_task(url.clone(), destination.to_path_buf(), kind);
    }

    /// Network-direct persistence path: durable database first when
    /// persisting, then the transport.
    async fn begin_database_fetch(
        &self,
        url: &RemoteUrl,
        kind: AssetKind,
        persist: bool,
    ) -> Option<AssetPayload> {
        let database = match &self.backend {
            StorageBackend::DurableKeyValue(database) => database.clone(),
            StorageBackend::NativeFile(_) => None,
        };

        if persist {
            if let Some(database) = &database {
                if let Some(bytes) = database.get(kind.database_table(), url.as_str()).await {
                    log::debug!("durable database hit for {}", url.as_str());
                    return self.finish_decode(url, kind, bytes).await;
                }
            }
        }

        match self
            .transport
            .send(url.as_str(), kind.response_kind(), !persist)
            .await
        {
            Ok(bytes) => {
                if persist {
                    if let Some(database) = &database {
                        database
                            .put(kind.database_table(), url.as_str(), bytes.clone())
                            .await;
                    }
                }
                self.finish_decode(url, kind, bytes).await
            }
            Err(err) => {
                log::warn!("network request for {} failed: {err}", url.as_str());
                self.fail_entry(&CacheKey::remote(url));
                None
            }
        }
    }

    /// Decodes fetched bytes and finalizes the entry: mark it loaded, drain
    /// the waiters, hand the payload to the owning caller. A decode failure
    /// is a uniform failure, eviction and fan-out included.
    async fn finish_decode(
        &self,
        url: &RemoteUrl,
        kind: AssetKind,
        bytes: Vec<u8>,
    ) -> Option<AssetPayload> {
        let key = CacheKey::remote(url);
        match self.decoder.decode(kind, bytes).await {
            Ok(payload) => {
                let mut index = self.index.lock().unwrap();
                if let Some(entry) = index.get_mut(&key) {
                    entry.mark_loaded(payload.clone());
                    entry.finish_waiters(Some(payload.clone()));
                }
                Some(payload)
            }
            Err(err) => {
                log::warn!("failed to decode {}: {err}", url.as_str());
                self.fail_entry(&key);
                None
            }
        }
    }

    /// Runs one admitted download to completion: fetch, persist, finalize.
    async fn run_download(&self, task: DownloadTask) {
        match self
            .transport
            .send(task.url.as_str(), task.kind.response_kind(), false)
            .await
        {
            Ok(bytes) => {
                let wrote = match self.native_store() {
                    Some(store) => store.write(&task.destination, &bytes).await,
                    None => false,
                };
                if wrote {
                    self.on_download_success(&task).await;
                } else {
                    log::error!(
                        "failed to write {} to local storage",
                        task.destination.display()
                    );
                    self.on_download_error(&task);
                }
            }
            Err(err) => {
                log::error!("download of {} failed: {err}", task.url.as_str());
                self.on_download_error(&task);
            }
        }
    }

    async fn on_download_success(&self, task: &DownloadTask) {
        // Free the admission slot before decoding so the next tick can
        // admit while we finalize.
        self.queue.lock().unwrap().complete();
        log::debug!("download of {} complete", task.url.as_str());
        if let Some(store) = self.native_store() {
            let store = Arc::clone(store);
            self.load_local(&store, &task.url, &task.destination).await;
        }
    }

    fn on_download_error(&self, task: &DownloadTask) {
        self.queue.lock().unwrap().complete();
        self.fail_entry(&CacheKey::remote(&task.url));
    }

    /// Finalizes an entry from a file in local storage: read, decode,
    /// notify the native waiter and then every logical waiter in order.
    async fn load_local(&self, store: &Arc<dyn LocalStore>, url: &RemoteUrl, path: &Path) {
        let key = CacheKey::remote(url);
        let kind = {
            let index = self.index.lock().unwrap();
            match index.get(&key) {
                Some(entry) => entry.kind(),
                None => {
                    log::error!("no cache entry for local load of {}", url.as_str());
                    return;
                }
            }
        };

        let result = match store.load(path).await {
            Ok(bytes) => match self.decoder.decode(kind, bytes).await {
                Ok(payload) => Some(payload),
                Err(err) => {
                    log::warn!("failed to decode {}: {err}", url.as_str());
                    None
                }
            },
            Err(err) => {
                log::warn!("failed to read {}: {err}", path.display());
                None
            }
        };

        match result {
            Some(payload) => {
                let mut index = self.index.lock().unwrap();
                if let Some(entry) = index.get_mut(&key) {
                    entry.mark_loaded(payload.clone());
                    entry.finish_native(Some(payload.clone()));
                    entry.finish_waiters(Some(payload));
                }
            }
            None => self.fail_entry(&key),
        }
    }

    /// Evicts a failed entry and fans the failure out to every waiter.
    /// Each caller that registered while the entry was pending receives
    /// exactly one notification.
    fn fail_entry(&self, key: &CacheKey) {
        let mut index = self.index.lock().unwrap();
        if let Some(mut entry) = index.remove(key) {
            entry.mark_failed();
            entry.finish_native(None);
            entry.finish_waiters(None);
        }
    }

    /// Queues a native download, de-duplicating against tasks already
    /// waiting for the same URL.
    fn push_task(&self, url: RemoteUrl, destination: PathBuf, kind: AssetKind) {
        let mut queue = self.queue.lock().unwrap();
        if queue.push(DownloadTask {
            url: url.clone(),
            destination,
            kind,
        }) {
            log::debug!(
                "queued download of {} ({} queued, {} in flight, cap {})",
                url.as_str(),
                queue.len(),
                queue.in_flight(),
                self.max_concurrent_tasks()
            );
        } else {
            log::debug!("download of {} already queued", url.as_str());
        }
    }

    fn native_store(&self) -> Option<&Arc<dyn LocalStore>> {
        match &self.backend {
            StorageBackend::NativeFile(store) => Some(store),
            StorageBackend::DurableKeyValue(_) => None,
        }
    }
}
