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

//! Bundle-local asset loading with reference-aware release.
//!
//! [`AssetManager`] is the bundle-side counterpart of
//! [`RemoteLoader`](crate::RemoteLoader): the same de-duplication discipline
//! over a [`CacheIndex`], but keyed by `(bundle, path)` and backed by
//! [`Bundle`] handles instead of the network. Its distinctive concern is
//! release: an asset released while its load is still in flight is not
//! evicted immediately but marked `WaitingForRelease`, and the deferral is
//! honored (or cancelled by fresh interest) when the load completes.

use std::sync::{Arc, Mutex};
use std::time::Instant;
use tessera_cache::{AssetCacheEntry, CacheIndex, CacheStatus, WaiterReceiver};
use tessera_core::collab::{Bundle, BundleProvider, ProgressFn};
use tessera_core::{AssetKind, AssetPayload, CacheKey};

/// Outcome of a release request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseInfo {
    /// The entry was evicted and the bundle's reference freed.
    Released,
    /// A load is in flight; eviction is deferred to completion time.
    Deferred,
    /// Nothing is cached under that key. Strictly a no-op: the bundle is
    /// not touched, so reference counts cannot go negative.
    NotCached,
}

/// What the load path decided to do, computed under the index lock.
enum LoadPlan {
    Hit(AssetPayload),
    Wait(WaiterReceiver),
    /// First request for this key; this caller owns the bundle load.
    Start,
}

/// Orchestrates de-duplicated loading and reference-aware release of
/// bundle-local assets.
pub struct AssetManager {
    bundles: Arc<dyn BundleProvider>,
    index: Mutex<CacheIndex>,
}

impl AssetManager {
    /// Creates a manager resolving bundles through `bundles`.
    pub fn new(bundles: Arc<dyn BundleProvider>) -> Self {
        Self {
            bundles,
            index: Mutex::new(CacheIndex::new()),
        }
    }

    /// Loads an asset from a loaded bundle.
    ///
    /// Requesting from a bundle that is not loaded fails fast with `None`;
    /// loading bundles is a caller responsibility, not retried here. A
    /// request for a key whose eviction is deferred cancels the deferral
    /// and joins the entry as usual.
    pub async fn load(
        &self,
        bundle_id: &str,
        path: &str,
        kind: AssetKind,
        progress: Option<ProgressFn>,
    ) -> Option<AssetPayload> {
        let bundle = match self.bundles.bundle(bundle_id) {
            Some(bundle) => bundle,
            None => {
                log::warn!("bundle '{bundle_id}' is not loaded, cannot load {path}");
                return None;
            }
        };

        let key = CacheKey::bundle(bundle_id, path);
        let plan = {
            let mut index = self.index.lock().unwrap();
            if let Some(entry) = index.get_mut(&key) {
                if entry.cancel_release() {
                    log::debug!("fresh request for {path} cancelled its deferred release");
                }
                match (entry.status(), entry.payload()) {
                    (CacheStatus::Loaded, Some(payload)) => LoadPlan::Hit(payload.clone()),
                    _ => LoadPlan::Wait(entry.register_waiter()),
                }
            } else {
                index.insert(AssetCacheEntry::new(key.clone(), kind));
                LoadPlan::Start
            }
        };

        match plan {
            LoadPlan::Hit(payload) => Some(payload),
            LoadPlan::Wait(rx) => rx.await.ok().flatten(),
            LoadPlan::Start => {
                // Already resident in the bundle itself: no async hop.
                if let Some(payload) = bundle.get(path, kind) {
                    return self.complete_success(&bundle, &key, path, kind, payload);
                }

                let started = Instant::now();
                match bundle.load(path, kind, progress).await {
                    Ok(payload) => {
                        log::debug!(
                            "loaded {path} from bundle '{bundle_id}' in {:?}",
                            started.elapsed()
                        );
                        self.complete_success(&bundle, &key, path, kind, payload)
                    }
                    Err(err) => {
                        log::warn!("failed to load {path} from bundle '{bundle_id}': {err}");
                        self.complete_failure(&key);
                        None
                    }
                }
            }
        }
    }

    /// Releases a cached asset.
    ///
    /// Resident entries are evicted and the bundle reference freed exactly
    /// once. In-flight entries are marked for deferred eviction instead of
    /// being torn out from under their waiters. An absent key does nothing.
    pub fn release(&self, bundle_id: &str, path: &str, kind: AssetKind) -> ReleaseInfo {
        let key = CacheKey::bundle(bundle_id, path);
        {
            let mut index = self.index.lock().unwrap();
            // An entry without a resident payload is still in flight, even
            // when a previous release already marked it: evicting now would
            // strand its waiters.
            let in_flight = match index.get(&key) {
                Some(entry) => {
                    entry.payload().is_none()
                        && matches!(
                            entry.status(),
                            CacheStatus::Pending | CacheStatus::WaitingForRelease
                        )
                }
                None => {
                    log::debug!("release of {path}: nothing cached, ignoring");
                    return ReleaseInfo::NotCached;
                }
            };
            if in_flight {
                if let Some(entry) = index.get_mut(&key) {
                    entry.mark_waiting_for_release();
                }
                log::debug!("release of {path} deferred until its load completes");
                return ReleaseInfo::Deferred;
            }
            index.remove(&key);
        }

        if let Some(bundle) = self.bundles.bundle(bundle_id) {
            bundle.release(path, kind);
        }
        ReleaseInfo::Released
    }

    /// Whether a payload is resident for `(bundle_id, path)` right now.
    pub fn is_cached(&self, bundle_id: &str, path: &str) -> bool {
        let index = self.index.lock().unwrap();
        index
            .get(&CacheKey::bundle(bundle_id, path))
            .map(|entry| entry.status() == CacheStatus::Loaded)
            .unwrap_or(false)
    }

    /// Delivers a successful load to the owner and every waiter, honoring a
    /// deferred release that arrived mid-flight. Callers still receive the
    /// payload in that case; only the cache residency is given up.
    fn complete_success(
        &self,
        bundle: &Arc<dyn Bundle>,
        key: &CacheKey,
        path: &str,
        kind: AssetKind,
        payload: AssetPayload,
    ) -> Option<AssetPayload> {
        let release_deferred = {
            let mut index = self.index.lock().unwrap();
            match index.get_mut(key) {
                Some(entry) if entry.status() == CacheStatus::WaitingForRelease => {
                    entry.finish_waiters(Some(payload.clone()));
                    index.remove(key);
                    true
                }
                Some(entry) => {
                    entry.mark_loaded(payload.clone());
                    entry.finish_waiters(Some(payload.clone()));
                    false
                }
                // Entry vanished under a concurrent eviction; deliver to the
                // owner anyway.
                None => false,
            }
        };

        if release_deferred {
            log::debug!("honoring deferred release of {path} after delivery");
            bundle.release(path, kind);
        }
        Some(payload)
    }

    /// Evicts a failed entry and fans the failure out to every waiter.
    fn complete_failure(&self, key: &CacheKey) {
        let mut index = self.index.lock().unwrap();
        if let Some(mut entry) = index.remove(key) {
            entry.mark_failed();
            entry.finish_waiters(None);
        }
    }
}
