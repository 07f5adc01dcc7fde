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

use std::path::{Path, PathBuf};
use tessera_core::{AssetKind, AssetPayload, CacheKey};
use tokio::sync::oneshot;

/// A caller's end of a completion channel: resolves with the shared payload
/// on success, or `None` on failure.
pub type WaiterReceiver = oneshot::Receiver<Option<AssetPayload>>;

type WaiterSender = oneshot::Sender<Option<AssetPayload>>;

/// Lifecycle state of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// A fetch is in flight; concurrent callers attach as waiters.
    Pending,
    /// The payload is resident.
    Loaded,
    /// The fetch failed; the entry is removed from the index immediately.
    Failed,
    /// Eviction was requested but deferred; honored at completion time
    /// unless a fresh load arrives first.
    WaitingForRelease,
}

/// The per-key entity tracked by the [`CacheIndex`](crate::CacheIndex).
///
/// Created on first miss, mutated only by the component that owns the fetch
/// in flight, and removed on failure or on explicit release. The waiter list
/// is drained exactly once, in registration order, when the entry leaves
/// `Pending`.
#[derive(Debug)]
pub struct AssetCacheEntry {
    key: CacheKey,
    kind: AssetKind,
    status: CacheStatus,
    payload: Option<AssetPayload>,
    waiters: Vec<WaiterSender>,
    native_waiter: Option<WaiterSender>,
    storage_path: Option<PathBuf>,
}

impl AssetCacheEntry {
    /// Creates a fresh `Pending` entry for a key with no prior interest.
    pub fn new(key: CacheKey, kind: AssetKind) -> Self {
        Self {
            key,
            kind,
            status: CacheStatus::Pending,
            payload: None,
            waiters: Vec::new(),
            native_waiter: None,
            storage_path: None,
        }
    }

    /// The key this entry is indexed under.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// What decoder applies to this entry's bytes.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Current lifecycle state.
    pub fn status(&self) -> CacheStatus {
        self.status
    }

    /// The resident payload, if the entry is loaded.
    pub fn payload(&self) -> Option<&AssetPayload> {
        self.payload.as_ref()
    }

    /// Attaches a concurrent caller to the in-flight fetch.
    ///
    /// Waiters are notified in registration order when the entry completes.
    pub fn register_waiter(&mut self) -> WaiterReceiver {
        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        rx
    }

    /// Registers the single continuation specific to the native persistence
    /// path. Fired once, independently of the waiter list.
    pub fn register_native_waiter(&mut self) -> WaiterReceiver {
        let (tx, rx) = oneshot::channel();
        self.native_waiter = Some(tx);
        rx
    }

    /// Records where the native backend will persist this entry's download.
    pub fn set_storage_path(&mut self, path: PathBuf) {
        self.storage_path = Some(path);
    }

    /// The native storage destination, if one was computed.
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    /// Transitions to `Loaded` and stores the payload.
    pub fn mark_loaded(&mut self, payload: AssetPayload) {
        self.status = CacheStatus::Loaded;
        self.payload = Some(payload);
    }

    /// Transitions to `Failed` and drops any partial payload.
    pub fn mark_failed(&mut self) {
        self.status = CacheStatus::Failed;
        self.payload = None;
    }

    /// Marks the entry for deferred eviction.
    pub fn mark_waiting_for_release(&mut self) {
        self.status = CacheStatus::WaitingForRelease;
    }

    /// Cancels a pending deferred eviction because fresh interest arrived.
    ///
    /// Restores `Loaded` or `Pending` depending on whether a payload is
    /// resident. Returns `true` if a deferral was actually cancelled.
    pub fn cancel_release(&mut self) -> bool {
        if self.status != CacheStatus::WaitingForRelease {
            return false;
        }
        self.status = if self.payload.is_some() {
            CacheStatus::Loaded
        } else {
            CacheStatus::Pending
        };
        true
    }

    /// Drains the waiter list exactly once, in registration order.
    ///
    /// Receivers whose caller has gone away are skipped silently. Calling
    /// this again is a no-op: the list is already empty.
    pub fn finish_waiters(&mut self, result: Option<AssetPayload>) {
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(result.clone());
        }
    }

    /// Fires the native-path continuation, if one is registered.
    pub fn finish_native(&mut self, result: Option<AssetPayload>) {
        if let Some(waiter) = self.native_waiter.take() {
            let _ = waiter.send(result);
        }
    }
}
