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

use std::collections::VecDeque;
use std::path::PathBuf;
use tessera_core::{AssetKind, RemoteUrl};

/// A native download waiting for (or holding) an admission slot.
///
/// Dead once consumed by the admission loop or de-duplicated away. A task
/// is queued at most once per URL, but many logical waiters can hang off
/// the cache entry it will eventually finalize.
#[derive(Debug, Clone)]
pub(crate) struct DownloadTask {
    /// Canonical URL to fetch.
    pub url: RemoteUrl,
    /// Local storage path the response is written to.
    pub destination: PathBuf,
    /// Kind of the asset being fetched, deciding the response shape.
    pub kind: AssetKind,
}

/// FIFO admission queue for native downloads.
///
/// Tracks queued tasks and the number currently in flight. The queue itself
/// enforces nothing about concurrency; [`admit`](DownloadQueue::admit) is
/// handed the cap on each call so the cap stays runtime-settable.
#[derive(Debug, Default)]
pub(crate) struct DownloadQueue {
    tasks: VecDeque<DownloadTask>,
    in_flight: usize,
}

impl DownloadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task unless one for the same URL is already waiting.
    ///
    /// Returns `false` when de-duplicated away.
    pub fn push(&mut self, task: DownloadTask) -> bool {
        if self.tasks.iter().any(|queued| queued.url == task.url) {
            return false;
        }
        self.tasks.push_back(task);
        true
    }

    /// Dequeues the oldest task if an admission slot is free under `cap`.
    ///
    /// The admitted task occupies a slot until [`complete`](Self::complete).
    pub fn admit(&mut self, cap: usize) -> Option<DownloadTask> {
        if self.in_flight >= cap {
            return None;
        }
        let task = self.tasks.pop_front()?;
        self.in_flight += 1;
        Some(task)
    }

    /// Frees an admission slot after a download finished, in success or
    /// failure.
    pub fn complete(&mut self) {
        debug_assert!(self.in_flight > 0);
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Number of tasks waiting for admission.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Number of downloads currently holding a slot.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
