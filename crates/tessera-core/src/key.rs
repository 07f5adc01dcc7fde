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

//! Cache keys and canonical remote-URL decomposition.
//!
//! Two independent key namespaces exist: bundle-local assets are keyed by
//! `(bundle, path)` and remote assets by their canonical URL. The
//! [`RemoteUrl`] type is the single place where a raw URL string is turned
//! into both a cache identity and a filesystem-safe storage path.
//!
//! # Canonicalization policy
//!
//! The query string participates in identity: two URLs that differ in any
//! query parameter get distinct cache entries and distinct storage file
//! names (the query is hashed into the file name). The one exception is the
//! transport's own auto-appended cache-busting parameter
//! ([`RemoteUrl::CACHE_BUST_PARAM`]), which is stripped before keying;
//! otherwise every forced re-download would also be a new cache identity.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// The owning pool a cache key belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// An asset addressed by path inside a named local bundle.
    Bundle(String),
    /// An asset addressed by remote URL.
    Remote,
}

/// A reference key into the cache index.
///
/// For any key, at most one cache entry exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// The namespace the key lives in.
    pub namespace: Namespace,
    /// Bundle-relative path, or canonical remote URL.
    pub path: String,
}

impl CacheKey {
    /// Creates a key for a bundle-local asset.
    pub fn bundle(bundle: &str, path: &str) -> Self {
        Self {
            namespace: Namespace::Bundle(bundle.to_string()),
            path: path.to_string(),
        }
    }

    /// Creates a key for a remote asset from its canonical URL.
    pub fn remote(url: &RemoteUrl) -> Self {
        Self {
            namespace: Namespace::Remote,
            path: url.as_str().to_string(),
        }
    }
}

/// Canonical decomposition of a remote URL.
///
/// Usable both as a cache key (via [`as_str`](RemoteUrl::as_str)) and as a
/// filesystem-safe relative storage path (via
/// [`storage_rel_path`](RemoteUrl::storage_rel_path)).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteUrl {
    url: String,
    dir: PathBuf,
    file_name: String,
}

impl RemoteUrl {
    /// Query parameter appended by the transport to defeat intermediary
    /// caches. Stripped during canonicalization.
    pub const CACHE_BUST_PARAM: &'static str = "_t";

    /// Parses and canonicalizes a raw URL string.
    ///
    /// Returns `None` for empty input. Fragments are dropped; the
    /// cache-busting parameter is stripped; all other query parameters are
    /// kept in order and hashed into the storage file name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        // Fragments never reach the server, so they carry no identity.
        let without_fragment = raw.split('#').next().unwrap_or(raw);

        let (base, query) = match without_fragment.split_once('?') {
            Some((base, query)) => (base, Self::strip_cache_bust(query)),
            None => (without_fragment, String::new()),
        };

        let url = if query.is_empty() {
            base.to_string()
        } else {
            format!("{base}?{query}")
        };

        // Drop the scheme and sanitize the remainder into a relative path.
        let address = match base.split_once("://") {
            Some((_, rest)) => rest,
            None => base,
        };
        let address = address.replace(':', "_");
        let address = address.trim_matches('/');
        if address.is_empty() {
            return None;
        }

        let (dir, file) = match address.rsplit_once('/') {
            Some((dir, file)) => (PathBuf::from(dir), file.to_string()),
            None => (PathBuf::new(), address.to_string()),
        };

        // Two query variants of the same path must not collide on disk.
        let file_name = if query.is_empty() {
            file
        } else {
            Self::tag_file_name(&file, &query)
        };

        Some(Self {
            url,
            dir,
            file_name,
        })
    }

    /// The canonical URL string (cache identity, and what the transport is
    /// asked to fetch).
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Directory portion of the storage path, relative to the store's
    /// writable root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name portion of the storage path.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Full storage path relative to the store's writable root.
    pub fn storage_rel_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn strip_cache_bust(query: &str) -> String {
        query
            .split('&')
            .filter(|pair| {
                let key = pair.split('=').next().unwrap_or(pair);
                !pair.is_empty() && key != Self::CACHE_BUST_PARAM
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    fn tag_file_name(file: &str, query: &str) -> String {
        let mut hasher = DefaultHasher::new();
        query.hash(&mut hasher);
        let digest = hasher.finish();
        match file.rsplit_once('.') {
            Some((stem, ext)) => format!("{stem}-{digest:016x}.{ext}"),
            None => format!("{file}-{digest:016x}"),
        }
    }
}
