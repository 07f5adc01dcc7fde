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

use super::Asset;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A thread-safe, reference-counted handle to a decoded asset.
///
/// The payload is type-erased so that a single cache can hold textures,
/// documents, and composite assets side by side. Cloning is cheap: only the
/// reference count is touched, never the underlying data.
///
/// Callers that know the concrete type recover it with
/// [`downcast`](AssetPayload::downcast).
#[derive(Clone)]
pub struct AssetPayload(Arc<dyn Any + Send + Sync>);

impl AssetPayload {
    /// Wraps a decoded asset, taking ownership of its data.
    ///
    /// This is typically called by an [`AssetDecoder`](crate::collab::AssetDecoder)
    /// implementation once raw bytes have been turned into a usable object.
    pub fn new<T: Asset>(asset: T) -> Self {
        Self(Arc::new(asset))
    }

    /// Attempts to view the payload as a concrete asset type.
    ///
    /// Returns `None` if the payload holds a different type.
    pub fn downcast<T: Asset>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }

    /// Returns `true` if the payload holds an asset of type `T`.
    pub fn is<T: Asset>(&self) -> bool {
        self.0.is::<T>()
    }
}

impl fmt::Debug for AssetPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AssetPayload").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTexture {
        id: u32,
    }
    impl Asset for TestTexture {}

    struct TestDocument;
    impl Asset for TestDocument {}

    #[test]
    fn downcast_recovers_concrete_type() {
        let payload = AssetPayload::new(TestTexture { id: 7 });
        assert!(payload.is::<TestTexture>());
        let texture = payload.downcast::<TestTexture>().unwrap();
        assert_eq!(texture.id, 7);
    }

    #[test]
    fn downcast_wrong_type_returns_none() {
        let payload = AssetPayload::new(TestTexture { id: 7 });
        assert!(!payload.is::<TestDocument>());
        assert!(payload.downcast::<TestDocument>().is_none());
    }

    #[test]
    fn clones_share_the_same_data() {
        let payload = AssetPayload::new(TestTexture { id: 42 });
        let clone = payload.clone();
        let a = payload.downcast::<TestTexture>().unwrap();
        let b = clone.downcast::<TestTexture>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
