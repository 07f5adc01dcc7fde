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

mod common;

use anyhow::Result;
use common::{decoded_bytes, ByteDecoder, MemoryDatabase, MockTransport};
use std::sync::Arc;
use tessera_core::collab::{KeyValueStore, Transport};
use tessera_core::LoaderConfig;
use tessera_loader::{RemoteLoader, StorageBackend};

const URL: &str = "https://cdn.example.com/icons/coin.png";

fn network_only(transport: Arc<MockTransport>) -> Arc<RemoteLoader> {
    RemoteLoader::new(
        transport,
        ByteDecoder::new(),
        StorageBackend::network_only(),
        &LoaderConfig::default(),
    )
}

#[tokio::test]
async fn resolves_from_network_and_caches() -> Result<()> {
    let transport = MockTransport::new();
    transport.respond(URL, b"coin");
    let loader = network_only(Arc::clone(&transport));

    let first = loader.load_image(URL, true).await.unwrap();
    assert_eq!(decoded_bytes(&first), b"coin");

    // Second request is a pure cache hit.
    let second = loader.load_image(URL, true).await.unwrap();
    assert_eq!(decoded_bytes(&second), b"coin");
    assert_eq!(transport.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_url_resolves_none_immediately() {
    let transport = MockTransport::new();
    let loader = network_only(Arc::clone(&transport));

    assert!(loader.load_image("", true).await.is_none());
    assert!(loader.load_image("   ", true).await.is_none());
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn concurrent_requests_share_one_fetch() -> Result<()> {
    let (transport, gate) = MockTransport::gated();
    transport.respond(URL, b"coin");
    let loader = network_only(Arc::clone(&transport));

    // Three logical callers while the single network request is held open.
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let loader = Arc::clone(&loader);
            tokio::spawn(async move { loader.load_image(URL, true).await })
        })
        .collect();
    while transport.started_count() < 1 {
        tokio::task::yield_now().await;
    }
    gate.add_permits(1);

    for handle in handles {
        let payload = handle.await?.unwrap();
        assert_eq!(decoded_bytes(&payload), b"coin");
    }
    assert_eq!(transport.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_fetch_resolves_none_and_is_retriable() {
    let transport = MockTransport::new();
    // No scripted response: the transport answers 404.
    let loader = network_only(Arc::clone(&transport));

    assert!(loader.load_image(URL, true).await.is_none());

    // The failed entry was evicted, so a retry reaches the network again.
    assert!(loader.load_image(URL, true).await.is_none());
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn decode_failure_resolves_none() {
    let transport = MockTransport::new();
    transport.respond(URL, b"corrupt");
    let loader = network_only(Arc::clone(&transport));

    assert!(loader.load_image(URL, true).await.is_none());
}

#[tokio::test]
async fn durable_database_hit_bypasses_network() {
    let transport = MockTransport::new();
    let database = MemoryDatabase::new();
    database.insert("cache_png", URL, b"coin");
    let loader = RemoteLoader::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ByteDecoder::new(),
        StorageBackend::database(Arc::clone(&database) as Arc<dyn KeyValueStore>),
        &LoaderConfig::default(),
    );

    let payload = loader.load_image(URL, true).await.unwrap();
    assert_eq!(decoded_bytes(&payload), b"coin");
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn persisted_fetch_stores_raw_response() {
    let transport = MockTransport::new();
    transport.respond(URL, b"coin");
    let database = MemoryDatabase::new();
    let loader = RemoteLoader::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ByteDecoder::new(),
        StorageBackend::database(Arc::clone(&database) as Arc<dyn KeyValueStore>),
        &LoaderConfig::default(),
    );

    loader.load_image(URL, true).await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls, vec![(URL.to_string(), false)]);
    assert!(database.contains("cache_png", URL));
}

#[tokio::test]
async fn non_persistent_fetch_busts_caches_and_skips_database() {
    let transport = MockTransport::new();
    transport.respond(URL, b"coin");
    let database = MemoryDatabase::new();
    let loader = RemoteLoader::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        ByteDecoder::new(),
        StorageBackend::database(Arc::clone(&database) as Arc<dyn KeyValueStore>),
        &LoaderConfig::default(),
    );

    loader.load_image(URL, false).await.unwrap();

    // Cache-busting is requested and nothing is persisted.
    let calls = transport.calls();
    assert_eq!(calls, vec![(URL.to_string(), true)]);
    assert_eq!(database.len(), 0);
}
