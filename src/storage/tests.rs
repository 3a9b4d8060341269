//! Storage Module Tests
//!
//! Validates the store backends against the `Store` contract.
//!
//! ## Test Scopes
//! - **MemoryStore**: Put/Get, overwrite, batch shape and partial failure, predicate queries.
//! - **Store endpoints**: Status codes of the internal HTTP surface.
//! - **RemoteStore**: The same contract exercised over a real loopback HTTP server.

#[cfg(test)]
mod tests {
    use crate::context::RequestContext;
    use crate::storage::error::StoreError;
    use crate::storage::handlers::store_routes;
    use crate::storage::memory::MemoryStore;
    use crate::storage::remote::RemoteStore;
    use crate::storage::traits::Store;
    use crate::storage::types::{Key, Record, synthetic_name};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tower::ServiceExt;

    fn ctx() -> RequestContext {
        RequestContext::detached("storage-test")
    }

    fn keys(kind: &str, count: usize) -> Vec<Key> {
        (0..count).map(|i| Key::new(kind, synthetic_name(i))).collect()
    }

    async fn spawn_store_server(store: Arc<MemoryStore>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, store_routes(store)).await.unwrap();
        });
        addr
    }

    // ============================================================
    // MEMORY STORE TESTS
    // ============================================================

    #[tokio::test]
    async fn test_memory_put_and_get() {
        let store = MemoryStore::new();
        let key = Key::new("data", "name0");
        let record = Record::synthetic(0);

        let stored = store.put(&ctx(), &key, &record).await.unwrap();
        assert_eq!(stored, key);

        let fetched = store.get(&ctx(), &key).await.unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_memory_get_missing_key_is_not_found() {
        let store = MemoryStore::new();
        let key = Key::new("data", "missing");

        let err = store.get(&ctx(), &key).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { key });
    }

    #[tokio::test]
    async fn test_memory_overwrite_replaces_record() {
        let store = MemoryStore::new();
        let key = Key::new("data", "name1");

        let first = Record::synthetic(1);
        store.put(&ctx(), &key, &first).await.unwrap();

        let mut second = Record::synthetic(1);
        second.value = "changed".to_string();
        store.put(&ctx(), &key, &second).await.unwrap();

        assert_eq!(store.entry_count(), 1);
        let fetched = store.get_local(&key).unwrap();
        assert_eq!(fetched.value, "changed");
        assert!(fetched.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_memory_kinds_are_isolated() {
        let store = MemoryStore::new();
        store
            .put(&ctx(), &Key::new("data", "name0"), &Record::synthetic(0))
            .await
            .unwrap();

        assert_eq!(store.dump_kind("data").len(), 1);
        assert!(store.get_local(&Key::new("other", "name0")).is_none());
        assert!(store.dump_kind("other").is_empty());
    }

    #[tokio::test]
    async fn test_memory_put_multi_and_get_multi_roundtrip() {
        let store = MemoryStore::new();
        let keys = keys("data", 10);
        let records: Vec<Record> = (0..10).map(Record::synthetic).collect();

        let stored = store.put_multi(&ctx(), &keys, &records).await.unwrap();
        assert_eq!(stored, keys);

        let fetched = store.get_multi(&ctx(), &keys).await.unwrap();
        assert_eq!(fetched, records);
    }

    #[tokio::test]
    async fn test_memory_put_multi_rejects_mismatched_batch() {
        let store = MemoryStore::new();
        let keys = keys("data", 3);
        let records = vec![Record::synthetic(0)];

        let err = store.put_multi(&ctx(), &keys, &records).await.unwrap_err();
        assert_eq!(err, StoreError::InvalidBatch { keys: 3, records: 1 });
        assert_eq!(store.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_memory_get_multi_reports_missing_entries() {
        let store = MemoryStore::new();
        let keys = keys("data", 3);
        store.store_local(&keys[0], Record::synthetic(0));
        store.store_local(&keys[2], Record::synthetic(2));

        let err = store.get_multi(&ctx(), &keys).await.unwrap_err();
        assert_eq!(err, StoreError::Batch { failed: 1, total: 3 });
    }

    #[tokio::test]
    async fn test_memory_query_by_indexed_field() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store.store_local(&Key::new("data", synthetic_name(i)), Record::synthetic(i));
        }

        let hits = store
            .query_by_field(&ctx(), "data", "name", "name3")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, "value3");

        let misses = store
            .query_by_field(&ctx(), "data", "name", "name99")
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_memory_query_on_unindexed_value_matches_nothing() {
        let store = MemoryStore::new();
        store.store_local(&Key::new("data", "name0"), Record::synthetic(0));

        let hits = store
            .query_by_field(&ctx(), "data", "value", "value0")
            .await
            .unwrap();
        assert!(hits.is_empty(), "value is stored unindexed");
    }

    #[tokio::test]
    async fn test_memory_simulated_latency_applies_per_call() {
        let store = MemoryStore::with_latency(Duration::from_millis(20));
        let key = Key::new("data", "name0");

        let started = Instant::now();
        store.put(&ctx(), &key, &Record::synthetic(0)).await.unwrap();
        store.get(&ctx(), &key).await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    // ============================================================
    // STORE ENDPOINT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_store_endpoint_get_missing_returns_404() {
        let app = store_routes(Arc::new(MemoryStore::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/internal/store/get/data/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .unwrap();
        let err: StoreError = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            err,
            StoreError::NotFound {
                key: Key::new("data", "missing")
            }
        );
    }

    #[tokio::test]
    async fn test_store_endpoint_put_multi_mismatch_returns_400() {
        let app = store_routes(Arc::new(MemoryStore::new()));
        let payload = serde_json::json!({
            "keys": [Key::new("data", "name0"), Key::new("data", "name1")],
            "records": [Record::synthetic(0)],
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/internal/store/put_multi")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ============================================================
    // REMOTE STORE TESTS (loopback server)
    // ============================================================

    #[tokio::test]
    async fn test_remote_put_and_get_through_peer() {
        let backing = Arc::new(MemoryStore::new());
        let addr = spawn_store_server(backing.clone()).await;
        let remote = RemoteStore::new(&addr.to_string(), Duration::from_secs(2));

        let key = Key::new("data", "name5");
        let record = Record::synthetic(5);
        let stored = remote.put(&ctx(), &key, &record).await.unwrap();
        assert_eq!(stored, key);

        assert_eq!(backing.get_local(&key), Some(record.clone()));
        assert_eq!(remote.get(&ctx(), &key).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_remote_get_with_reserved_characters_in_key() {
        let backing = Arc::new(MemoryStore::new());
        let addr = spawn_store_server(backing.clone()).await;
        let remote = RemoteStore::new(&addr.to_string(), Duration::from_secs(2));

        let keys = [
            Key::new("bench/v2", "name0"),
            Key::new("data", "a?b"),
            Key::new("data", "x#1"),
            Key::new("data", "50% off"),
        ];
        for (index, key) in keys.iter().enumerate() {
            let record = Record::synthetic(index);
            remote.put(&ctx(), key, &record).await.unwrap();
            assert_eq!(backing.get_local(key), Some(record.clone()));

            let fetched = remote.get(&ctx(), key).await;
            assert_eq!(fetched, Ok(record), "point read of {}", key);
        }
    }

    #[tokio::test]
    async fn test_remote_get_missing_is_not_found() {
        let addr = spawn_store_server(Arc::new(MemoryStore::new())).await;
        let remote = RemoteStore::new(&addr.to_string(), Duration::from_secs(2));

        let key = Key::new("data", "nope");
        let err = remote.get(&ctx(), &key).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { key });
    }

    #[tokio::test]
    async fn test_remote_multi_and_query() {
        let addr = spawn_store_server(Arc::new(MemoryStore::new())).await;
        let remote = RemoteStore::new(&format!("http://{}/", addr), Duration::from_secs(2));

        let keys = keys("data", 4);
        let records: Vec<Record> = (0..4).map(Record::synthetic).collect();
        remote.put_multi(&ctx(), &keys, &records).await.unwrap();

        let fetched = remote.get_multi(&ctx(), &keys).await.unwrap();
        assert_eq!(fetched, records);

        let hits = remote
            .query_by_field(&ctx(), "data", "name", "name2")
            .await
            .unwrap();
        assert_eq!(hits, vec![records[2].clone()]);
    }

    #[tokio::test]
    async fn test_remote_get_multi_partial_failure_is_batch_error() {
        let backing = Arc::new(MemoryStore::new());
        let keys = keys("data", 5);
        backing.store_local(&keys[0], Record::synthetic(0));
        let addr = spawn_store_server(backing).await;
        let remote = RemoteStore::new(&addr.to_string(), Duration::from_secs(2));

        let err = remote.get_multi(&ctx(), &keys).await.unwrap_err();
        assert_eq!(err, StoreError::Batch { failed: 4, total: 5 });
    }

    #[tokio::test]
    async fn test_remote_unreachable_peer_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let remote = RemoteStore::new(&addr.to_string(), Duration::from_millis(500));
        let err = remote
            .put(&ctx(), &Key::new("data", "name0"), &Record::synthetic(0))
            .await
            .unwrap_err();

        assert!(
            matches!(err, StoreError::Unavailable { .. }),
            "unexpected error: {:?}",
            err
        );
    }
}
