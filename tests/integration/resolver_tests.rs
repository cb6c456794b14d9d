//! Client resolution, caching and eviction through the public API.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use openfga_bridge::{Deadline, ErrorClass, ErrorKind};
use tokio::time::Instant;

use crate::common::Harness;

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(5))
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_misses_resolve_once() {
    let harness = Harness::with_docs();
    harness.fga.set_latency(Duration::from_millis(100));

    let checks = (0..20).map(|_| {
        harness
            .gateway
            .check("docs", "user:anne", "reader", "document:budget", None)
    });
    let results = join_all(checks).await;

    assert!(results.into_iter().all(|r| r.expect("check should succeed")));
    assert_eq!(harness.fga.connects(), 1);
    assert_eq!(harness.fga.list_stores_calls(), 1);
    assert_eq!(harness.fga.open_connections(), 1);
    assert_eq!(harness.registry().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_across_threads() {
    let harness = Harness::with_docs();
    harness.fga.set_latency(Duration::from_millis(20));
    let gateway = harness.gateway.clone();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let gateway = gateway.clone();
            tokio::spawn(async move {
                let user = if i % 2 == 0 { "user:anne" } else { "user:bob" };
                gateway.check("docs", user, "reader", "document:budget", None).await
            })
        })
        .collect();

    let mut allowed = 0;
    for handle in handles {
        if handle.await.expect("task should not panic").expect("check should succeed") {
            allowed += 1;
        }
    }

    assert_eq!(allowed, 8);
    assert_eq!(harness.fga.list_stores_calls(), 1);
    assert_eq!(harness.fga.open_connections(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_misses_on_different_keys_run_in_parallel() {
    let harness = Harness::new();
    for name in ["a", "b", "c"] {
        harness.fga.create_store(name);
    }
    harness.fga.set_latency(Duration::from_secs(1));
    let registry = harness.registry();

    let keys: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|raw| registry.key_for(raw).expect("valid key"))
        .collect();
    let started = Instant::now();
    let results = join_all(keys.iter().map(|key| registry.resolve(key, deadline()))).await;

    assert!(results.iter().all(Result::is_ok));
    // Serialized resolution would take three seconds.
    assert!(started.elapsed() < Duration::from_millis(1500));
    assert_eq!(registry.len(), 3);
}

#[tokio::test]
async fn test_cached_key_makes_no_resolution_calls() {
    let harness = Harness::with_docs();
    let registry = harness.registry();
    let key = registry.key_for("docs").expect("valid key");

    registry.resolve(&key, deadline()).await.expect("resolves");
    let connects = harness.fga.connects();
    let lists = harness.fga.list_stores_calls();

    for _ in 0..5 {
        registry.resolve(&key, deadline()).await.expect("cache hit");
    }
    assert_eq!(harness.fga.connects(), connects);
    assert_eq!(harness.fga.list_stores_calls(), lists);
    assert_eq!(registry.stats().hits, 5);
}

#[tokio::test]
async fn test_evict_then_resolve_lists_again() {
    let harness = Harness::with_docs();
    let registry = harness.registry();
    let key = registry.key_for("docs").expect("valid key");

    let first = registry.resolve(&key, deadline()).await.expect("resolves");
    assert!(registry.evict(&key));
    let second = registry.resolve(&key, deadline()).await.expect("resolves again");

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(harness.fga.list_stores_calls(), 2);
    assert_eq!(harness.fga.open_connections(), 1);
}

#[tokio::test]
async fn test_missing_store_caches_nothing() {
    let harness = Harness::new();
    let registry = harness.registry();
    let key = registry.key_for("docs").expect("valid key");

    let err = registry.resolve(&key, deadline()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreNotFound);
    assert_eq!(err.class(), ErrorClass::Resolution);
    assert!(registry.cached(&key).is_none());
    assert_eq!(harness.fga.open_connections(), 0);

    // Creating the store later is picked up by the next call.
    harness.fga.create_store("docs");
    registry.resolve(&key, deadline()).await.expect("resolves once created");
}

#[tokio::test]
async fn test_store_deleted_after_caching_is_found_on_failure() {
    let harness = Harness::with_docs();

    assert!(harness
        .gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .expect("check should succeed"));

    harness.fga.delete_store("docs");
    let err = harness
        .gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(harness.registry().is_empty());

    let err = harness
        .gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreNotFound);
}

#[tokio::test(start_paused = true)]
async fn test_waiters_share_the_deadline() {
    let harness = Harness::with_docs();
    harness.fga.set_latency(Duration::from_secs(3));
    let registry = harness.registry();
    let key = registry.key_for("docs").expect("valid key");

    // The leader needs 3s; a waiter with a 1s budget gives up first.
    let leader = registry.resolve(&key, deadline());
    let waiter = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        registry.resolve(&key, Deadline::after(Duration::from_secs(1))).await
    };
    let (leader, waiter) = tokio::join!(leader, waiter);

    leader.expect("leader resolves");
    let err = waiter.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(!err.evicts_client());
    assert_eq!(harness.fga.list_stores_calls(), 1);
}

#[tokio::test]
async fn test_no_connections_leak_across_failures() {
    let harness = Harness::with_docs();
    harness.fga.create_store("other");

    for _ in 0..3 {
        harness.fga.set_unreachable(true);
        let _ = harness
            .gateway
            .check("docs", "user:anne", "reader", "document:budget", None)
            .await;
        harness.fga.set_unreachable(false);
        let _ = harness
            .gateway
            .check("other", "user:anne", "reader", "document:budget", None)
            .await;
        let _ = harness
            .gateway
            .check("missing", "user:anne", "reader", "document:budget", None)
            .await;
    }

    assert_eq!(harness.fga.open_connections(), harness.registry().len());
    harness.registry().clear();
    assert_eq!(harness.fga.open_connections(), 0);
}
