//! End-to-end gateway scenarios against the in-memory service.

use std::time::Duration;

use openfga_bridge::{ErrorClass, ErrorKind, TupleCondition, TupleKey, encode_tuple_list};
use serde_json::json;

use crate::common::{BOB_READER, Harness, short_timeout};

#[tokio::test]
async fn test_direct_tuple_allows_and_denies() {
    let harness = Harness::with_docs();

    let anne = harness
        .gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .expect("check should succeed");
    let bob = harness
        .gateway
        .check("docs", "user:bob", "reader", "document:budget", None)
        .await
        .expect("check should succeed");

    assert!(anne);
    assert!(!bob);
    assert_eq!(harness.fga.list_stores_calls(), 1);
    assert_eq!(harness.fga.check_calls(), 2);
}

#[tokio::test]
async fn test_missing_store_denies_at_boundary() {
    let harness = Harness::new();

    let err = harness
        .gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Resolution);
    assert!(err.to_string().contains("not found or has been deleted"));

    let boundary = harness.gateway.fail_closed();
    assert!(!boundary.check("docs", "user:anne", "reader", "document:budget", None).await);
    assert!(harness.registry().is_empty());
}

#[tokio::test]
async fn test_write_then_check() {
    let harness = Harness::with_docs();
    let boundary = harness.gateway.fail_closed();

    assert!(boundary.write_tuples("docs", Some(BOB_READER), None).await);
    assert!(boundary.check("docs", "user:bob", "reader", "document:budget", None).await);
    assert!(boundary.delete_tuples("docs", Some(BOB_READER)).await);
    assert!(!boundary.check("docs", "user:bob", "reader", "document:budget", None).await);
}

#[tokio::test]
async fn test_broken_connection_evicts_and_recovers() {
    let harness = Harness::with_docs();
    let gateway = &harness.gateway;
    let key = harness.registry().key_for("docs").expect("valid key");

    assert!(gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .expect("check should succeed"));
    assert!(harness.registry().contains(&key));

    harness.fga.break_connections();
    let err = gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Transport);
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(!harness.registry().contains(&key));
    assert_eq!(harness.fga.open_connections(), 0);

    assert!(gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .expect("check should succeed after re-resolution"));
    assert_eq!(harness.fga.list_stores_calls(), 2);
    assert_eq!(harness.registry().stats().evictions, 1);
}

#[tokio::test]
async fn test_malformed_contextual_tuples_make_no_rpc() {
    let harness = Harness::with_docs();

    let err = harness
        .gateway
        .check("docs", "user:bob", "reader", "document:budget", Some(r#"[{"user": 7}]"#))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decoding);
    assert!(!err.evicts_client());
    assert_eq!(harness.fga.connects(), 0);
    assert_eq!(harness.fga.check_calls(), 0);
}

#[tokio::test]
async fn test_contextual_tuples_with_conditions() {
    let harness = Harness::with_docs();
    let mut context = serde_json::Map::new();
    context.insert("ip".to_string(), json!("10.0.0.1"));
    let tuples = vec![
        TupleKey::new("user:carl", "reader", "document:budget")
            .with_condition(TupleCondition::new("in_office").with_context(context)),
    ];
    let payload = encode_tuple_list(&tuples).expect("encodes");

    let allowed = harness
        .gateway
        .check("docs", "user:carl", "reader", "document:budget", Some(&payload))
        .await
        .expect("check should succeed");
    assert!(allowed);
}

#[tokio::test]
async fn test_fixed_store_check_with_items() {
    let harness = Harness::new();
    harness.fga.create_store("core");
    harness.fga.create_store("custom");
    harness.fga.write_tuple("custom", "user:anne", "owner", "folder:root");
    let boundary = harness.gateway.fail_closed();

    let items = vec![r#"{"user":"user:bob","relation":"viewer","object":"folder:root"}"#.to_string()];
    assert!(boundary.check_in_store("core", "user:bob", "viewer", "folder:root", &items).await);
    assert!(!boundary.check_in_store("custom", "user:bob", "viewer", "folder:root", &[] as &[String]).await);
    assert!(boundary.check_in_store("custom", "user:anne", "owner", "folder:root", &[] as &[String]).await);
}

#[tokio::test]
async fn test_embedded_endpoint_gets_its_own_client() {
    let harness = Harness::with_docs();

    for raw in ["docs", "http://replica.internal:8081/docs", "http://openfga:8081/docs"] {
        assert!(harness
            .gateway
            .check(raw, "user:anne", "reader", "document:budget", None)
            .await
            .expect("check should succeed"));
    }
    // The explicit default endpoint shares the bare key's entry.
    assert_eq!(harness.registry().len(), 2);
    assert_eq!(harness.fga.connects(), 2);
}

#[tokio::test]
async fn test_store_name_with_slash_uses_default_endpoint() -> anyhow::Result<()> {
    let harness = Harness::new();
    harness.fga.create_store("team/docs");
    harness.fga.write_tuple("team/docs", "user:anne", "reader", "document:budget");

    let allowed = harness
        .gateway
        .check("team/docs", "user:anne", "reader", "document:budget", None)
        .await?;
    assert!(allowed);

    let key = harness.registry().key_for("team/docs")?;
    assert_eq!(key.store_name(), "team/docs");
    assert_eq!(key.endpoint(), harness.registry().default_endpoint());
    assert!(harness.registry().contains(&key));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_slow_rpc_times_out_and_evicts() {
    let harness = Harness::with_config(short_timeout(Duration::from_secs(1)));
    harness.fga.create_store("docs");
    let gateway = &harness.gateway;

    gateway
        .write_tuples("docs", Some(BOB_READER), None)
        .await
        .expect("write should succeed");

    harness.fga.set_latency(Duration::from_secs(2));
    let err = gateway
        .check("docs", "user:bob", "reader", "document:budget", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.class(), ErrorClass::Transport);
    assert!(harness.registry().is_empty());
}

#[tokio::test]
async fn test_positional_boundary() {
    let harness = Harness::with_docs();
    let boundary = harness.gateway.fail_closed();

    assert!(boundary.write_positional(&[Some("docs"), Some(BOB_READER), None]).await);
    assert!(boundary
        .check_positional(&[
            Some("docs"),
            Some("user:bob"),
            Some("reader"),
            Some("document:budget"),
            None,
        ])
        .await);
    assert!(!boundary.check_positional(&[Some("docs")]).await);
    assert!(boundary.delete_positional(&[Some("docs"), Some(BOB_READER)]).await);
}
