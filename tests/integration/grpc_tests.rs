//! Tests against a live OpenFGA server.
//!
//! Skipped unless `OPENFGA_TEST_ADDRESS` is set. The server needs a store
//! named by `OPENFGA_TEST_STORE` (default `docs`) with a model defining
//! `document#reader`.

use std::time::Duration;

use anyhow::{Context, Result};
use openfga_bridge::{BridgeConfig, ErrorClass, Gateway};

use crate::common::init_tracing;

fn live_gateway() -> Result<Option<(Gateway, String)>> {
    let Ok(address) = std::env::var("OPENFGA_TEST_ADDRESS") else {
        return Ok(None);
    };
    let store = std::env::var("OPENFGA_TEST_STORE").unwrap_or_else(|_| "docs".to_string());
    init_tracing();
    let config = BridgeConfig::builder().server_address(address.clone()).build();
    let gateway =
        Gateway::grpc(config).with_context(|| format!("invalid OPENFGA_TEST_ADDRESS '{address}'"))?;
    Ok(Some((gateway, store)))
}

#[tokio::test]
async fn test_live_write_check_delete() -> Result<()> {
    let Some((gateway, store)) = live_gateway()? else {
        eprintln!("OPENFGA_TEST_ADDRESS not set, skipping");
        return Ok(());
    };
    let tuple = r#"[{"user":"user:bridge-test","relation":"reader","object":"document:bridge-test"}]"#;

    // Clean up a leftover from an earlier run; failure here is expected.
    let _ = gateway.delete_tuples(&store, Some(tuple)).await;

    gateway
        .write_tuples(&store, Some(tuple), None)
        .await
        .context("write tuple")?;
    let allowed = gateway
        .check(&store, "user:bridge-test", "reader", "document:bridge-test", None)
        .await
        .context("check tuple")?;
    assert!(allowed);
    gateway.delete_tuples(&store, Some(tuple)).await.context("delete tuple")?;
    Ok(())
}

#[tokio::test]
async fn test_live_unknown_store() -> Result<()> {
    let Some((gateway, _)) = live_gateway()? else {
        eprintln!("OPENFGA_TEST_ADDRESS not set, skipping");
        return Ok(());
    };

    let err = gateway
        .check("bridge-test-no-such-store", "user:a", "reader", "document:b", None)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Resolution);
    assert!(gateway.registry().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_server_is_resolution_error() {
    init_tracing();
    let config = BridgeConfig::builder()
        .server_address("127.0.0.1:1")
        .request_timeout(Duration::from_secs(2))
        .connect_timeout(Duration::from_millis(200))
        .build();
    let gateway = Gateway::grpc(config).expect("valid config");

    let err = gateway
        .check("docs", "user:anne", "reader", "document:budget", None)
        .await
        .unwrap_err();
    assert_eq!(err.class(), ErrorClass::Resolution);
    assert!(gateway.registry().is_empty());
    assert!(!gateway.fail_closed().check("docs", "user:anne", "reader", "document:budget", None).await);
}
