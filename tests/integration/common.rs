//! Common test harness for bridge integration tests.

use std::sync::{Arc, Once};
use std::time::Duration;

use openfga_bridge::testing::InMemoryFga;
use openfga_bridge::{BridgeConfig, ClientRegistry, Gateway};

/// Tuple list granting bob `reader` on the budget document.
pub const BOB_READER: &str =
    r#"[{"user":"user:bob","relation":"reader","object":"document:budget"}]"#;

static TRACING: Once = Once::new();

/// Installs a test subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fake service, a registry over it and a gateway sharing that registry.
pub struct Harness {
    pub fga: InMemoryFga,
    pub gateway: Gateway,
}

impl Harness {
    /// Builds a harness with the default configuration.
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Builds a harness with a custom configuration.
    pub fn with_config(config: BridgeConfig) -> Self {
        init_tracing();
        let fga = InMemoryFga::new();
        let registry = ClientRegistry::new(config, Arc::new(fga.clone()))
            .expect("test configuration should be valid");
        Self {
            fga,
            gateway: Gateway::new(Arc::new(registry)),
        }
    }

    /// Builds a harness with the "docs" store and anne as a reader of the
    /// budget document.
    pub fn with_docs() -> Self {
        let harness = Self::new();
        harness.fga.create_store("docs");
        harness.fga.write_tuple("docs", "user:anne", "reader", "document:budget");
        harness
    }

    pub fn registry(&self) -> &ClientRegistry {
        self.gateway.registry()
    }
}

/// A configuration with a short request timeout.
pub fn short_timeout(timeout: Duration) -> BridgeConfig {
    BridgeConfig::builder().request_timeout(timeout).build()
}
