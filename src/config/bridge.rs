//! Bridge configuration.

use std::time::Duration;

use crate::types::normalize_endpoint;
use crate::{Error, Result};

/// Server address used when neither the configuration nor the store key names one.
pub const DEFAULT_SERVER_ADDRESS: &str = "openfga:8081";

/// Deadline applied to every gateway call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable overriding [`BridgeConfig::server_address`].
pub const ENV_SERVER_ADDRESS: &str = "OPENFGA_SERVER_ADDRESS";

/// Environment variable overriding [`BridgeConfig::request_timeout`], in milliseconds.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "OPENFGA_REQUEST_TIMEOUT_MS";

/// Environment variable overriding [`BridgeConfig::connect_timeout`], in milliseconds.
pub const ENV_CONNECT_TIMEOUT_MS: &str = "OPENFGA_CONNECT_TIMEOUT_MS";

/// Environment variable overriding [`BridgeConfig::list_stores_page_size`].
pub const ENV_LIST_STORES_PAGE_SIZE: &str = "OPENFGA_LIST_STORES_PAGE_SIZE";

/// Configuration shared by the client registry and the gateway.
///
/// ## Example
///
/// ```rust
/// use openfga_bridge::BridgeConfig;
/// use std::time::Duration;
///
/// let config = BridgeConfig::builder()
///     .server_address("localhost:8081")
///     .request_timeout(Duration::from_secs(2))
///     .build();
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, bon::Builder)]
pub struct BridgeConfig {
    /// Address of the OpenFGA gRPC endpoint used for store keys that do not
    /// embed their own (e.g. `openfga:8081` or `http://localhost:8081`).
    #[builder(into, default = DEFAULT_SERVER_ADDRESS.to_string())]
    pub server_address: String,

    /// Deadline for one gateway call, covering resolution and the RPC.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,

    /// Upper bound on establishing the TCP connection behind a lazy channel.
    #[builder(default = Duration::from_secs(5))]
    pub connect_timeout: Duration,

    /// Page size requested from `ListStores` while resolving a store name.
    #[builder(default = 100)]
    pub list_stores_page_size: i32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BridgeConfig {
    /// Builds a configuration from defaults overlaid with `OPENFGA_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from defaults overlaid with values returned by
    /// `lookup` for the `OPENFGA_*` variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(address) = lookup(ENV_SERVER_ADDRESS) {
            config.server_address = address;
        }
        if let Some(ms) = lookup(ENV_REQUEST_TIMEOUT_MS) {
            config.request_timeout = Duration::from_millis(parse_number(ENV_REQUEST_TIMEOUT_MS, &ms)?);
        }
        if let Some(ms) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout = Duration::from_millis(parse_number(ENV_CONNECT_TIMEOUT_MS, &ms)?);
        }
        if let Some(size) = lookup(ENV_LIST_STORES_PAGE_SIZE) {
            config.list_stores_page_size = parse_number(ENV_LIST_STORES_PAGE_SIZE, &size)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        normalize_endpoint(&self.server_address)?;
        if self.request_timeout.is_zero() {
            return Err(Error::configuration("request_timeout must be greater than zero"));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::configuration("connect_timeout must be greater than zero"));
        }
        if self.list_stores_page_size <= 0 {
            return Err(Error::configuration("list_stores_page_size must be positive"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("{name} must be a number, got '{value}'")))
}
