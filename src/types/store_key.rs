//! Cache key identifying one store on one endpoint.

use std::fmt;

use url::Url;

use crate::{Error, Result};

/// Composite cache key: `(endpoint, store name)`.
///
/// A raw key is either a store name, resolved against the configured default
/// endpoint, or `<scheme>://<authority>/<store>` naming both. Only an explicit
/// `http://` or `https://` prefix introduces an endpoint, so store names may
/// contain `/`.
///
/// ```rust
/// use openfga_bridge::StoreKey;
///
/// let key = StoreKey::parse("docs", "openfga:8081").unwrap();
/// assert_eq!(key.endpoint(), "http://openfga:8081");
/// assert_eq!(key.store_name(), "docs");
///
/// let key = StoreKey::parse("http://fga.internal:9000/docs", "openfga:8081").unwrap();
/// assert_eq!(key.endpoint(), "http://fga.internal:9000");
///
/// let key = StoreKey::parse("team/docs", "openfga:8081").unwrap();
/// assert_eq!(key.store_name(), "team/docs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreKey {
    endpoint: String,
    store_name: String,
}

impl StoreKey {
    /// Creates a key from an endpoint address and a store name.
    pub fn new(endpoint: &str, store_name: impl Into<String>) -> Result<Self> {
        let store_name = store_name.into();
        if store_name.trim().is_empty() {
            return Err(Error::invalid_argument("store name cannot be empty"));
        }
        let endpoint = normalize_endpoint(endpoint)
            .map_err(|e| Error::invalid_argument(format!("invalid endpoint in store key: {}", e.message())))?;
        Ok(Self {
            endpoint,
            store_name,
        })
    }

    /// Parses a raw store key, falling back to `default_endpoint` when the key
    /// names only a store.
    pub fn parse(raw: &str, default_endpoint: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::invalid_argument("store key cannot be empty"));
        }

        match split_endpoint(raw) {
            Some((endpoint, store_name)) => Self::new(endpoint, store_name),
            None => Self::new(default_endpoint, raw),
        }
    }

    /// Returns the normalized endpoint URI (e.g. `http://openfga:8081`).
    #[inline]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the store name.
    #[inline]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.store_name, self.endpoint)
    }
}

/// Splits `http(s)://authority/store` into endpoint and store name.
fn split_endpoint(raw: &str) -> Option<(&str, &str)> {
    let scheme_len = ["http://", "https://"]
        .into_iter()
        .find(|scheme| raw.get(..scheme.len()).is_some_and(|p| p.eq_ignore_ascii_case(scheme)))?
        .len();
    let slash = scheme_len + raw[scheme_len..].find('/')?;
    Some((&raw[..slash], &raw[slash + 1..]))
}

/// Normalizes a server address into a gRPC endpoint URI.
///
/// Bare `host:port` addresses get an `http://` scheme (connections are
/// plaintext). Only `http` and `https` are accepted; any path is rejected.
pub fn normalize_endpoint(address: &str) -> Result<String> {
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::configuration("server address cannot be empty"));
    }

    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };

    let url = Url::parse(&candidate)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::configuration(format!(
            "unsupported scheme '{}' in server address '{address}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::configuration(format!("server address '{address}' has no host")));
    }
    if url.path() != "/" || url.query().is_some() {
        return Err(Error::configuration(format!(
            "server address '{address}' must not carry a path or query"
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}
