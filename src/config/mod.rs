//! Configuration types for the bridge.
//!
//! [`BridgeConfig`] carries the default endpoint, the per-call deadline and the
//! resolution tuning knobs. It can be built in code or read from `OPENFGA_*`
//! environment variables.

mod bridge;

pub use bridge::{
    BridgeConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SERVER_ADDRESS, ENV_CONNECT_TIMEOUT_MS,
    ENV_LIST_STORES_PAGE_SIZE, ENV_REQUEST_TIMEOUT_MS, ENV_SERVER_ADDRESS,
};
