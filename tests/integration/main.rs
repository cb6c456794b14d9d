//! Integration tests for the OpenFGA bridge.
//!
//! Most tests drive the public API against the in-memory fake from
//! `openfga_bridge::testing`. The tests in `grpc_tests` talk to a real OpenFGA
//! server and are skipped unless one is configured.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # Include the live-server tests
//! docker run -d -p 8081:8081 openfga/openfga run
//! OPENFGA_TEST_ADDRESS=localhost:8081 cargo test --test integration -- --nocapture
//! ```
//!
//! # Environment Variables
//!
//! - `OPENFGA_TEST_ADDRESS`: address of a live OpenFGA gRPC endpoint
//! - `RUST_LOG`: log filter for the test subscriber (e.g. `openfga_bridge=debug`)

mod common;
mod gateway_tests;
mod grpc_tests;
mod resolver_tests;
