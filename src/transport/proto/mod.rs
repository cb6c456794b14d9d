//! Generated OpenFGA v1 protobuf types and gRPC client.
//!
//! Regenerate with `tonic-prost-build` from `proto/openfga/v1/` by deleting the
//! committed file and rebuilding.

#![allow(missing_docs)]
#![allow(clippy::all)]

include!("openfga.v1.rs");
