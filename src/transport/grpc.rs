//! gRPC transport implementation using tonic.
//!
//! Channels are created lazily: [`GrpcConnector::connect`] only builds the
//! channel object and returns immediately. The HTTP/2 connection is opened by
//! the first RPC and bounded by the configured connect timeout.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tonic::transport::{Channel, Endpoint};

use super::proto::open_fga_service_client::OpenFgaServiceClient;
use super::proto::{
    CheckRequest, CheckResponse, ListStoresRequest, ListStoresResponse, WriteRequest,
};
use super::traits::{Connection, Connector};
use crate::types::Deadline;
use crate::Error;

/// Connector producing plaintext tonic channels.
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    connect_timeout: Duration,
}

impl GrpcConnector {
    /// Creates a connector with the given TCP connect timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for GrpcConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Connector for GrpcConnector {
    fn connect(&self, endpoint: &str) -> Result<Arc<dyn Connection>, Error> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .map_err(|e| {
                Error::connection(format!("failed to create gRPC client for {endpoint}: {e}"))
                    .with_source(e)
            })?
            .connect_timeout(self.connect_timeout)
            .connect_lazy();

        Ok(Arc::new(GrpcConnection::new(endpoint, channel)))
    }
}

/// A tonic channel plus the generated OpenFGA client bound to it.
pub struct GrpcConnection {
    endpoint: String,
    client: RwLock<Option<OpenFgaServiceClient<Channel>>>,
}

impl GrpcConnection {
    fn new(endpoint: &str, channel: Channel) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: RwLock::new(Some(OpenFgaServiceClient::new(channel))),
        }
    }

    /// Clones the client handle; clones share the channel.
    fn client(&self) -> Result<OpenFgaServiceClient<Channel>, Error> {
        self.client
            .read()
            .clone()
            .ok_or_else(|| Error::unavailable(format!("connection to {} is closed", self.endpoint)))
    }

    fn request<T>(message: T, deadline: Deadline) -> Result<tonic::Request<T>, Error> {
        if deadline.is_expired() {
            return Err(Error::timeout("deadline expired before the call was sent"));
        }
        let mut request = tonic::Request::new(message);
        // Sent as the grpc-timeout header.
        request.set_timeout(deadline.remaining());
        Ok(request)
    }
}

#[async_trait::async_trait]
impl Connection for GrpcConnection {
    async fn list_stores(
        &self,
        request: ListStoresRequest,
        deadline: Deadline,
    ) -> Result<ListStoresResponse, Error> {
        let mut client = self.client()?;
        let response = client
            .list_stores(Self::request(request, deadline)?)
            .await
            .map_err(Error::from_status)?;
        Ok(response.into_inner())
    }

    async fn check(&self, request: CheckRequest, deadline: Deadline) -> Result<CheckResponse, Error> {
        let mut client = self.client()?;
        let response = client
            .check(Self::request(request, deadline)?)
            .await
            .map_err(Error::from_status)?;
        Ok(response.into_inner())
    }

    async fn write(&self, request: WriteRequest, deadline: Deadline) -> Result<(), Error> {
        let mut client = self.client()?;
        client
            .write(Self::request(request, deadline)?)
            .await
            .map_err(Error::from_status)?;
        Ok(())
    }

    fn close(&self) {
        // The channel shuts down once the last clone (including any in-flight
        // call's) is dropped.
        self.client.write().take();
    }

    fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for GrpcConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrpcConnection")
            .field("endpoint", &self.endpoint)
            .field("closed", &self.is_closed())
            .finish()
    }
}
