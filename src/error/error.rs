//! Main error type for the bridge.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::{ErrorClass, ErrorKind};

/// The error type for every bridge operation.
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (what went wrong)
/// ├── class: ErrorClass        (where: argument, decoding, resolution, transport)
/// ├── message: String          (human-readable description)
/// ├── store: Option            (store key the call was made against)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use openfga_bridge::{Error, ErrorClass, ErrorKind};
///
/// let err = Error::store_not_found("docs");
/// assert_eq!(err.kind(), ErrorKind::StoreNotFound);
/// assert_eq!(err.class(), ErrorClass::Resolution);
/// assert!(!err.evicts_client());
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    class: ErrorClass,
    message: Cow<'static, str>,
    store: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// The class defaults to [`ErrorKind::default_class`].
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            class: kind.default_class(),
            message: message.into(),
            store: None,
            source: None,
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the pipeline stage the error was raised in.
    #[inline]
    pub fn class(&self) -> ErrorClass {
        self.class
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the store key the failing call targeted, if known.
    #[inline]
    pub fn store(&self) -> Option<&str> {
        self.store.as_deref()
    }

    /// Returns `true` if the cached client that served the call must be
    /// evicted because of this error.
    #[inline]
    pub fn evicts_client(&self) -> bool {
        self.class == ErrorClass::Transport
    }

    /// Attaches the store key the call was made against.
    #[must_use]
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Reclassifies the error as a resolution failure.
    ///
    /// Used when an RPC fails while a client is still being resolved: the
    /// connection is discarded and nothing was cached.
    #[must_use]
    pub fn in_resolution(mut self) -> Self {
        self.class = ErrorClass::Resolution;
        self
    }

    /// Maps a gRPC status to a transport-class error.
    ///
    /// The class is always [`ErrorClass::Transport`], whatever the kind: the
    /// status came back over a live connection.
    pub fn from_status(status: tonic::Status) -> Self {
        let kind = ErrorKind::from_grpc_code(status.code());
        let message = format!("{}: {}", status.code(), status.message());
        let mut err = Self::new(kind, message).with_source(status);
        err.class = ErrorClass::Transport;
        err
    }

    /// Creates a transport-class error of the given kind.
    pub fn transport(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        let mut err = Self::new(kind, message);
        err.class = ErrorClass::Transport;
        err
    }

    // Convenience constructors for common error types

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Creates a decoding error.
    pub fn decoding(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Decoding, message)
    }

    /// Creates a store-not-found error for the given store name.
    pub fn store_not_found(store_name: &str) -> Self {
        Self::new(
            ErrorKind::StoreNotFound,
            format!("store '{store_name}' not found or has been deleted"),
        )
    }

    /// Creates a connection error.
    pub fn connection(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Connection, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(ref store) = self.store {
            write!(f, " (store: {})", store)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, kind.to_string())
    }
}

impl From<tonic::Status> for Error {
    fn from(status: tonic::Status) -> Self {
        Self::from_status(status)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid endpoint address: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::decoding(format!("malformed tuple list: {}", err)).with_source(err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_new() {
        let err = Error::new(ErrorKind::InvalidArgument, "store key cannot be empty");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.class(), ErrorClass::Argument);
        assert!(err.to_string().contains("store key cannot be empty"));
        assert!(err.store().is_none());
    }

    #[test]
    fn test_from_status_is_transport() {
        let err = Error::from_status(tonic::Status::unavailable("connection reset"));
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.class(), ErrorClass::Transport);
        assert!(err.evicts_client());
        assert!(err.message().contains("connection reset"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_server_invalid_argument_still_evicts() {
        let err = Error::from_status(tonic::Status::invalid_argument("tuple already exists"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(err.class(), ErrorClass::Transport);
        assert!(err.evicts_client());
    }

    #[test]
    fn test_in_resolution_stops_eviction() {
        let err = Error::from_status(tonic::Status::unavailable("refused")).in_resolution();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.class(), ErrorClass::Resolution);
        assert!(!err.evicts_client());
    }

    #[test]
    fn test_store_not_found() {
        let err = Error::store_not_found("docs");
        assert_eq!(err.kind(), ErrorKind::StoreNotFound);
        assert!(err.message().contains("'docs'"));
        assert!(!err.evicts_client());
    }

    #[test]
    fn test_with_store_display() {
        let err = Error::timeout("deadline of 5s exceeded").with_store("docs@http://openfga:8081");
        assert_eq!(err.store(), Some("docs@http://openfga:8081"));
        let display = err.to_string();
        assert!(display.starts_with("timeout: "));
        assert!(display.contains("(store: docs@http://openfga:8081)"));
    }

    #[test]
    fn test_from_serde_json_is_decoding() {
        let json_err = serde_json::from_str::<Vec<u8>>("[{bad json").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(err.class(), ErrorClass::Decoding);
        assert!(!err.evicts_client());
    }

    #[test]
    fn test_from_error_kind() {
        let err: Error = ErrorKind::Timeout.into();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.evicts_client());
    }
}
