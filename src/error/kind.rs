//! Error kind and error class enumerations.

/// Categorization of bridge errors.
///
/// The kind says *what* went wrong. Where it went wrong (and therefore whether
/// the cached client must be dropped) is carried by [`ErrorClass`].
///
/// | ErrorKind         | Default class | Source                               |
/// |-------------------|---------------|--------------------------------------|
/// | `InvalidArgument` | Argument      | Wrong arity, empty store key         |
/// | `Decoding`        | Decoding      | Malformed tuple-list JSON            |
/// | `StoreNotFound`   | Resolution    | No live store with the given name    |
/// | `Connection`      | Resolution    | Transport object could not be built  |
/// | `Configuration`   | Resolution    | Invalid endpoint or settings         |
/// | `Timeout`         | Transport     | Call deadline expired                |
/// | gRPC-derived      | Transport     | Status returned by the service       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid request argument or arity.
    ///
    /// Also used for gRPC `INVALID_ARGUMENT` / `OUT_OF_RANGE` returned by the
    /// service (e.g. writing a tuple that already exists).
    #[error("invalid argument")]
    InvalidArgument,

    /// A JSON tuple-list payload could not be decoded.
    #[error("decoding error")]
    Decoding,

    /// No non-deleted store with the requested name exists.
    #[error("store not found")]
    StoreNotFound,

    /// The transport object for an endpoint could not be constructed.
    #[error("connection error")]
    Connection,

    /// Configuration error (invalid address, zero timeout).
    #[error("configuration error")]
    Configuration,

    /// The call deadline expired.
    ///
    /// gRPC: DEADLINE_EXCEEDED
    #[error("timeout")]
    Timeout,

    /// Service temporarily unavailable or connection broken.
    ///
    /// gRPC: UNAVAILABLE
    #[error("service unavailable")]
    Unavailable,

    /// Authentication failed.
    ///
    /// gRPC: UNAUTHENTICATED
    #[error("unauthorized")]
    Unauthorized,

    /// Caller is not permitted to perform the RPC.
    ///
    /// gRPC: PERMISSION_DENIED
    #[error("forbidden")]
    Forbidden,

    /// The service reported a missing resource (e.g. store deleted server-side).
    ///
    /// gRPC: NOT_FOUND
    #[error("not found")]
    NotFound,

    /// Request rejected by the authorization model.
    ///
    /// gRPC: FAILED_PRECONDITION
    #[error("schema violation")]
    SchemaViolation,

    /// Conflicting concurrent modification.
    ///
    /// gRPC: ALREADY_EXISTS or ABORTED
    #[error("conflict")]
    Conflict,

    /// Rate limit exceeded.
    ///
    /// gRPC: RESOURCE_EXHAUSTED
    #[error("rate limited")]
    RateLimited,

    /// Request was cancelled.
    ///
    /// gRPC: CANCELLED
    #[error("cancelled")]
    Cancelled,

    /// Internal server error.
    ///
    /// gRPC: INTERNAL or DATA_LOSS
    #[error("internal error")]
    Internal,

    /// Protocol error (unimplemented method, version mismatch).
    #[error("protocol error")]
    Protocol,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Returns the class an error of this kind belongs to when raised at its
    /// usual site.
    pub fn default_class(&self) -> ErrorClass {
        match self {
            ErrorKind::InvalidArgument => ErrorClass::Argument,
            ErrorKind::Decoding => ErrorClass::Decoding,
            ErrorKind::StoreNotFound | ErrorKind::Connection | ErrorKind::Configuration => {
                ErrorClass::Resolution
            },
            _ => ErrorClass::Transport,
        }
    }

    /// Creates an `ErrorKind` from a gRPC status code.
    pub fn from_grpc_code(code: tonic::Code) -> Self {
        use tonic::Code;
        match code {
            Code::Ok => ErrorKind::Unknown, // Shouldn't happen
            Code::Cancelled => ErrorKind::Cancelled,
            Code::Unknown => ErrorKind::Unknown,
            Code::InvalidArgument => ErrorKind::InvalidArgument,
            Code::DeadlineExceeded => ErrorKind::Timeout,
            Code::NotFound => ErrorKind::NotFound,
            Code::AlreadyExists => ErrorKind::Conflict,
            Code::PermissionDenied => ErrorKind::Forbidden,
            Code::ResourceExhausted => ErrorKind::RateLimited,
            Code::FailedPrecondition => ErrorKind::SchemaViolation,
            Code::Aborted => ErrorKind::Conflict,
            Code::OutOfRange => ErrorKind::InvalidArgument,
            Code::Unimplemented => ErrorKind::Protocol,
            Code::Internal => ErrorKind::Internal,
            Code::Unavailable => ErrorKind::Unavailable,
            Code::DataLoss => ErrorKind::Internal,
            Code::Unauthenticated => ErrorKind::Unauthorized,
        }
    }
}

/// Where in the request pipeline an error was raised.
///
/// Only [`ErrorClass::Transport`] errors evict the cached client: they are the
/// only ones raised after a live connection was actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorClass {
    /// Bad arguments at the boundary. No cache or network access happened.
    #[error("argument error")]
    Argument,

    /// Malformed tuple-list payload. No cache or network access happened.
    #[error("decoding error")]
    Decoding,

    /// The client for a store key could not be resolved. Nothing was cached.
    #[error("resolution error")]
    Resolution,

    /// An RPC against a resolved client failed.
    #[error("transport error")]
    Transport,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use test_case::test_case;
    use tonic::Code;

    use super::*;

    #[test_case(Code::Cancelled, ErrorKind::Cancelled)]
    #[test_case(Code::Unknown, ErrorKind::Unknown)]
    #[test_case(Code::InvalidArgument, ErrorKind::InvalidArgument)]
    #[test_case(Code::DeadlineExceeded, ErrorKind::Timeout)]
    #[test_case(Code::NotFound, ErrorKind::NotFound)]
    #[test_case(Code::AlreadyExists, ErrorKind::Conflict)]
    #[test_case(Code::PermissionDenied, ErrorKind::Forbidden)]
    #[test_case(Code::ResourceExhausted, ErrorKind::RateLimited)]
    #[test_case(Code::FailedPrecondition, ErrorKind::SchemaViolation)]
    #[test_case(Code::Aborted, ErrorKind::Conflict)]
    #[test_case(Code::Unimplemented, ErrorKind::Protocol)]
    #[test_case(Code::Internal, ErrorKind::Internal)]
    #[test_case(Code::Unavailable, ErrorKind::Unavailable)]
    #[test_case(Code::DataLoss, ErrorKind::Internal)]
    #[test_case(Code::Unauthenticated, ErrorKind::Unauthorized)]
    fn test_from_grpc_code(code: Code, expected: ErrorKind) {
        assert_eq!(ErrorKind::from_grpc_code(code), expected);
    }

    #[test]
    fn test_default_class() {
        assert_eq!(ErrorKind::InvalidArgument.default_class(), ErrorClass::Argument);
        assert_eq!(ErrorKind::Decoding.default_class(), ErrorClass::Decoding);
        assert_eq!(ErrorKind::StoreNotFound.default_class(), ErrorClass::Resolution);
        assert_eq!(ErrorKind::Connection.default_class(), ErrorClass::Resolution);
        assert_eq!(ErrorKind::Configuration.default_class(), ErrorClass::Resolution);
        assert_eq!(ErrorKind::Timeout.default_class(), ErrorClass::Transport);
        assert_eq!(ErrorKind::Unavailable.default_class(), ErrorClass::Transport);
        assert_eq!(ErrorKind::NotFound.default_class(), ErrorClass::Transport);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorKind::StoreNotFound.to_string(), "store not found");
        assert_eq!(ErrorKind::Decoding.to_string(), "decoding error");
        assert_eq!(ErrorKind::Unavailable.to_string(), "service unavailable");
        assert_eq!(ErrorClass::Transport.to_string(), "transport error");
    }
}
