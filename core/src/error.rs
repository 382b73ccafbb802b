//! Error types for the CRUD client.
//!
//! # Design
//! Every failure surfaces to the caller; nothing is retried or recovered at
//! this layer. Caller mistakes (`InvalidArgument`) are raised before any
//! network call. Non-2xx responses land in `BadResponse` uniformly, whether
//! the call was a read or a write, so retry and idempotency decisions stay
//! with the caller.

use thiserror::Error;

/// Failures raised by a [`Transport`](crate::transport::Transport) while
/// performing a round trip. Passed through `ApiError::Transport` unchanged.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The call exceeded the transport's deadline.
    #[error("request timed out")]
    Timeout,

    /// DNS resolution, connect, or socket I/O failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Anything else the transport reports (TLS handshake, protocol errors).
    #[error("{0}")]
    Other(String),
}

/// Errors returned by `Endpoint` and `Scope` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed base URI, unsupported query shape, invalid header, or any
    /// other caller-input violation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport could not complete the round trip.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a status outside 2xx.
    #[error("{}", describe_bad_response(.status, .message, .body))]
    BadResponse {
        status: u16,
        message: String,
        body: String,
    },

    /// The response claimed to be JSON but the body did not parse.
    #[error("failed to parse JSON response: {0}")]
    Parse(String),
}

impl ApiError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ApiError::InvalidArgument(msg.into())
    }

    /// The HTTP status code, for `BadResponse` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn describe_bad_response(status: &u16, message: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{status} - {message}")
    } else {
        format!("{status} - {message}\n{body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_response_without_body() {
        let err = ApiError::BadResponse {
            status: 404,
            message: "Not Found".to_string(),
            body: String::new(),
        };
        assert_eq!(err.to_string(), "404 - Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn bad_response_appends_body() {
        let err = ApiError::BadResponse {
            status: 500,
            message: "Internal Server Error".to_string(),
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "500 - Internal Server Error\nboom");
    }

    #[test]
    fn transport_errors_convert() {
        let err: ApiError = TransportError::Timeout.into();
        assert!(matches!(err, ApiError::Transport(TransportError::Timeout)));
        assert_eq!(err.status(), None);
    }
}
