//! Transport error types.

use modelcat_core::Error;

/// Failures raised by a transport before any status code is available.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS or TLS failure.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// The request was cancelled before a response arrived.
    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { TransportError::Timeout } else { TransportError::Network(err.to_string()) }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(msg) => Error::Transport(msg),
            TransportError::Timeout => Error::Timeout("request timeout".into()),
            TransportError::Cancelled => Error::Cancelled,
        }
    }
}
