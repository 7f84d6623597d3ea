//! Unified error types for modelcat.
//!
//! Variants fall into two groups: transport and protocol failures, which a
//! stored entry may stand in for, and decode failures or cancellation, which
//! always reach the caller.

/// Unified error type surfaced by the fetcher.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty filter value).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Connection, DNS or TLS failure.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Request did not complete within the transport timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    Timeout(String),

    /// Status code other than success or not-modified.
    #[error("HTTP_ERROR: status {status}")]
    Protocol { status: u16 },

    /// Response body failed schema decoding.
    #[error("DECODE_ERROR: {0}")]
    Decode(String),

    /// The transport call was cancelled before completing.
    #[error("CANCELLED")]
    Cancelled,
}

impl Error {
    /// Whether a stored entry may be served in place of this failure.
    pub fn allows_stale_fallback(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_) | Error::Protocol { .. })
    }
}
