//! Transport seam between the fetcher and the network.
//!
//! The fetcher only sees [`Transport`]: it hands over a GET target plus an
//! optional `If-None-Match` value and gets back a status, the response ETag
//! and the body. [`HttpTransport`] is the reqwest-backed implementation;
//! tests substitute scripted ones.
//!
//! ### Status handling
//! - 2xx: success with body
//! - 304: not modified, body ignored
//! - anything else: protocol error

pub mod error;
pub mod http;

pub use error::TransportError;
pub use http::{HttpConfig, HttpTransport};

use bytes::Bytes;
use modelcat_core::{Error, Reply};
use reqwest::StatusCode;
use url::Url;

/// A conditional GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Full target URL with ordered query parameters.
    pub url: Url,
    /// Stored validator to send as `If-None-Match`.
    pub if_none_match: Option<String>,
}

/// What came back from the server.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    /// `ETag` response header
    pub etag: Option<String>,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn new(status: StatusCode, etag: Option<String>, body: impl Into<Bytes>) -> Self {
        Self { status, etag, body: body.into() }
    }

    /// Classify the response for the freshness policy.
    pub fn into_reply(self) -> Reply {
        if self.status == StatusCode::NOT_MODIFIED {
            Reply::NotModified
        } else if self.status.is_success() {
            Reply::Modified { body: self.body.to_vec(), validator: self.etag }
        } else {
            Reply::Failed(Error::Protocol { status: self.status.as_u16() })
        }
    }
}

/// Capability to perform a single GET.
///
/// Implementations make exactly one attempt per call. Timeouts are the
/// implementation's responsibility and surface as [`TransportError::Timeout`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_is_modified() {
        let response = TransportResponse::new(StatusCode::OK, Some("\"v2\"".into()), "{}");
        match response.into_reply() {
            Reply::Modified { body, validator } => {
                assert_eq!(body, b"{}");
                assert_eq!(validator.as_deref(), Some("\"v2\""));
            }
            other => panic!("expected Modified, got {other:?}"),
        }
    }

    #[test]
    fn test_not_modified() {
        let response = TransportResponse::new(StatusCode::NOT_MODIFIED, Some("\"v1\"".into()), Bytes::new());
        assert!(matches!(response.into_reply(), Reply::NotModified));
    }

    #[test]
    fn test_other_status_is_protocol_error() {
        for status in [StatusCode::INTERNAL_SERVER_ERROR, StatusCode::NOT_FOUND, StatusCode::FOUND] {
            let response = TransportResponse::new(status, None, "oops");
            assert!(matches!(
                response.into_reply(),
                Reply::Failed(Error::Protocol { status: code }) if code == status.as_u16()
            ));
        }
    }
}
