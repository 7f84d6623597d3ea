//! reqwest-backed transport.

use std::time::{Duration, Instant};

use reqwest::{Client, header};

use super::{Transport, TransportError, TransportRequest, TransportResponse};

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string (default: "modelcat/0.1")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Bearer token for the catalog endpoint
    pub auth_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { user_agent: "modelcat/0.1".to_string(), timeout: Duration::from_millis(20000), auth_token: None }
    }
}

/// HTTP transport over a single reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let start = Instant::now();

        let mut builder = self.http.get(request.url.clone()).header(header::ACCEPT, "application/json");
        if let Some(token) = &self.config.auth_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(validator) = &request.if_none_match {
            builder = builder.header(header::IF_NONE_MATCH, validator.as_str());
        }

        let response = builder.send().await?;

        let status = response.status();
        let etag = response
            .headers()
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let body = response.bytes().await?;

        tracing::debug!(
            url = %request.url,
            status = status.as_u16(),
            conditional = request.if_none_match.is_some(),
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog request completed"
        );

        Ok(TransportResponse { status, etag, body })
    }
}
