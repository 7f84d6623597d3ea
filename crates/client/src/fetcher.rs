//! Conditional fetch orchestration.
//!
//! [`CachedFetcher`] is the facade callers use. Each call:
//!
//! 1. Builds the canonical request from the endpoint and the ordered query
//!    parameters, and derives the cache key from it.
//! 2. Reads the stored entry (unreadable records count as absent).
//! 3. Asks the [`FreshnessPolicy`] whether to serve it or go to the network.
//! 4. Makes at most one transport call and resolves the reply against the
//!    stored entry.
//! 5. Decodes the chosen body and, for new or revalidated bodies, writes the
//!    entry back.
//!
//! Store writes happen only after a reply has been decoded, so dropping the
//! future mid-request, or a transport reporting cancellation, leaves the
//! store as it was. Concurrent fetches for one key are not coalesced; the
//! last writer wins and each write is atomic.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use modelcat_core::{
    AppConfig, CacheEntry, CacheStore, CanonicalRequest, Clock, ConfigError, Decision, Error, FreshnessPolicy, Reply,
    Resolution, SystemClock,
};
use url::Url;

use crate::decode::Decoder;
use crate::transport::{Transport, TransportError, TransportRequest};

/// Parameters that identify one request shape.
pub trait RequestParams {
    /// Query parameters in their declared order. Absent optional parameters
    /// are left out rather than sent empty.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    /// Reject parameters before any cache or network work.
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// Where a fetched value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Fresh entry served without a network call.
    Cache,
    /// New body from the server.
    Network,
    /// Server answered not-modified; stored body served.
    Revalidated,
    /// Network attempt failed; stored body served as a fallback.
    Stale,
}

/// A decoded value plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

/// Immutable fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    endpoint: Url,
    cache_dir: PathBuf,
    policy: FreshnessPolicy,
    clock: Arc<dyn Clock>,
}

impl FetcherConfig {
    /// Defaults: conditional validation and stale fallback on, 6h TTL, wall clock.
    pub fn new(endpoint: Url, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            endpoint,
            cache_dir: cache_dir.into(),
            policy: FreshnessPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.policy.ttl = ttl;
        self
    }

    pub fn with_conditional_validation(mut self, enabled: bool) -> Self {
        self.policy.conditional_validation = enabled;
        self
    }

    pub fn with_stale_on_error(mut self, enabled: bool) -> Self {
        self.policy.stale_on_error = enabled;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }
}

impl TryFrom<&AppConfig> for FetcherConfig {
    type Error = ConfigError;

    fn try_from(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: config.endpoint_url()?,
            cache_dir: config.resolved_cache_dir()?,
            policy: config.freshness_policy(),
            clock: Arc::new(SystemClock),
        })
    }
}

/// Cache-aware fetcher for one endpoint.
pub struct CachedFetcher<D> {
    config: FetcherConfig,
    store: CacheStore,
    transport: Arc<dyn Transport>,
    decoder: D,
}

impl<D: Decoder> CachedFetcher<D> {
    pub fn new(config: FetcherConfig, transport: Arc<dyn Transport>, decoder: D) -> Self {
        let store = CacheStore::new(config.cache_dir.clone());
        Self { config, store, transport, decoder }
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Canonical request for `params`.
    pub fn request_for<P: RequestParams + ?Sized>(&self, params: &P) -> CanonicalRequest {
        CanonicalRequest::new(&self.config.endpoint, params.query_pairs())
    }

    /// Fetch and decode the payload for `params`.
    pub async fn fetch<P: RequestParams + ?Sized>(&self, params: &P) -> Result<D::Output, Error> {
        self.fetch_with_source(params).await.map(|fetched| fetched.value)
    }

    /// Like [`fetch`](Self::fetch), also reporting where the value came from.
    pub async fn fetch_with_source<P: RequestParams + ?Sized>(&self, params: &P) -> Result<Fetched<D::Output>, Error> {
        params.validate()?;

        let request = self.request_for(params);
        let key = request.key();
        let policy = &self.config.policy;
        let mut cached = self.store.get(&key);

        let validator = match policy.decide(cached.as_ref(), self.config.clock.now()) {
            Decision::Serve => {
                if let Some(value) = cached.as_ref().and_then(|entry| self.decode_stored(entry)) {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(Fetched { value, source: Source::Cache });
                }
                cached = None;
                None
            }
            Decision::Contact { validator } => validator,
        };

        tracing::debug!(
            key = %key,
            url = %request.url(),
            cached = cached.is_some(),
            conditional = validator.is_some(),
            "contacting catalog endpoint"
        );

        let transport_request = TransportRequest { url: request.url().clone(), if_none_match: validator };
        let reply = match self.transport.get(&transport_request).await {
            Ok(response) => response.into_reply(),
            Err(TransportError::Cancelled) => return Err(Error::Cancelled),
            Err(err) => Reply::Failed(err.into()),
        };

        match policy.resolve(&key, cached, reply, self.config.clock.now()) {
            Resolution::Replace(entry) => {
                let value = self.decoder.decode(&entry.body)?;
                self.persist(&entry);
                Ok(Fetched { value, source: Source::Network })
            }
            Resolution::Refresh(entry) => {
                // The stored record is left as it was when its body no longer decodes.
                let value = self.decoder.decode(&entry.body)?;
                self.persist(&entry);
                Ok(Fetched { value, source: Source::Revalidated })
            }
            Resolution::Fallback { entry, cause } => match self.decode_stored(&entry) {
                Some(value) => {
                    tracing::warn!(
                        key = %key,
                        error = %cause,
                        stored_at = %entry.stored_at,
                        "serving stale cache entry after failed fetch"
                    );
                    Ok(Fetched { value, source: Source::Stale })
                }
                None => Err(cause),
            },
            Resolution::Fail(err) => Err(err),
        }
    }

    /// Delete the stored entry for `params`. Returns whether one was removed.
    pub fn invalidate<P: RequestParams + ?Sized>(&self, params: &P) -> bool {
        self.remove(&self.request_for(params).key())
    }

    /// Delete every stored entry. Returns the number removed.
    pub fn invalidate_all(&self) -> usize {
        match self.store.clear() {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(dir = %self.store.dir().display(), error = %e, "failed to clear cache");
                0
            }
        }
    }

    fn decode_stored(&self, entry: &CacheEntry) -> Option<D::Output> {
        match self.decoder.decode(&entry.body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key = %entry.key, error = %e, "stored body no longer decodes");
                None
            }
        }
    }

    fn persist(&self, entry: &CacheEntry) {
        if let Err(e) = self.store.put(entry) {
            tracing::warn!(key = %entry.key, error = %e, "failed to write cache entry");
        }
    }

    fn remove(&self, key: &str) -> bool {
        match self.store.delete(key) {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to delete cache entry");
                false
            }
        }
    }
}
