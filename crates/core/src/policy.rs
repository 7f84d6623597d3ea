//! Freshness policy and revalidation state machine.
//!
//! Two protocols, picked by `conditional_validation`:
//!
//! - **Revalidate** (on): every call goes to the network. A stored validator
//!   is sent as `If-None-Match`; a not-modified answer keeps the stored body
//!   and restamps it. TTL is not consulted.
//! - **TTL** (off): entries younger than `ttl` are served without a network
//!   call. Older entries are refetched unconditionally.
//!
//! In both modes, when the network attempt fails with a transport or
//! protocol error and `stale_on_error` is set, any stored entry for the key
//! is served regardless of age. Decode failures never take that path.
//!
//! Everything here is pure: the fetcher performs the I/O that a
//! [`Decision`] or [`Resolution`] asks for.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::Error;
use crate::cache::CacheEntry;

/// Default TTL for catalog data: 6 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub ttl: Duration,
    pub conditional_validation: bool,
    pub stale_on_error: bool,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, conditional_validation: true, stale_on_error: true }
    }
}

/// What to do before touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Serve the stored entry without contacting the server.
    Serve,
    /// Contact the server, with a validator precondition if one is given.
    Contact { validator: Option<String> },
}

/// Outcome of a network attempt, reduced to what the policy needs.
#[derive(Debug)]
pub enum Reply {
    /// Success with a body.
    Modified { body: Vec<u8>, validator: Option<String> },
    /// The stored version is still current.
    NotModified,
    /// Transport, timeout or protocol failure.
    Failed(Error),
}

/// What to do after a network attempt.
#[derive(Debug)]
pub enum Resolution {
    /// New body from the server: write it, then return it.
    Replace(CacheEntry),
    /// Server confirmed the stored body: write the restamped entry, then return it.
    Refresh(CacheEntry),
    /// The attempt failed but the stored entry may stand in. No writes.
    Fallback { entry: CacheEntry, cause: Error },
    /// Nothing can be served.
    Fail(Error),
}

impl FreshnessPolicy {
    /// Whether `entry` is younger than the TTL at `now`.
    ///
    /// A `stored_at` in the future (clock moved backwards) counts as stale.
    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.stored_at)
            .to_std()
            .map(|elapsed| elapsed < self.ttl)
            .unwrap_or(false)
    }

    pub fn decide(&self, entry: Option<&CacheEntry>, now: DateTime<Utc>) -> Decision {
        match entry {
            Some(entry) if self.conditional_validation => Decision::Contact { validator: entry.validator.clone() },
            Some(entry) if self.is_fresh(entry, now) => Decision::Serve,
            _ => Decision::Contact { validator: None },
        }
    }

    pub fn resolve(&self, key: &str, cached: Option<CacheEntry>, reply: Reply, now: DateTime<Utc>) -> Resolution {
        match reply {
            Reply::Modified { body, validator } => Resolution::Replace(CacheEntry::new(key, body, validator, now)),
            Reply::NotModified => match cached {
                Some(entry) => Resolution::Refresh(entry.refreshed(now)),
                // 304 with nothing stored: the server answered a precondition we never sent.
                None => Resolution::Fail(Error::Protocol { status: 304 }),
            },
            Reply::Failed(cause) => self.on_failure(cached, cause),
        }
    }

    fn on_failure(&self, cached: Option<CacheEntry>, cause: Error) -> Resolution {
        match cached {
            Some(entry) if self.stale_on_error && cause.allows_stale_fallback() => Resolution::Fallback { entry, cause },
            _ => Resolution::Fail(cause),
        }
    }
}
