//! File-backed cache for catalog responses.
//!
//! This module provides a persistent, content-addressed response cache on the
//! local filesystem. It supports:
//!
//! - Cache keys derived from a SHA-256 hash of the canonical request
//! - One record per key, replaced atomically on write
//! - Silent degradation: unreadable records read back as misses

pub mod entry;
pub mod hash;
pub mod request;
pub mod store;

pub use entry::CacheEntry;
pub use request::CanonicalRequest;
pub use store::{CacheIoError, CacheStore};
