//! Core types and shared functionality for modelcat.
//!
//! This crate provides:
//! - File-backed, content-addressed response cache
//! - Freshness policy and revalidation state machine
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod policy;

pub use cache::{CacheEntry, CacheIoError, CacheStore, CanonicalRequest};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use policy::{Decision, FreshnessPolicy, Reply, Resolution};
