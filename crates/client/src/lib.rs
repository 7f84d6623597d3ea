//! Client code for modelcat.
//!
//! This crate provides the transport seam, payload decoding, catalog request
//! and response types, and the `CachedFetcher` that ties them to the on-disk
//! cache from `modelcat-core`.

pub mod catalog;
pub mod decode;
pub mod fetcher;
pub mod transport;

pub use catalog::{CatalogData, CatalogQuery, CatalogResponse, ModelRecord, Pricing};
pub use decode::{Decoder, JsonDecoder};
pub use fetcher::{CachedFetcher, Fetched, FetcherConfig, RequestParams, Source};
pub use transport::{HttpConfig, HttpTransport, Transport, TransportError, TransportRequest, TransportResponse};
