//! Model catalog endpoint types.
//!
//! - **Request**: optional `plan`, `mode`, `provider` and `q` filters, always
//!   serialized in that order so equal filters share a cache entry.
//! - **Response**: `{ success, data: { providers, models } }`.

pub mod query;
pub mod response;

pub use query::CatalogQuery;
pub use response::{CatalogData, CatalogResponse, ModelRecord, Pricing};
