//! Cache entry and its on-disk record format.
//!
//! A record is one line of compact JSON metadata followed by the raw body:
//!
//! ```text
//! {"key":"<sha256 hex>","stored_at":1735689600,"validator":"\"v1\""}\n<body bytes>
//! ```
//!
//! The body is written verbatim, so a read returns exactly the bytes the
//! server sent.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::store::CacheIoError;

/// One cached response for one request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// SHA-256 hex of the canonical request.
    pub key: String,
    /// When the entry was last written or revalidated (whole seconds).
    pub stored_at: DateTime<Utc>,
    /// Entity tag from the server, if it sent one.
    pub validator: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordHeader {
    key: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    stored_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validator: Option<String>,
}

impl CacheEntry {
    /// Create an entry. `stored_at` is truncated to whole seconds to match
    /// what the record format keeps.
    pub fn new(key: impl Into<String>, body: Vec<u8>, validator: Option<String>, stored_at: DateTime<Utc>) -> Self {
        Self { key: key.into(), stored_at: stored_at.trunc_subsecs(0), validator, body }
    }

    /// Same body and validator, stamped with a new store time.
    pub fn refreshed(self, now: DateTime<Utc>) -> Self {
        Self { stored_at: now.trunc_subsecs(0), ..self }
    }

    /// Serialize to the on-disk record format.
    pub fn to_record(&self) -> Result<Vec<u8>, CacheIoError> {
        let header = RecordHeader { key: self.key.clone(), stored_at: self.stored_at, validator: self.validator.clone() };
        let mut record = serde_json::to_vec(&header).map_err(|e| CacheIoError::Corrupt(e.to_string()))?;
        record.push(b'\n');
        record.extend_from_slice(&self.body);
        Ok(record)
    }

    /// Parse an on-disk record.
    pub fn from_record(record: &[u8]) -> Result<Self, CacheIoError> {
        let split = record
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| CacheIoError::Corrupt("missing header terminator".into()))?;

        let header: RecordHeader =
            serde_json::from_slice(&record[..split]).map_err(|e| CacheIoError::Corrupt(e.to_string()))?;

        Ok(Self {
            key: header.key,
            stored_at: header.stored_at,
            validator: header.validator,
            body: record[split + 1..].to_vec(),
        })
    }
}
