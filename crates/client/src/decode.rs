//! Payload decoding.
//!
//! Bytes are only accepted into the cache once they decode, so a decoder is
//! the schema gate for everything the fetcher stores or serves.

use std::marker::PhantomData;

use modelcat_core::Error;
use serde::de::DeserializeOwned;

/// Turns raw response bytes into a typed payload.
pub trait Decoder: Send + Sync {
    type Output;

    fn decode(&self, bytes: &[u8]) -> Result<Self::Output, Error>;
}

/// serde_json decoder for any `DeserializeOwned` payload.
pub struct JsonDecoder<T> {
    _payload: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self { _payload: PhantomData }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDecoder").field("payload", &std::any::type_name::<T>()).finish()
    }
}

impl<T: DeserializeOwned> Decoder for JsonDecoder<T> {
    type Output = T;

    fn decode(&self, bytes: &[u8]) -> Result<T, Error> {
        serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
    }
}
