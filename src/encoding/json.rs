//! JSON body serialization.

use bytes::Bytes;
use serde::Serialize;

use crate::error::WaymarkError;

/// Serialize a value into JSON body bytes.
pub fn encode_body<T: Serialize>(value: &T) -> Result<Bytes, WaymarkError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|e| WaymarkError::EncodingFailed(e.to_string()))
}
