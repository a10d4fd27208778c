//! Response normalization
//!
//! Maps a raw transport outcome into a [`ToolsResult`]:
//!
//! - 2xx with a body of the expected shape: `Ok`
//! - 2xx with a body that does not parse: [`ToolsError::Deserialization`]
//! - any other status: [`ToolsError::Provider`] carrying the raw body text
//! - no response at all: [`ToolsError::Transport`]
//!
//! Nothing here panics on provider data.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{ToolsError, ToolsResult};
use crate::transport::{TransportError, TransportResponse};

/// Normalize a JSON response
pub fn normalize_json<T>(outcome: Result<TransportResponse, TransportError>) -> ToolsResult<T>
where
    T: DeserializeOwned,
{
    let body = normalize_bytes(outcome)?;
    serde_json::from_slice(&body).map_err(|e| ToolsError::Deserialization(e.to_string()))
}

/// Normalize a response whose success body is opaque bytes (audio, images)
pub fn normalize_bytes(outcome: Result<TransportResponse, TransportError>) -> ToolsResult<Bytes> {
    let response = outcome?;
    if response.status.is_success() {
        Ok(response.body)
    } else {
        Err(ToolsError::Provider {
            status: response.status.as_u16(),
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }
}
