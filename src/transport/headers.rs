//! Header utilities for provider calls
//!
//! Every provider call carries a bearer credential and an explicit accept
//! type. Downloads of generated assets carry neither.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::error::{ToolsError, ToolsResult};

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_AUDIO: &str = "audio/mpeg";

/// Build default headers for provider requests
pub fn build_default_headers(api_key: &str, accept: &'static str) -> ToolsResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
        ToolsError::InvalidRequest("API key contains characters not allowed in a header".to_string())
    })?;
    bearer.set_sensitive(true);

    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static(accept));

    Ok(headers)
}
