//! Object storage for synthesized assets
//!
//! Speech output can be uploaded to a blob container. The store is an
//! external collaborator behind [`ObjectStore`]; the pipeline only needs
//! "make sure the container exists" and "upload these bytes, give me a URL".

pub mod blob;
#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;

use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ToolsError, ToolsResult};

pub use blob::HttpBlobStore;
#[cfg(any(test, feature = "test-utils"))]
pub use in_memory::InMemoryObjectStore;

/// Longest object name accepted by the store
pub const MAX_OBJECT_NAME_LEN: usize = 1024;

static DISALLOWED_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\-]").unwrap());

// Lowercase alphanumerics; single hyphens only between them
static CONTAINER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9](?:-?[a-z0-9])*$").unwrap());

/// Blob-style object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Create the container with public read access if it does not exist
    async fn ensure_container(&self, container: &str) -> ToolsResult<()>;

    /// Upload `data` and return the object's public URL
    async fn upload(
        &self,
        container: &str,
        object_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> ToolsResult<String>;
}

/// Make `name` safe to use as an object name
///
/// Every character outside `[A-Za-z0-9-]` becomes `-` and the result is
/// truncated to [`MAX_OBJECT_NAME_LEN`]. An empty name is rejected.
pub fn sanitize_object_name(name: &str) -> ToolsResult<String> {
    let mut sanitized = DISALLOWED_NAME_CHARS.replace_all(name, "-").into_owned();
    // Only ASCII survives the replacement, so byte length equals char count
    sanitized.truncate(MAX_OBJECT_NAME_LEN);

    if sanitized.is_empty() {
        return Err(ToolsError::InvalidRequest(
            "object name must not be empty".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Check that `container` is a valid container name
///
/// 3 to 63 lowercase letters, digits and single hyphens, starting and ending
/// with a letter or digit. Anything else (`/`, `?`, `&`, ...) would change
/// the request target once placed in a URL.
pub fn validate_container_name(container: &str) -> ToolsResult<()> {
    if (3..=63).contains(&container.len()) && CONTAINER_NAME.is_match(container) {
        Ok(())
    } else {
        Err(ToolsError::InvalidRequest(format!(
            "invalid container name: {:?}",
            container
        )))
    }
}
