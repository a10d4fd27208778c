//! In-memory object store for testing
//!
//! Stands in for the blob service so speech-to-blob flows can be exercised
//! without a storage account.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use super::ObjectStore;
use crate::error::{ToolsError, ToolsResult};

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-memory object store
///
/// Uploading into a container that was never ensured fails, the same way
/// the real service answers 404 for a missing container.
pub struct InMemoryObjectStore {
    base_url: String,
    containers: RwLock<HashSet<String>>,
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl InMemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            containers: RwLock::new(HashSet::new()),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.containers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(container)
    }

    pub fn get(&self, container: &str, object_name: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(container.to_string(), object_name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new("memory://store")
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    async fn ensure_container(&self, container: &str) -> ToolsResult<()> {
        self.containers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(container.to_string());
        Ok(())
    }

    async fn upload(
        &self,
        container: &str,
        object_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> ToolsResult<String> {
        if !self.has_container(container) {
            return Err(ToolsError::Storage(format!(
                "container not found: {}",
                container
            )));
        }

        self.objects.write().unwrap_or_else(|e| e.into_inner()).insert(
            (container.to_string(), object_name.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(format!("{}/{}/{}", self.base_url, container, object_name))
    }
}
