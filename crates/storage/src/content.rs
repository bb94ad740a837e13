//! Locally resolvable references to uploaded content.
//!
//! A reference is created when a simulated upload completes and stays resolvable
//! until it is released or the store is dropped.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use shared::domain::ContentRef;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create(&self, file_name: &str, bytes: Arc<[u8]>) -> ContentRef;
    async fn resolve(&self, content: ContentRef) -> Option<StoredContent>;
    /// Returns false when the reference was unknown or already released.
    async fn release(&self, content: ContentRef) -> bool;
}

#[derive(Clone, Default)]
pub struct MemoryContentStore {
    entries: Arc<RwLock<HashMap<ContentRef, StoredContent>>>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn create(&self, file_name: &str, bytes: Arc<[u8]>) -> ContentRef {
        let content = ContentRef::generate();
        debug!(%content, file_name, size_bytes = bytes.len(), "content reference created");
        self.entries.write().await.insert(
            content,
            StoredContent {
                file_name: file_name.to_string(),
                bytes,
            },
        );
        content
    }

    async fn resolve(&self, content: ContentRef) -> Option<StoredContent> {
        self.entries.read().await.get(&content).cloned()
    }

    async fn release(&self, content: ContentRef) -> bool {
        let released = self.entries.write().await.remove(&content).is_some();
        if released {
            debug!(%content, "content reference released");
        }
        released
    }
}
