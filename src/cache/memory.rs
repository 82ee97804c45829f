//! In-memory content cache

use std::collections::HashMap;
use std::io::Cursor;

use bytes::Bytes;
use tokio::sync::RwLock;

use super::{CacheEntry, ContentCache};
use crate::error::CacheError;

/// Content cache backed by a map of `Bytes`
///
/// Lookups share the stored allocation, so serving a key never copies it.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Bytes>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store content under `key`, returning the previous content if any
    pub async fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) -> Option<Bytes> {
        self.entries.write().await.insert(key.into(), data.into())
    }

    /// Remove the content stored under `key`
    pub async fn remove(&self, key: &str) -> Option<Bytes> {
        self.entries.write().await.remove(key)
    }

    /// Get the content stored under `key`
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.read().await.get(key).cloned()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl ContentCache for MemoryCache {
    async fn lookup(&self, key: &str) -> Result<CacheEntry, CacheError> {
        let data = self
            .get(key)
            .await
            .ok_or_else(|| CacheError::NotFound(key.to_owned()))?;

        Ok(CacheEntry::new(Cursor::new(data)))
    }
}
