//! Coalescing registry implementation
//!
//! Maps each resource key to the broadcast group whose accumulation window is
//! still open, and starts one resolver per group.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::AsyncWrite;
use tokio::sync::Mutex;

use crate::broadcast::BroadcastWriter;
use crate::cache::ContentCache;
use crate::config::SenderConfig;

use super::resolver;

/// Coalescing registry for all open broadcast groups
///
/// Requests for the same key that arrive within one accumulation window share
/// a single group and a single cache lookup. The window is anchored to the
/// first request and is never extended by later joiners.
pub struct MultiSender<C: ContentCache> {
    /// Map of resource key to its open group
    groups: Mutex<HashMap<String, Arc<BroadcastWriter>>>,

    /// Backing cache
    cache: Arc<C>,

    /// Configuration
    config: SenderConfig,
}

impl<C: ContentCache> MultiSender<C> {
    /// Create a sender with the default one second window
    pub fn new(cache: C) -> Self {
        Self::with_config(cache, SenderConfig::default())
    }

    /// Create a sender with custom configuration
    pub fn with_config(cache: C, config: SenderConfig) -> Self {
        Self::with_shared_cache(Arc::new(cache), config)
    }

    /// Create a sender over a cache that is shared with other owners
    pub fn with_shared_cache(cache: Arc<C>, config: SenderConfig) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            cache,
            config,
        }
    }

    /// Get the sender configuration
    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Get the backing cache
    pub fn cache(&self) -> &Arc<C> {
        &self.cache
    }

    /// Enroll `destination` to receive the content for `key`
    ///
    /// Joins the open group for `key` if there is one, otherwise opens a new
    /// group and spawns its resolver. Wait on the returned writer to know when
    /// delivery has finished.
    ///
    /// Must be called within a Tokio runtime.
    pub async fn add<W>(self: &Arc<Self>, key: &str, destination: W) -> Arc<BroadcastWriter>
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let mut groups = self.groups.lock().await;

        let group = match groups.get(key) {
            Some(group) => {
                tracing::debug!(key = %key, "Destination joined open group");
                Arc::clone(group)
            }
            None => {
                let group = Arc::new(BroadcastWriter::new());
                group.mark_pending();
                groups.insert(key.to_owned(), Arc::clone(&group));

                tracing::info!(
                    key = %key,
                    window_ms = self.config.accumulation_window.as_millis() as u64,
                    open_groups = groups.len(),
                    "Opened broadcast group"
                );

                resolver::spawn(Arc::clone(self), key.to_owned(), Arc::clone(&group));
                group
            }
        };

        // Still under the registry lock, so the resolver cannot close the
        // window between lookup and enrollment.
        group.add_destination(destination).await;

        group
    }

    /// Close the window for `key`, returning the number of enrolled destinations
    pub(super) async fn close_window(&self, key: &str) -> usize {
        let group = self.groups.lock().await.remove(key);

        match group {
            Some(group) => group.destination_count().await,
            None => 0,
        }
    }

    /// Number of keys with an open window
    pub async fn open_groups(&self) -> usize {
        self.groups.lock().await.len()
    }

    /// Whether `key` currently has an open window
    pub async fn is_open(&self, key: &str) -> bool {
        self.groups.lock().await.contains_key(key)
    }
}

impl<C: ContentCache> std::fmt::Debug for MultiSender<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiSender")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
