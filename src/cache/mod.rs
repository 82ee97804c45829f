//! Backing cache interface
//!
//! The registry resolves each closed group's key through a [`ContentCache`].
//! A lookup hands back a readable stream plus an optional release callback
//! that runs once the resolver is done with the stream, whichever way it ends.

pub mod file;
pub mod memory;

use std::future::Future;
use std::sync::Arc;

use tokio::io::AsyncRead;

use crate::error::CacheError;

pub use file::FileCache;
pub use memory::MemoryCache;

/// A boxed content stream
pub type ContentReader = Box<dyn AsyncRead + Send + Unpin>;

/// Resolves a resource key to a content stream
pub trait ContentCache: Send + Sync + 'static {
    /// Look up `key`
    fn lookup(&self, key: &str) -> impl Future<Output = Result<CacheEntry, CacheError>> + Send;
}

impl<C: ContentCache> ContentCache for Arc<C> {
    fn lookup(&self, key: &str) -> impl Future<Output = Result<CacheEntry, CacheError>> + Send {
        (**self).lookup(key)
    }
}

/// Result of a successful cache lookup
pub struct CacheEntry {
    /// Content stream
    pub reader: ContentReader,

    /// Runs when dropped
    pub release: ReleaseGuard,
}

impl CacheEntry {
    /// Create an entry with nothing to release
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            reader: Box::new(reader),
            release: ReleaseGuard::none(),
        }
    }

    /// Attach a callback to run once the content has been consumed
    ///
    /// Replaces any earlier callback, which runs immediately.
    pub fn with_release<F>(mut self, release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.release = ReleaseGuard::new(release);
        self
    }

    /// Whether a release callback is attached
    pub fn has_release(&self) -> bool {
        self.release.is_armed()
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheEntry")
            .field("release", &self.release.is_armed())
            .finish_non_exhaustive()
    }
}

/// Runs a release callback exactly once, on drop
#[must_use = "dropping the guard runs the release immediately"]
pub struct ReleaseGuard(Option<Box<dyn FnOnce() + Send>>);

impl ReleaseGuard {
    /// Guard that runs `release` when dropped
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self(Some(Box::new(release)))
    }

    /// Guard with nothing to run
    pub fn none() -> Self {
        Self(None)
    }

    /// Whether a callback is still pending
    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    /// Run the callback now
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}
