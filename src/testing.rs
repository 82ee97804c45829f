//! Shared test fixtures

use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use tokio::io::AsyncWrite;

use crate::cache::{CacheEntry, ContentCache, MemoryCache};
use crate::error::CacheError;

/// Install a test log subscriber, filtered by `RUST_LOG`
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory destination whose contents stay readable after it is handed off
#[derive(Clone, Default)]
pub(crate) struct SharedSink {
    buf: Arc<Mutex<Vec<u8>>>,
    fail_flush: bool,
}

impl SharedSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_flush() -> Self {
        Self {
            fail_flush: true,
            ..Self::default()
        }
    }

    pub(crate) fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap().clone()
    }
}

impl AsyncWrite for SharedSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        if self.fail_flush {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "flush failed")))
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Memory cache that counts lookups and releases
#[derive(Default)]
pub(crate) struct CountingCache {
    inner: MemoryCache,
    lookups: AtomicUsize,
    releases: Arc<AtomicUsize>,
}

impl CountingCache {
    pub(crate) async fn with_entry(key: &str, data: &'static [u8]) -> Self {
        let cache = Self::default();
        cache.insert(key, data).await;
        cache
    }

    pub(crate) async fn insert(&self, key: &str, data: &'static [u8]) {
        self.inner.insert(key, Bytes::from_static(data)).await;
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl ContentCache for CountingCache {
    async fn lookup(&self, key: &str) -> Result<CacheEntry, CacheError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let releases = Arc::clone(&self.releases);
        let entry = self.inner.lookup(key).await?;
        Ok(entry.with_release(move || {
            releases.fetch_add(1, Ordering::SeqCst);
        }))
    }
}
