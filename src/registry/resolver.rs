//! Per-group resolver task
//!
//! One resolver is spawned for every group the registry opens. It sleeps out
//! the accumulation window, closes the window, looks the key up in the cache
//! and streams whatever it finds into the group.
//!
//! The registry lock is released as soon as the window is closed; the cache
//! lookup and all streaming run without it.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;

use crate::broadcast::{BroadcastWriter, Outcome};
use crate::cache::{CacheEntry, ContentCache, ContentReader};
use crate::error::Result;

use super::store::MultiSender;

/// Signals group completion on drop, so waiters are released even if the
/// resolver unwinds.
struct CompletionGuard<'a> {
    group: &'a BroadcastWriter,
    outcome: Option<Outcome>,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.group.finish(self.outcome.take());
    }
}

/// Spawn the resolver for a freshly opened group
pub(super) fn spawn<C: ContentCache>(
    sender: Arc<MultiSender<C>>,
    key: String,
    group: Arc<BroadcastWriter>,
) {
    tokio::spawn(async move {
        resolve(&sender, &key, &group).await;
    });
}

async fn resolve<C: ContentCache>(sender: &MultiSender<C>, key: &str, group: &BroadcastWriter) {
    let mut completion = CompletionGuard {
        group,
        outcome: None,
    };

    tokio::time::sleep(sender.config().accumulation_window).await;

    let destinations = sender.close_window(key).await;

    let outcome = match fetch(sender.cache(), key).await {
        Ok(entry) => deliver(entry, group, sender.config().chunk_size).await,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Cache lookup failed, nothing delivered");
            Outcome::Missing
        }
    };

    match outcome {
        Outcome::Delivered { bytes } => {
            tracing::info!(
                key = %key,
                bytes = bytes,
                destinations = destinations,
                "Group resolved"
            );
        }
        Outcome::Interrupted { bytes } => {
            tracing::warn!(key = %key, bytes = bytes, "Group resolution interrupted");
        }
        Outcome::Missing => {}
    }

    completion.outcome = Some(outcome);
}

async fn fetch<C: ContentCache>(cache: &C, key: &str) -> Result<CacheEntry> {
    Ok(cache.lookup(key).await?)
}

/// Stream an entry into the group, releasing it afterwards
async fn deliver(entry: CacheEntry, group: &BroadcastWriter, chunk_size: usize) -> Outcome {
    let CacheEntry {
        mut reader,
        release,
    } = entry;

    let mut sent = 0u64;
    let outcome = match stream(&mut reader, group, chunk_size, &mut sent).await {
        Ok(()) => Outcome::Delivered { bytes: sent },
        Err(e) => {
            tracing::warn!(error = %e, bytes = sent, "Content read failed");
            Outcome::Interrupted { bytes: sent }
        }
    };

    drop(reader);
    release.release();

    outcome
}

/// Fan the reader out chunk by chunk, then flush whatever was written,
/// including after a read error.
async fn stream(
    reader: &mut ContentReader,
    group: &BroadcastWriter,
    chunk_size: usize,
    sent: &mut u64,
) -> Result<()> {
    let copied = copy_chunks(reader, group, chunk_size, sent).await;
    group.flush().await?;
    copied
}

async fn copy_chunks(
    reader: &mut ContentReader,
    group: &BroadcastWriter,
    chunk_size: usize,
    sent: &mut u64,
) -> Result<()> {
    let mut buf = BytesMut::with_capacity(chunk_size);

    loop {
        buf.clear();
        if reader.read_buf(&mut buf).await? == 0 {
            return Ok(());
        }

        group.write(&buf).await?;
        *sent += buf.len() as u64;
    }
}
