//! Broadcast writer
//!
//! A [`BroadcastWriter`] holds the destinations waiting on one key's content
//! and fans every buffer out to all of them.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{watch, Mutex};

/// A boxed destination sink
pub type Destination = Box<dyn AsyncWrite + Send + Unpin>;

/// How a group's resolution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All content was streamed to the group
    Delivered {
        /// Bytes read from the cache and fanned out
        bytes: u64,
    },
    /// The cache lookup failed, nothing was delivered
    Missing,
    /// Reading the content failed part way through
    Interrupted {
        /// Bytes fanned out before the read error
        bytes: u64,
    },
}

#[derive(Debug, Default)]
struct Completion {
    pending: usize,
    outcome: Option<Outcome>,
}

#[derive(Clone, Copy)]
enum Op<'a> {
    Write(&'a [u8]),
    Flush,
}

/// Fan-out writer shared by every destination in one broadcast group
///
/// Destinations that fail a write or flush are removed and never retried.
/// Failures are never reported to the caller of [`write`](Self::write).
pub struct BroadcastWriter {
    /// Current destinations, in insertion order until the first prune
    destinations: Mutex<Vec<Destination>>,

    /// Pending resolver count and recorded outcome
    completion: watch::Sender<Completion>,
}

impl BroadcastWriter {
    /// Create an empty writer with nothing pending
    pub fn new() -> Self {
        let (completion, _) = watch::channel(Completion::default());

        Self {
            destinations: Mutex::new(Vec::new()),
            completion,
        }
    }

    /// Register a destination
    pub async fn add_destination<W>(&self, destination: W)
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        self.destinations.lock().await.push(Box::new(destination));
    }

    /// Number of destinations that have not failed yet
    pub async fn destination_count(&self) -> usize {
        self.destinations.lock().await.len()
    }

    /// Write `buf` to every destination
    ///
    /// Always reports the full buffer as accepted.
    pub async fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.apply(Op::Write(buf)).await;
        Ok(buf.len())
    }

    /// Flush every destination, pruning those that fail
    pub async fn flush(&self) -> io::Result<()> {
        self.apply(Op::Flush).await;
        Ok(())
    }

    async fn apply(&self, op: Op<'_>) {
        let mut destinations = self.destinations.lock().await;

        let mut i = 0;
        while i < destinations.len() {
            let result = match op {
                Op::Write(buf) => destinations[i].write_all(buf).await,
                Op::Flush => destinations[i].flush().await,
            };

            match result {
                Ok(()) => i += 1,
                Err(e) => {
                    // The last destination moves into slot i, so i is visited again
                    destinations.swap_remove(i);
                    tracing::debug!(
                        error = %e,
                        remaining = destinations.len(),
                        "Destination failed, removed from group"
                    );
                }
            }
        }
    }

    /// Register a resolver that must finish before [`wait`](Self::wait) returns
    pub fn mark_pending(&self) {
        self.completion.send_modify(|c| c.pending += 1);
    }

    /// Signal that a resolver has finished
    pub fn mark_done(&self) {
        self.completion.send_modify(|c| c.pending = c.pending.saturating_sub(1));
    }

    /// Record the outcome and signal completion
    pub(crate) fn finish(&self, outcome: Option<Outcome>) {
        self.completion.send_modify(|c| {
            if outcome.is_some() {
                c.outcome = outcome;
            }
            c.pending = c.pending.saturating_sub(1);
        });
    }

    /// Whether no resolver is pending
    pub fn is_done(&self) -> bool {
        self.completion.borrow().pending == 0
    }

    /// Outcome of the resolution, once it has finished
    pub fn outcome(&self) -> Option<Outcome> {
        self.completion.borrow().outcome
    }

    /// Wait until every pending resolver has finished
    ///
    /// Returns immediately if nothing is pending.
    pub async fn wait(&self) {
        let mut rx = self.completion.subscribe();
        // The sender lives in self, so the channel cannot close here
        let _ = rx.wait_for(|c| c.pending == 0).await;
    }

    /// Wait for completion and return the recorded outcome
    pub async fn wait_outcome(&self) -> Option<Outcome> {
        self.wait().await;
        self.outcome()
    }
}

impl Default for BroadcastWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BroadcastWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let completion = self.completion.borrow();
        f.debug_struct("BroadcastWriter")
            .field("pending", &completion.pending)
            .field("outcome", &completion.outcome)
            .finish_non_exhaustive()
    }
}
