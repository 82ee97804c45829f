//! Coalescing broadcast for cached content
//!
//! Many consumers often request the same resource at nearly the same time.
//! [`MultiSender`] groups the requests for a key that arrive within an
//! accumulation window, reads the content from a [`ContentCache`] once, and
//! streams it to every enrolled destination.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use multisender::{MemoryCache, MultiSender, SenderConfig};
//!
//! # async fn example() {
//! let cache = MemoryCache::new();
//! cache.insert("video/chunk-0001", "chunk bytes").await;
//!
//! let config = SenderConfig::with_window(Duration::from_millis(50));
//! let sender = Arc::new(MultiSender::with_config(cache, config));
//!
//! // Both destinations share one lookup
//! let first = sender.add("video/chunk-0001", Vec::<u8>::new()).await;
//! let second = sender.add("video/chunk-0001", Vec::<u8>::new()).await;
//! assert!(Arc::ptr_eq(&first, &second));
//!
//! let outcome = first.wait_outcome().await;
//! println!("{:?}", outcome);
//! # }
//! ```
//!
//! # Failure handling
//!
//! - A destination that fails a write is dropped from its group; the other
//!   destinations keep receiving content.
//! - A failed cache lookup delivers nothing but still completes the group, so
//!   `wait()` never hangs. The result is visible through [`Outcome`].

pub mod broadcast;
pub mod cache;
pub mod config;
pub mod error;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{BroadcastWriter, Outcome};
pub use cache::{CacheEntry, ContentCache, FileCache, MemoryCache};
pub use config::SenderConfig;
pub use error::{CacheError, Error, Result};
pub use registry::MultiSender;
