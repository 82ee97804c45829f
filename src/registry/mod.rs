//! Coalescing registry
//!
//! The registry groups requests for the same key that arrive close together
//! and serves them from a single cache lookup.
//!
//! # Architecture
//!
//! ```text
//!                        Arc<MultiSender>
//!                 ┌──────────────────────────────┐
//!                 │ groups: HashMap<Key,         │
//!                 │   Arc<BroadcastWriter>>      │
//!                 │ cache: Arc<ContentCache>     │
//!                 └──────────────┬───────────────┘
//!                                │
//!       add(key, d1) ────────────┤ first request: open group, spawn resolver
//!       add(key, d2) ────────────┤ within window: join group
//!                                │
//!                                ▼
//!                           [Resolver]
//!               sleep(window) → close window → cache.lookup(key)
//!                                │
//!                                ▼
//!                  BroadcastWriter::write(chunk) ──► d1, d2, ...
//! ```
//!
//! # Window semantics
//!
//! The window starts with the first request for a key and is never extended.
//! Once the resolver closes it, the next request for the key opens a new
//! group with its own resolver and its own lookup.

mod resolver;
pub mod store;

pub use store::MultiSender;
