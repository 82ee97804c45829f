//! Broadcast groups
//!
//! A broadcast group is the set of destinations waiting on one key within one
//! accumulation window. The resolver drives content into the group through a
//! single [`BroadcastWriter`], which copies every buffer to each destination
//! and silently drops any destination that fails.

pub mod writer;

pub use writer::{BroadcastWriter, Destination, Outcome};
