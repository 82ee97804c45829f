//! Sender configuration

use std::time::Duration;

/// Default accumulation window
pub const DEFAULT_ACCUMULATION_WINDOW: Duration = Duration::from_secs(1);

/// Default resolver read buffer size
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Configuration for a [`MultiSender`](crate::MultiSender)
#[derive(Debug, Clone)]
pub struct SenderConfig {
    /// How long a group stays open to joiners, measured from its first request
    pub accumulation_window: Duration,

    /// Size of each chunk read from the cache and fanned out
    pub chunk_size: usize,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            accumulation_window: DEFAULT_ACCUMULATION_WINDOW,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SenderConfig {
    /// Create a config with a custom accumulation window
    pub fn with_window(window: Duration) -> Self {
        Self {
            accumulation_window: window,
            ..Default::default()
        }
    }

    /// Set the accumulation window
    pub fn accumulation_window(mut self, window: Duration) -> Self {
        self.accumulation_window = window;
        self
    }

    /// Set the chunk size (at least one byte)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }
}
