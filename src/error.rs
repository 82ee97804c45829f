//! Error types
//!
//! Failures here never reach destinations or `wait()` callers. They surface
//! through cache lookups and the recorded [`Outcome`](crate::broadcast::Outcome).

use std::io;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// Backing cache failed to resolve a key
    Cache(CacheError),
    /// I/O error while streaming content
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Cache(e) => write!(f, "Cache error: {}", e),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Cache(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<CacheError> for Error {
    fn from(e: CacheError) -> Self {
        Error::Cache(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Error returned by a [`ContentCache`](crate::cache::ContentCache) lookup
#[derive(Debug)]
pub enum CacheError {
    /// No content stored under this key
    NotFound(String),
    /// Key cannot be mapped to a cache location
    InvalidKey(String),
    /// Underlying storage failed
    Io(io::Error),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::NotFound(key) => write!(f, "Key not found: {}", key),
            CacheError::InvalidKey(key) => write!(f, "Invalid key: {}", key),
            CacheError::Io(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(e: io::Error) -> Self {
        CacheError::Io(e)
    }
}
