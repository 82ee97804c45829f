//! Filesystem content cache
//!
//! Keys are relative paths under a root directory. Keys that would resolve
//! outside the root are rejected before touching the filesystem.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs::File;

use super::{CacheEntry, ContentCache};
use crate::error::CacheError;

/// Content cache that serves files below a root directory
#[derive(Debug, Clone)]
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Create a cache rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path below the root
    pub fn resolve(&self, key: &str) -> Result<PathBuf, CacheError> {
        let relative = Path::new(key);
        let mut path = self.root.clone();
        let mut depth = 0usize;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(CacheError::InvalidKey(key.to_owned()));
                }
            }
        }

        if depth == 0 {
            return Err(CacheError::InvalidKey(key.to_owned()));
        }

        Ok(path)
    }
}

impl ContentCache for FileCache {
    async fn lookup(&self, key: &str) -> Result<CacheEntry, CacheError> {
        let path = self.resolve(key)?;

        let file = File::open(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CacheError::NotFound(key.to_owned()),
            _ => CacheError::Io(e),
        })?;

        if !file.metadata().await?.is_file() {
            return Err(CacheError::NotFound(key.to_owned()));
        }

        tracing::debug!(key = %key, path = %path.display(), "Opened cached file");

        Ok(CacheEntry::new(file))
    }
}
