//! File-backed key/value store for JSON payloads.
//!
//! Each key lives in `<dir>/<key>.json`. Writes go through a temp file and
//! a rename while holding an advisory lock on `<key>.lock`, so a reader
//! never sees a half-written payload. Reads never fail: missing files and
//! unparseable payloads both come back as `None`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::key::CacheKey;

/// Errors from persisting a cache entry.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize cache payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache write task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: Arc<PathBuf>,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir.into()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    /// Read the raw payload for `key`.
    ///
    /// Missing or corrupt entries are a cache miss.
    pub async fn read(&self, key: CacheKey) -> Option<Value> {
        let path = self.entry_path(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt cache entry, treating as miss");
                None
            }
        }
    }

    /// Read and decode the payload for `key`. A shape mismatch is a miss.
    pub async fn read_as<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let value = self.read(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache entry has unexpected shape, treating as miss");
                None
            }
        }
    }

    /// Persist `value` under `key`, reporting failure to the caller.
    pub async fn try_write<T: Serialize + ?Sized>(
        &self,
        key: CacheKey,
        value: &T,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        let dir = Arc::clone(&self.dir);
        let path = self.entry_path(key);

        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, &bytes))
            .await
            .map_err(|e| CacheError::Task(e.to_string()))?
    }

    /// Persist `value` under `key`. Failures are logged and swallowed; the
    /// caller's in-memory state is already authoritative.
    pub async fn write<T: Serialize + ?Sized>(&self, key: CacheKey, value: &T) {
        if let Err(e) = self.try_write(key, value).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: io::Error| CacheError::Io { path, source }
    };

    fs::create_dir_all(dir).map_err(io_err(dir))?;

    let lock_path = path.with_extension("lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(io_err(&lock_path))?;
    FileExt::lock_exclusive(&lock_file).map_err(io_err(&lock_path))?;
    let lock_file = scopeguard::guard(lock_file, |file| {
        let _ = FileExt::unlock(&file);
    });

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, bytes).map_err(io_err(&tmp_path))?;
    fs::rename(&tmp_path, path).map_err(io_err(path))?;

    drop(lock_file);
    Ok(())
}
